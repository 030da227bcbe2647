//! Plan version queries: current-plan lookup, atomic version commit,
//! history, and session reset.

use jiff::Timestamp;
use log::info;
use rusqlite::{params, types::Type, OptionalExtension, Row};

use crate::{
    error::{DatabaseResultExt, Result},
    models::{PlanDocument, PlanVersion, ResetSummary},
};

const PLAN_COLUMNS: &str = "id, client_id, version, plan_json, is_current, created_at";

fn plan_version_from_row(row: &Row<'_>) -> rusqlite::Result<PlanVersion> {
    let plan_json: String = row.get(3)?;
    let document: PlanDocument = serde_json::from_str(&plan_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

    Ok(PlanVersion {
        id: row.get::<_, i64>(0)? as u64,
        client_id: row.get(1)?,
        version: row.get::<_, i64>(2)? as u32,
        document,
        is_current: row.get(4)?,
        created_at: row
            .get::<_, String>(5)?
            .parse::<Timestamp>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?,
    })
}

impl super::Database {
    /// Returns the client's current plan version, if any.
    pub fn get_current_plan(&self, client_id: &str) -> Result<Option<PlanVersion>> {
        let sql =
            format!("SELECT {PLAN_COLUMNS} FROM plans WHERE client_id = ?1 AND is_current = 1");
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare current-plan query")?;

        stmt.query_row(params![client_id], plan_version_from_row)
            .optional()
            .db_context("Failed to query current plan")
    }

    /// Commits a new plan version for the client.
    ///
    /// Runs as a single transaction: all prior versions are demoted to
    /// non-current, then the new row is inserted with `MAX(version) + 1`
    /// (1 when none exist) and `is_current` set. Exactly one current version
    /// per client holds afterwards.
    pub fn commit_new_plan(&mut self, client_id: &str, document: &PlanDocument) -> Result<PlanVersion> {
        let plan_json = serde_json::to_string(document)?;

        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        tx.execute(
            "UPDATE plans SET is_current = 0 WHERE client_id = ?1",
            params![client_id],
        )
        .db_context("Failed to demote prior plan versions")?;

        let next_version: i64 = tx
            .query_row(
                "SELECT COALESCE(MAX(version), 0) + 1 FROM plans WHERE client_id = ?1",
                params![client_id],
                |row| row.get(0),
            )
            .db_context("Failed to determine next version number")?;

        let now = Timestamp::now();
        tx.execute(
            "INSERT INTO plans (client_id, version, plan_json, is_current, created_at) \
             VALUES (?1, ?2, ?3, 1, ?4)",
            params![client_id, next_version, plan_json, now.to_string()],
        )
        .db_context("Failed to insert plan version")?;

        let id = tx.last_insert_rowid() as u64;

        tx.commit().db_context("Failed to commit transaction")?;

        info!("Created plan version {next_version} for client {client_id}");

        Ok(PlanVersion {
            id,
            client_id: client_id.to_string(),
            version: next_version as u32,
            document: document.clone(),
            is_current: true,
            created_at: now,
        })
    }

    /// Plan versions for a client, most recent first.
    pub fn plan_history(&self, client_id: &str, limit: usize) -> Result<Vec<PlanVersion>> {
        let sql = format!(
            "SELECT {PLAN_COLUMNS} FROM plans WHERE client_id = ?1 ORDER BY version DESC LIMIT ?2"
        );
        let mut stmt = self
            .connection
            .prepare(&sql)
            .db_context("Failed to prepare plan-history query")?;

        let rows = stmt
            .query_map(params![client_id, limit as i64], plan_version_from_row)
            .db_context("Failed to query plan history")?;

        let mut versions = Vec::new();
        for row in rows {
            versions.push(row.db_context("Failed to read plan version row")?);
        }
        Ok(versions)
    }

    /// Deletes all conversations and plan versions for a client. Idempotent.
    pub fn reset_client(&mut self, client_id: &str) -> Result<ResetSummary> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let messages_deleted = tx
            .execute(
                "DELETE FROM conversations WHERE client_id = ?1",
                params![client_id],
            )
            .db_context("Failed to delete conversations")?;

        let plans_deleted = tx
            .execute("DELETE FROM plans WHERE client_id = ?1", params![client_id])
            .db_context("Failed to delete plans")?;

        tx.commit().db_context("Failed to commit transaction")?;

        info!(
            "Reset session for client {client_id}: {messages_deleted} conversations, \
             {plans_deleted} plans deleted"
        );

        Ok(ResetSummary {
            messages_deleted,
            plans_deleted,
        })
    }
}
