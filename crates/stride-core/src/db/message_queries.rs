//! Conversation log queries.

use std::str::FromStr;

use jiff::Timestamp;
use rusqlite::{params, types::Type};

use crate::{
    error::{DatabaseResultExt, Result},
    models::{ConversationMessage, Role},
};

const INSERT_MESSAGE_SQL: &str =
    "INSERT INTO conversations (client_id, role, content, created_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_RECENT_SQL: &str = "SELECT id, client_id, role, content, created_at FROM conversations \
     WHERE client_id = ?1 AND role != 'system' ORDER BY id DESC LIMIT ?2";

impl super::Database {
    /// Appends one message to the conversation log. Never silent: storage
    /// errors propagate.
    pub fn append_message(
        &mut self,
        client_id: &str,
        role: Role,
        content: &str,
    ) -> Result<ConversationMessage> {
        let now = Timestamp::now();

        self.connection
            .execute(
                INSERT_MESSAGE_SQL,
                params![client_id, role.as_str(), content, now.to_string()],
            )
            .db_context("Failed to insert conversation message")?;

        Ok(ConversationMessage {
            id: self.connection.last_insert_rowid() as u64,
            client_id: client_id.to_string(),
            role,
            content: content.to_string(),
            created_at: now,
        })
    }

    /// Most recent messages for a client, most-recent-first, excluding
    /// system-role entries.
    pub fn recent_messages(&self, client_id: &str, limit: usize) -> Result<Vec<ConversationMessage>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_RECENT_SQL)
            .db_context("Failed to prepare recent-messages query")?;

        let rows = stmt
            .query_map(params![client_id, limit as i64], |row| {
                let role_str: String = row.get(2)?;
                let role = Role::from_str(&role_str).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        Type::Text,
                        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
                    )
                })?;

                Ok(ConversationMessage {
                    id: row.get::<_, i64>(0)? as u64,
                    client_id: row.get(1)?,
                    role,
                    content: row.get(3)?,
                    created_at: row.get::<_, String>(4)?.parse::<Timestamp>().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
                    })?,
                })
            })
            .db_context("Failed to query recent messages")?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row.db_context("Failed to read conversation row")?);
        }
        Ok(messages)
    }
}
