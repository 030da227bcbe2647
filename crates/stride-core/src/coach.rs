//! High-level coach API with async support.
//!
//! [`Coach`] orchestrates one chat turn end to end: record the user message,
//! assemble context, call the completion client, record the reply, extract
//! and validate a candidate plan, diff it against the current version, and
//! decide whether to commit. Database work runs on blocking tasks; the
//! completion client is injected rather than globally constructed.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{info, warn};
use tokio::task;

use crate::{
    context::{self, NoiseFilter, DEFAULT_HISTORY_LIMIT},
    db::Database,
    diff,
    error::{CoachError, Result},
    extract,
    llm::CompletionClient,
    models::{ChatOutcome, ConversationMessage, PlanVersion, ResetSummary, Role},
    prompts::SYSTEM_PROMPT,
    schema,
};

/// Assistant placeholder recorded after an upstream failure so the
/// conversation log stays continuous. The noise filter keeps it out of
/// future context.
const ERROR_PLACEHOLDER: &str = "Sorry, I encountered an error. Please try again.";

/// Main coaching interface.
pub struct Coach {
    db_path: PathBuf,
    client: Option<Arc<dyn CompletionClient>>,
    system_prompt: String,
    history_limit: usize,
    filter: NoiseFilter,
}

impl Coach {
    /// Processes one chat turn for a client.
    ///
    /// The user message is always recorded before the completion call; on
    /// upstream failure a placeholder assistant message is recorded for
    /// continuity and the error is surfaced. Extraction and validation
    /// failures never fail the turn: the explanation is still returned with
    /// the best available plan document.
    pub async fn chat(&self, client_id: &str, message: &str) -> Result<ChatOutcome> {
        if message.trim().is_empty() {
            return Err(CoachError::InvalidInput {
                field: "message".to_string(),
                reason: "message must be non-empty".to_string(),
            });
        }
        let client = self.client.clone().ok_or_else(|| CoachError::Configuration {
            message: "no completion client configured".to_string(),
        })?;

        // Read context state, then record the user message.
        let (current, history) = {
            let client_id = client_id.to_string();
            let message = message.to_string();
            let limit = self.history_limit;
            self.with_db(move |db| {
                let current = db.get_current_plan(&client_id)?;
                let history = db.recent_messages(&client_id, limit)?;
                db.append_message(&client_id, Role::User, &message)?;
                Ok((current, history))
            })
            .await?
        };

        let messages = context::build_messages(
            &self.system_prompt,
            current.as_ref(),
            &history,
            message,
            &self.filter,
        );

        let raw = match client.complete(&messages).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Completion failed for client {client_id}: {e}");
                let client_id = client_id.to_string();
                if let Err(db_err) = self
                    .with_db(move |db| {
                        db.append_message(&client_id, Role::Assistant, ERROR_PLACEHOLDER)
                    })
                    .await
                {
                    warn!("Failed to record error placeholder: {db_err}");
                }
                return Err(e.into());
            }
        };

        {
            let client_id = client_id.to_string();
            let raw = raw.clone();
            self.with_db(move |db| db.append_message(&client_id, Role::Assistant, &raw))
                .await?;
        }

        let (explanation, candidate) = extract::parse_reply(&raw);
        let reply = if explanation.is_empty() {
            raw.clone()
        } else {
            explanation
        };

        let mut outcome = ChatOutcome {
            reply,
            plan_updated: false,
            persisted: true,
            plan: current.as_ref().map(|version| version.document.clone()),
        };

        let Some(candidate) = candidate else {
            return Ok(outcome);
        };

        let document = match schema::validate_value(candidate) {
            Ok(document) => document,
            Err(e) => {
                warn!("Plan validation failed for client {client_id}: {e}");
                return Ok(outcome);
            }
        };

        let should_commit = match &current {
            None => true,
            Some(current) => {
                let changes = diff::compare_plans(Some(&current.document), &document);
                info!("Plan changes detected: {:?}", changes.summary);
                changes.requires_new_version()
            }
        };

        if should_commit {
            let commit = {
                let client_id = client_id.to_string();
                let document = document.clone();
                self.with_db(move |db| db.commit_new_plan(&client_id, &document))
                    .await
            };
            match commit {
                Ok(version) => {
                    info!(
                        "Plan version {} committed for client {client_id}: {}",
                        version.version,
                        version.document.summary()
                    );
                    outcome.plan_updated = true;
                    outcome.plan = Some(version.document);
                }
                Err(e) => {
                    // Display and persistence are decoupled: a storage
                    // hiccup never hides a usable plan from the user.
                    warn!("Plan storage failed for client {client_id}, returning unpersisted: {e}");
                    outcome.persisted = false;
                    outcome.plan = Some(document);
                }
            }
        } else {
            info!("No significant plan changes detected, keeping current version");
            outcome.plan = Some(document);
        }

        Ok(outcome)
    }

    /// Returns the client's current plan version, if any.
    pub async fn current_plan(&self, client_id: &str) -> Result<Option<PlanVersion>> {
        let client_id = client_id.to_string();
        self.with_db(move |db| db.get_current_plan(&client_id)).await
    }

    /// Returns plan versions for a client, most recent first.
    pub async fn plan_history(&self, client_id: &str, limit: usize) -> Result<Vec<PlanVersion>> {
        let client_id = client_id.to_string();
        self.with_db(move |db| db.plan_history(&client_id, limit))
            .await
    }

    /// Returns recent conversation messages, most recent first, excluding
    /// system-role entries.
    pub async fn recent_messages(
        &self,
        client_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationMessage>> {
        let client_id = client_id.to_string();
        self.with_db(move |db| db.recent_messages(&client_id, limit))
            .await
    }

    /// Deletes all conversations and plan versions for a client.
    pub async fn reset(&self, client_id: &str) -> Result<ResetSummary> {
        let client_id = client_id.to_string();
        self.with_db(move |db| db.reset_client(&client_id)).await
    }

    async fn with_db<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            f(&mut db)
        })
        .await
        .map_err(|e| CoachError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}

/// Builder for creating and configuring Coach instances.
pub struct CoachBuilder {
    database_path: Option<PathBuf>,
    client: Option<Arc<dyn CompletionClient>>,
    system_prompt: String,
    history_limit: usize,
    filter: NoiseFilter,
}

impl CoachBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            database_path: None,
            client: None,
            system_prompt: SYSTEM_PROMPT.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            filter: NoiseFilter::default(),
        }
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/stride/coach.db` or `~/.local/share/stride/coach.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets the completion client used for chat turns.
    ///
    /// A coach built without one can still serve plan/history/reset queries
    /// but fails chat with a configuration error.
    pub fn with_client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Overrides the fixed system instruction.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Overrides the number of stored messages fetched for context.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Overrides the history noise-filtering policy.
    pub fn with_noise_filter(mut self, filter: NoiseFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Builds the configured coach instance.
    ///
    /// # Errors
    ///
    /// Returns `CoachError::FileSystem` if the database path is invalid
    /// Returns `CoachError::Database` if database initialization fails
    pub async fn build(self) -> Result<Coach> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CoachError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), CoachError>(())
        })
        .await
        .map_err(|e| CoachError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(Coach {
            db_path,
            client: self.client,
            system_prompt: self.system_prompt,
            history_limit: self.history_limit,
            filter: self.filter,
        })
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("stride")
            .place_data_file("coach.db")
            .map_err(|e| CoachError::XdgDirectory(e.to_string()))
    }
}

impl Default for CoachBuilder {
    fn default() -> Self {
        Self::new()
    }
}
