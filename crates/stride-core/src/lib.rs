//! Core library for the Stride conversational running coach.
//!
//! This crate turns free-form chat messages into structured, versioned
//! multi-week training plans via a large-language-model call. The hard part
//! is the response-parsing and plan-reconciliation pipeline:
//!
//! 1. [`context`] assembles the bounded message history sent to the model,
//!    filtering noise and summarizing the current plan.
//! 2. [`llm`] defines the completion-function seam and an OpenAI-compatible
//!    client.
//! 3. [`extract`] splits the raw reply into explanation text and a candidate
//!    JSON block, tolerating missing markers, code fences, and trailing
//!    prose.
//! 4. [`schema`] repairs and strictly validates the candidate into a
//!    [`models::PlanDocument`].
//! 5. [`diff`] classifies the change against the stored current version.
//! 6. [`coach`] reconciles: commit a new immutable version only for material
//!    changes, degrade to display-without-persisting on storage failure, and
//!    always surface the explanation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use stride_core::{CoachBuilder, CoachConfig, OpenAiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CoachConfig::from_env()?;
//! let client = Arc::new(OpenAiClient::from_config(&config)?);
//!
//! let coach = CoachBuilder::new()
//!     .with_database_path(Some("coach.db"))
//!     .with_client(client)
//!     .build()
//!     .await?;
//!
//! let outcome = coach.chat("client-1", "I want to train for a 10K").await?;
//! println!("{}", outcome.reply);
//! if let Some(plan) = &outcome.plan {
//!     println!("{plan}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod coach;
pub mod config;
pub mod context;
pub mod db;
pub mod diff;
pub mod error;
pub mod extract;
pub mod llm;
pub mod models;
pub mod prompts;
pub mod schema;

// Re-export commonly used types
pub use coach::{Coach, CoachBuilder};
pub use config::CoachConfig;
pub use context::NoiseFilter;
pub use db::Database;
pub use diff::{compare_plans, PlanChanges};
pub use error::{CoachError, CompletionError, Result};
pub use llm::{ChatMessage, CompletionClient, OpenAiClient};
pub use models::{
    ChatOutcome, ConversationMessage, PlanConstraints, PlanDocument, PlanMeta, PlanVersion,
    ResetSummary, Role, Session, WeekPlan,
};
