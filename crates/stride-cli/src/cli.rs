//! Command handlers printing coach results to stdout.

use anyhow::{anyhow, Result};
use stride_core::{Coach, CoachError};

pub struct Cli {
    coach: Coach,
}

impl Cli {
    pub fn new(coach: Coach) -> Self {
        Self { coach }
    }

    pub async fn chat(&self, client_id: &str, message: &str) -> Result<()> {
        let outcome = match self.coach.chat(client_id, message).await {
            Ok(outcome) => outcome,
            // Upstream failures surface as guidance, never raw internals.
            Err(CoachError::Completion(e)) => return Err(anyhow!("{}", e.user_message())),
            Err(e) => return Err(e.into()),
        };

        println!("{}", outcome.reply);
        if let Some(plan) = &outcome.plan {
            println!();
            println!("{plan}");
        }
        if outcome.plan_updated {
            println!("(a new plan version was committed)");
        } else if !outcome.persisted {
            println!("(plan shown but not persisted due to a storage error)");
        }
        Ok(())
    }

    pub async fn show_plan(&self, client_id: &str) -> Result<()> {
        match self.coach.current_plan(client_id).await? {
            Some(version) => {
                println!(
                    "Version {} (created {})",
                    version.version, version.created_at
                );
                println!();
                println!("{}", version.document);
            }
            None => println!("No plan yet for client '{client_id}'."),
        }
        Ok(())
    }

    pub async fn show_history(&self, client_id: &str, limit: usize) -> Result<()> {
        let messages = self.coach.recent_messages(client_id, limit).await?;
        if messages.is_empty() {
            println!("No conversation history for client '{client_id}'.");
            return Ok(());
        }
        // Stored most-recent-first; print chronologically.
        for message in messages.iter().rev() {
            println!("[{}] {}: {}", message.created_at, message.role, message.content);
        }
        Ok(())
    }

    pub async fn reset(&self, client_id: &str) -> Result<()> {
        let summary = self.coach.reset(client_id).await?;
        println!(
            "Session reset for '{client_id}': {} messages and {} plan versions deleted.",
            summary.messages_deleted, summary.plans_deleted
        );
        Ok(())
    }
}
