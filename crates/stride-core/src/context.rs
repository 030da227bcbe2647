//! Assembly of the bounded message context sent to the completion function.
//!
//! The context is: one fixed system instruction, an optional system summary
//! of the current plan (so the model modifies rather than regenerates),
//! filtered recent history in chronological order, and the new user message
//! last. The new user message is never filtered.

use log::info;

use crate::{
    llm::ChatMessage,
    models::{ConversationMessage, PlanVersion, Role},
};

/// Default number of stored messages fetched for context.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Assistant replies shorter than this are assumed truncated or failed.
const MIN_ASSISTANT_LEN: usize = 50;

/// Predicate deciding which stored messages are noise and must be kept out
/// of the model context.
///
/// Kept as a standalone policy object so filtering can evolve without
/// touching the assembly algorithm.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    /// Case-insensitive substrings marking error/apology messages
    keywords: Vec<String>,
    /// Minimum length for assistant messages
    min_assistant_len: usize,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self {
            keywords: vec!["error".to_string(), "sorry".to_string()],
            min_assistant_len: MIN_ASSISTANT_LEN,
        }
    }
}

impl NoiseFilter {
    /// Whether a stored message should be excluded from model context.
    ///
    /// Assistant messages that echo the plan marker are dropped so a stale
    /// serialized plan is never fed back and mistaken for the current one.
    pub fn is_noise(&self, message: &ConversationMessage) -> bool {
        let lowered = message.content.to_lowercase();
        if self.keywords.iter().any(|kw| lowered.contains(kw)) {
            return true;
        }
        if message.role == Role::Assistant {
            // Character count, not bytes: accented replies must not slip
            // past the threshold.
            if message.content.chars().count() < self.min_assistant_len {
                return true;
            }
            if message.content.to_uppercase().contains("PLAN") {
                return true;
            }
        }
        false
    }
}

/// System message summarizing the current plan and instructing the model to
/// modify or extend it rather than start over.
fn plan_context_message(current: &PlanVersion) -> String {
    let document = &current.document;
    format!(
        "CURRENT PLAN CONTEXT:\n\
         The user already has an active training plan. Here is their current plan structure:\n\n\
         Goal: {}\n\
         Phase: {}\n\
         Weeks: {} weeks planned\n\
         Current Version: {}\n\n\
         When the user asks for modifications, update/extend this existing plan rather than \
         creating a completely new one.\n\
         If they ask for extensions (e.g., \"make it 12 weeks\"), extend the existing plan \
         structure.\n\
         If they mention constraints like races, incorporate them into the existing timeline.",
        document.meta.goal.as_deref().unwrap_or("Unknown"),
        document.meta.phase,
        document.weeks.len(),
        current.version
    )
}

/// Build the ordered message list for one completion call.
///
/// `history` is expected most-recent-first, as returned by the store; it is
/// reversed here into chronological order.
pub fn build_messages(
    system_prompt: &str,
    current: Option<&PlanVersion>,
    history: &[ConversationMessage],
    user_message: &str,
    filter: &NoiseFilter,
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage {
        role: Role::System,
        content: system_prompt.to_string(),
    }];

    if let Some(current) = current {
        messages.push(ChatMessage {
            role: Role::System,
            content: plan_context_message(current),
        });
        info!(
            "Added plan context for client {}: {}",
            current.client_id,
            current.document.summary()
        );
    }

    let mut kept = 0usize;
    for message in history.iter().rev() {
        if filter.is_noise(message) {
            continue;
        }
        messages.push(ChatMessage {
            role: message.role,
            content: message.content.clone(),
        });
        kept += 1;
    }

    // The new user message always goes last, no matter what it contains.
    messages.push(ChatMessage {
        role: Role::User,
        content: user_message.to_string(),
    });

    info!(
        "Assembled {} context messages ({} from history, plan_context={})",
        messages.len(),
        kept,
        current.is_some()
    );

    messages
}
