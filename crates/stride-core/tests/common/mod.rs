use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use stride_core::{ChatMessage, Coach, CoachBuilder, CompletionClient, CompletionError};
use tempfile::TempDir;

/// Scripted completion client: pops one canned result per call and records
/// the message lists it was sent.
pub struct FakeClient {
    responses: Mutex<VecDeque<Result<String, CompletionError>>>,
    pub requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(reply.into()));
    }

    pub fn push_error(&self, error: CompletionError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn last_request(&self) -> Vec<ChatMessage> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no completion request recorded")
    }
}

#[async_trait]
impl CompletionClient for FakeClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("fake client ran out of scripted responses")
    }
}

/// Helper function to create a temporary directory and database path
pub fn create_test_environment() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temporary directory");
    let db_path = temp_dir.path().join("test_coach.db");
    (temp_dir, db_path)
}

/// Helper function to create a test coach backed by a fake client
pub async fn create_test_coach() -> (TempDir, Arc<FakeClient>, Coach) {
    let (temp_dir, db_path) = create_test_environment();
    let client = FakeClient::new();
    let coach = CoachBuilder::new()
        .with_database_path(Some(db_path))
        .with_client(client.clone())
        .build()
        .await
        .expect("Failed to create coach");
    (temp_dir, client, coach)
}

/// A canned model reply: short explanation, PLAN marker, fenced JSON plan.
pub fn plan_reply(goal: &str, weeks: usize, sessions_per_week: usize, min_rest_days: i64) -> String {
    let mut week_entries = Vec::new();
    for week in 1..=weeks {
        let sessions: Vec<String> = (0..sessions_per_week)
            .map(|i| {
                format!(
                    r#"{{"type": "Easy Run", "distance_km": {}, "intensity": "E"}}"#,
                    5 + i
                )
            })
            .collect();
        week_entries.push(format!(
            r#""week_{week:02}": {{"mileage_target": {}, "sessions": [{}]}}"#,
            20 + week,
            sessions.join(", ")
        ));
    }
    format!(
        "Here is a structured schedule building volume gradually.\n\nPLAN\n```json\n\
         {{\"meta\": {{\"goal\": \"{goal}\", \"phase\": \"Base\"}}, \
         \"constraints\": {{\"max_weekly_increase_pct\": 15, \"min_rest_days\": {min_rest_days}}}, \
         \"weeks\": {{{}}}}}\n```",
        week_entries.join(", ")
    )
}
