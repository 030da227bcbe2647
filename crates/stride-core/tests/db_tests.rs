mod common;

use common::create_test_environment;
use serde_json::json;
use stride_core::{Database, PlanDocument, Role};

fn sample_document(goal: &str, weeks: usize) -> PlanDocument {
    let week_map: serde_json::Map<String, serde_json::Value> = (1..=weeks)
        .map(|week| {
            (
                format!("week_{week:02}"),
                json!({"sessions": [{"type": "Easy Run", "distance_km": 6}]}),
            )
        })
        .collect();
    stride_core::schema::validate_value(json!({
        "meta": {"goal": goal},
        "weeks": week_map
    }))
    .expect("sample document should validate")
}

#[test]
fn append_and_list_messages() {
    let (_temp_dir, db_path) = create_test_environment();
    let mut db = Database::new(&db_path).expect("Failed to open database");

    db.append_message("c1", Role::User, "first").unwrap();
    db.append_message("c1", Role::Assistant, "second").unwrap();
    db.append_message("c1", Role::User, "third").unwrap();
    db.append_message("other", Role::User, "unrelated").unwrap();

    let messages = db.recent_messages("c1", 10).unwrap();
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    // Most-recent-first, scoped to the client.
    assert_eq!(contents, vec!["third", "second", "first"]);

    let limited = db.recent_messages("c1", 2).unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].content, "third");
}

#[test]
fn system_messages_are_excluded_from_recent() {
    let (_temp_dir, db_path) = create_test_environment();
    let mut db = Database::new(&db_path).expect("Failed to open database");

    db.append_message("c1", Role::System, "internal note").unwrap();
    db.append_message("c1", Role::User, "hello").unwrap();

    let messages = db.recent_messages("c1", 10).unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, Role::User);
}

#[test]
fn first_commit_creates_version_one() {
    let (_temp_dir, db_path) = create_test_environment();
    let mut db = Database::new(&db_path).expect("Failed to open database");

    assert!(db.get_current_plan("c1").unwrap().is_none());

    let version = db.commit_new_plan("c1", &sample_document("5K", 4)).unwrap();
    assert_eq!(version.version, 1);
    assert!(version.is_current);

    let current = db.get_current_plan("c1").unwrap().unwrap();
    assert_eq!(current.version, 1);
    assert_eq!(current.document.meta.goal.as_deref(), Some("5K"));
}

#[test]
fn commits_are_monotonic_and_demote_prior_versions() {
    let (_temp_dir, db_path) = create_test_environment();
    let mut db = Database::new(&db_path).expect("Failed to open database");

    db.commit_new_plan("c1", &sample_document("5K", 4)).unwrap();
    db.commit_new_plan("c1", &sample_document("10K", 6)).unwrap();
    let third = db.commit_new_plan("c1", &sample_document("10K", 8)).unwrap();
    assert_eq!(third.version, 3);

    let current = db.get_current_plan("c1").unwrap().unwrap();
    assert_eq!(current.version, 3);
    assert_eq!(current.document.weeks.len(), 8);

    let history = db.plan_history("c1", 10).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].version, 3);
    assert_eq!(history[2].version, 1);
    assert_eq!(history.iter().filter(|v| v.is_current).count(), 1);
}

#[test]
fn version_sequences_are_per_client() {
    let (_temp_dir, db_path) = create_test_environment();
    let mut db = Database::new(&db_path).expect("Failed to open database");

    db.commit_new_plan("c1", &sample_document("5K", 4)).unwrap();
    let other = db.commit_new_plan("c2", &sample_document("10K", 4)).unwrap();
    assert_eq!(other.version, 1);

    assert_eq!(db.get_current_plan("c1").unwrap().unwrap().version, 1);
    assert_eq!(db.get_current_plan("c2").unwrap().unwrap().version, 1);
}

#[test]
fn reset_wipes_messages_and_plans() {
    let (_temp_dir, db_path) = create_test_environment();
    let mut db = Database::new(&db_path).expect("Failed to open database");

    db.append_message("c1", Role::User, "hello").unwrap();
    db.append_message("c1", Role::Assistant, "hi there").unwrap();
    db.commit_new_plan("c1", &sample_document("5K", 4)).unwrap();
    db.commit_new_plan("c1", &sample_document("10K", 6)).unwrap();
    db.append_message("other", Role::User, "untouched").unwrap();

    let summary = db.reset_client("c1").unwrap();
    assert_eq!(summary.messages_deleted, 2);
    assert_eq!(summary.plans_deleted, 2);

    assert!(db.get_current_plan("c1").unwrap().is_none());
    assert!(db.recent_messages("c1", 10).unwrap().is_empty());
    assert_eq!(db.recent_messages("other", 10).unwrap().len(), 1);

    // Reset is idempotent.
    let again = db.reset_client("c1").unwrap();
    assert_eq!(again.messages_deleted, 0);
    assert_eq!(again.plans_deleted, 0);
}

#[test]
fn stored_documents_round_trip() {
    let (_temp_dir, db_path) = create_test_environment();
    let mut db = Database::new(&db_path).expect("Failed to open database");

    let document = sample_document("Half Marathon", 4);
    db.commit_new_plan("c1", &document).unwrap();

    let restored = db.get_current_plan("c1").unwrap().unwrap();
    assert_eq!(restored.document, document);
}
