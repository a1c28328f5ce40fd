use chrono::{Days, NaiveDate};
use revtrack_core::{
    effective_status, local_today, DataSource, DataStore, DisplayStatus, DocumentStatus,
    LoadError, NewDocument, NewUser, StaticSource,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn counting_source(calls: Arc<AtomicUsize>, payload: Value) -> impl DataSource {
    let bytes = serde_json::to_vec(&payload).unwrap();
    move || {
        let calls = Arc::clone(&calls);
        let bytes = bytes.clone();
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(bytes)
        }
    }
}

/// Fails the first `failures` fetches with a 503, then serves `payload`.
fn flaky_source(calls: Arc<AtomicUsize>, failures: usize, payload: Value) -> impl DataSource {
    let bytes = serde_json::to_vec(&payload).unwrap();
    move || {
        let attempt = calls.fetch_add(1, Ordering::SeqCst);
        let bytes = bytes.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            if attempt < failures {
                Err(LoadError::Status {
                    resource: "data.json".to_string(),
                    code: 503,
                })
            } else {
                Ok(bytes)
            }
        }
    }
}

fn fixture() -> Value {
    json!({
        "users": [
            {"id": "u1", "name": "Ada"},
            {"id": "u2", "name": "Grace"}
        ],
        "documents": [
            {"id": "d1", "title": "Threat model", "status": "In Progress",
             "dueDate": "2024-07-31", "assignedToUserId": "u1"},
            {"id": "d2", "title": "API review", "status": "Not Started",
             "dueDate": "2024-08-05", "assignedToUserId": "u1"},
            {"id": "d3", "title": "Release notes", "status": "Completed",
             "dueDate": "2024-07-01", "assignedToUserId": "u2",
             "completionDate": "2024-06-30"}
        ]
    })
}

fn fixture_store() -> DataStore {
    DataStore::new(StaticSource::from_bytes(
        serde_json::to_vec(&fixture()).unwrap(),
    ))
}

#[tokio::test]
async fn concurrent_loads_share_one_fetch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let store = DataStore::new(counting_source(Arc::clone(&calls), fixture()));

    let outcomes = futures::future::join_all((0..8).map(|_| store.load())).await;

    assert!(outcomes.iter().all(Result::is_ok));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(store.is_loaded());

    store.load().await.unwrap();
    store.get_documents().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_loads_across_tasks_share_one_fetch() {
    let calls = Arc::new(AtomicUsize::new(0));
    let store = Arc::new(DataStore::new(counting_source(
        Arc::clone(&calls),
        fixture(),
    )));

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.get_users().await })
        })
        .collect();

    for handle in handles {
        let users = handle.await.unwrap().unwrap();
        assert_eq!(users.len(), 2);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_attempt_is_reported_to_every_waiter_and_retried_later() {
    let calls = Arc::new(AtomicUsize::new(0));
    let store = DataStore::new(flaky_source(Arc::clone(&calls), 1, fixture()));

    let outcomes = futures::future::join_all((0..4).map(|_| store.load())).await;
    for outcome in &outcomes {
        assert_eq!(
            outcome.as_ref().unwrap_err(),
            &LoadError::Status {
                resource: "data.json".to_string(),
                code: 503,
            }
        );
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!store.is_loaded());

    store.load().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.get_documents().await.unwrap().len(), 3);
}

#[tokio::test]
async fn accessors_propagate_load_failure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let store = DataStore::new(flaky_source(Arc::clone(&calls), 1, fixture()));

    let err = store.get_users().await.unwrap_err();
    assert!(matches!(err, LoadError::Status { code: 503, .. }));

    let users = store.get_users().await.unwrap();
    assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn malformed_payload_is_a_retryable_load_error() {
    let store = DataStore::new(StaticSource::from_bytes(b"{\"users\": 42}".to_vec()));

    assert!(matches!(store.load().await, Err(LoadError::Decode(_))));
    assert!(!store.is_loaded());
    assert!(matches!(store.load().await, Err(LoadError::Decode(_))));
}

#[tokio::test]
async fn returned_copies_do_not_alias_canonical_state() {
    let store = fixture_store();

    let mut documents = store.get_documents().await.unwrap();
    documents[0].title = "tampered".to_string();
    documents[0].status = DocumentStatus::Completed;
    documents.clear();

    let mut users = store.get_users().await.unwrap();
    users[0].name = "Mallory".to_string();

    let mut single = store.get_document_by_id("d2").await.unwrap().unwrap();
    single.assigned_to_user_id = None;

    let documents = store.get_documents().await.unwrap();
    assert_eq!(documents.len(), 3);
    assert_eq!(documents[0].title, "Threat model");
    assert_eq!(documents[0].status, DocumentStatus::InProgress);
    assert_eq!(documents[1].assigned_to_user_id.as_deref(), Some("u1"));
    assert_eq!(store.get_users().await.unwrap()[0].name, "Ada");
}

#[tokio::test]
async fn removing_user_unassigns_only_their_documents() {
    let store = fixture_store();

    let removed = store.remove_user("u1").await.unwrap().unwrap();
    assert_eq!(removed.name, "Ada");

    let documents = store.get_documents().await.unwrap();
    for id in ["d1", "d2"] {
        let document = documents.iter().find(|doc| doc.id == id).unwrap();
        assert_eq!(document.assigned_to_user_id, None);
        assert_eq!(document.reviewer_name, "Unassigned");
    }
    let untouched = documents.iter().find(|doc| doc.id == "d3").unwrap();
    assert_eq!(untouched.assigned_to_user_id.as_deref(), Some("u2"));
    assert_eq!(untouched.reviewer_name, "Grace");

    assert!(store.get_user_by_id("u1").await.unwrap().is_none());
    assert!(store.remove_user("u1").await.unwrap().is_none());
}

#[tokio::test]
async fn added_document_resolves_reviewer_name() {
    let store = DataStore::seeded(Vec::new(), Vec::new()).unwrap();
    let ada = store.add_user(NewUser::new("Ada")).await.unwrap();
    assert!(ada.id.starts_with("user"));

    let assigned = store
        .add_document(NewDocument::new("Design doc", "2024-09-01").assigned_to(ada.id.clone()))
        .await
        .unwrap();
    assert_eq!(assigned.reviewer_name, "Ada");
    assert_eq!(assigned.status, DocumentStatus::NotStarted);

    let unassigned = store
        .add_document(NewDocument::new("Design doc", "2024-09-01"))
        .await
        .unwrap();
    assert_eq!(unassigned.reviewer_name, "Unassigned");
    assert_ne!(unassigned.id, assigned.id);

    let dangling = store
        .add_document(NewDocument::new("Orphan", "2024-09-01").assigned_to("ghost"))
        .await
        .unwrap();
    assert_eq!(dangling.reviewer_name, "Unassigned");

    assert_eq!(store.get_documents().await.unwrap().len(), 3);
}

#[tokio::test]
async fn blank_status_on_new_document_defaults_to_not_started() {
    let store = DataStore::seeded(Vec::new(), Vec::new()).unwrap();

    for blank in ["", "   "] {
        let created = store
            .add_document(NewDocument::new("Checklist", "2024-01-01").with_status(blank))
            .await
            .unwrap();
        assert_eq!(created.status, DocumentStatus::NotStarted);
    }

    let kept = store
        .add_document(NewDocument::new("Checklist", "2024-01-01").with_status("Blocked"))
        .await
        .unwrap();
    assert_eq!(kept.status, DocumentStatus::Other("Blocked".to_string()));
}

#[tokio::test]
async fn reset_during_fetch_discards_stale_result_and_reloads() {
    let calls = Arc::new(AtomicUsize::new(0));
    let source = {
        let calls = Arc::clone(&calls);
        move || {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(Duration::from_millis(30)).await;
                let name = if attempt == 0 { "old" } else { "new" };
                let payload = json!({"users": [{"id": "u1", "name": name}]});
                Ok::<_, LoadError>(serde_json::to_vec(&payload).unwrap())
            }
        }
    };
    let store = Arc::new(DataStore::new(source));

    let reader = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.get_users().await })
    };
    tokio::time::sleep(Duration::from_millis(5)).await;
    store.reset();

    let users = reader.await.unwrap().unwrap();
    let names: Vec<&str> = users.iter().map(|user| user.name.as_str()).collect();
    assert_eq!(names, vec!["new"]);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(store.is_loaded());
    assert_eq!(store.get_users().await.unwrap()[0].name, "new");
}

#[tokio::test]
async fn add_document_loads_first_so_names_resolve_against_payload() {
    let store = fixture_store();
    assert!(!store.is_loaded());

    let created = store
        .add_document(NewDocument::new("Late add", "2024-08-20").assigned_to("u2"))
        .await
        .unwrap();

    assert_eq!(created.reviewer_name, "Grace");
    assert_eq!(store.get_documents().await.unwrap().len(), 4);
}

#[tokio::test]
async fn removing_document_twice_is_a_no_op() {
    let store = fixture_store();

    let removed = store.remove_document("d2").await.unwrap().unwrap();
    assert_eq!(removed.title, "API review");
    assert_eq!(store.get_documents().await.unwrap().len(), 2);

    assert!(store.remove_document("d2").await.unwrap().is_none());
    assert_eq!(store.get_documents().await.unwrap().len(), 2);
}

#[tokio::test]
async fn status_update_is_stored_verbatim() {
    let store = fixture_store();

    let updated = store
        .update_document_status("d2", "Archived")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, DocumentStatus::Other("Archived".to_string()));

    let reread = store.get_document_by_id("d2").await.unwrap().unwrap();
    assert_eq!(reread.status.as_str(), "Archived");

    assert!(store
        .update_document_status("missing", DocumentStatus::Completed)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn unknown_payload_fields_survive_copies() {
    let store = DataStore::new(StaticSource::from_bytes(
        serde_json::to_vec(&json!({
            "documents": [{"id": "d1", "title": "A", "status": "Not Started",
                           "dueDate": "2024-08-01", "priority": "high"}]
        }))
        .unwrap(),
    ));

    let document = store.get_document_by_id("d1").await.unwrap().unwrap();
    assert_eq!(document.extra.get("priority"), Some(&json!("high")));
    assert!(store.get_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn end_to_end_seed_derives_overdue_and_cascades() {
    let today = local_today();
    let yesterday = today.checked_sub_days(Days::new(1)).unwrap();
    let next_week = today.checked_add_days(Days::new(7)).unwrap();
    let fmt = |date: NaiveDate| date.format("%Y-%m-%d").to_string();

    let store = DataStore::new(StaticSource::from_bytes(
        serde_json::to_vec(&json!({
            "users": [{"id": "U1", "name": "Ada"}, {"id": "U2", "name": "Grace"}],
            "documents": [
                {"id": "Doc1", "title": "Doc1", "status": "In Progress",
                 "dueDate": fmt(yesterday), "assignedToUserId": "U1"},
                {"id": "Doc2", "title": "Doc2", "status": "Not Started",
                 "dueDate": fmt(next_week), "assignedToUserId": "U2"},
                {"id": "Doc3", "title": "Doc3", "status": "Completed",
                 "dueDate": fmt(yesterday), "assignedToUserId": null}
            ]
        }))
        .unwrap(),
    ));

    let documents = store.get_documents().await.unwrap();
    assert_eq!(documents.len(), 3);

    let overdue: Vec<&str> = documents
        .iter()
        .filter(|doc| effective_status(doc, today) == DisplayStatus::Overdue)
        .map(|doc| doc.id.as_str())
        .collect();
    assert_eq!(overdue, vec!["Doc1"]);

    store.remove_user("U1").await.unwrap().unwrap();
    let doc1 = store.get_document_by_id("Doc1").await.unwrap().unwrap();
    assert_eq!(doc1.assigned_to_user_id, None);
    assert_eq!(doc1.reviewer_name, "Unassigned");
    // Stored status is never rewritten to Overdue.
    assert_eq!(doc1.status, DocumentStatus::InProgress);
}
