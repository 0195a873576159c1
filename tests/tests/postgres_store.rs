//! Store tests against a real Postgres.
//!
//! Requires Docker to be running for the testcontainer, or
//! `BRUTAL_TEST_DATABASE_URL` pointing at a scratch database.

use brutal_core::{
    Endpoint, NewFeedbackEntry, NewReviewEntry, NewWaitlistEntry, WaitlistOutcome,
};
use integration_tests::containers::TestContainers;
use std::net::{IpAddr, Ipv4Addr};
use store::{count_rows, table_columns, truncate_all, waitlist_rows_for_email, SubmissionStore};

fn waitlist_entry(email: &str) -> NewWaitlistEntry {
    NewWaitlistEntry {
        email: email.to_string(),
        name: Some("Ada".to_string()),
        ip_address: Some(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 9))),
    }
}

/// Migration is idempotent and creates every column
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_schema_migration_is_idempotent() {
    let containers = TestContainers::start().await;
    let client = containers.client().await;

    client.ensure_schema().await.expect("first migration");
    client.ensure_schema().await.expect("cached migration");
    store::schema::init_schema(&client)
        .await
        .expect("migration should re-run cleanly");
    assert!(client.schema_ready());

    let columns: Vec<String> = table_columns(&client, Endpoint::Waitlist)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.column_name)
        .collect();
    for expected in ["id", "email", "name", "ip_address", "created_at", "updated_at"] {
        assert!(columns.iter().any(|c| c == expected), "missing {}", expected);
    }

    let health = client.health().await.unwrap();
    assert!(health.schema_present());
    assert!(health.db_version.contains("PostgreSQL"));
}

/// Duplicate emails resolve to AlreadyJoined without a second row
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_waitlist_insert_is_idempotent() {
    let containers = TestContainers::start().await;
    let client = containers.client().await;
    client.ensure_schema().await.unwrap();
    truncate_all(&client).await.unwrap();

    let first = client
        .insert_waitlist(&waitlist_entry("pg@example.com"))
        .await
        .unwrap();
    let id = match first {
        WaitlistOutcome::Joined(id) => id,
        other => panic!("expected Joined, got {:?}", other),
    };

    let second = client
        .insert_waitlist(&waitlist_entry("pg@example.com"))
        .await
        .unwrap();
    assert_eq!(second, WaitlistOutcome::AlreadyJoined);

    assert_eq!(
        client.find_waitlist_email("PG@example.com").await.unwrap(),
        Some(id)
    );
    assert_eq!(count_rows(&client, Endpoint::Waitlist).await.unwrap(), 1);

    let rows = waitlist_rows_for_email(&client, "pg@example.com").await.unwrap();
    assert_eq!(rows[0].ip_address.as_deref(), Some("203.0.113.9"));
    assert!(rows[0].created_at.is_some());
}

/// Feedback and reviews get fresh ids and show up in the counts
#[tokio::test]
#[ignore = "requires Docker"]
async fn test_feedback_and_review_inserts() {
    let containers = TestContainers::start().await;
    let client = containers.client().await;
    client.ensure_schema().await.unwrap();
    truncate_all(&client).await.unwrap();

    let feedback = NewFeedbackEntry {
        name: None,
        email: Some("f@example.com".to_string()),
        ideas: Some("Harsher".to_string()),
        views: None,
        suggestions: None,
        wants: None,
    };
    let review = NewReviewEntry {
        name: Some("Linus".to_string()),
        email: None,
        review: Some("Honest".to_string()),
        idea_opinion: None,
        suggestion: None,
    };

    let a = client.insert_feedback(&feedback).await.unwrap();
    let b = client.insert_feedback(&feedback).await.unwrap();
    assert_ne!(a, b);
    client.insert_review(&review).await.unwrap();

    let health = client.health().await.unwrap();
    assert_eq!(health.tables["feedback"].total_entries, 2);
    assert_eq!(health.tables["reviews"].total_entries, 1);
    assert_eq!(health.tables["waitlist"].total_entries, 0);
}
