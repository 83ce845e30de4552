//! Integration tests for numeric id assignment under concurrent registration.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestClient;
use std::collections::HashSet;
use tower::ServiceExt;

/// Ids come from the counter, starting at 1 and increasing monotonically.
#[tokio::test]
async fn test_ids_assigned_sequentially() {
    let client = TestClient::new();

    for (i, email) in ["a@example.com", "b@example.com", "c@example.com"]
        .iter()
        .enumerate()
    {
        client.signup(email, "secret123").await;

        let conn = client.state.db.get().unwrap();
        let id: i64 = conn
            .query_row("SELECT id FROM users WHERE email = ?", [email], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(id, i as i64 + 1);
    }
}

/// Concurrent registrations with distinct emails never share a numeric id.
#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_registrations_get_distinct_ids() {
    let client = TestClient::new();
    const N: usize = 8;

    let mut handles = Vec::new();
    for i in 0..N {
        let router = client.router();
        handles.push(tokio::spawn(async move {
            let body = format!("email=user{}%40example.com&password=secret123", i);
            let response = router
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/register")
                        .header("Content-Type", "application/x-www-form-urlencoded")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();
            response.status()
        }));
    }

    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::SEE_OTHER);
    }

    let conn = client.state.db.get().unwrap();
    let mut stmt = conn.prepare("SELECT id FROM users").unwrap();
    let ids: Vec<i64> = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .filter_map(|r| r.ok())
        .collect();

    assert_eq!(ids.len(), N, "all registrations should be persisted");
    let distinct: HashSet<i64> = ids.iter().copied().collect();
    assert_eq!(distinct.len(), N, "no two users may share an id");

    // The counter ends exactly where N single increments would leave it.
    let counter: i64 = conn
        .query_row(
            "SELECT value FROM counters WHERE name = 'user_id'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(counter, N as i64);
}

/// A failed duplicate registration does not consume an id.
#[tokio::test]
async fn test_duplicate_registration_does_not_leak_an_id() {
    let client = TestClient::new();
    client.signup("alice@example.com", "secret123").await;

    let response = client.register("alice@example.com", "other456").await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    client.signup("bob@example.com", "secret123").await;

    let conn = client.state.db.get().unwrap();
    let bob_id: i64 = conn
        .query_row(
            "SELECT id FROM users WHERE email = 'bob@example.com'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(bob_id, 2, "the rejected duplicate must not advance the counter");
}
