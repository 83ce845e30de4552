//! Integration tests for the add-entry flow.

mod common;

use axum::http::StatusCode;
use common::TestClient;

/// The entry form is reachable with a valid token.
#[tokio::test]
async fn test_entry_form_renders() {
    let client = TestClient::new();
    let token = client.signup("alice@example.com", "secret123").await;

    let response = client.get_authed("/add-entry", &token).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Expense"));
    assert!(response.body.contains("Income"));
}

/// A valid submission persists the entry and redirects to the dashboard.
#[tokio::test]
async fn test_add_entry_persists_and_redirects() {
    let client = TestClient::new();
    let token = client.signup("alice@example.com", "secret123").await;

    let response = client
        .post_form_authed("/add-entry", &[
                ("remark", "Grocery"),
                ("date", "2024-05-01"),
                ("amount", "12.34"),
                ("type", "Expense"),
            ], &token)
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/dashboard"));

    let conn = client.state.db.get().unwrap();
    let (remark, amount_cents, entry_type): (String, i64, String) = conn
        .query_row(
            "SELECT remark, amount_cents, entry_type FROM entries",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(remark, "Grocery");
    assert_eq!(amount_cents, 1234);
    assert_eq!(entry_type, "Expense");
}

/// Malformed fields are rejected with a validation error.
#[tokio::test]
async fn test_add_entry_validation() {
    let client = TestClient::new();
    let token = client.signup("alice@example.com", "secret123").await;

    let cases: &[&[(&str, &str)]] = &[
        // Empty remark
        &[
            ("remark", "   "),
            ("date", "2024-05-01"),
            ("amount", "5"),
            ("type", "Expense"),
        ],
        // Unparseable date
        &[
            ("remark", "Fuel"),
            ("date", "01.05.2024"),
            ("amount", "5"),
            ("type", "Expense"),
        ],
        // Non-numeric amount
        &[
            ("remark", "Fuel"),
            ("date", "2024-05-01"),
            ("amount", "five"),
            ("type", "Expense"),
        ],
        // Unknown type
        &[
            ("remark", "Fuel"),
            ("date", "2024-05-01"),
            ("amount", "5"),
            ("type", "Transfer"),
        ],
    ];

    for case in cases {
        let response = client.post_form_authed("/add-entry", case, &token).await;
        assert_eq!(
            response.status,
            StatusCode::BAD_REQUEST,
            "case {case:?} should be rejected"
        );
    }

    let conn = client.state.db.get().unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0, "no invalid entry may be persisted");
}

/// The owning user id comes from the token; a user_id field in the form
/// body is ignored.
#[tokio::test]
async fn test_owner_cannot_be_spoofed() {
    let client = TestClient::new();
    let token = client.signup("alice@example.com", "secret123").await;

    let response = client
        .post_form_authed("/add-entry", &[
                ("remark", "Grocery"),
                ("date", "2024-05-01"),
                ("amount", "10"),
                ("type", "Expense"),
                ("user_id", "999"),
            ], &token)
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);

    let conn = client.state.db.get().unwrap();
    let owner: i64 = conn
        .query_row("SELECT user_id FROM entries", [], |row| row.get(0))
        .unwrap();
    assert_eq!(owner, 1, "entry must belong to the authenticated user");
}

/// Without a token the store is never touched.
#[tokio::test]
async fn test_add_entry_rejected_without_token() {
    let client = TestClient::new();
    client.signup("alice@example.com", "secret123").await;

    let response = client
        .post_form("/add-entry", &[
                ("remark", "Grocery"),
                ("date", "2024-05-01"),
                ("amount", "10"),
                ("type", "Expense"),
            ])
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location.as_deref(), Some("/login"));

    let conn = client.state.db.get().unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}
