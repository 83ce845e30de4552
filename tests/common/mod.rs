//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the full production router (auth middleware, cookie
//! layer, error pages) against an in-memory database, simulating a browser
//! that carries the bearer-token cookie between requests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::path::{Path, PathBuf};
use tally::config::Config;
use tally::db::{create_in_memory_pool, migrations};
use tally::handlers;
use tally::state::AppState;
use tower::ServiceExt;

/// Response essentials captured from a oneshot request.
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookie: Option<String>,
    pub body: String,
}

pub struct TestClient {
    pub state: AppState,
}

impl TestClient {
    /// Fresh in-memory database with migrations applied.
    pub fn new() -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        {
            let conn = pool.get().expect("Failed to get connection");
            migrations::run_migrations(&conn, Path::new("migrations"))
                .expect("Failed to run migrations");
        }

        let config = Config {
            host: "127.0.0.1".into(),
            port: 3000,
            database_path: PathBuf::from(":memory:"),
            migrations_path: PathBuf::from("migrations"),
            static_path: PathBuf::from("static"),
            token_secret: "integration-test-secret".into(),
        };

        Self {
            state: AppState::new(pool, config),
        }
    }

    /// The production router (auth middleware and all layers included).
    pub fn router(&self) -> Router {
        handlers::router(self.state.clone())
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router().oneshot(request).await.unwrap();

        let status = response.status();
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        let location = header("location");
        let set_cookie = header("set-cookie");

        let body = response.into_body().collect().await.unwrap().to_bytes();
        TestResponse {
            status,
            location,
            set_cookie,
            body: String::from_utf8_lossy(&body).to_string(),
        }
    }

    /// Make a GET request without credentials.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Make a GET request carrying the bearer-token cookie.
    pub async fn get_authed(&self, uri: &str, token: &str) -> TestResponse {
        self.send(
            Request::builder()
                .uri(uri)
                .header("Cookie", format!("token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// POST form data without credentials.
    pub async fn post_form(&self, uri: &str, form_data: &[(&str, &str)]) -> TestResponse {
        self.send(Self::form_request(uri, form_data, None)).await
    }

    /// POST form data carrying the bearer-token cookie.
    pub async fn post_form_authed(
        &self,
        uri: &str,
        form_data: &[(&str, &str)],
        token: &str,
    ) -> TestResponse {
        self.send(Self::form_request(uri, form_data, Some(token)))
            .await
    }

    fn form_request(uri: &str, form_data: &[(&str, &str)], token: Option<&str>) -> Request<Body> {
        let body = form_data
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/x-www-form-urlencoded");
        if let Some(token) = token {
            builder = builder.header("Cookie", format!("token={}", token));
        }
        builder.body(Body::from(body)).unwrap()
    }

    /// GET JSON with credentials and parse it.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        uri: &str,
        token: &str,
    ) -> (StatusCode, Option<T>) {
        let response = self.get_authed(uri, token).await;
        let parsed = serde_json::from_str(&response.body).ok();
        (response.status, parsed)
    }

    // =========================================================================
    // Helper methods for driving the application flows
    // =========================================================================

    /// Register an account; returns the response for status assertions.
    pub async fn register(&self, email: &str, password: &str) -> TestResponse {
        self.post_form("/register", &[("email", email), ("password", password)])
            .await
    }

    /// Log in and return the bearer token from the Set-Cookie header.
    pub async fn login(&self, email: &str, password: &str) -> Option<String> {
        let response = self
            .post_form("/login", &[("email", email), ("password", password)])
            .await;

        let cookie = response.set_cookie?;
        cookie
            .split(';')
            .next()?
            .strip_prefix("token=")
            .map(String::from)
    }

    /// Register and log in, returning a usable token.
    pub async fn signup(&self, email: &str, password: &str) -> String {
        let response = self.register(email, password).await;
        assert_eq!(
            response.status,
            StatusCode::SEE_OTHER,
            "registration should succeed"
        );
        self.login(email, password)
            .await
            .expect("login should issue a token")
    }

    /// Create an entry via POST and return success status.
    pub async fn add_entry(
        &self,
        token: &str,
        remark: &str,
        date: &str,
        amount: &str,
        entry_type: &str,
    ) -> bool {
        let response = self
            .post_form_authed(
                "/add-entry",
                &[
                    ("remark", remark),
                    ("date", date),
                    ("amount", amount),
                    ("type", entry_type),
                ],
                token,
            )
            .await;
        // Redirect (303) indicates success
        response.status == StatusCode::SEE_OTHER
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
