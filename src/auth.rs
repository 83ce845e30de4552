//! Authentication: registration, login, and the bearer-token gate.
//!
//! Credentials are argon2id-hashed passwords. A successful login issues an
//! HS256-signed token carrying the user's numeric id and a one-hour expiry,
//! stored in an HTTP-only `token` cookie. The middleware verifies the token
//! on every protected request and rejects before any store access.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use askama::Template;
use axum::body::Body;
use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use tracing::{debug, info, warn};

use crate::db::queries::{counters, users};
use crate::error::{AppError, AppResult, RenderHtml};
use crate::state::AppState;
use crate::VERSION;

/// Cookie name for the bearer token.
pub const TOKEN_COOKIE: &str = "token";

/// Counter row that assigns numeric user ids.
const USER_ID_COUNTER: &str = "user_id";

/// Token lifetime from issuance.
const TOKEN_TTL_HOURS: i64 = 1;

/// The authenticated identity for the current request, derived from a
/// verified token by `require_auth`. Never taken from client input.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub user_id: i64,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .copied()
            .ok_or(AppError::Unauthorized)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Numeric user id.
    sub: i64,
    /// Expiry as a unix timestamp, one hour after issuance.
    exp: i64,
}

/// Signing and verification keys for bearer tokens, derived from the
/// configured secret at startup.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    pub fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a signed token for the user, expiring in one hour.
    pub fn issue(&self, user_id: i64) -> AppResult<String> {
        self.issue_with_ttl(user_id, Duration::hours(TOKEN_TTL_HOURS))
    }

    fn issue_with_ttl(&self, user_id: i64, ttl: Duration) -> AppResult<String> {
        let claims = Claims {
            sub: user_id,
            exp: (Utc::now() + ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify signature and expiry; returns the principal encoded at
    /// issuance time.
    pub fn verify(&self, token: &str) -> Option<Principal> {
        match jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default()) {
            Ok(data) => Some(Principal {
                user_id: data.claims.sub,
            }),
            Err(e) => {
                debug!("Token verification failed: {}", e);
                None
            }
        }
    }
}

/// Middleware guarding protected routes. A missing or invalid token halts
/// the request here: page routes redirect to the login form, API routes get
/// a plain 401.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = cookies.get(TOKEN_COOKIE).map(|c| c.value().to_string());

    let principal = match token {
        Some(token) => state.token_keys.verify(&token),
        None => {
            debug!(path = %request.uri().path(), "No token presented");
            None
        }
    };

    match principal {
        Some(principal) => {
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        None => {
            if request.uri().path().starts_with("/api/") {
                (StatusCode::UNAUTHORIZED, "Authentication required").into_response()
            } else {
                Redirect::to("/login").into_response()
            }
        }
    }
}

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub title: String,
    pub version: &'static str,
}

#[derive(Template)]
#[template(path = "pages/register.html")]
pub struct RegisterTemplate {
    pub title: String,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

/// Render the login page. Serves both `/` and `/login`.
pub async fn login_page() -> AppResult<Html<String>> {
    LoginTemplate {
        title: "Login".into(),
        version: VERSION,
    }
    .render_html()
}

pub async fn register_page() -> AppResult<Html<String>> {
    RegisterTemplate {
        title: "Register".into(),
        version: VERSION,
    }
    .render_html()
}

/// Handle registration. Assigns the numeric id from the shared counter and
/// stores the argon2 hash, all in one transaction.
pub async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> AppResult<Redirect> {
    let email = form.email.trim().to_string();
    if email.is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if form.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }

    let mut conn = state.db.get()?;

    if users::email_exists(&conn, &email)? {
        return Err(AppError::DuplicateEmail);
    }

    let password_hash = hash_password(&form.password)?;

    // Counter increment and insert commit together; a failed insert rolls
    // the counter back instead of leaking an id.
    let tx = conn.transaction()?;
    let user_id = counters::next_value(&tx, USER_ID_COUNTER)?;
    users::create_user(&tx, user_id, &email, &password_hash).map_err(|e| {
        if users::is_duplicate_email_error(&e) {
            AppError::DuplicateEmail
        } else {
            AppError::Database(e)
        }
    })?;
    tx.commit()?;

    info!(user_id, "Registered user");
    Ok(Redirect::to("/login"))
}

/// Handle login. Unknown email and wrong password collapse into one generic
/// failure so accounts cannot be enumerated.
pub async fn login_submit(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<CredentialsForm>,
) -> AppResult<Redirect> {
    let invalid = || AppError::Validation("Invalid email or password".into());

    let conn = state.db.get()?;
    let user = users::find_by_email(&conn, form.email.trim())?.ok_or_else(invalid)?;

    if !verify_password(&form.password, &user.password_hash) {
        warn!(user_id = user.id, "Failed login attempt");
        return Err(invalid());
    }

    let token = state.token_keys.issue(user.id)?;
    let cookie = Cookie::build((TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build();
    cookies.add(cookie);

    info!(user_id = user.id, "Logged in");
    Ok(Redirect::to("/dashboard"))
}

/// Handle logout by discarding the token cookie.
pub async fn logout(cookies: Cookies) -> Redirect {
    let cookie = Cookie::build((TOKEN_COOKIE, ""))
        .path("/")
        .http_only(true)
        .build();
    cookies.remove(cookie);

    Redirect::to("/")
}

/// Hash a password with argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored argon2 hash (constant-time compare).
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        tracing::error!("Invalid password hash format in users table");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
