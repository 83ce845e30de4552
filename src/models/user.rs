use serde::Serialize;

/// A registered account. The numeric id is assigned from the `user_id`
/// counter at registration time, not by SQLite.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Argon2id PHC string. Never rendered or logged.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}
