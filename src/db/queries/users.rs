use crate::models::User;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

pub fn find_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
        [email],
        |row| {
            Ok(User {
                id: row.get(0)?,
                email: row.get(1)?,
                password_hash: row.get(2)?,
                created_at: row.get(3)?,
            })
        },
    )
    .optional()
}

pub fn email_exists(conn: &Connection, email: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)",
        [email],
        |row| row.get(0),
    )
}

/// Insert a user with a pre-assigned id (from the `user_id` counter).
pub fn create_user(
    conn: &Connection,
    id: i64,
    email: &str,
    password_hash: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO users (id, email, password_hash) VALUES (?1, ?2, ?3)",
        params![id, email, password_hash],
    )?;
    debug!(user_id = id, "Created user");
    Ok(())
}

/// True when the error is the UNIQUE violation on users.email, i.e. a
/// concurrent registration won the race after our pre-check.
pub fn is_duplicate_email_error(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("users.email")
    )
}
