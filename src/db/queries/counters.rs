use rusqlite::Connection;

/// Atomically increment the named counter and return the new value.
///
/// The row is created on first use. Increment and read happen in a single
/// UPSERT..RETURNING statement, so two concurrent callers can never observe
/// the same value — SQLite serializes the write internally.
pub fn next_value(conn: &Connection, name: &str) -> rusqlite::Result<i64> {
    conn.query_row(
        "INSERT INTO counters (name, value) VALUES (?1, 1)
         ON CONFLICT(name) DO UPDATE SET value = value + 1
         RETURNING value",
        [name],
        |row| row.get(0),
    )
}
