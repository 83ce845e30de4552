use rusqlite::Connection;
use std::fs;
use std::path::Path;

/// Apply any pending `.sql` files from `migrations_dir`, in filename order.
/// Applied files are tracked by name in `schema_migrations`.
pub fn run_migrations(conn: &Connection, migrations_dir: &Path) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let mut files: Vec<_> = fs::read_dir(migrations_dir)
        .map(|rd| {
            rd.filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().map(|ext| ext == "sql").unwrap_or(false))
                .collect()
        })
        .unwrap_or_default();
    files.sort();

    tracing::debug!(dir = %migrations_dir.display(), count = files.len(), "Found migration files");

    let mut applied = 0;
    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let pending: bool = conn.query_row(
            "SELECT NOT EXISTS(SELECT 1 FROM schema_migrations WHERE name = ?)",
            [&name],
            |row| row.get(0),
        )?;
        if !pending {
            continue;
        }

        let sql = fs::read_to_string(&path)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        tracing::info!(migration = %name, "Applying migration");
        conn.execute_batch(&sql)?;
        conn.execute("INSERT INTO schema_migrations (name) VALUES (?)", [&name])?;
        applied += 1;
    }

    if applied > 0 {
        tracing::info!(count = applied, "Migrations applied");
    }

    Ok(())
}
