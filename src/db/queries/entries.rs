use crate::date_utils::{month_window, year_window};
use crate::models::{Entry, NewEntry};
use rusqlite::{params, Connection, Row};
use tracing::debug;

/// Optional conjunctive filters for the analysis listing. `month` is only
/// honored together with `year`; a month on its own selects nothing narrower.
#[derive(Debug, Default, Clone)]
pub struct EntryFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub remark: Option<String>,
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    let type_str: String = row.get(5)?;
    Ok(Entry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        remark: row.get(2)?,
        date: row.get(3)?,
        amount_cents: row.get(4)?,
        entry_type: type_str.parse().map_err(|()| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                format!("unknown entry type: {type_str}").into(),
            )
        })?,
        created_at: row.get(6)?,
    })
}

pub fn insert_entry(conn: &Connection, entry: &NewEntry) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO entries (user_id, remark, date, amount_cents, entry_type)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            entry.user_id,
            entry.remark,
            entry.date,
            entry.amount_cents,
            entry.entry_type.as_str(),
        ],
    )?;
    let id = conn.last_insert_rowid();
    debug!(entry_id = id, user_id = entry.user_id, "Created entry");
    Ok(id)
}

/// List a user's entries matching the filter, newest first.
pub fn list_entries(
    conn: &Connection,
    user_id: i64,
    filter: &EntryFilter,
) -> rusqlite::Result<Vec<Entry>> {
    let mut sql = String::from(
        "SELECT id, user_id, remark, date, amount_cents, entry_type, created_at
         FROM entries
         WHERE user_id = ?",
    );
    let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(user_id)];

    if let Some(year) = filter.year {
        if let Some((start, end)) = filter.month.and_then(|m| month_window(year, m)) {
            // Half-open month window; December rolls into January.
            sql.push_str(" AND date >= ? AND date < ?");
            params_vec.push(Box::new(start.format("%Y-%m-%d").to_string()));
            params_vec.push(Box::new(end.format("%Y-%m-%d").to_string()));
        } else if let Some((start, end)) = year_window(year) {
            sql.push_str(" AND date >= ? AND date <= ?");
            params_vec.push(Box::new(start.format("%Y-%m-%d").to_string()));
            params_vec.push(Box::new(end.format("%Y-%m-%d").to_string()));
        }
    }

    if let Some(ref remark) = filter.remark {
        sql.push_str(" AND remark = ?");
        params_vec.push(Box::new(remark.clone()));
    }

    sql.push_str(" ORDER BY date DESC, id DESC");

    let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;
    let entries: Vec<Entry> = stmt
        .query_map(params_refs.as_slice(), entry_from_row)?
        .filter_map(|e| e.ok())
        .collect();

    debug!(user_id, count = entries.len(), "Listed entries");
    Ok(entries)
}

/// (remark, amount_cents) pairs of a user's Expense entries whose stored
/// date has the given month and year components. Matching is by component
/// extraction, not by range comparison.
pub fn expense_amounts_for_month(
    conn: &Connection,
    user_id: i64,
    year: i32,
    month: u32,
) -> rusqlite::Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT remark, amount_cents
         FROM entries
         WHERE user_id = ?1
           AND entry_type = 'Expense'
           AND CAST(strftime('%Y', date) AS INTEGER) = ?2
           AND CAST(strftime('%m', date) AS INTEGER) = ?3",
    )?;
    let rows = stmt
        .query_map(params![user_id, year, month], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?
        .filter_map(|r| r.ok())
        .collect();
    Ok(rows)
}

/// Distinct calendar years among a user's Expense entries, ascending.
/// Populates the dashboard's year selector.
pub fn distinct_expense_years(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<i32>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT CAST(strftime('%Y', date) AS INTEGER) AS year
         FROM entries
         WHERE user_id = ? AND entry_type = 'Expense'
         ORDER BY year",
    )?;
    let years = stmt
        .query_map([user_id], |row| row.get(0))?
        .filter_map(|y| y.ok())
        .collect();
    Ok(years)
}

/// Distinct remarks across a user's entries, for the analysis filter form.
pub fn distinct_remarks(conn: &Connection, user_id: i64) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT remark FROM entries WHERE user_id = ? ORDER BY remark",
    )?;
    let remarks = stmt
        .query_map([user_id], |row| row.get(0))?
        .filter_map(|r| r.ok())
        .collect();
    Ok(remarks)
}
