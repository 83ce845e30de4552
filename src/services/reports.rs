//! User-scoped reporting over financial entries.
//!
//! Pure aggregation: handlers fetch the matching rows for one user and hand
//! them here; nothing in this module touches the database or the clock.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::format_cents;

/// One line of the monthly summary: an exact remark and the summed expense
/// amount recorded under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub remark: String,
    pub total_cents: i64,
}

impl SummaryRow {
    pub fn total_display(&self) -> String {
        format_cents(self.total_cents)
    }
}

/// Grouped-sum report of one user's expenses for a single month.
#[derive(Debug, Clone)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub rows: Vec<SummaryRow>,
    pub grand_total_cents: i64,
}

impl MonthlySummary {
    pub fn grand_total_display(&self) -> String {
        format_cents(self.grand_total_cents)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Group (remark, amount) pairs by exact remark and sum each group.
///
/// Rows come back sorted ascending by remark, case-sensitive, so "Fuel"
/// sorts before "food". The grand total is the sum over all groups; with no
/// input it is zero and the row list is empty.
pub fn summarize_month(year: i32, month: u32, amounts: Vec<(String, i64)>) -> MonthlySummary {
    let mut totals: HashMap<String, i64> = HashMap::new();
    for (remark, cents) in amounts {
        *totals.entry(remark).or_insert(0) += cents;
    }

    let mut rows: Vec<SummaryRow> = totals
        .into_iter()
        .map(|(remark, total_cents)| SummaryRow { remark, total_cents })
        .collect();
    rows.sort_by(|a, b| a.remark.cmp(&b.remark));

    let grand_total_cents = rows.iter().map(|r| r.total_cents).sum();

    MonthlySummary {
        year,
        month,
        rows,
        grand_total_cents,
    }
}
