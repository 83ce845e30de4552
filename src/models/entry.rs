use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Whether an entry records money going out or coming in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryType {
    Expense,
    Income,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "Expense",
            Self::Income => "Income",
        }
    }

    pub fn all() -> &'static [EntryType] {
        &[Self::Expense, Self::Income]
    }
}

impl FromStr for EntryType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Expense" => Ok(Self::Expense),
            "Income" => Ok(Self::Income),
            _ => Err(()),
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded income or expense transaction, owned by one user.
/// Entries are immutable once created; there are no update or delete paths.
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    pub id: i64,
    pub user_id: i64,
    pub remark: String,
    /// Calendar date as `YYYY-MM-DD`; no time-of-day semantics.
    pub date: String,
    pub amount_cents: i64,
    pub entry_type: EntryType,
    pub created_at: String,
}

impl Entry {
    pub fn amount_display(&self) -> String {
        format_cents(self.amount_cents)
    }

    pub fn is_expense(&self) -> bool {
        self.entry_type == EntryType::Expense
    }
}

#[derive(Debug, Clone)]
pub struct NewEntry {
    pub user_id: i64,
    pub remark: String,
    pub date: String,
    pub amount_cents: i64,
    pub entry_type: EntryType,
}

/// Convert a decimal currency amount to integer cents.
pub fn cents_from_decimal(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Render cents as a fixed two-decimal display value, e.g. `1500` -> `"15.00"`.
pub fn format_cents(cents: i64) -> String {
    let is_negative = cents < 0;
    let abs_cents = cents.abs();
    let whole = abs_cents / 100;
    let fractional = abs_cents % 100;
    if is_negative {
        format!("-{}.{:02}", whole, fractional)
    } else {
        format!("{}.{:02}", whole, fractional)
    }
}
