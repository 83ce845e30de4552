use askama::Template;
use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::Form;
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use tracing::info;

use crate::auth::Principal;
use crate::db::queries::entries;
use crate::error::{AppError, AppResult, RenderHtml};
use crate::models::{cents_from_decimal, EntryType, NewEntry};
use crate::state::AppState;
use crate::VERSION;

#[derive(Template)]
#[template(path = "pages/add_entry.html")]
pub struct AddEntryTemplate {
    pub title: String,
    pub version: &'static str,
    pub types: &'static [EntryType],
    pub today: String,
}

pub async fn new_form() -> AppResult<Html<String>> {
    AddEntryTemplate {
        title: "Add Entry".into(),
        version: VERSION,
        types: EntryType::all(),
        today: Local::now().format("%Y-%m-%d").to_string(),
    }
    .render_html()
}

#[derive(Debug, Deserialize)]
pub struct AddEntryForm {
    pub remark: String,
    pub date: String,
    pub amount: String,
    #[serde(rename = "type")]
    pub entry_type: String,
}

/// Create an entry from the submitted form. The owning user id comes from
/// the principal, never from the request body.
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    Form(form): Form<AddEntryForm>,
) -> AppResult<Redirect> {
    let entry = validate(principal, &form)?;

    let conn = state.db.get()?;
    let entry_id = entries::insert_entry(&conn, &entry)?;

    info!(entry_id, user_id = principal.user_id, "Added entry");
    Ok(Redirect::to("/dashboard"))
}

fn validate(principal: Principal, form: &AddEntryForm) -> AppResult<NewEntry> {
    let remark = form.remark.trim();
    if remark.is_empty() {
        return Err(AppError::Validation("Remark must not be empty".into()));
    }

    let date = NaiveDate::parse_from_str(form.date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Date must be a valid YYYY-MM-DD date".into()))?;

    let amount: f64 = form
        .amount
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Amount must be a number".into()))?;
    if !amount.is_finite() {
        return Err(AppError::Validation("Amount must be a number".into()));
    }

    let entry_type: EntryType = form
        .entry_type
        .parse()
        .map_err(|()| AppError::Validation("Type must be Expense or Income".into()))?;

    Ok(NewEntry {
        user_id: principal.user_id,
        remark: remark.to_string(),
        date: date.format("%Y-%m-%d").to_string(),
        amount_cents: cents_from_decimal(amount),
        entry_type,
    })
}
