use askama::Template;
use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;
use tracing::debug;

use crate::auth::Principal;
use crate::date_utils::{current_year_month, month_name};
use crate::db::queries::entries;
use crate::error::{AppResult, RenderHtml};
use crate::handlers::{month_options, MonthOption};
use crate::services::reports::{summarize_month, MonthlySummary};
use crate::state::AppState;
use crate::VERSION;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    #[serde(default, deserialize_with = "crate::form_utils::deserialize_optional_i32")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "crate::form_utils::deserialize_optional_u32")]
    pub month: Option<u32>,
}

pub struct YearOption {
    pub year: i32,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "pages/dashboard.html")]
pub struct DashboardTemplate {
    pub title: String,
    pub version: &'static str,
    pub summary: MonthlySummary,
    pub period_label: String,
    pub months: Vec<MonthOption>,
    pub years: Vec<YearOption>,
}

/// Monthly category summary: the user's expenses for the selected month,
/// grouped by remark. Defaults to the current month.
pub async fn index(
    State(state): State<AppState>,
    principal: Principal,
    Query(params): Query<DashboardParams>,
) -> AppResult<Html<String>> {
    let (current_year, current_month) = current_year_month();
    let year = params.year.unwrap_or(current_year);
    let month = params.month.unwrap_or(current_month);

    let conn = state.db.get()?;
    let amounts = entries::expense_amounts_for_month(&conn, principal.user_id, year, month)?;
    let summary = summarize_month(year, month, amounts);
    let available_years = entries::distinct_expense_years(&conn, principal.user_id)?;

    debug!(
        user_id = principal.user_id,
        year,
        month,
        rows = summary.rows.len(),
        "Dashboard summary computed"
    );

    let years = available_years
        .into_iter()
        .map(|y| YearOption {
            year: y,
            selected: y == year,
        })
        .collect();

    DashboardTemplate {
        title: "Dashboard".into(),
        version: VERSION,
        period_label: format!("{} {}", month_name(month), year),
        months: month_options(Some(month)),
        years,
        summary,
    }
    .render_html()
}
