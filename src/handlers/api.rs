use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;

use crate::auth::Principal;
use crate::date_utils::current_year_month;
use crate::db::queries::entries;
use crate::error::AppResult;
use crate::handlers::dashboard::DashboardParams;
use crate::models::format_cents;
use crate::services::reports::summarize_month;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SummaryRowJson {
    pub remark: String,
    pub total_cents: i64,
    pub total: String,
}

#[derive(Debug, Serialize)]
pub struct MonthlySummaryJson {
    pub year: i32,
    pub month: u32,
    pub rows: Vec<SummaryRowJson>,
    pub grand_total_cents: i64,
    pub grand_total: String,
    pub available_years: Vec<i32>,
}

/// JSON variant of the dashboard summary, for client-side consumers.
pub async fn monthly_summary(
    State(state): State<AppState>,
    principal: Principal,
    Query(params): Query<DashboardParams>,
) -> AppResult<Json<MonthlySummaryJson>> {
    let (current_year, current_month) = current_year_month();
    let year = params.year.unwrap_or(current_year);
    let month = params.month.unwrap_or(current_month);

    let conn = state.db.get()?;
    let amounts = entries::expense_amounts_for_month(&conn, principal.user_id, year, month)?;
    let summary = summarize_month(year, month, amounts);
    let available_years = entries::distinct_expense_years(&conn, principal.user_id)?;

    Ok(Json(MonthlySummaryJson {
        year,
        month,
        rows: summary
            .rows
            .into_iter()
            .map(|r| SummaryRowJson {
                total: format_cents(r.total_cents),
                remark: r.remark,
                total_cents: r.total_cents,
            })
            .collect(),
        grand_total_cents: summary.grand_total_cents,
        grand_total: format_cents(summary.grand_total_cents),
        available_years,
    }))
}
