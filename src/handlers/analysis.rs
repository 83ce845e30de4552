use askama::Template;
use axum::extract::{Query, State};
use axum::response::Html;
use serde::Deserialize;
use tracing::debug;

use crate::auth::Principal;
use crate::db::queries::entries::{self, EntryFilter};
use crate::error::{AppResult, RenderHtml};
use crate::handlers::{month_options, MonthOption};
use crate::models::Entry;
use crate::state::AppState;
use crate::VERSION;

#[derive(Debug, Default, Deserialize)]
pub struct AnalysisParams {
    #[serde(default, deserialize_with = "crate::form_utils::deserialize_optional_i32")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "crate::form_utils::deserialize_optional_u32")]
    pub month: Option<u32>,
    #[serde(default, deserialize_with = "crate::form_utils::deserialize_optional_trimmed")]
    pub remark: Option<String>,
}

pub struct RemarkOption {
    pub remark: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "pages/analysis.html")]
pub struct AnalysisTemplate {
    pub title: String,
    pub version: &'static str,
    pub entries: Vec<Entry>,
    pub months: Vec<MonthOption>,
    pub remarks: Vec<RemarkOption>,
    /// Selected year as text, empty when unfiltered.
    pub year_value: String,
}

/// Filtered listing of the user's entries, newest first. Year, month, and
/// remark filters compose conjunctively; month is only applied with a year.
pub async fn index(
    State(state): State<AppState>,
    principal: Principal,
    Query(params): Query<AnalysisParams>,
) -> AppResult<Html<String>> {
    let filter = EntryFilter {
        year: params.year,
        month: params.month,
        remark: params.remark.clone(),
    };

    let conn = state.db.get()?;
    let entries = entries::list_entries(&conn, principal.user_id, &filter)?;
    let known_remarks = entries::distinct_remarks(&conn, principal.user_id)?;

    debug!(
        user_id = principal.user_id,
        count = entries.len(),
        "Analysis listing computed"
    );

    let remarks = known_remarks
        .into_iter()
        .map(|r| RemarkOption {
            selected: params.remark.as_deref() == Some(r.as_str()),
            remark: r,
        })
        .collect();

    AnalysisTemplate {
        title: "Analysis".into(),
        version: VERSION,
        entries,
        months: month_options(params.month),
        remarks,
        year_value: params.year.map(|y| y.to_string()).unwrap_or_default(),
    }
    .render_html()
}
