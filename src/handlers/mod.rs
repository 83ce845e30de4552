pub mod analysis;
pub mod api;
pub mod dashboard;
pub mod entries;

use std::time::Duration;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_cookies::CookieManagerLayer;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::date_utils::MONTH_NAMES;
use crate::error_pages;
use crate::state::AppState;

/// A month choice for the report filter selects.
pub struct MonthOption {
    pub number: u32,
    pub name: &'static str,
    pub selected: bool,
}

pub fn month_options(selected: Option<u32>) -> Vec<MonthOption> {
    MONTH_NAMES
        .iter()
        .copied()
        .enumerate()
        .map(|(i, name)| {
            let number = i as u32 + 1;
            MonthOption {
                number,
                name,
                selected: selected == Some(number),
            }
        })
        .collect()
}

/// The canonical route table. Protected routes sit behind the token gate;
/// everything else is public.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/dashboard", get(dashboard::index))
        .route("/analysis", get(analysis::index))
        .route("/add-entry", get(entries::new_form).post(entries::create))
        .route("/api/reports/monthly-summary", get(api::monthly_summary))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/", get(auth::login_page))
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route(
            "/register",
            get(auth::register_page).post(auth::register_submit),
        )
        .route("/logout", post(auth::logout))
        .route("/health", get(health))
        .merge(protected)
        .fallback(error_pages::fallback_handler)
        .nest_service("/static", ServeDir::new(&state.config.static_path))
        .layer(middleware::from_fn(error_pages::error_page_middleware))
        .layer(CookieManagerLayer::new())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
