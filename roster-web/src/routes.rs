//! Route definitions for the Roster web server

use crate::{handlers, AppState};
use axum::{routing::get, Router};

/// HTML pages
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/login", get(handlers::login_page).post(handlers::login_submit))
        .route("/logout", get(handlers::logout))
        .route("/upload", get(handlers::upload_page).post(handlers::upload_submit))
        .route(
            "/options",
            get(handlers::options_page).post(handlers::options_submit),
        )
}

/// Machine-readable endpoints
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health_check))
}
