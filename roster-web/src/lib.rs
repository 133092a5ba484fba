//! Roster Web Server
//!
//! HTML front end: directory login restricted to managers, CSV employee
//! upload and a small options form. All pages except `/login`, `/logout`
//! and `/health` require a signed-in session.

pub mod auth;
pub mod flash;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;
pub mod templates;

// Re-export main types
pub use roster_core::{init_logging, RosterConfig};
pub use server::RosterServer;
pub use state::AppState;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit},
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use roster_core::StoreError;
use sha2::{Digest, Sha512};
use tower_http::trace::TraceLayer;
use tower_sessions::{
    cookie::{time::Duration, Key, SameSite},
    Expiry, MemoryStore, SessionManagerLayer,
};
use tracing::error;

use crate::templates::{render, ErrorTemplate};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "roster_session";

/// Create the main application router
pub fn create_app(state: AppState) -> Router {
    let server = &state.config.server;

    // The cookie key needs 64 bytes; stretch whatever secret was configured.
    let key = Key::from(Sha512::digest(server.secret_key.as_bytes()).as_slice());

    let mut sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE)
        .with_secure(server.secure_cookies)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_signed(key);

    if server.session_inactivity_minutes > 0 {
        sessions = sessions.with_expiry(Expiry::OnInactivity(Duration::minutes(i64::from(
            server.session_inactivity_minutes,
        ))));
    }

    let body_limit = server.max_upload_bytes;

    Router::new()
        .merge(routes::page_routes())
        .merge(routes::api_routes())
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Error types for the web server
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Upload error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Database error: {0}")]
    Database(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            WebError::Multipart(e) => (e.status(), e.body_text()),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong while handling your request.".to_string(),
            ),
        };

        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        match render(&ErrorTemplate::new(status.as_u16(), message.clone())) {
            Ok(html) => (status, html).into_response(),
            Err(_) => (status, message).into_response(),
        }
    }
}
