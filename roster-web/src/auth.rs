//! Session guard
//!
//! The signed-in username lives in the server-side session under
//! [`USERNAME_KEY`]. Handlers receive it explicitly through the
//! [`SessionUser`] or [`RequestContext`] extractors.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::{debug, error};

use crate::WebError;

/// Session key holding the authenticated username
pub const USERNAME_KEY: &str = "username";

/// Where unauthenticated requests are sent
pub const LOGIN_PATH: &str = "/login";

/// Per-request view of who is signed in
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub identity: Option<String>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(username: impl Into<String>) -> Self {
        Self {
            identity: Some(username.into()),
        }
    }

    /// True iff the session holds a non-empty username
    pub fn is_authenticated(&self) -> bool {
        self.identity.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// Load the context from the session
    pub async fn load(session: &Session) -> Result<Self, WebError> {
        let identity = session.get::<String>(USERNAME_KEY).await?;
        Ok(Self { identity })
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        RequestContext::load(&session)
            .await
            .map_err(IntoResponse::into_response)
    }
}

/// Authentication redirect for protected pages
#[derive(Debug)]
pub struct AuthRedirect;

impl IntoResponse for AuthRedirect {
    fn into_response(self) -> Response {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

/// Extractor for protected pages: the signed-in username.
///
/// Rejects with a redirect to the login page when nobody is signed in, so
/// the handler body (and any store access) never runs.
#[derive(Debug, Clone)]
pub struct SessionUser(pub String);

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = AuthRedirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let context = RequestContext::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                error!("Session unavailable; treating request as unauthenticated");
                AuthRedirect
            })?;

        match context.identity {
            Some(username) if !username.is_empty() => Ok(SessionUser(username)),
            _ => {
                debug!("Unauthenticated request to {}", parts.uri.path());
                Err(AuthRedirect)
            }
        }
    }
}

/// Record `username` as signed in
pub async fn sign_in(session: &Session, username: &str) -> Result<(), WebError> {
    session.cycle_id().await?;
    session.insert(USERNAME_KEY, username).await?;
    Ok(())
}

/// Forget the signed-in user, keeping other session data (pending flashes)
pub async fn sign_out(session: &Session) -> Result<Option<String>, WebError> {
    Ok(session.remove::<String>(USERNAME_KEY).await?)
}
