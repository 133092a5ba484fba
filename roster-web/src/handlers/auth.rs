//! Login and logout handlers

use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use roster_core::{AuthError, AUDIT_TARGET};
use tower_sessions::Session;
use tracing::info;

use super::types::LoginForm;
use crate::auth::{sign_in, sign_out, LOGIN_PATH};
use crate::flash::{flash, take_flashes, FlashCategory};
use crate::templates::{render, LoginTemplate};
use crate::{AppState, WebResult};

/// Render the login form
pub async fn login_page(session: Session) -> WebResult<Html<String>> {
    let flashes = take_flashes(&session).await?;
    render(&LoginTemplate::new(flashes, String::new()))
}

/// Validate credentials with the directory, then apply the manager policy.
///
/// Non-managers are sent through `/logout` so they end up signed out with
/// both the denial and the logout notice queued.
pub async fn login_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> WebResult<Response> {
    let username = form.username;

    if username.is_empty() || form.password.is_empty() {
        flash(&session, FlashCategory::Danger, "Invalid username or password.").await?;
        return login_form_again(&session, username).await;
    }

    info!("User login attempt: {}", username);

    match state.policy.login(&username, &form.password).await {
        Ok(employee) => {
            sign_in(&session, &employee.email).await?;
            flash(&session, FlashCategory::Success, "Logged in successfully!").await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::AccessDenied(_)) => {
            sign_out(&session).await?;
            flash(
                &session,
                FlashCategory::Danger,
                "Access denied: You must be a manager.",
            )
            .await?;
            Ok(Redirect::to("/logout").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            flash(&session, FlashCategory::Danger, "Invalid username or password.").await?;
            login_form_again(&session, username).await
        }
        Err(AuthError::Store(e)) => Err(e.into()),
    }
}

async fn login_form_again(session: &Session, username: String) -> WebResult<Response> {
    let flashes = take_flashes(session).await?;
    Ok(render(&LoginTemplate::new(flashes, username))?.into_response())
}

/// Sign out and return to the login page
pub async fn logout(session: Session) -> WebResult<Redirect> {
    if let Some(username) = sign_out(&session).await? {
        info!(target: AUDIT_TARGET, user = %username, "User logged out");
    }

    flash(&session, FlashCategory::Info, "You have been logged out.").await?;
    Ok(Redirect::to(LOGIN_PATH))
}
