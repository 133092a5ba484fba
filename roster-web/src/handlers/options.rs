//! Options form handlers

use axum::{response::Html, response::Redirect, Form};
use tower_sessions::Session;

use super::types::OptionsForm;
use crate::auth::SessionUser;
use crate::flash::{flash, take_flashes, FlashCategory};
use crate::templates::{render, OptionsTemplate};
use crate::WebResult;

pub async fn options_page(
    SessionUser(username): SessionUser,
    session: Session,
) -> WebResult<Html<String>> {
    let flashes = take_flashes(&session).await?;
    render(&OptionsTemplate::new(username, flashes))
}

/// Echo the selected option back as a flash message
pub async fn options_submit(
    SessionUser(_username): SessionUser,
    session: Session,
    Form(form): Form<OptionsForm>,
) -> WebResult<Redirect> {
    let Some(selected) = form.dropdown.filter(|choice| !choice.is_empty()) else {
        flash(&session, FlashCategory::Danger, "Please select an option.").await?;
        return Ok(Redirect::to("/options"));
    };

    flash(
        &session,
        FlashCategory::Success,
        format!("Option \"{}\" selected.", selected),
    )
    .await?;
    Ok(Redirect::to("/"))
}
