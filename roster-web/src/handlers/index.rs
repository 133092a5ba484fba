//! Landing page

use axum::{extract::State, response::Html};
use tower_sessions::Session;

use crate::auth::SessionUser;
use crate::flash::take_flashes;
use crate::templates::{render, IndexTemplate};
use crate::{AppState, WebResult};

/// List the imported employees
pub async fn index(
    SessionUser(username): SessionUser,
    State(state): State<AppState>,
    session: Session,
) -> WebResult<Html<String>> {
    let flashes = take_flashes(&session).await?;
    let employees = state.store.list().await?;
    render(&IndexTemplate::new(username, flashes, employees))
}
