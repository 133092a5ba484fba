//! One-shot flash messages stored in the session

use std::fmt;

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::WebError;

const FLASH_KEY: &str = "_flashes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Danger,
    Info,
}

impl fmt::Display for FlashCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlashCategory::Success => "success",
            FlashCategory::Danger => "danger",
            FlashCategory::Info => "info",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub category: FlashCategory,
    pub message: String,
}

/// Queue a message for the next rendered page
pub async fn flash(
    session: &Session,
    category: FlashCategory,
    message: impl Into<String>,
) -> Result<(), WebError> {
    let mut pending: Vec<FlashMessage> = session.get(FLASH_KEY).await?.unwrap_or_default();
    pending.push(FlashMessage {
        category,
        message: message.into(),
    });
    session.insert(FLASH_KEY, pending).await?;
    Ok(())
}

/// Remove and return all queued messages
pub async fn take_flashes(session: &Session) -> Result<Vec<FlashMessage>, WebError> {
    Ok(session
        .remove::<Vec<FlashMessage>>(FLASH_KEY)
        .await?
        .unwrap_or_default())
}
