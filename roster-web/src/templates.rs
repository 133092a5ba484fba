//! Template system for server-side rendering
//!
//! This module provides templates for server-side rendering using Askama.

use askama::Template;
use axum::response::Html;
use roster_core::EmployeeRecord;

use crate::flash::FlashMessage;
use crate::WebResult;

/// Choices offered on the options page
pub const OPTIONS: [&str; 3] = ["Option 1", "Option 2", "Option 3"];

/// Landing page for signed-in managers
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: String,
    pub username: Option<String>,
    pub flashes: Vec<FlashMessage>,
    pub employees: Vec<EmployeeRecord>,
}

/// Login form
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub title: String,
    pub username: Option<String>,
    pub flashes: Vec<FlashMessage>,
    /// Value to pre-fill in the username field
    pub submitted_username: String,
}

/// CSV upload form
#[derive(Template)]
#[template(path = "upload.html")]
pub struct UploadTemplate {
    pub title: String,
    pub username: Option<String>,
    pub flashes: Vec<FlashMessage>,
}

/// Options dropdown
#[derive(Template)]
#[template(path = "options.html")]
pub struct OptionsTemplate {
    pub title: String,
    pub username: Option<String>,
    pub flashes: Vec<FlashMessage>,
    pub options: Vec<String>,
}

/// Error page template
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub username: Option<String>,
    pub flashes: Vec<FlashMessage>,
    pub error_code: u16,
    pub error_message: String,
}

impl IndexTemplate {
    pub fn new(username: String, flashes: Vec<FlashMessage>, employees: Vec<EmployeeRecord>) -> Self {
        Self {
            title: "Roster".to_string(),
            username: Some(username),
            flashes,
            employees,
        }
    }
}

impl LoginTemplate {
    pub fn new(flashes: Vec<FlashMessage>, submitted_username: String) -> Self {
        Self {
            title: "Sign in - Roster".to_string(),
            username: None,
            flashes,
            submitted_username,
        }
    }
}

impl UploadTemplate {
    pub fn new(username: String, flashes: Vec<FlashMessage>) -> Self {
        Self {
            title: "Upload employees - Roster".to_string(),
            username: Some(username),
            flashes,
        }
    }
}

impl OptionsTemplate {
    pub fn new(username: String, flashes: Vec<FlashMessage>) -> Self {
        Self {
            title: "Options - Roster".to_string(),
            username: Some(username),
            flashes,
            options: OPTIONS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl ErrorTemplate {
    pub fn new(error_code: u16, error_message: String) -> Self {
        Self {
            title: format!("Error {} - Roster", error_code),
            username: None,
            flashes: Vec::new(),
            error_code,
            error_message,
        }
    }
}

/// Render a template into an HTML response body
pub fn render<T: Template>(template: &T) -> WebResult<Html<String>> {
    Ok(Html(template.render()?))
}
