//! HTTP request handlers for the Roster web server
//!
//! This module contains all the HTTP request handlers organized by functionality.

pub mod auth;
pub mod health;
pub mod index;
pub mod options;
pub mod types;
pub mod upload;

pub use auth::*;
pub use health::*;
pub use index::*;
pub use options::*;
pub use upload::*;

pub use types::*;
