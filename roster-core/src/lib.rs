//! Roster Core - employee store, directory authentication and CSV import
//!
//! Everything here is independent of the HTTP layer; `roster-web` wires it
//! into request handlers.

pub mod config;
pub mod directory;
pub mod error;
pub mod import;
pub mod logging;
pub mod policy;
pub mod store;
pub mod traits;
pub mod types;

pub use config::*;
pub use directory::{LdapAuthenticator, StaticAuthenticator};
pub use error::*;
pub use import::CsvImporter;
pub use logging::*;
pub use policy::AccessPolicy;
pub use store::EmployeeStore;
pub use traits::*;
pub use types::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tracing;
