//! Unified error handling system
//!
//! Each concern owns a small `thiserror` enum; [`RosterError`] wraps them all
//! for callers that only need to propagate.

use thiserror::Error;
use tracing::{error, warn};

pub type RosterResult<T> = Result<T, RosterError>;

/// Result of an authentication/authorization attempt
pub type AuthResult<T> = Result<T, AuthError>;

/// Employee store failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("An employee with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to prepare database location: {0}")]
    Io(#[from] std::io::Error),
}

/// Login failures
#[derive(Error, Debug)]
pub enum AuthError {
    /// The directory rejected the username/credential pair
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Authenticated, but not a manager
    #[error("Access denied: user '{0}' is not a manager")]
    AccessDenied(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Upload validation failures
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Invalid file format: '{0}' is not a CSV file")]
    InvalidExtension(String),

    #[error("No file was provided")]
    MissingFile,
}

/// CSV import failures. The whole batch is discarded on any of these.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to read CSV file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),

    #[error("Row {row}: missing value for '{column}'")]
    MissingValue { row: u64, column: &'static str },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Configuration failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration for '{field}': {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Main error type for the Roster system
#[derive(Error, Debug)]
pub enum RosterError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RosterError {
    /// Whether the error is caused by user input rather than a server fault
    pub fn is_user_error(&self) -> bool {
        match self {
            RosterError::Auth(AuthError::Store(_)) => false,
            RosterError::Auth(_) | RosterError::Upload(_) => true,
            RosterError::Import(
                ImportError::MissingColumns(_) | ImportError::MissingValue { .. } | ImportError::Csv(_),
            ) => true,
            RosterError::Import(ImportError::Store(StoreError::DuplicateEmail(_))) => true,
            RosterError::Store(StoreError::DuplicateEmail(_)) => true,
            _ => false,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        if self.is_user_error() {
            warn!(error = %self, "Request rejected");
        } else {
            match self {
                RosterError::Config(_) => {
                    error!(error = %self, "Configuration error");
                }
                _ => {
                    error!(error = %self, "Error occurred");
                }
            }
        }
    }
}
