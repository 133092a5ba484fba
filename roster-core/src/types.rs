//! Core data types

use serde::{Deserialize, Serialize};

/// The only role allowed past the access policy
pub const MANAGER_ROLE: &str = "Manager";

/// A stored employee row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmployeeRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl EmployeeRecord {
    pub fn is_manager(&self) -> bool {
        self.role == MANAGER_ROLE
    }
}

/// An employee that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub role: String,
}

impl NewEmployee {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role: role.into(),
        }
    }
}

/// Outcome of a successful CSV import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
}
