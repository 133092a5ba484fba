//! Manager-only access policy
//!
//! A login succeeds only when the directory accepts the credentials *and*
//! the employee table records the user (matched by email) as a manager.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{AuthError, AuthResult};
use crate::logging::AUDIT_TARGET;
use crate::store::EmployeeStore;
use crate::traits::DirectoryAuthenticator;
use crate::types::EmployeeRecord;

#[derive(Clone)]
pub struct AccessPolicy {
    authenticator: Arc<dyn DirectoryAuthenticator>,
    store: EmployeeStore,
}

impl AccessPolicy {
    pub fn new(authenticator: Arc<dyn DirectoryAuthenticator>, store: EmployeeStore) -> Self {
        Self {
            authenticator,
            store,
        }
    }

    /// Check the credentials with the directory only
    pub async fn authenticate(&self, username: &str, credential: &str) -> bool {
        self.authenticator.authenticate(username, credential).await
    }

    /// Check that an already authenticated user holds the manager role
    pub async fn authorize(&self, username: &str) -> AuthResult<EmployeeRecord> {
        match self.store.find_by_email(username).await? {
            Some(employee) if employee.is_manager() => Ok(employee),
            Some(employee) => {
                warn!(
                    target: AUDIT_TARGET,
                    user = username,
                    role = %employee.role,
                    "Access denied: not a manager"
                );
                Err(AuthError::AccessDenied(username.to_string()))
            }
            None => {
                warn!(
                    target: AUDIT_TARGET,
                    user = username,
                    "Access denied: no employee record"
                );
                Err(AuthError::AccessDenied(username.to_string()))
            }
        }
    }

    /// Authenticate, then authorize.
    ///
    /// `AccessDenied` means the directory accepted the user; callers that
    /// track sessions treat the user as signed in and immediately sign them
    /// out again.
    pub async fn login(&self, username: &str, credential: &str) -> AuthResult<EmployeeRecord> {
        if !self.authenticate(username, credential).await {
            warn!(target: AUDIT_TARGET, user = username, "Authentication failed");
            return Err(AuthError::InvalidCredentials);
        }

        let employee = self.authorize(username).await?;
        info!(target: AUDIT_TARGET, user = username, "Manager logged in");
        Ok(employee)
    }
}
