//! Core trait definitions

use async_trait::async_trait;

/// Validates a username/credential pair against a directory service.
///
/// Implementations report only success or failure; transport errors are
/// logged by the implementation and reported as `false`.
#[async_trait]
pub trait DirectoryAuthenticator: Send + Sync {
    async fn authenticate(&self, username: &str, credential: &str) -> bool;
}
