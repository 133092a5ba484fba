//! Application state shared by all handlers

use std::path::PathBuf;
use std::sync::Arc;

use roster_core::{
    AccessPolicy, CsvImporter, DirectoryAuthenticator, EmployeeStore, LdapAuthenticator,
    RosterConfig, StaticAuthenticator,
};
use tracing::{info, warn};

use crate::{WebError, WebResult};

#[derive(Clone)]
pub struct AppState {
    /// Configuration
    pub config: Arc<RosterConfig>,
    /// Employee table
    pub store: EmployeeStore,
    /// Directory authentication plus the manager check
    pub policy: AccessPolicy,
    /// CSV importer writing into `store`
    pub importer: CsvImporter,
    /// Where raw uploads are saved
    pub upload_dir: PathBuf,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// Connects to the database, creates the upload directory and picks the
    /// directory authenticator (LDAP when a host is configured).
    pub async fn new(config: RosterConfig) -> WebResult<Self> {
        let store = EmployeeStore::connect(&config.database.url).await?;

        let authenticator: Arc<dyn DirectoryAuthenticator> = match &config.ldap.host {
            Some(host) => {
                let ldap = LdapAuthenticator::new(host, &config.ldap);
                info!(
                    "Authenticating against directory {} (search base {})",
                    ldap.url(),
                    ldap.search_base()
                );
                Arc::new(ldap)
            }
            None => {
                let users: StaticAuthenticator = config.ldap.dev_users.clone().into_iter().collect();
                warn!(
                    "No directory configured; using {} development user(s)",
                    users.len()
                );
                Arc::new(users)
            }
        };

        Self::with_parts(config, store, authenticator).await
    }

    /// Assemble state from already constructed collaborators
    pub async fn with_parts(
        config: RosterConfig,
        store: EmployeeStore,
        authenticator: Arc<dyn DirectoryAuthenticator>,
    ) -> WebResult<Self> {
        let upload_dir = config.uploads.dir.clone();
        tokio::fs::create_dir_all(&upload_dir).await.map_err(|e| {
            WebError::Config(format!(
                "Failed to create upload directory {}: {}",
                upload_dir.display(),
                e
            ))
        })?;

        let state = Self {
            policy: AccessPolicy::new(authenticator, store.clone()),
            importer: CsvImporter::new(store.clone()),
            store,
            upload_dir,
            config: Arc::new(config),
        };

        info!("Application state initialized successfully");
        Ok(state)
    }
}
