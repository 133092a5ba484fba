//! Configuration management
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables. Command-line overrides are applied by the binary.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::logging::LoggingConfig;

/// Secret used when none is configured. Only suitable for local development.
pub const DEV_SECRET_KEY: &str = "roster-dev-secret-change-me";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub uploads: UploadConfig,
    pub ldap: LdapConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Signs the session cookie
    pub secret_key: String,
    /// Mark the session cookie `Secure` (HTTPS only)
    pub secure_cookies: bool,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
    /// Sessions expire after this many idle minutes; 0 keeps them for the
    /// lifetime of the browser session
    pub session_inactivity_minutes: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            secret_key: DEV_SECRET_KEY.to_string(),
            secure_cookies: false,
            max_upload_bytes: 5 * 1024 * 1024,
            session_inactivity_minutes: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:data.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub dir: PathBuf,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LdapConfig {
    /// Directory host or URL; when unset, `dev_users` is used instead
    pub host: Option<String>,
    pub base_dn: String,
    /// Container of user entries, relative to `base_dn`
    pub user_dn: Option<String>,
    /// Attribute matched against the submitted username
    pub user_login_attr: String,
    pub bind_user_dn: Option<String>,
    pub bind_user_password: Option<String>,
    /// username → password pairs for running without a directory
    pub dev_users: HashMap<String, String>,
}

impl Default for LdapConfig {
    fn default() -> Self {
        Self {
            host: None,
            base_dn: "DC=example,DC=com".to_string(),
            user_dn: Some("CN=Users".to_string()),
            user_login_attr: "uid".to_string(),
            bind_user_dn: None,
            bind_user_password: None,
            dev_users: HashMap::new(),
        }
    }
}

impl RosterConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Defaults overlaid with the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Overlay values from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Overlay values looked up through `lookup`
    pub fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("ROSTER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("ROSTER_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::invalid("server.port", format!("'{}' is not a port", port)))?;
        }
        if let Some(secret) = lookup("ROSTER_SECRET_KEY") {
            self.server.secret_key = secret;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(dir) = lookup("ROSTER_UPLOAD_DIR") {
            self.uploads.dir = PathBuf::from(dir);
        }
        if let Some(host) = lookup("ROSTER_LDAP_HOST") {
            self.ldap.host = Some(host);
        }
        if let Some(base_dn) = lookup("ROSTER_LDAP_BASE_DN") {
            self.ldap.base_dn = base_dn;
        }
        if let Some(user_dn) = lookup("ROSTER_LDAP_USER_DN") {
            self.ldap.user_dn = Some(user_dn);
        }
        if let Some(attr) = lookup("ROSTER_LDAP_USER_LOGIN_ATTR") {
            self.ldap.user_login_attr = attr;
        }
        if let Some(dn) = lookup("ROSTER_LDAP_BIND_USER_DN") {
            self.ldap.bind_user_dn = Some(dn);
        }
        if let Some(password) = lookup("ROSTER_LDAP_BIND_USER_PASSWORD") {
            self.ldap.bind_user_password = Some(password);
        }
        if let Some(level) = lookup("ROSTER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("ROSTER_LOG_FORMAT") {
            self.logging.format = format
                .parse()
                .map_err(|e: String| ConfigError::invalid("logging.format", e))?;
        }
        Ok(())
    }

    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.is_empty() {
            return Err(ConfigError::invalid("server.host", "must not be empty"));
        }
        if self.server.port == 0 {
            return Err(ConfigError::invalid("server.port", "must not be 0"));
        }
        if self.server.secret_key.is_empty() {
            return Err(ConfigError::invalid("server.secret_key", "must not be empty"));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::invalid(
                "server.max_upload_bytes",
                "must be greater than 0",
            ));
        }
        if self.database.url.is_empty() {
            return Err(ConfigError::invalid("database.url", "must not be empty"));
        }
        if let Some(host) = &self.ldap.host {
            if host.is_empty() {
                return Err(ConfigError::invalid("ldap.host", "must not be empty if provided"));
            }
            if self.ldap.user_login_attr.is_empty() {
                return Err(ConfigError::invalid("ldap.user_login_attr", "must not be empty"));
            }
        }

        if self.server.secret_key == DEV_SECRET_KEY {
            warn!("Using the built-in development secret key; set ROSTER_SECRET_KEY in production");
        }

        Ok(())
    }

    /// Address the server binds to
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
