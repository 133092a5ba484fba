//! Directory authenticators
//!
//! [`LdapAuthenticator`] talks to a real directory using the search-then-bind
//! flow: bind as a service account, find the user's entry, then bind again
//! as that entry with the supplied credential. [`StaticAuthenticator`] keeps
//! users in memory for development and tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use ldap3::{ldap_escape, LdapConnAsync, LdapConnSettings, LdapError, Scope, SearchEntry};
use tracing::{debug, warn};

use crate::config::LdapConfig;
use crate::traits::DirectoryAuthenticator;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// LDAP search-then-bind authenticator
#[derive(Debug, Clone)]
pub struct LdapAuthenticator {
    url: String,
    search_base: String,
    login_attr: String,
    bind_user_dn: Option<String>,
    bind_user_password: Option<String>,
}

impl LdapAuthenticator {
    pub fn new(host: &str, config: &LdapConfig) -> Self {
        let url = if host.contains("://") {
            host.to_string()
        } else {
            format!("ldap://{}", host)
        };

        let search_base = match config.user_dn.as_deref() {
            Some(user_dn) if !user_dn.is_empty() => format!("{},{}", user_dn, config.base_dn),
            _ => config.base_dn.clone(),
        };

        Self {
            url,
            search_base,
            login_attr: config.user_login_attr.clone(),
            bind_user_dn: config.bind_user_dn.clone(),
            bind_user_password: config.bind_user_password.clone(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn search_base(&self) -> &str {
        &self.search_base
    }

    /// Filter that selects the entry for `username`
    pub fn user_filter(&self, username: &str) -> String {
        format!("({}={})", self.login_attr, ldap_escape(username))
    }

    async fn try_authenticate(&self, username: &str, credential: &str) -> Result<bool, LdapError> {
        let settings = LdapConnSettings::new().set_conn_timeout(CONNECT_TIMEOUT);
        let (conn, mut ldap) = LdapConnAsync::with_settings(settings, &self.url).await?;
        ldap3::drive!(conn);

        if let (Some(dn), Some(password)) = (&self.bind_user_dn, &self.bind_user_password) {
            ldap.simple_bind(dn, password).await?.success()?;
        }

        let (entries, _) = ldap
            .search(
                &self.search_base,
                Scope::Subtree,
                &self.user_filter(username),
                vec!["1.1"],
            )
            .await?
            .success()?;

        let mut entries = entries.into_iter();
        let (Some(entry), None) = (entries.next(), entries.next()) else {
            debug!("Directory search for '{}' did not match exactly one entry", username);
            ldap.unbind().await?;
            return Ok(false);
        };
        let user_dn = SearchEntry::construct(entry).dn;

        let authenticated = ldap.simple_bind(&user_dn, credential).await?.rc == 0;
        ldap.unbind().await?;

        Ok(authenticated)
    }
}

#[async_trait]
impl DirectoryAuthenticator for LdapAuthenticator {
    async fn authenticate(&self, username: &str, credential: &str) -> bool {
        // An empty password would be an unauthenticated bind, which
        // most servers accept.
        if username.is_empty() || credential.is_empty() {
            return false;
        }

        match self.try_authenticate(username, credential).await {
            Ok(authenticated) => authenticated,
            Err(e) => {
                warn!("Directory authentication for '{}' failed: {}", username, e);
                false
            }
        }
    }
}

/// In-memory authenticator backed by a username → credential map
#[derive(Debug, Clone, Default)]
pub struct StaticAuthenticator {
    users: HashMap<String, String>,
}

impl StaticAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, username: impl Into<String>, credential: impl Into<String>) -> Self {
        self.users.insert(username.into(), credential.into());
        self
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticAuthenticator {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            users: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[async_trait]
impl DirectoryAuthenticator for StaticAuthenticator {
    async fn authenticate(&self, username: &str, credential: &str) -> bool {
        !credential.is_empty()
            && self
                .users
                .get(username)
                .is_some_and(|stored| stored == credential)
    }
}
