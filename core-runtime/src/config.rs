//! Environment-provided configuration.
//!
//! All settings are required at startup with no defaults; a missing or
//! malformed variable fails fast with a descriptive error. An optional
//! `.env` file next to the binary is honored before the process environment
//! is consulted.

use std::env;

use crate::error::{Result, RuntimeError};

const ELASTICSEARCH_HOST: &str = "ELASTICSEARCH_HOST";
const ELASTICSEARCH_PORT: &str = "ELASTICSEARCH_PORT";
const ELASTICSEARCH_USER: &str = "ELASTICSEARCH_USER";
const ELASTICSEARCH_PASSWORD: &str = "ELASTICSEARCH_PASSWORD";
const DISCOGS_USERNAME: &str = "DISCOGS_USERNAME";
const DISCOGS_TOKEN: &str = "DISCOGS_TOKEN";

/// Resolved settings for one sync run
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Index service host name
    pub elasticsearch_host: String,

    /// Index service port
    pub elasticsearch_port: u16,

    /// Index service basic-auth username
    pub elasticsearch_user: String,

    /// Index service basic-auth password
    pub elasticsearch_password: String,

    /// Default catalog account to sync when no `--user` flag is given
    pub discogs_username: String,

    /// Catalog personal token; `None` runs in anonymous (throttled) mode
    pub discogs_token: Option<String>,
}

impl SyncSettings {
    /// Load settings from a `.env` file (if present) and the environment.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error naming the first missing or malformed
    /// variable.
    pub fn from_env() -> Result<Self> {
        // Missing .env is fine; variables may come from the environment.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    RuntimeError::Config(format!("Required environment variable {} is not set", key))
                })
        };

        let port_raw = require(ELASTICSEARCH_PORT)?;
        let elasticsearch_port = port_raw.parse::<u16>().map_err(|_| {
            RuntimeError::Config(format!(
                "{} must be a port number, got '{}'",
                ELASTICSEARCH_PORT, port_raw
            ))
        })?;

        Ok(Self {
            elasticsearch_host: require(ELASTICSEARCH_HOST)?,
            elasticsearch_port,
            elasticsearch_user: require(ELASTICSEARCH_USER)?,
            elasticsearch_password: require(ELASTICSEARCH_PASSWORD)?,
            discogs_username: require(DISCOGS_USERNAME)?,
            // Empty token means anonymous mode, not a config error.
            discogs_token: lookup(DISCOGS_TOKEN).filter(|t| !t.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn complete() -> HashMap<String, String> {
        env(&[
            (ELASTICSEARCH_HOST, "es.example.com"),
            (ELASTICSEARCH_PORT, "9243"),
            (ELASTICSEARCH_USER, "elastic"),
            (ELASTICSEARCH_PASSWORD, "hunter2"),
            (DISCOGS_USERNAME, "rodney"),
            (DISCOGS_TOKEN, "tok123"),
        ])
    }

    #[test]
    fn test_complete_environment() {
        let vars = complete();
        let settings = SyncSettings::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(settings.elasticsearch_host, "es.example.com");
        assert_eq!(settings.elasticsearch_port, 9243);
        assert_eq!(settings.discogs_username, "rodney");
        assert_eq!(settings.discogs_token.as_deref(), Some("tok123"));
    }

    #[test]
    fn test_missing_variable_is_named() {
        let mut vars = complete();
        vars.remove(ELASTICSEARCH_PASSWORD);

        let err = SyncSettings::from_lookup(|k| vars.get(k).cloned()).unwrap_err();

        assert!(err.to_string().contains(ELASTICSEARCH_PASSWORD));
    }

    #[test]
    fn test_bad_port_is_rejected() {
        let mut vars = complete();
        vars.insert(ELASTICSEARCH_PORT.to_string(), "not-a-port".to_string());

        let err = SyncSettings::from_lookup(|k| vars.get(k).cloned()).unwrap_err();

        assert!(err.to_string().contains("port number"));
    }

    #[test]
    fn test_empty_token_means_anonymous() {
        let mut vars = complete();
        vars.insert(DISCOGS_TOKEN.to_string(), String::new());

        let settings = SyncSettings::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert!(settings.discogs_token.is_none());
    }
}
