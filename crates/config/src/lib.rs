//! Configuration for the DV360 tool server
//!
//! Credentials and defaults come from the process environment, optionally
//! seeded from a `.env` file in the working directory.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub mod env;

pub use env::{PARTNER_ID_VAR, SERVICE_ACCOUNT_VAR};

/// Errors in configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "DV360_SERVICE_ACCOUNT environment variable not set. \
         Please set it to your service account JSON credentials."
    )]
    MissingServiceAccount,

    #[error("Invalid JSON in DV360_SERVICE_ACCOUNT environment variable: {0}")]
    InvalidServiceAccount(#[from] serde_json::Error),

    #[error("Service account credentials are missing '{0}'")]
    IncompleteServiceAccount(&'static str),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Google service-account key, as downloaded from the cloud console
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key_id: Option<String>,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Root configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Raw service-account JSON
    pub service_account: Option<String>,
    /// Partner used when a tool call does not name one
    pub partner_id: Option<String>,
}

impl Config {
    /// Load from the environment, reading `.env` first when present
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => info!("◆ LOADED ENVIRONMENT FROM {:?}", path),
            Err(e) => debug!("◆ NO .env FILE LOADED: {}", e),
        }
        Self::from_vars(std::env::vars())
    }

    /// Build from an arbitrary set of key/value pairs
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Config::default();
        for (key, value) in vars {
            match key.as_ref() {
                SERVICE_ACCOUNT_VAR => config.service_account = non_blank(value.into()),
                PARTNER_ID_VAR => config.partner_id = non_blank(value.into()),
                _ => {}
            }
        }
        config
    }

    /// Override the default partner id
    pub fn with_partner_id(mut self, partner_id: impl Into<String>) -> Self {
        self.partner_id = non_blank(partner_id.into());
        self
    }

    /// Check whether credentials are present (not whether they are valid)
    pub fn has_service_account(&self) -> bool {
        self.service_account.is_some()
    }

    /// Parse and sanity-check the service-account credentials
    pub fn service_account_key(&self) -> Result<ServiceAccountKey> {
        let raw = self
            .service_account
            .as_deref()
            .ok_or(ConfigError::MissingServiceAccount)?;
        let key: ServiceAccountKey = serde_json::from_str(raw)?;

        if key.client_email.is_empty() {
            return Err(ConfigError::IncompleteServiceAccount("client_email"));
        }
        if key.private_key.is_empty() {
            return Err(ConfigError::IncompleteServiceAccount("private_key"));
        }
        Ok(key)
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank("  ".to_string()), None);
        assert_eq!(non_blank(" 42 ".to_string()), Some("42".to_string()));
    }

    #[test]
    fn test_default_token_uri_applied() {
        let key: ServiceAccountKey =
            serde_json::from_str(r#"{"client_email":"a@b.iam","private_key":"k"}"#).unwrap();
        assert_eq!(key.token_uri, "https://oauth2.googleapis.com/token");
        assert!(key.project_id.is_none());
    }
}
