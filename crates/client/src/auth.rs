//! OAuth access tokens for Google APIs

use async_trait::async_trait;
use dv360_config::Config;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use tracing::trace;

use crate::{ClientError, Result};

/// Source of bearer tokens for a set of scopes
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self, scopes: &[&str]) -> Result<String>;
}

/// Tokens minted from service-account credentials
pub struct ServiceAccountTokens {
    account: CustomServiceAccount,
}

impl ServiceAccountTokens {
    /// Build from the configured credential JSON; fails on a missing or
    /// unusable key without touching the network
    pub fn from_config(config: &Config) -> Result<Self> {
        let key = config.service_account_key()?;
        let raw = config
            .service_account
            .as_deref()
            .ok_or(dv360_config::ConfigError::MissingServiceAccount)?;
        let account =
            CustomServiceAccount::from_json(raw).map_err(|e| ClientError::Auth(e.to_string()))?;
        trace!("◆ SERVICE ACCOUNT READY: {}", key.client_email);
        Ok(Self { account })
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokens {
    async fn access_token(&self, scopes: &[&str]) -> Result<String> {
        let token = self
            .account
            .token(scopes)
            .await
            .map_err(|e| ClientError::Auth(e.to_string()))?;
        Ok(token.as_str().to_string())
    }
}

/// Fixed token, for tests and pre-authorized environments
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self, _scopes: &[&str]) -> Result<String> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dv360_config::SERVICE_ACCOUNT_VAR;

    #[tokio::test]
    async fn test_static_token() {
        let source = StaticToken::new("abc");
        assert_eq!(source.access_token(&["scope"]).await.unwrap(), "abc");
    }

    #[test]
    fn test_from_config_without_credentials() {
        let err = ServiceAccountTokens::from_config(&Config::default())
            .err()
            .unwrap();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_from_config_with_unusable_key() {
        let config = Config::from_vars(vec![(
            SERVICE_ACCOUNT_VAR,
            r#"{"client_email":"a@b.iam","private_key":"not a pem key"}"#,
        )]);
        let err = ServiceAccountTokens::from_config(&config).err().unwrap();
        assert!(matches!(err, ClientError::Auth(_)));
    }
}
