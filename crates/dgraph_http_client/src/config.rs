//! Configuration for a transaction handle.

use crate::error::{TxnError, TxnResult};
use dgraph_http_protocol::CommitPayload;
use std::time::Duration;

/// Connection parameters for one transaction.
///
/// All fields are fixed for the lifetime of the handle built from them.
#[derive(Debug, Clone)]
pub struct TxnConfig {
    /// API key sent in the `X-Auth-Token` header.
    pub api_key: String,
    /// Base URL of the server (e.g., "https://alpha.example.com").
    pub endpoint: String,
    /// Run queries as read-only.
    pub read_only: bool,
    /// Allow best-effort reads.
    pub best_effort: bool,
    /// Server-side query timeout hint.
    pub timeout: Duration,
    /// Shape of the commit body.
    pub commit_payload: CommitPayload,
}

impl TxnConfig {
    /// Default server-side timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

    /// Creates a new configuration with default flags.
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            read_only: false,
            best_effort: false,
            timeout: Self::DEFAULT_TIMEOUT,
            commit_payload: CommitPayload::default(),
        }
    }

    /// Marks the transaction as read-only.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Enables best-effort queries.
    pub fn with_best_effort(mut self, best_effort: bool) -> Self {
        self.best_effort = best_effort;
        self
    }

    /// Sets the server-side timeout. Zero disables the parameter.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the commit body shape.
    pub fn with_commit_payload(mut self, payload: CommitPayload) -> Self {
        self.commit_payload = payload;
        self
    }

    /// Checks that the required parameters are present.
    pub fn validate(&self) -> TxnResult<()> {
        if self.api_key.is_empty() {
            return Err(TxnError::MissingApiKey);
        }
        if self.endpoint.is_empty() {
            return Err(TxnError::MissingEndpoint);
        }
        Ok(())
    }

    /// Returns the endpoint without trailing slashes.
    pub(crate) fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txn_config_builder() {
        let config = TxnConfig::new("key", "https://alpha.example.com")
            .with_read_only(true)
            .with_best_effort(true)
            .with_timeout(Duration::from_secs(20))
            .with_commit_payload(CommitPayload::KeysOnly);

        assert_eq!(config.api_key, "key");
        assert_eq!(config.endpoint, "https://alpha.example.com");
        assert!(config.read_only);
        assert!(config.best_effort);
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.commit_payload, CommitPayload::KeysOnly);
    }

    #[test]
    fn txn_config_defaults() {
        let config = TxnConfig::new("key", "https://alpha.example.com");
        assert!(!config.read_only);
        assert!(!config.best_effort);
        assert_eq!(config.timeout, Duration::from_secs(600));
        assert_eq!(config.commit_payload, CommitPayload::KeysAndPreds);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_required_fields() {
        let err = TxnConfig::new("", "https://alpha.example.com")
            .validate()
            .unwrap_err();
        assert!(matches!(err, TxnError::MissingApiKey));

        let err = TxnConfig::new("key", "").validate().unwrap_err();
        assert!(matches!(err, TxnError::MissingEndpoint));
    }

    #[test]
    fn base_url_strips_trailing_slash() {
        let config = TxnConfig::new("key", "https://alpha.example.com/");
        assert_eq!(config.base_url(), "https://alpha.example.com");
    }
}
