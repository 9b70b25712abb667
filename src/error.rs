//! Error types
//!
//! The decision components never fail; these cover configuration and the
//! external collaborators.

use thiserror::Error;

/// Failure talking to a data provider or CRM.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{provider} credential is not configured")]
    MissingCredential { provider: &'static str },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} API error: {status} - {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} response could not be decoded: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ProviderError {
    /// Timeouts, connection failures, 429 and 5xx.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_transience() {
        let status = |status| ProviderError::Status {
            provider: "fub",
            status,
            body: String::new(),
        };
        assert!(status(503).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(404).is_transient());
        assert!(!status(401).is_transient());
    }

    #[test]
    fn non_http_errors_are_permanent() {
        assert!(!ProviderError::MissingCredential { provider: "attom" }.is_transient());
        assert!(!ProviderError::InvalidInput("x".into()).is_transient());
    }

    #[test]
    fn messages_name_the_provider() {
        let err = ProviderError::Status {
            provider: "FUB",
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "FUB API error: 500 - boom");
        assert_eq!(
            ProviderError::MissingCredential { provider: "ATTOM" }.to_string(),
            "ATTOM credential is not configured"
        );
    }
}
