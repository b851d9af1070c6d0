//! Broker client error types
//!
//! The taxonomy keeps three cases apart: an unconfigured integration, an
//! authentication rejection from the broker (HTTP 401) and transport
//! failures, which pass through untouched.

use thiserror::Error;

/// Result type for broker operations
pub type Result<T> = std::result::Result<T, BrokerError>;

/// Envelope code the broker API uses for success
pub const SUCCESS_CODE: &str = "200000";

/// Broker operation errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrokerError {
    /// One or more credential fields are absent
    #[error("Broker credentials are not configured")]
    NotConfigured,

    /// The broker answered 401; never retried
    #[error("Authentication rejected by broker (code {code}): {message}")]
    AuthenticationRejected { code: String, message: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("HTTP error {0}: {1}")]
    HttpError(u16, String),

    /// Envelope code other than `200000`
    #[error("Broker API error {code}: {message}")]
    Api { code: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Credential store error: {0}")]
    CredentialStore(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Signing error: {0}")]
    SigningError(String),
}

impl BrokerError {
    /// True when the broker rejected the request's authentication
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self, BrokerError::AuthenticationRejected { .. })
    }

    /// True for failures of the underlying transport
    pub fn is_transport(&self) -> bool {
        matches!(self, BrokerError::NetworkError(_) | BrokerError::Timeout(_))
    }
}

impl From<serde_json::Error> for BrokerError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<url::ParseError> for BrokerError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<ndbroker_core::AmountError> for BrokerError {
    fn from(err: ndbroker_core::AmountError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}
