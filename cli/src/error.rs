//! Error types and result aliases for spotstats.
//!
//! This module provides the error taxonomy of the HTTP pipeline:
//! - Authentication failures that survived the refresh-and-retry cycle
//! - Refresh failures that require a fresh interactive login
//! - Transport failures propagated unchanged for the caller's own retry policy
//! - Local configuration, storage and serialization failures

use thiserror::Error;

/// Main error type for spotstats operations.
///
/// Each variant includes a user-friendly message with actionable recovery steps.
/// Use [`requires_reauth`](Self::requires_reauth) and [`is_retriable`](Self::is_retriable)
/// to determine appropriate error handling strategies.
#[derive(Error, Debug)]
pub enum ClientError {
    /// No credential is stored.
    #[error("Not authenticated. Run 'spotstats auth import' to store a credential.")]
    NotAuthenticated,

    /// The refresh exchange failed and the stored credential was cleared.
    #[error("Your session has expired and could not be renewed. Log in again and run 'spotstats auth import'.")]
    ReauthenticationRequired,

    /// Stored credentials are malformed or corrupted.
    #[error("Invalid credentials. Your stored credentials may be corrupted. Try 'spotstats auth logout' then 'spotstats auth import'.")]
    InvalidCredentials,

    /// Token refresh request failed.
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// API returned a non-success status code.
    #[error("API request failed ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// API still returned 401 after a refreshed credential was presented.
    #[error("API server returned unauthorized (401) after refreshing the session. Log in again and run 'spotstats auth import'.")]
    Unauthorized,

    /// API server is unreachable (503 or connection failed).
    #[error("API server is unavailable. Check your network connection or try again later.")]
    ApiUnavailable,

    /// Request timed out.
    #[error("Request timed out. The server may be slow or unreachable. Try again later.")]
    Timeout,

    /// Network error during HTTP request.
    #[error("Network error: {0}. Check your internet connection.")]
    Network(String),

    /// A middleware in the pipeline failed outside the transport.
    #[error("Request pipeline error: {0}")]
    Middleware(String),

    /// Failed to access the OS keyring.
    #[error("Failed to access credential storage: {0}. Ensure your system keyring is unlocked.")]
    CredentialStorage(String),

    /// General configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}. Check file permissions and format.")]
    ConfigRead(String),

    /// Failed to write configuration file.
    #[error("Failed to write configuration file: {0}. Check directory permissions.")]
    ConfigWrite(String),

    /// IO operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("Data serialization error: {0}. This may indicate corrupted data.")]
    Serialization(String),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Checks if this error can be resolved by logging in again.
    ///
    /// Only these conditions are meant to reach the user; everything else is either
    /// recovered inside the pipeline or a transport problem owned by the caller.
    #[must_use]
    pub const fn requires_reauth(&self) -> bool {
        matches!(
            self,
            Self::NotAuthenticated
                | Self::ReauthenticationRequired
                | Self::InvalidCredentials
                | Self::Unauthorized
        )
    }

    /// Checks if this error is transient and the operation might succeed on retry.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout | Self::ApiUnavailable)
    }
}

/// Result type alias using [`ClientError`].
pub type Result<T> = std::result::Result<T, ClientError>;

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(format!("JSON error: {err}"))
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigRead(format!("TOML parse error: {err}"))
    }
}

impl From<toml::ser::Error> for ClientError {
    fn from(err: toml::ser::Error) -> Self {
        Self::ConfigWrite(format!("TOML serialize error: {err}"))
    }
}

impl From<keyring::Error> for ClientError {
    fn from(err: keyring::Error) -> Self {
        Self::CredentialStorage(err.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ApiUnavailable
        } else if err.is_decode() {
            Self::Serialization(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<reqwest_middleware::Error> for ClientError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => e.into(),
            reqwest_middleware::Error::Middleware(e) => match e.downcast::<Self>() {
                Ok(client_error) => client_error,
                Err(other) => Self::Middleware(format!("{other:#}")),
            },
        }
    }
}
