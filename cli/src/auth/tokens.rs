//! Token types for authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Seconds of slack applied before an access token is treated as expired.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Credential presented to the main API and renewed through the refresh exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// The access token sent as a bearer credential.
    pub access_token: String,
    /// The refresh token traded for a new access token.
    pub refresh_token: String,
    /// When the access token expires.
    pub expires_at: DateTime<Utc>,
    /// Token type (usually "Bearer").
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Granted scopes, space separated.
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Instant `secs` seconds from now, or `None` when it does not fit a timestamp.
#[must_use]
pub fn expiry_after_secs(secs: i64) -> Option<DateTime<Utc>> {
    Duration::try_seconds(secs).and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
}

impl Credential {
    /// Create a bearer credential that expires `expires_in` from now.
    ///
    /// Lifetimes past the last representable instant saturate to it.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: Duration,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at: Utc::now()
                .checked_add_signed(expires_in)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            token_type: default_token_type(),
            scope: None,
        }
    }

    /// Check if the access token is expired or about to expire.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now() + Duration::seconds(EXPIRY_MARGIN_SECS)
    }

    /// Check if the credential carries a usable refresh token.
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        !self.refresh_token.is_empty()
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Response body of the credential-exchange endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
    /// Providers may omit this when the refresh token is not rotated.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl TokenResponse {
    /// Build the credential that replaces `previous`.
    ///
    /// The previous refresh token is kept when the exchange did not rotate it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::TokenRefreshFailed`] when `expires_in` is out of range.
    pub fn into_credential(self, previous: &Credential) -> Result<Credential> {
        let expires_at = expiry_after_secs(self.expires_in.max(0)).ok_or_else(|| {
            ClientError::TokenRefreshFailed(format!(
                "token lifetime out of range: {}s",
                self.expires_in
            ))
        })?;

        Ok(Credential {
            access_token: self.access_token,
            refresh_token: self
                .refresh_token
                .unwrap_or_else(|| previous.refresh_token.clone()),
            expires_at,
            token_type: self.token_type,
            scope: self.scope.or_else(|| previous.scope.clone()),
        })
    }
}
