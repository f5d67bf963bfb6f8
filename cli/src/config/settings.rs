//! Application configuration settings.

use serde::{Deserialize, Serialize};
use url::Url;

/// Main API base address. Paths are resolved relative to it.
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1/";

/// Credential-exchange base address.
pub const DEFAULT_AUTH_BASE_URL: &str = "https://accounts.spotify.com/";

/// Main configuration for spotstats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Main API client settings.
    pub api: ApiConfig,
    /// Credential-exchange settings.
    pub auth: AuthConfig,
    /// HTTP diagnostics settings.
    pub logging: LoggingConfig,
}

/// API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Main API base URL.
    #[serde(with = "url_serde")]
    pub base_url: Url,
    /// Request timeout in seconds, shared by both transports.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_BASE_URL).expect("valid default URL"),
            timeout_secs: 30,
        }
    }
}

/// Credential-exchange configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Accounts service base URL.
    #[serde(with = "url_serde")]
    pub base_url: Url,
    /// Application client ID.
    pub client_id: String,
    /// Client secret for confidential clients. Public (PKCE) clients leave it unset.
    pub client_secret: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_AUTH_BASE_URL).expect("valid default URL"),
            client_id: String::new(),
            client_secret: None,
        }
    }
}

/// How much of each HTTP exchange the logging middleware reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpLogLevel {
    /// No exchange records.
    None,
    /// Method, URL, status and timing.
    #[default]
    Basic,
    /// Basic plus request and response headers.
    Headers,
    /// Headers plus request and response bodies. Response bodies are buffered.
    Body,
}

impl TryFrom<&str> for HttpLogLevel {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "basic" => Ok(Self::Basic),
            "headers" => Ok(Self::Headers),
            "body" => Ok(Self::Body),
            _ => Err(format!("Unknown HTTP log level: {s}")),
        }
    }
}

/// HTTP diagnostics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Exchange record verbosity.
    pub level: HttpLogLevel,
    /// Mask credential-bearing header values in exchange records.
    pub redact_credentials: bool,
    /// Emit a reproducible curl command per request.
    pub curl: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: HttpLogLevel::Basic,
            redact_credentials: true,
            curl: false,
        }
    }
}

/// Custom serde module for URL serialization.
mod url_serde {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use url::Url;

    pub fn serialize<S>(url: &Url, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(url.as_str())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Url, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Url::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Environment variables that can override configuration.
pub mod env {
    pub const API_URL: &str = "SPOTSTATS_API_URL";
    pub const AUTH_URL: &str = "SPOTSTATS_AUTH_URL";
    pub const CLIENT_ID: &str = "SPOTSTATS_CLIENT_ID";
    pub const CLIENT_SECRET: &str = "SPOTSTATS_CLIENT_SECRET";
    pub const HTTP_LOG: &str = "SPOTSTATS_HTTP_LOG";
    pub const LOG_LEVEL: &str = "SPOTSTATS_LOG";
}

impl AppConfig {
    /// Apply environment variable overrides to the configuration.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(parsed) = lookup(env::API_URL).and_then(|url| Url::parse(&url).ok()) {
            self.api.base_url = parsed;
        }

        if let Some(parsed) = lookup(env::AUTH_URL).and_then(|url| Url::parse(&url).ok()) {
            self.auth.base_url = parsed;
        }

        if let Some(client_id) = lookup(env::CLIENT_ID) {
            self.auth.client_id = client_id;
        }

        if let Some(secret) = lookup(env::CLIENT_SECRET) {
            self.auth.client_secret = Some(secret);
        }

        if let Some(level) = lookup(env::HTTP_LOG).and_then(|l| HttpLogLevel::try_from(l.as_str()).ok()) {
            self.logging.level = level;
        }

        self
    }
}
