//! Transport builders.
//!
//! Both transports are cut from one base [`Client`]; cloning a `reqwest::Client`
//! shares its connection pool, so the auth and main transports reuse connections.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};

use crate::auth::{AuthTransport, Session};
use crate::client::middleware::{
    AuthorizationMiddleware, CurlMiddleware, LoggingMiddleware, TokenAuthenticator,
};
use crate::client::sink::LogSink;
use crate::config::{ApiConfig, AuthConfig, LoggingConfig};
use crate::error::Result;

/// Build the shared base transport.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built.
pub fn build_base_client(config: &ApiConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(format!("spotstats/{}", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Build the credential-exchange transport: base transport only.
#[must_use]
pub fn build_auth_transport(base: &Client, config: &AuthConfig) -> AuthTransport {
    AuthTransport::new(
        base.clone(),
        config.base_url.clone(),
        config.client_id.clone(),
        config.client_secret.clone(),
    )
}

/// Build the main API transport with the full middleware stack.
#[must_use]
pub fn build_main_transport(
    base: &Client,
    session: &Arc<Session>,
    sink: &Arc<dyn LogSink>,
    logging: &LoggingConfig,
) -> ClientWithMiddleware {
    let mut builder = ClientBuilder::new(base.clone())
        .with(AuthorizationMiddleware::new(Arc::clone(session)))
        .with(TokenAuthenticator::new(Arc::clone(session)))
        .with(LoggingMiddleware::new(Arc::clone(sink), logging));

    if logging.curl {
        builder = builder.with(CurlMiddleware::new(Arc::clone(sink)));
    }

    builder.build()
}
