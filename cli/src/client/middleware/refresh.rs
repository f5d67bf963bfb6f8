//! Refresh-on-401 authenticator.
//!
//! The authenticator only engages when the server answers `401 Unauthorized`. It then
//! walks a small state machine:
//!
//! ```text
//! Idle --401, no prior retry--> Refreshing --credential--> Retrying --> Idle
//!                                    \--no credential / rejected--> Failed
//! ```
//!
//! The session's refresh lock guards the `Idle -> Refreshing` edge, so simultaneous
//! rejections share one exchange. Each logical request is retried at most once.

use std::sync::Arc;

use async_trait::async_trait;
use http::header::AUTHORIZATION;
use http::{Extensions, HeaderValue};
use reqwest::{Request, Response, StatusCode};
use reqwest_middleware::{Error, Middleware, Next, Result};

use crate::auth::{Credential, RefreshOutcome, Session};
use crate::error::ClientError;

/// Retries allowed per logical request after an authentication failure.
pub const MAX_AUTH_RETRIES: u32 = 1;

/// Number of authentication retries already spent on a request chain.
///
/// Stored in the request [`Extensions`] so outer layers can observe it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthAttempts(pub u32);

/// Authenticator states.
#[derive(Debug)]
enum AuthState {
    Idle,
    Refreshing,
    Retrying(Credential),
    Failed,
}

/// Middleware that refreshes the credential and replays the request on a 401.
pub struct TokenAuthenticator {
    session: Arc<Session>,
}

impl TokenAuthenticator {
    /// Create a new token authenticator.
    #[must_use]
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }

    /// Decide whether a response should trigger a refresh.
    fn should_engage(response: &Response, attempts: u32) -> bool {
        response.status() == StatusCode::UNAUTHORIZED && attempts < MAX_AUTH_RETRIES
    }

    /// Run the refresh in its own task so a cancelled caller never cancels the
    /// exchange other requests may be waiting on.
    async fn refresh(&self, rejected_token: Option<String>) -> Result<AuthState> {
        let session = Arc::clone(&self.session);
        let outcome = tokio::spawn(async move { session.refresh_rejected(rejected_token).await })
            .await
            .map_err(|e| Error::middleware(ClientError::TokenRefreshFailed(e.to_string())))?;

        match outcome {
            RefreshOutcome::Refreshed(creds) | RefreshOutcome::Reused(creds) => {
                Ok(AuthState::Retrying(creds))
            },
            RefreshOutcome::Missing => {
                tracing::debug!("No credential to refresh, giving up");
                Ok(AuthState::Failed)
            },
            RefreshOutcome::Rejected(err) => {
                tracing::warn!("Re-authentication required: {err}");
                Ok(AuthState::Failed)
            },
            RefreshOutcome::Failed(err) => Err(Error::middleware(err)),
        }
    }
}

/// Token carried by a request's bearer header.
fn bearer_token(req: &Request) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Copy of the original request presenting `creds`.
fn with_credential(mut req: Request, creds: &Credential) -> Result<Request> {
    let value = HeaderValue::from_str(&creds.bearer()).map_err(Error::middleware)?;
    req.headers_mut().insert(AUTHORIZATION, value);
    Ok(req)
}

#[async_trait]
impl Middleware for TokenAuthenticator {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let mut attempts = extensions.get::<AuthAttempts>().map_or(0, |a| a.0);
        let mut rejected_token = bearer_token(&req);
        // Streaming bodies cannot be replayed; such requests simply never retry.
        let mut template = req.try_clone();

        let mut response = next.clone().run(req, extensions).await?;
        let mut state = AuthState::Idle;

        loop {
            state = match state {
                AuthState::Idle => {
                    if template.is_some() && Self::should_engage(&response, attempts) {
                        AuthState::Refreshing
                    } else {
                        return Ok(response);
                    }
                },
                AuthState::Refreshing => self.refresh(rejected_token.take()).await?,
                AuthState::Retrying(creds) => {
                    let Some(original) = template.take() else {
                        return Ok(response);
                    };
                    attempts += 1;
                    extensions.insert(AuthAttempts(attempts));
                    tracing::debug!(attempt = attempts, "Retrying request with refreshed credential");
                    response = next
                        .clone()
                        .run(with_credential(original, &creds)?, extensions)
                        .await?;
                    AuthState::Idle
                },
                AuthState::Failed => return Ok(response),
            };
        }
    }
}
