//! Authentication middleware for injecting Bearer tokens.

use std::sync::Arc;

use async_trait::async_trait;
use http::header::AUTHORIZATION;
use http::{Extensions, HeaderValue};
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

use crate::auth::Session;

/// Middleware that injects the Bearer token into requests.
///
/// Requests that already carry an `Authorization` header pass through untouched,
/// as do all requests while no credential is stored.
pub struct AuthorizationMiddleware {
    session: Arc<Session>,
}

impl AuthorizationMiddleware {
    /// Create a new authorization middleware.
    #[must_use]
    pub fn new(session: Arc<Session>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl Middleware for AuthorizationMiddleware {
    async fn handle(
        &self,
        mut req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        if !req.headers().contains_key(AUTHORIZATION) {
            if let Some(creds) = self.session.credential().await {
                match HeaderValue::from_str(&creds.bearer()) {
                    Ok(value) => {
                        req.headers_mut().insert(AUTHORIZATION, value);
                    },
                    Err(_) => tracing::warn!("Stored access token is not a valid header value"),
                }
            }
        }

        next.run(req, extensions).await
    }
}
