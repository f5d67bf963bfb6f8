//! HTTP client middleware.
//!
//! Stack order on the main transport, outermost first:
//! [`AuthorizationMiddleware`], [`TokenAuthenticator`], [`LoggingMiddleware`],
//! [`CurlMiddleware`]. Diagnostics sit inside the authorization layer so they
//! observe the credential actually sent, including on retries.

pub mod auth;
pub mod curl;
pub mod logging;
pub mod refresh;

pub use auth::AuthorizationMiddleware;
pub use curl::CurlMiddleware;
pub use logging::LoggingMiddleware;
pub use refresh::{AuthAttempts, TokenAuthenticator, MAX_AUTH_RETRIES};
