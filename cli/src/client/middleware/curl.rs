//! Curl command reconstruction for reproducing requests by hand.

use std::sync::Arc;

use async_trait::async_trait;
use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

use crate::client::sink::{self, LogSink};

/// Middleware that reports each request as a shell-ready `curl` command.
pub struct CurlMiddleware {
    sink: Arc<dyn LogSink>,
}

impl CurlMiddleware {
    /// Create a curl middleware writing to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }
}

/// Quote for POSIX shells.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Render `req` as a curl invocation.
///
/// Streaming bodies are not available to middleware and are left out.
pub fn to_curl(req: &Request) -> String {
    let mut parts = vec!["curl".to_string(), "-X".to_string(), req.method().to_string()];

    for (name, value) in req.headers() {
        let value = String::from_utf8_lossy(value.as_bytes());
        parts.push("-H".to_string());
        parts.push(shell_quote(&format!("{name}: {value}")));
    }

    if let Some(bytes) = req.body().and_then(reqwest::Body::as_bytes) {
        parts.push("--data-binary".to_string());
        parts.push(shell_quote(&String::from_utf8_lossy(bytes)));
    }

    parts.push(shell_quote(req.url().as_str()));
    parts.join(" ")
}

#[async_trait]
impl Middleware for CurlMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        let command = to_curl(&req);
        sink::deliver("curl command", || self.sink.record_command(&command));

        next.run(req, extensions).await
    }
}
