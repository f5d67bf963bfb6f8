//! Structured HTTP exchange logging.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use http::header::{AUTHORIZATION, COOKIE, PROXY_AUTHORIZATION, SET_COOKIE};
use http::{Extensions, HeaderMap, HeaderName};
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next, Result};

use crate::client::sink::{self, HttpExchange, LogSink};
use crate::config::{HttpLogLevel, LoggingConfig};

const REDACTED: &str = "██";

/// Headers whose values carry credentials.
fn is_sensitive(name: &HeaderName) -> bool {
    [AUTHORIZATION, PROXY_AUTHORIZATION, COOKIE, SET_COOKIE].contains(name)
}

/// Middleware that reports every request attempt to a [`LogSink`].
///
/// Only reads the request and response; both reach the transport and the caller
/// exactly as they were.
pub struct LoggingMiddleware {
    sink: Arc<dyn LogSink>,
    level: HttpLogLevel,
    redact_credentials: bool,
}

impl LoggingMiddleware {
    /// Create a logging middleware from the diagnostics configuration.
    #[must_use]
    pub fn new(sink: Arc<dyn LogSink>, config: &LoggingConfig) -> Self {
        Self {
            sink,
            level: config.level,
            redact_credentials: config.redact_credentials,
        }
    }

    fn collect_headers(&self, headers: &HeaderMap) -> Vec<(String, String)> {
        headers
            .iter()
            .map(|(name, value)| {
                let shown = if self.redact_credentials && is_sensitive(name) {
                    redact(value.to_str().unwrap_or_default())
                } else {
                    String::from_utf8_lossy(value.as_bytes()).into_owned()
                };
                (name.as_str().to_string(), shown)
            })
            .collect()
    }

    fn request_record(&self, req: &Request) -> HttpExchange {
        let mut record = HttpExchange {
            method: req.method().to_string(),
            url: req.url().to_string(),
            ..HttpExchange::default()
        };

        if self.level >= HttpLogLevel::Headers {
            record.request_headers = self.collect_headers(req.headers());
        }

        if self.level >= HttpLogLevel::Body {
            record.request_body = req
                .body()
                .and_then(reqwest::Body::as_bytes)
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned());
        }

        record
    }
}

/// Keep the auth scheme so the record still shows which kind of credential was sent.
fn redact(value: &str) -> String {
    match value.split_once(' ') {
        Some((scheme, _)) => format!("{scheme} {REDACTED}"),
        None => REDACTED.to_string(),
    }
}

/// Read the whole response body into `record` and hand back an equivalent response.
///
/// The rebuilt response keeps status, version and headers. Its `url()` is not
/// carried over.
async fn buffer_body(response: Response, record: &mut HttpExchange) -> Result<Response> {
    let status = response.status();
    let version = response.version();
    let headers = response.headers().clone();

    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            record.error = Some(e.to_string());
            return Err(e.into());
        },
    };
    record.response_body = Some(String::from_utf8_lossy(&bytes).into_owned());

    let mut rebuilt = http::Response::new(bytes);
    *rebuilt.status_mut() = status;
    *rebuilt.version_mut() = version;
    *rebuilt.headers_mut() = headers;
    Ok(rebuilt.into())
}

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> Result<Response> {
        if self.level == HttpLogLevel::None {
            return next.run(req, extensions).await;
        }

        let mut record = self.request_record(&req);
        let started = Instant::now();

        let result = next.run(req, extensions).await;

        record.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let result = match result {
            Ok(response) => {
                record.status = Some(response.status().as_u16());
                if self.level >= HttpLogLevel::Headers {
                    record.response_headers = self.collect_headers(response.headers());
                }
                if self.level >= HttpLogLevel::Body {
                    buffer_body(response, &mut record).await
                } else {
                    Ok(response)
                }
            },
            Err(e) => {
                record.error = Some(e.to_string());
                Err(e)
            },
        };

        sink::deliver("HTTP exchange record", || self.sink.record_exchange(&record));

        result
    }
}
