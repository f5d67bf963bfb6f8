//! Destinations for HTTP diagnostics.
//!
//! The diagnostics middlewares never talk to an output directly; they hand
//! [`HttpExchange`] records and curl command lines to a [`LogSink`]. Sink failures,
//! including panics, are contained by [`deliver`] so they can never abort a request.

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::Serialize;
use thiserror::Error;

/// Failure reported by a [`LogSink`].
#[derive(Debug, Error)]
#[error("log sink failed: {0}")]
pub struct SinkError(pub String);

/// Structured record of one request attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HttpExchange {
    pub method: String,
    pub url: String,
    pub request_headers: Vec<(String, String)>,
    pub request_body: Option<String>,
    pub status: Option<u16>,
    pub response_headers: Vec<(String, String)>,
    pub response_body: Option<String>,
    pub elapsed_ms: u64,
    /// Transport error, when no response was received.
    pub error: Option<String>,
}

/// Receiver of diagnostics output.
pub trait LogSink: Send + Sync {
    /// Record a completed (or failed) request attempt.
    fn record_exchange(&self, exchange: &HttpExchange) -> Result<(), SinkError>;

    /// Record a reconstructed curl command.
    fn record_command(&self, command: &str) -> Result<(), SinkError>;
}

/// Sink that forwards everything to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn record_exchange(&self, exchange: &HttpExchange) -> Result<(), SinkError> {
        match (exchange.status, &exchange.error) {
            (Some(status), _) => tracing::info!(
                target: "spotstats::http",
                method = %exchange.method,
                url = %exchange.url,
                status,
                elapsed_ms = exchange.elapsed_ms,
                "http_exchange"
            ),
            (None, error) => tracing::warn!(
                target: "spotstats::http",
                method = %exchange.method,
                url = %exchange.url,
                error = error.as_deref().unwrap_or("unknown"),
                elapsed_ms = exchange.elapsed_ms,
                "http_exchange_failed"
            ),
        }

        if !exchange.request_headers.is_empty() || !exchange.response_headers.is_empty() {
            tracing::debug!(
                target: "spotstats::http",
                request_headers = ?exchange.request_headers,
                response_headers = ?exchange.response_headers,
                "http_headers"
            );
        }

        if let Some(body) = &exchange.request_body {
            tracing::debug!(target: "spotstats::http", body = %body, "http_request_body");
        }

        if let Some(body) = &exchange.response_body {
            tracing::debug!(target: "spotstats::http", body = %body, "http_response_body");
        }

        Ok(())
    }

    fn record_command(&self, command: &str) -> Result<(), SinkError> {
        tracing::debug!(target: "spotstats::curl", "{command}");
        Ok(())
    }
}

/// Run a sink call, swallowing errors and panics.
pub(crate) fn deliver(what: &str, call: impl FnOnce() -> Result<(), SinkError>) {
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(())) => {},
        Ok(Err(e)) => tracing::warn!("Dropped {what}: {e}"),
        Err(_) => tracing::warn!("Dropped {what}: log sink panicked"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deliver_swallows_errors() {
        deliver("test record", || Err(SinkError("disk full".to_string())));
    }

    #[test]
    fn deliver_swallows_panics() {
        deliver("test record", || panic!("sink exploded"));
    }

    #[test]
    fn tracing_sink_accepts_failed_exchanges() {
        let exchange = HttpExchange {
            method: "GET".to_string(),
            url: "https://api.spotify.com/v1/me".to_string(),
            error: Some("connection reset".to_string()),
            ..HttpExchange::default()
        };
        assert!(TracingSink.record_exchange(&exchange).is_ok());
        assert!(TracingSink.record_command("curl 'https://example.com'").is_ok());
    }

    #[test]
    fn exchange_serializes_for_json_sinks() {
        let exchange = HttpExchange {
            method: "GET".to_string(),
            url: "https://api.spotify.com/v1/me".to_string(),
            status: Some(200),
            ..HttpExchange::default()
        };
        let json = serde_json::to_value(&exchange).unwrap();
        assert_eq!(json["status"], 200);
        assert_eq!(json["method"], "GET");
    }
}
