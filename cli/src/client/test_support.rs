//! Shared fixtures for pipeline tests.

use std::sync::{Arc, Mutex};

use chrono::Duration;
use reqwest_middleware::ClientWithMiddleware;
use url::Url;
use wiremock::MockServer;

use crate::auth::{Credential, MemoryCredentialStore, Session};
use crate::client::sink::{HttpExchange, LogSink, SinkError, TracingSink};
use crate::client::transport::{build_auth_transport, build_base_client, build_main_transport};
use crate::config::{ApiConfig, AuthConfig, LoggingConfig};

/// Sink that keeps everything it receives.
#[derive(Default)]
pub struct RecordingSink {
    exchanges: Mutex<Vec<HttpExchange>>,
    commands: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn exchanges(&self) -> Vec<HttpExchange> {
        self.exchanges.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }
}

impl LogSink for RecordingSink {
    fn record_exchange(&self, exchange: &HttpExchange) -> Result<(), SinkError> {
        self.exchanges.lock().unwrap().push(exchange.clone());
        Ok(())
    }

    fn record_command(&self, command: &str) -> Result<(), SinkError> {
        self.commands.lock().unwrap().push(command.to_string());
        Ok(())
    }
}

/// Sink that fails every call, by error or by panic.
pub struct FailingSink {
    panic: bool,
}

impl FailingSink {
    pub fn erroring() -> Self {
        Self { panic: false }
    }

    pub fn panicking() -> Self {
        Self { panic: true }
    }

    fn fail(&self) -> Result<(), SinkError> {
        assert!(!self.panic, "sink exploded");
        Err(SinkError("sink closed".to_string()))
    }
}

impl LogSink for FailingSink {
    fn record_exchange(&self, _exchange: &HttpExchange) -> Result<(), SinkError> {
        self.fail()
    }

    fn record_command(&self, _command: &str) -> Result<(), SinkError> {
        self.fail()
    }
}

/// Mock API and accounts servers wired to a real main transport.
pub struct Harness {
    pub api: MockServer,
    pub accounts: MockServer,
    pub store: Arc<MemoryCredentialStore>,
    pub session: Arc<Session>,
    pub client: ClientWithMiddleware,
}

impl Harness {
    pub fn builder() -> HarnessBuilder {
        HarnessBuilder::default()
    }

    pub async fn with_credential(access: &str, refresh: &str) -> Self {
        Self::builder().credential(access, refresh).build().await
    }

    pub async fn empty() -> Self {
        Self::builder().build().await
    }

    pub fn api_base(&self) -> Url {
        Url::parse(&format!("{}/v1/", self.api.uri())).unwrap()
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.api.uri())
    }
}

#[derive(Default)]
pub struct HarnessBuilder {
    credential: Option<Credential>,
    sink: Option<Arc<dyn LogSink>>,
    logging: Option<LoggingConfig>,
    auth_base: Option<Url>,
}

impl HarnessBuilder {
    pub fn credential(mut self, access: &str, refresh: &str) -> Self {
        self.credential = Some(Credential::new(access, refresh, Duration::hours(1)));
        self
    }

    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Point the exchange at `base` instead of the mock accounts server.
    pub fn auth_base(mut self, base: &str) -> Self {
        self.auth_base = Some(Url::parse(base).unwrap());
        self
    }

    pub async fn build(self) -> Harness {
        let api = MockServer::start().await;
        let accounts = MockServer::start().await;

        let store = Arc::new(
            self.credential
                .map(MemoryCredentialStore::with_credential)
                .unwrap_or_default(),
        );

        let base = build_base_client(&ApiConfig::default()).unwrap();
        let auth_config = AuthConfig {
            base_url: self
                .auth_base
                .unwrap_or_else(|| Url::parse(&format!("{}/", accounts.uri())).unwrap()),
            client_id: "client-1".to_string(),
            client_secret: None,
        };
        let session = Arc::new(Session::new(
            store.clone(),
            build_auth_transport(&base, &auth_config),
        ));
        session.load().await.unwrap();

        let sink = self.sink.unwrap_or_else(|| Arc::new(TracingSink));
        let client = build_main_transport(
            &base,
            &session,
            &sink,
            &self.logging.unwrap_or_default(),
        );

        Harness {
            api,
            accounts,
            store,
            session,
            client,
        }
    }
}
