//! Application context.
//!
//! Wires configuration, credential storage, both transports and the API client
//! together. Commands receive a fully built [`AppContext`].

use std::sync::Arc;

use crate::auth::{
    AuthTransport, CredentialStore, KeyringCredentialStore, MemoryCredentialStore, Session,
};
use crate::client::{
    build_auth_transport, build_base_client, build_main_transport, LogSink, SpotifyApi,
    TracingSink,
};
use crate::config::AppConfig;
use crate::error::Result;

/// Holds every service a command may need.
pub struct AppContext {
    pub config: AppConfig,
    pub session: Arc<Session>,
    pub auth: AuthTransport,
    pub api: SpotifyApi,
}

impl AppContext {
    /// Build the context from explicit parts.
    ///
    /// # Errors
    ///
    /// Returns an error if the base transport cannot be built or the stored
    /// credential cannot be read.
    pub async fn new(
        config: AppConfig,
        store: Arc<dyn CredentialStore>,
        sink: Arc<dyn LogSink>,
    ) -> Result<Self> {
        let base = build_base_client(&config.api)?;
        let auth = build_auth_transport(&base, &config.auth);

        let session = Arc::new(Session::new(store, auth.clone()));
        if session.load().await? {
            tracing::debug!("Loaded stored credential");
        }

        let http = build_main_transport(&base, &session, &sink, &config.logging);
        let api = SpotifyApi::new(http, config.api.base_url.clone(), Arc::clone(&session));

        Ok(Self {
            config,
            session,
            auth,
            api,
        })
    }

    /// Build the context the command line uses.
    ///
    /// `ephemeral` keeps the credential in process memory instead of the OS keyring.
    pub async fn from_config(config: AppConfig, ephemeral: bool) -> Result<Self> {
        let store: Arc<dyn CredentialStore> = if ephemeral {
            Arc::new(MemoryCredentialStore::default())
        } else {
            Arc::new(KeyringCredentialStore::new()?)
        };

        Self::new(config, store, Arc::new(TracingSink)).await
    }
}
