//! Shared authentication session.
//!
//! The session owns the in-memory credential, mirrors every change into the
//! [`CredentialStore`], and serializes refresh exchanges behind a single lock so
//! concurrent 401s never race each other's rotated refresh tokens.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::auth::credentials::CredentialStore;
use crate::auth::exchange::AuthTransport;
use crate::auth::tokens::Credential;
use crate::error::{ClientError, Result};

/// Result of a refresh attempt made on behalf of a rejected request.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// This call performed the exchange.
    Refreshed(Credential),
    /// Another task replaced the rejected credential while this one waited.
    Reused(Credential),
    /// No credential is stored; nothing to refresh.
    Missing,
    /// The exchange was rejected and the credential was cleared.
    Rejected(ClientError),
    /// The exchange could not be performed (network, storage); the credential is kept.
    Failed(ClientError),
}

/// Credential holder shared by the authorization middlewares and the API client.
pub struct Session {
    current: RwLock<Option<Credential>>,
    store: Arc<dyn CredentialStore>,
    exchange: AuthTransport,
    refresh_lock: Mutex<()>,
}

impl Session {
    /// Create an empty session. Call [`Session::load`] to read the persisted credential.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, exchange: AuthTransport) -> Self {
        Self {
            current: RwLock::new(None),
            store,
            exchange,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Load the persisted credential into memory.
    ///
    /// # Returns
    ///
    /// Returns `true` if a credential was found.
    pub async fn load(&self) -> Result<bool> {
        let loaded = self.store.load()?;
        let found = loaded.is_some();
        *self.current.write().await = loaded;
        Ok(found)
    }

    /// Snapshot of the current credential.
    pub async fn credential(&self) -> Option<Credential> {
        self.current.read().await.clone()
    }

    /// Current access token, if any.
    pub async fn access_token(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|c| c.access_token.clone())
    }

    /// Check if a credential is loaded.
    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Persist and activate a credential obtained outside the pipeline.
    pub async fn set_credential(&self, credential: Credential) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;
        self.store.save(&credential)?;
        *self.current.write().await = Some(credential);
        Ok(())
    }

    /// Drop the credential from memory and storage.
    pub async fn clear(&self) -> Result<()> {
        let _guard = self.refresh_lock.lock().await;
        self.clear_locked().await
    }

    /// Refresh after the main API rejected `rejected_token`.
    ///
    /// Waits for any refresh already in flight. When that refresh replaced the
    /// rejected token, its result is reused instead of exchanging again.
    pub async fn refresh_rejected(&self, rejected_token: Option<String>) -> RefreshOutcome {
        let _guard = self.refresh_lock.lock().await;

        let Some(current) = self.current.read().await.clone() else {
            return RefreshOutcome::Missing;
        };

        if rejected_token.as_deref() != Some(current.access_token.as_str()) {
            tracing::debug!("Credential already refreshed by a concurrent request");
            return RefreshOutcome::Reused(current);
        }

        match self.exchange_locked(&current).await {
            Ok(next) => RefreshOutcome::Refreshed(next),
            Err(err @ ClientError::TokenRefreshFailed(_)) => RefreshOutcome::Rejected(err),
            Err(err) => RefreshOutcome::Failed(err),
        }
    }

    /// Exchange the stored refresh token regardless of the access token's state.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] without a stored credential and
    /// [`ClientError::ReauthenticationRequired`] when the exchange is rejected.
    pub async fn force_refresh(&self) -> Result<Credential> {
        let _guard = self.refresh_lock.lock().await;

        let current = self
            .current
            .read()
            .await
            .clone()
            .ok_or(ClientError::NotAuthenticated)?;

        self.exchange_locked(&current).await.map_err(|e| match e {
            ClientError::TokenRefreshFailed(_) => ClientError::ReauthenticationRequired,
            other => other,
        })
    }

    /// Caller must hold `refresh_lock`.
    async fn exchange_locked(&self, current: &Credential) -> Result<Credential> {
        match self.exchange.refresh(current).await {
            Ok(next) => {
                // Rotated refresh tokens are single-use; memory keeps the new one even
                // when persisting it fails.
                if let Err(e) = self.store.save(&next) {
                    tracing::warn!("Failed to persist refreshed credential: {e}");
                }
                *self.current.write().await = Some(next.clone());
                tracing::info!("Access token refreshed");
                Ok(next)
            },
            Err(err @ ClientError::TokenRefreshFailed(_)) => {
                tracing::warn!("Refresh rejected, clearing stored credential: {err}");
                if let Err(e) = self.clear_locked().await {
                    tracing::warn!("Failed to clear stored credential: {e}");
                }
                Err(err)
            },
            Err(err) => {
                tracing::warn!("Refresh exchange failed: {err}");
                Err(err)
            },
        }
    }

    /// Caller must hold `refresh_lock`.
    async fn clear_locked(&self) -> Result<()> {
        *self.current.write().await = None;
        self.store.clear()
    }
}
