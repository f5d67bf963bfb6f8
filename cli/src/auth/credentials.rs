//! Credential persistence.
//!
//! The pipeline reads and writes its credential through the [`CredentialStore`] trait:
//! - [`KeyringCredentialStore`] - platform secure storage (Keychain, Secret Service,
//!   Credential Manager)
//! - [`MemoryCredentialStore`] - process-local storage for `--ephemeral` runs and tests
//!
//! Keyring credentials are stored as JSON under a service-specific key.

use std::sync::Mutex;

use keyring::Entry;

use crate::auth::tokens::Credential;
use crate::error::{ClientError, Result};

const SERVICE_NAME: &str = "dev.spotstats.cli";
const CREDENTIALS_KEY: &str = "spotify_credential";

/// Read/write interface for the persisted credential.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialStore: Send + Sync {
    /// Loads the stored credential, if any.
    fn load(&self) -> Result<Option<Credential>>;

    /// Stores a credential, replacing any previous one.
    fn save(&self, credential: &Credential) -> Result<()>;

    /// Removes the stored credential. No-op when nothing is stored.
    fn clear(&self) -> Result<()>;
}

/// Secure credential storage backed by the OS keyring.
pub struct KeyringCredentialStore {
    entry: Entry,
}

impl KeyringCredentialStore {
    /// Creates a new credential store instance.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::CredentialStorage`] if the keyring entry cannot be created,
    /// which may occur if the keyring service is unavailable or locked.
    pub fn new() -> Result<Self> {
        let entry = Entry::new(SERVICE_NAME, CREDENTIALS_KEY)
            .map_err(|e| ClientError::CredentialStorage(e.to_string()))?;
        Ok(Self { entry })
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        match self.entry.get_password() {
            Ok(json) => {
                let creds: Credential =
                    serde_json::from_str(&json).map_err(|_| ClientError::InvalidCredentials)?;
                Ok(Some(creds))
            },
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(ClientError::CredentialStorage(e.to_string())),
        }
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        let json = serde_json::to_string(credential)?;
        self.entry.set_password(&json)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ClientError::CredentialStorage(e.to_string())),
        }
    }
}

/// In-process credential storage.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryCredentialStore {
    /// Creates a store pre-populated with `credential`.
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<Credential>>> {
        self.slot
            .lock()
            .map_err(|_| ClientError::CredentialStorage("memory store poisoned".to_string()))
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credential>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, credential: &Credential) -> Result<()> {
        *self.lock()? = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}
