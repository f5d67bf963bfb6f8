//! Authentication module for spotstats.
//!
//! This module owns the Spotify credential: its persisted form, the refresh
//! exchange with the accounts service, and the in-memory session shared by every
//! request on the main transport.

pub mod credentials;
pub mod exchange;
pub mod session;
pub mod tokens;

#[cfg(test)]
pub use credentials::MockCredentialStore;
pub use credentials::{CredentialStore, KeyringCredentialStore, MemoryCredentialStore};
pub use exchange::AuthTransport;
pub use session::{RefreshOutcome, Session};
pub use tokens::{Credential, TokenResponse};
