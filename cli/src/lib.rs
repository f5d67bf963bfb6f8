//! Spotstats - authenticated HTTP pipeline for the Spotify Web API.
//!
//! Requests on the main transport carry the stored bearer credential. When the
//! API answers `401 Unauthorized`, the credential is renewed through the accounts
//! service and the request is replayed once. Every attempt can be reported to a
//! [`client::LogSink`] as a structured record or a `curl` command.

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod context;
pub mod error;

pub use context::AppContext;
pub use error::{ClientError, Result};
