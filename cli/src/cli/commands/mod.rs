//! Command implementations.

pub mod api;
pub mod auth;
pub mod completions;

pub use api::{handle_get, handle_me};
pub use auth::{handle_import, handle_logout, handle_refresh, handle_status};
pub use completions::handle_completions;
