//! HTTP pipeline for the Spotify Web API.
//!
//! The main transport stacks authorization, refresh-on-401, exchange logging and
//! optional curl reconstruction on top of a shared base client. The credential
//! exchange runs on the base client alone.

pub mod api;
pub mod middleware;
pub mod sink;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{Followers, SpotifyApi, UserProfile};
pub use sink::{HttpExchange, LogSink, SinkError, TracingSink};
pub use transport::{build_auth_transport, build_base_client, build_main_transport};
