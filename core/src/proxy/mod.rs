//! Proxy module - HTTP front for the detection and icon backends

pub mod error;
pub mod handlers;
pub mod server;
pub mod upstream;
pub mod validators;

pub use error::ProxyError;
pub use server::{create_app, AppState, ProxyServer};
pub use upstream::UpstreamClient;
pub use validators::{IconList, IconListError};
