//! Evolution API proxy library.

// Core subsystems
pub mod config;
pub mod http;
pub mod proxy;

pub mod health;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::{ForwardError, Forwarder, InboundRequest, UpstreamResponse, UpstreamTarget};
