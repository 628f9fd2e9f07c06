//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP layer
//!     → types.rs (InboundRequest: method, path suffix, headers, query, body)
//!     → forwarder.rs (build, dispatch once, buffer)
//!     → types.rs (UpstreamResponse) or error.rs (ForwardError)
//!     → HTTP layer writes the response
//! ```
//!
//! # Design Decisions
//! - Works on plain values so it can be driven without a listener
//! - No shared mutable state between concurrent calls
//! - No retries: exactly one upstream request per inbound request

pub mod error;
pub mod forwarder;
pub mod types;
pub mod upstream;

pub use error::{ErrorBody, ForwardError};
pub use forwarder::Forwarder;
pub use types::{InboundRequest, UpstreamResponse};
pub use upstream::{UpstreamTarget, CREDENTIAL_HEADER};
