//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (preflight answers, CORS response headers)
//!     → headers.rs (client address behind trusted proxies)
//!     → Pass to forwarder
//!
//! Outgoing logs:
//!     → headers.rs (credential redaction)
//! ```
//!
//! # Design Decisions
//! - Inbound clients are not authenticated; the upstream guards its routes
//! - No trust in client-supplied forwarding headers from untrusted peers

pub mod cors;
pub mod headers;
