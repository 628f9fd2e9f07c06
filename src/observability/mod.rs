//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → tower_http TraceLayer (per-request spans)
//!
//! Consumers:
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Request ID flows through log fields
//! - Credentials never appear in log output

pub mod logging;

pub use logging::init_logging;
