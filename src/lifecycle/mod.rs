//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolve config → Validate → Init logging → Bind listener → Serve
//!
//! Shutdown (shutdown.rs):
//!     SIGTERM/SIGINT → Stop accepting → Drain in-flight requests → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, listener last
//! - In-flight upstream calls run to completion during drain

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{resolve_config, ConfigOverrides};
