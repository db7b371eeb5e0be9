//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs + startup.rs):
//!     Load config → Validate → Init logging/metrics → Bind → Log endpoints → Serve
//!
//! Shutdown (signals.rs):
//!     SIGTERM/SIGINT → Stop accepting → Drain in-flight requests → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then observability, then listener
//! - Fail fast: any startup error is fatal

pub mod signals;
pub mod startup;

pub use signals::shutdown_signal;
