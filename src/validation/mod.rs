//! Input validation subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (path, query, JSON body)
//!     → gate.rs (recognize identifiers and payload kind)
//!     → payload.rs (compose field checks per payload kind)
//!     → format.rs (identifier / email / phone predicates)
//!     → Ok, or a single GateRejection (400)
//! ```
//!
//! # Design Decisions
//! - One identifier scheme per deployment, chosen in config
//! - Payload kind is an explicit tag on the route, never inferred
//! - Stateless: compiled patterns are immutable process-wide statics

pub mod format;
pub mod gate;
pub mod payload;

pub use format::{IdentifierKind, IdentifierScheme};
pub use gate::{parse_query, GateRejection, QueryParams, ValidationGate};
pub use payload::{Payload, PayloadKind};
