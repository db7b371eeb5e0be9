//! HTTP middleware applied to gateway routes.

pub mod cors;
pub mod gate;

pub use cors::cors_layer;
pub use gate::validation_gate;
