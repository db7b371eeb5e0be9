//! Status translation subsystem.
//!
//! # Data Flow
//! ```text
//! tonic::Status / rendered "rpc error: ..." string / routing failure
//!     → BackendFailure (code + raw description + metadata)
//!     → translator.rs (fixed status table)
//!     → sanitize.rs (strip envelope markers from passed-through text)
//!     → TranslatedError { code, message, timestamp }
//! ```

pub mod sanitize;
pub mod translator;

pub use translator::{
    translate, translate_routing_failure, BackendCode, BackendFailure, TranslatedError,
};
