//! Core types and traits for the audit log analytics engine.
//!
//! Records and DTOs serialize to the JSON shapes served by the dashboard API.

mod dto;
mod record;
mod traits;

pub use dto::*;
pub use record::*;
pub use traits::*;
