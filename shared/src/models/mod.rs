//! Data models
//!
//! Display-scoped copies of records owned by the CRM API.
//! IDs are opaque strings assigned by the server (wire name `_id`).

pub mod campaign;
pub mod customer;
pub mod order;

// Re-exports
pub use campaign::*;
pub use customer::*;
pub use order::*;
