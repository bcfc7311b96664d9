//! Shared types for the CRM workspace
//!
//! Audience rule model, entity models and API DTOs used by the client
//! library and the command line front end.

pub mod audience;
pub mod client;
pub mod error;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use audience::{Audience, Combinator, Rule, RuleField, RuleOperator, RuleValue, ValueKind};
pub use error::{RemoteErrorBody, RuleError, RuleResult};
pub use models::{Campaign, CampaignStatus, Customer, DeliveryStats, Order};
