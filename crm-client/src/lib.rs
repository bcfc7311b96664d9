//! CRM Client - HTTP client and headless front-end core for the CRM API
//!
//! Provides the typed API facade plus the stateful pieces a front end needs:
//! the rule editor, the debounced audience previewer, campaign composition,
//! collection views and the session shell.

pub mod api;
pub mod campaign;
pub mod collections;
pub mod config;
pub mod editor;
pub mod error;
pub mod http;
pub mod notice;
pub mod preview;
pub mod session;

pub use api::CrmApi;
pub use campaign::{CampaignComposer, CampaignForm};
pub use collections::{
    CampaignBoard, CampaignCard, CampaignListView, CustomerCard, CustomerDirectory,
    CustomerListView, OrderBook, format_count, format_currency,
};
pub use config::ClientConfig;
pub use editor::RuleEditor;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use notice::{Notice, Severity};
pub use preview::{AudiencePreviewer, PreviewState, PreviewStatus};
pub use session::{Access, ConnectionMonitor, ConnectionStatus, MIN_CHECK_INTERVAL, SessionGuard};

// Re-export shared types for convenience
pub use shared::client::{CreateCampaignRequest, TextToRulesResponse};
pub use shared::{Audience, Combinator, Rule, RuleField, RuleOperator, RuleValue};
