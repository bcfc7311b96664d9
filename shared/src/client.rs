//! Request/response types for the CRM API
//!
//! Shared between crm-client and anything else speaking to the same backend.

use serde::{Deserialize, Serialize};

use crate::audience::{Audience, Combinator, Rule};

// =============================================================================
// AI API DTOs
// =============================================================================

/// Natural-language audience description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextToRulesRequest {
    pub text: String,
}

/// Rule set produced by the remote translator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextToRulesResponse {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub combinator: Combinator,
}

impl From<TextToRulesResponse> for Audience {
    fn from(resp: TextToRulesResponse) -> Self {
        Audience::with_rules(resp.rules, resp.combinator)
    }
}

// =============================================================================
// Campaign API DTOs
// =============================================================================

/// Audience size preview request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewAudienceRequest {
    pub rules: Vec<Rule>,
    pub combinator: Combinator,
}

impl From<&Audience> for PreviewAudienceRequest {
    fn from(audience: &Audience) -> Self {
        Self {
            rules: audience.rules().to_vec(),
            combinator: audience.combinator(),
        }
    }
}

/// Audience size preview response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewAudienceResponse {
    #[serde(default)]
    pub audience_size: u64,
}

/// Create campaign request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    pub name: String,
    pub audience: Audience,
    pub message_template: String,
}
