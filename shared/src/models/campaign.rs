//! Campaign Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::audience::Audience;

/// Campaign lifecycle, driven entirely by the remote system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CampaignStatus {
    #[default]
    Draft,
    Running,
    Completed,
}

impl CampaignStatus {
    fn rank(&self) -> u8 {
        match self {
            Self::Draft => 0,
            Self::Running => 1,
            Self::Completed => 2,
        }
    }

    /// Status only ever moves forward: Draft -> Running -> Completed
    pub fn can_advance_to(&self, next: CampaignStatus) -> bool {
        next.rank() == self.rank() + 1
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "Draft",
            Self::Running => "Running",
            Self::Completed => "Completed",
        };
        f.write_str(s)
    }
}

/// Delivery counters reported by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DeliveryStats {
    #[serde(default)]
    pub sent: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub pending: u64,
}

impl DeliveryStats {
    pub fn total(&self) -> u64 {
        self.sent + self.failed + self.pending
    }
}

/// Campaign entity (read-only on the client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub audience: Audience,
    pub message_template: String,
    #[serde(default)]
    pub audience_size: u64,
    #[serde(default)]
    pub delivery_stats: DeliveryStats,
    #[serde(default)]
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    pub fn was_updated(&self) -> bool {
        self.updated_at != self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audience::{Combinator, RuleField};

    #[test]
    fn test_status_progression() {
        assert!(CampaignStatus::Draft.can_advance_to(CampaignStatus::Running));
        assert!(CampaignStatus::Running.can_advance_to(CampaignStatus::Completed));
        assert!(!CampaignStatus::Draft.can_advance_to(CampaignStatus::Completed));
        assert!(!CampaignStatus::Completed.can_advance_to(CampaignStatus::Running));
        assert!(!CampaignStatus::Running.can_advance_to(CampaignStatus::Draft));
        assert!(CampaignStatus::Completed.is_terminal());
    }

    #[test]
    fn test_deserialize_campaign() {
        let campaign: Campaign = serde_json::from_value(serde_json::json!({
            "_id": "cmp-1",
            "name": "Win back",
            "audience": {
                "rules": [{"field": "visits", "operator": "<", "value": 2}],
                "combinator": "$or"
            },
            "messageTemplate": "Hi {name}, we miss you",
            "audienceSize": 42,
            "deliveryStats": {"sent": 40, "failed": 2, "pending": 0},
            "status": "Running",
            "createdAt": "2024-06-01T08:00:00Z",
            "updatedAt": "2024-06-01T09:30:00Z"
        }))
        .unwrap();

        assert_eq!(campaign.audience_size, 42);
        assert_eq!(campaign.status, CampaignStatus::Running);
        assert_eq!(campaign.audience.combinator(), Combinator::Or);
        assert_eq!(campaign.audience.rules()[0].field, RuleField::Visits);
        assert_eq!(campaign.delivery_stats.total(), 42);
        assert!(campaign.was_updated());
    }

    #[test]
    fn test_missing_stats_default_to_zero() {
        let campaign: Campaign = serde_json::from_value(serde_json::json!({
            "_id": "cmp-2",
            "name": "Fresh",
            "audience": {"rules": [], "combinator": "$and"},
            "messageTemplate": "Hello",
            "createdAt": "2024-06-01T08:00:00Z",
            "updatedAt": "2024-06-01T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(campaign.delivery_stats, DeliveryStats::default());
        assert_eq!(campaign.status, CampaignStatus::Draft);
        assert!(!campaign.was_updated());
    }
}
