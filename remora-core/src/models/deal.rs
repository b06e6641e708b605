//! Deal resource models.
//!
//! Deals are the representative authenticated resource the SDK exposes;
//! the listing endpoint exercises the full request pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single deal as returned by the deals endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deal {
    /// Deal identifier.
    pub id: String,
    /// Deal title.
    pub deal_name: String,
    /// Longer description.
    #[serde(default)]
    pub deal_description: Option<String>,
    /// Reward structure, e.g. "percentage" or "fixed".
    #[serde(default)]
    pub reward_type: Option<String>,
    /// Incentive offered to the referred customer.
    #[serde(default)]
    pub customer_incentive: Option<String>,
    /// Whether the deal is currently active.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Whether the deal is featured.
    #[serde(default)]
    pub is_featured: bool,
    /// Number of subscribers, when the endpoint includes it.
    #[serde(default)]
    pub subscribers_count: Option<u64>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

/// A page of deals from `GET /deals/all/`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealPage {
    /// Deals on this page.
    #[serde(default)]
    pub deals: Vec<Deal>,
    /// Total number of deals across pages, when reported.
    #[serde(default)]
    pub total: Option<u64>,
}

// ============================================================================
// Tests
// ============================================================================
