use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Active,
    Paused,
    Completed,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub brand_id: String,
    #[serde(default)]
    pub status: CampaignStatus,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub budget: f64,
    #[serde(default)]
    pub daily_budget: f64,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Envelope of `GET /campaigns`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignsResponse {
    pub campaigns: Vec<Campaign>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Envelope of `GET /campaigns/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignDetailResponse {
    pub campaign: Campaign,
}

/// Aggregate metrics across all campaigns.
///
/// `Default` is the all-zero snapshot shown when the insights call fails.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverallInsights {
    pub timestamp: Option<String>,
    pub total_campaigns: u64,
    pub active_campaigns: u64,
    pub paused_campaigns: u64,
    pub completed_campaigns: u64,
    pub total_impressions: u64,
    pub total_clicks: u64,
    pub total_conversions: u64,
    pub total_spend: f64,
    pub avg_ctr: f64,
    pub avg_cpc: f64,
    pub avg_conversion_rate: f64,
}

/// Envelope of `GET /campaigns/insights`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverallInsightsResponse {
    pub insights: OverallInsights,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignInsights {
    pub campaign_id: String,
    pub timestamp: Option<String>,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub spend: f64,
    pub ctr: f64,
    pub cpc: f64,
    pub conversion_rate: f64,
}

/// Envelope of `GET /campaigns/{id}/insights`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CampaignInsightsResponse {
    pub insights: CampaignInsights,
}
