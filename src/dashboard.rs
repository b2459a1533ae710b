//! Page-level loaders that fan out independent requests.
//!
//! Both loaders wait for every request and keep each outcome separately, so
//! one failing call never hides a sibling's result.

use crate::{
    Campaign, CampaignDetailResponse, CampaignInsightsResponse, CampaignsResponse,
    InsightsClient, OverallInsights, OverallInsightsResponse, Result,
};

/// Outcome of loading the campaigns overview.
#[derive(Debug)]
pub struct Dashboard {
    pub campaigns: Result<CampaignsResponse>,
    pub insights: Result<OverallInsightsResponse>,
}

impl Dashboard {
    /// Campaigns to render; empty when the list call failed.
    pub fn campaigns_or_empty(&self) -> &[Campaign] {
        match &self.campaigns {
            Ok(response) => &response.campaigns,
            Err(_) => &[],
        }
    }

    /// Aggregate insights, or the all-zero snapshot when the call failed.
    pub fn insights_or_default(&self) -> OverallInsights {
        match &self.insights {
            Ok(response) => response.insights.clone(),
            Err(_) => OverallInsights::default(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.campaigns.is_err() || self.insights.is_err()
    }

    /// One message per failed call, in request order.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Err(err) = &self.campaigns {
            warnings.push(format!("Unable to load campaigns: {err}"));
        }
        if let Err(err) = &self.insights {
            warnings.push(format!("Unable to load insights: {err}"));
        }
        warnings
    }
}

/// Outcome of loading one campaign's details together with its insights.
#[derive(Debug)]
pub struct CampaignDetail {
    pub campaign: Result<CampaignDetailResponse>,
    pub insights: Result<CampaignInsightsResponse>,
}

impl CampaignDetail {
    /// Both calls failed; nothing can be shown for the campaign.
    pub fn is_total_failure(&self) -> bool {
        self.campaign.is_err() && self.insights.is_err()
    }

    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Err(err) = &self.campaign {
            warnings.push(format!("Unable to load campaign details: {err}"));
        }
        if let Err(err) = &self.insights {
            warnings.push(format!("Unable to load campaign insights: {err}"));
        }
        warnings
    }
}

impl InsightsClient {
    /// Loads the campaign list and the overall insights concurrently.
    pub async fn dashboard(&self) -> Dashboard {
        let (campaigns, insights) = tokio::join!(self.list_campaigns(), self.overall_insights());
        let dashboard = Dashboard {
            campaigns,
            insights,
        };

        #[cfg(feature = "tracing")]
        for warning in dashboard.warnings() {
            tracing::warn!("{}", warning);
        }

        dashboard
    }

    /// Loads one campaign and its insights concurrently.
    pub async fn campaign_detail(&self, campaign_id: &str) -> CampaignDetail {
        let (campaign, insights) = tokio::join!(
            self.get_campaign(campaign_id),
            self.campaign_insights(campaign_id)
        );
        let detail = CampaignDetail { campaign, insights };

        #[cfg(feature = "tracing")]
        for warning in detail.warnings() {
            tracing::warn!(campaign_id, "{}", warning);
        }

        detail
    }
}
