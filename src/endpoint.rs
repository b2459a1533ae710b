/// A resource of the insights API, resolved against a base URL.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Endpoint {
    Campaigns,
    Campaign(String),
    OverallInsights,
    CampaignInsights(String),
    CampaignInsightsStream(String),
}

impl Endpoint {
    /// Builds the absolute URL by appending the resource path to `base`.
    ///
    /// Example: `Endpoint::CampaignInsights("c1")` → `"{base}/campaigns/c1/insights"`
    pub fn url(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        match self {
            Self::Campaigns => format!("{base}/campaigns"),
            Self::Campaign(id) => format!("{base}/campaigns/{id}"),
            Self::OverallInsights => format!("{base}/campaigns/insights"),
            Self::CampaignInsights(id) => format!("{base}/campaigns/{id}/insights"),
            Self::CampaignInsightsStream(id) => format!("{base}/campaigns/{id}/insights/stream"),
        }
    }

    /// Value of the `Accept` header sent for this resource.
    pub fn accept(&self) -> &'static str {
        match self {
            Self::CampaignInsightsStream(_) => "text/event-stream",
            _ => "application/json",
        }
    }

    /// Resource name used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Campaigns => "campaigns",
            Self::Campaign(_) => "campaign details",
            Self::OverallInsights => "overall insights",
            Self::CampaignInsights(_) => "campaign insights",
            Self::CampaignInsightsStream(_) => "campaign insights stream",
        }
    }
}
