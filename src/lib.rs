//! `campaign-insights-http` is a resilient async HTTP client for the
//! campaign insights API.
//!
//! Every JSON fetch goes through a retry loop with a 15 s per-attempt timeout
//! and capped exponential backoff:
//! - [`InsightsClient::list_campaigns`]
//! - [`InsightsClient::get_campaign`]
//! - [`InsightsClient::overall_insights`]
//! - [`InsightsClient::campaign_insights`]
//!
//! Live insights are read incrementally through
//! [`InsightsClient::campaign_insights_stream`], which is never retried.

pub mod config;
mod client;
mod dashboard;
mod decode;
mod endpoint;
mod error;
mod options;
mod retry;
mod stream;
mod types;

pub use client::{InsightsClient, RequestOptions};
pub use dashboard::{CampaignDetail, Dashboard};
pub use endpoint::Endpoint;
pub use error::InsightsError;
pub use options::ClientOptions;
pub use retry::is_retryable_status;
pub use stream::{InsightsStream, Utf8ChunkDecoder};
pub use types::{
    Campaign, CampaignDetailResponse, CampaignInsights, CampaignInsightsResponse, CampaignStatus,
    CampaignsResponse, OverallInsights, OverallInsightsResponse,
};

pub type Result<T> = std::result::Result<T, InsightsError>;
