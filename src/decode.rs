use serde::de::DeserializeOwned;

use crate::InsightsError;

/// Parses a response body into an envelope, keeping the raw text on failure.
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    resource: &'static str,
    body: String,
) -> Result<T, InsightsError> {
    serde_json::from_str::<T>(&body).map_err(|err| InsightsError::Decode {
        resource,
        message: format!("invalid response JSON: {err}"),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::decode_envelope;
    use crate::{
        CampaignDetailResponse, CampaignInsightsResponse, CampaignStatus, CampaignsResponse,
        InsightsError, OverallInsightsResponse,
    };

    #[test]
    fn decodes_campaign_list() {
        let body = r#"{
            "campaigns": [{
                "id": "camp_1",
                "name": "Spring Sale",
                "brand_id": "brand_9",
                "status": "active",
                "platforms": ["meta", "google"],
                "budget": 5000,
                "daily_budget": 250.5,
                "created_at": "2025-01-10T08:00:00Z"
            }],
            "total": 1
        }"#;
        let decoded: CampaignsResponse =
            decode_envelope("campaigns", body.to_owned()).expect("campaign list must decode");

        assert_eq!(decoded.total, Some(1));
        let campaign = &decoded.campaigns[0];
        assert_eq!(campaign.id, "camp_1");
        assert_eq!(campaign.status, CampaignStatus::Active);
        assert_eq!(campaign.platforms, vec!["meta", "google"]);
        assert_eq!(campaign.daily_budget, 250.5);
    }

    #[test]
    fn unknown_status_maps_to_unknown() {
        let body = r#"{"campaign": {"id": "c", "name": "n", "status": "archived"}}"#;
        let decoded: CampaignDetailResponse =
            decode_envelope("campaign details", body.to_owned()).expect("must decode");
        assert_eq!(decoded.campaign.status, CampaignStatus::Unknown);
        assert!(decoded.campaign.platforms.is_empty());
    }

    #[test]
    fn missing_metrics_default_to_zero() {
        let body = r#"{"insights": {"total_campaigns": 4, "avg_ctr": 1.25}}"#;
        let decoded: OverallInsightsResponse =
            decode_envelope("overall insights", body.to_owned()).expect("must decode");
        assert_eq!(decoded.insights.total_campaigns, 4);
        assert_eq!(decoded.insights.total_clicks, 0);
        assert_eq!(decoded.insights.avg_ctr, 1.25);
    }

    #[test]
    fn invalid_json_keeps_raw_body() {
        let err = decode_envelope::<CampaignInsightsResponse>(
            "campaign insights",
            "<html>bad gateway</html>".to_owned(),
        )
        .expect_err("html must not decode");

        match err {
            InsightsError::Decode { resource, body, .. } => {
                assert_eq!(resource, "campaign insights");
                assert_eq!(body, "<html>bad gateway</html>");
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
