use campaign_insights_http::InsightsClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = InsightsClient::from_env();
    println!("loading dashboard from {}", client.base_url());

    let dashboard = client.dashboard().await;
    for warning in dashboard.warnings() {
        eprintln!("warning: {warning}");
    }

    let insights = dashboard.insights_or_default();
    println!(
        "campaigns: {} total, {} active, {} paused, {} completed",
        insights.total_campaigns,
        insights.active_campaigns,
        insights.paused_campaigns,
        insights.completed_campaigns
    );
    println!(
        "spend: {:.2}, impressions: {}, clicks: {}, avg ctr: {:.2}%",
        insights.total_spend, insights.total_impressions, insights.total_clicks, insights.avg_ctr
    );

    for campaign in dashboard.campaigns_or_empty() {
        println!(
            "- {} [{:?}] budget={:.0} platforms={}",
            campaign.name,
            campaign.status,
            campaign.budget,
            campaign.platforms.join(",")
        );
    }

    if let Some(first) = dashboard.campaigns_or_empty().first() {
        let detail = client.campaign_detail(&first.id).await;
        if detail.is_total_failure() {
            eprintln!("campaign {} could not be loaded", first.id);
        }
        if let Ok(insights) = &detail.insights {
            println!(
                "{}: {} clicks, {} conversions",
                first.id, insights.insights.clicks, insights.insights.conversions
            );
        }
    }

    Ok(())
}
