use campaign_insights_http::InsightsClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let campaign_id = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: stream <campaign-id>"))?;

    let client = InsightsClient::from_env();
    let mut session = client.campaign_insights_stream(&campaign_id).await?;

    while let Some(chunk) = session.next_chunk().await? {
        print!("{chunk}");
    }
    println!();
    eprintln!("stream ended after {} chunks", session.chunks_read());

    Ok(())
}
