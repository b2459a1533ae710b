use reqwest::{header, Response};
use serde::de::DeserializeOwned;

use tokio::time::{sleep, timeout};

use crate::{
    config,
    decode::decode_envelope,
    retry::{Attempt, AttemptOutcome},
    CampaignDetailResponse, CampaignInsightsResponse, CampaignsResponse, ClientOptions, Endpoint,
    InsightsError, InsightsStream, OverallInsightsResponse, Result,
};

/// Per-request header settings passed to [`InsightsClient::execute`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RequestOptions {
    /// Value of the `Accept` header.
    pub accept: &'static str,
    /// Sends `Cache-Control: no-cache` and `Pragma: no-cache`.
    pub no_cache: bool,
}

impl RequestOptions {
    pub fn json() -> Self {
        Self {
            accept: "application/json",
            no_cache: true,
        }
    }

    pub fn event_stream() -> Self {
        Self {
            accept: "text/event-stream",
            no_cache: true,
        }
    }

    fn for_endpoint(endpoint: &Endpoint) -> Self {
        Self {
            accept: endpoint.accept(),
            no_cache: true,
        }
    }
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::json()
    }
}

#[derive(Clone, Debug)]
/// HTTP client for the campaign insights API.
pub struct InsightsClient {
    http: reqwest::Client,
    base_url: String,
    options: ClientOptions,
}

impl InsightsClient {
    /// Creates a client for an explicit base URL.
    ///
    /// A trailing `/` is removed so resource paths can be appended directly.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim().trim_end_matches('/').to_owned(),
            options: ClientOptions::default(),
        }
    }

    /// Creates a client for the process-wide base URL.
    ///
    /// Reads `CAMPAIGN_API_BASE_URL` once per process and falls back to
    /// [`config::DEFAULT_BASE_URL`] when it is unset or empty.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use campaign_insights_http::InsightsClient;
    ///
    /// let client = InsightsClient::from_env();
    /// ```
    pub fn from_env() -> Self {
        Self::new(config::base_url())
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Lists all campaigns.
    pub async fn list_campaigns(&self) -> Result<CampaignsResponse> {
        self.fetch_json(Endpoint::Campaigns).await
    }

    /// Fetches a single campaign by id.
    pub async fn get_campaign(&self, campaign_id: &str) -> Result<CampaignDetailResponse> {
        self.fetch_json(Endpoint::Campaign(campaign_id.to_owned())).await
    }

    /// Fetches metrics aggregated over all campaigns.
    pub async fn overall_insights(&self) -> Result<OverallInsightsResponse> {
        self.fetch_json(Endpoint::OverallInsights).await
    }

    /// Fetches metrics for one campaign.
    pub async fn campaign_insights(&self, campaign_id: &str) -> Result<CampaignInsightsResponse> {
        self.fetch_json(Endpoint::CampaignInsights(campaign_id.to_owned())).await
    }

    /// Opens the live insights stream for one campaign.
    ///
    /// The request is sent exactly once: no timeout and no retry apply, and
    /// a non-success status fails immediately. Read errors surface from
    /// [`InsightsStream::next_chunk`].
    pub async fn campaign_insights_stream(&self, campaign_id: &str) -> Result<InsightsStream> {
        let endpoint = Endpoint::CampaignInsightsStream(campaign_id.to_owned());
        let url = endpoint.url(&self.base_url);

        #[cfg(feature = "tracing")]
        tracing::debug!("opening {} from {}", endpoint.describe(), url);

        let response = self
            .request(&url, &RequestOptions::for_endpoint(&endpoint))
            .send()
            .await
            .map_err(InsightsError::Transport)?;
        let response = Self::ensure_success(endpoint.describe(), response).await?;
        Ok(InsightsStream::from_response(response))
    }

    /// Sends a GET request using the client's retry policy.
    ///
    /// Retry-exhausted 5xx/408 responses are returned as-is so the caller can
    /// branch on the status; exhausted timeouts and transport failures are
    /// returned as errors.
    pub async fn execute(&self, url: &str, request: &RequestOptions) -> Result<Response> {
        self.execute_with_retries(url, request, self.options.max_retries).await
    }

    /// Like [`InsightsClient::execute`] with an explicit retry count.
    ///
    /// Attempts run strictly one after another; each owns its own timer,
    /// which is dropped as soon as the attempt settles. Retryable statuses
    /// and timeouts wait out the backoff first; transport failures retry
    /// immediately.
    pub async fn execute_with_retries(
        &self,
        url: &str,
        request: &RequestOptions,
        max_retries: usize,
    ) -> Result<Response> {
        for index in 0..=max_retries {
            let attempt = Attempt {
                index,
                budget: self.options.attempt_timeout(),
            };

            match self.run_attempt(url, request, attempt).await {
                AttemptOutcome::Success(response) => return Ok(response),
                AttemptOutcome::RetryableStatus(response) => {
                    if !attempt.can_retry(max_retries) {
                        return Ok(response);
                    }
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        "attempt {} for {} returned status {}",
                        index,
                        url,
                        response.status()
                    );
                }
                AttemptOutcome::TimedOut => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("request timeout for {} on attempt {}", url, index);

                    if !attempt.can_retry(max_retries) {
                        return Err(InsightsError::Timeout {
                            url: url.to_owned(),
                            timeout_ms: self.options.timeout_ms,
                        });
                    }
                }
                AttemptOutcome::Transport(err) => {
                    if !attempt.can_retry(max_retries) {
                        return Err(InsightsError::Transport(err));
                    }
                    #[cfg(feature = "tracing")]
                    tracing::debug!("attempt {} for {} failed: {}", index, url, err);
                    // Connection-level failures retry at once, without backoff.
                    continue;
                }
            }

            self.wait_before_retry(url, attempt.index, max_retries).await;
        }

        Err(InsightsError::MaxRetriesExceeded {
            url: url.to_owned(),
            attempts: max_retries.saturating_add(1),
        })
    }

    async fn run_attempt(
        &self,
        url: &str,
        request: &RequestOptions,
        attempt: Attempt,
    ) -> AttemptOutcome {
        let pending = self.request(url, request).send();
        AttemptOutcome::classify(timeout(attempt.budget, pending).await)
    }

    fn request(&self, url: &str, request: &RequestOptions) -> reqwest::RequestBuilder {
        let builder = self.http.get(url).header(header::ACCEPT, request.accept);
        if request.no_cache {
            builder
                .header(header::CACHE_CONTROL, "no-cache")
                .header(header::PRAGMA, "no-cache")
        } else {
            builder
        }
    }

    async fn fetch_json<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let url = endpoint.url(&self.base_url);
        let resource = endpoint.describe();

        #[cfg(feature = "tracing")]
        tracing::debug!("fetching {} from {}", resource, url);

        let response = self
            .execute(&url, &RequestOptions::for_endpoint(&endpoint))
            .await?;
        let response = Self::ensure_success(resource, response).await?;
        let body = response.text().await.map_err(InsightsError::Transport)?;
        decode_envelope(resource, body)
    }

    async fn ensure_success(resource: &'static str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.map_err(InsightsError::Transport)?;

        #[cfg(feature = "tracing")]
        tracing::warn!("failed to fetch {}: {} body: {}", resource, status, body);

        Err(InsightsError::Http {
            resource,
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_owned(),
            body,
        })
    }

    /// Waits before the next retry attempt using the capped exponential
    /// backoff from [`ClientOptions::backoff_delay`].
    async fn wait_before_retry(&self, url: &str, attempt: usize, max_retries: usize) {
        let delay = self.options.backoff_delay(attempt);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "retry {}/{} for {} after {} ms",
            attempt + 1,
            max_retries,
            url,
            delay.as_millis()
        );
        #[cfg(not(feature = "tracing"))]
        let _ = (url, max_retries);

        sleep(delay).await;
    }
}
