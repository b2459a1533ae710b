use std::time::Duration;

/// Configures per-attempt timeout and retry behavior.
///
/// The defaults are the fixed retry policy used against the insights API:
/// three attempts in total, 15 s per attempt, and backoff of
/// `min(1000 * 2^attempt, 5000)` ms between attempts.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Base retry backoff in milliseconds (exponential strategy).
    pub retry_backoff_ms: u64,
    /// Upper bound for a single backoff delay in milliseconds.
    pub max_backoff_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 15_000,
            max_retries: 2,
            retry_backoff_ms: 1_000,
            max_backoff_ms: 5_000,
        }
    }
}

impl ClientOptions {
    /// Delay inserted after attempt `attempt` (0-based) before the next one.
    pub fn backoff_delay(&self, attempt: usize) -> Duration {
        let exp = attempt.min(16) as u32;
        let multiplier = 1u64 << exp;
        let delay_ms = self
            .retry_backoff_ms
            .saturating_mul(multiplier)
            .min(self.max_backoff_ms);
        Duration::from_millis(delay_ms)
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
