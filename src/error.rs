/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum InsightsError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// The final attempt did not produce a response within its budget.
    #[error("request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },
    /// Non-success HTTP status code with raw response body.
    #[error("failed to fetch {resource}: {status} {reason}")]
    Http {
        /// Human-readable name of the requested resource.
        resource: &'static str,
        status: u16,
        /// Canonical reason phrase for `status`, empty when unknown.
        reason: String,
        body: String,
    },
    /// Response body was not the expected JSON envelope.
    #[error("failed to decode {resource}: {message}")]
    Decode {
        resource: &'static str,
        message: String,
        /// Raw response text, kept for diagnostics.
        body: String,
    },
    /// Reading the insights byte stream failed; the session is closed.
    #[error("stream error: {0}")]
    Stream(String),
    /// The retry loop ran out of attempts without a classified outcome.
    #[error("max retries exceeded for {url} after {attempts} attempts")]
    MaxRetriesExceeded { url: String, attempts: usize },
}

impl InsightsError {
    /// Returns the HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` when the error came from an attempt exceeding its budget.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout { .. } => true,
            Self::Transport(err) => err.is_timeout(),
            _ => false,
        }
    }
}
