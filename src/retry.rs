use std::time::Duration;

use reqwest::{Response, StatusCode};
use tokio::time::error::Elapsed;

/// One physical attempt of a logical request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Attempt {
    /// 0-based attempt index.
    pub index: usize,
    /// Time this attempt may take before it is abandoned.
    pub budget: Duration,
}

impl Attempt {
    pub fn can_retry(&self, max_retries: usize) -> bool {
        self.index < max_retries
    }
}

/// How a single attempt settled.
#[derive(Debug)]
pub(crate) enum AttemptOutcome {
    /// Any response that must be handed back without retrying.
    Success(Response),
    /// 5xx or 408; retried while attempts remain, otherwise returned as-is.
    RetryableStatus(Response),
    /// The attempt exceeded its budget.
    TimedOut,
    /// DNS, connect or other request-level failure.
    Transport(reqwest::Error),
}

impl AttemptOutcome {
    pub fn classify(result: Result<reqwest::Result<Response>, Elapsed>) -> Self {
        match result {
            Err(_) => Self::TimedOut,
            Ok(Err(err)) if err.is_timeout() => Self::TimedOut,
            Ok(Err(err)) => Self::Transport(err),
            Ok(Ok(response)) if is_retryable_status(response.status()) => {
                Self::RetryableStatus(response)
            }
            Ok(Ok(response)) => Self::Success(response),
        }
    }
}

/// Server errors and `408 Request Timeout` are treated as transient.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT
}
