use thiserror::Error;

/// Failure taxonomy for one request against the user directory.
///
/// Every variant is non-fatal to the screen: callers absorb these into an
/// alert plus an empty or unchanged list, never a crash.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("the user directory is rate limiting requests (HTTP 429)")]
    RateLimited,
    #[error("the user directory returned HTTP {status}")]
    Server { status: u16 },
    #[error("transport failure reaching the user directory: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("failed to decode the user directory response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("the user directory returned an empty batch")]
    EmptyBatch,
}

impl FetchError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited)
    }
}
