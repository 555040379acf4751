use reqwest::StatusCode;
use thiserror::Error;

/// Every way a lookup of a user's events can fail. The display text is what the operator sees.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("❌ Error: No internet connection. Please check your network.")]
    NetworkUnavailable(#[source] reqwest::Error),
    #[error("❌ Error: Request timed out. GitHub API might be slow. Try again later.")]
    Timeout(#[source] reqwest::Error),
    #[error("❌ Error: GitHub user not found.")]
    UserNotFound,
    #[error("⚠️ Error: API rate limit exceeded. Try again later")]
    RateLimited,
    #[error("❌ Unexpected error: HTTP {0}")]
    HttpStatus(StatusCode),
    #[error("❌ Error: failed to decode JSON response.")]
    MalformedBody(#[source] serde_json::Error),
    #[error("❌ Network Error: {0}")]
    Transport(#[source] reqwest::Error),
}

impl FetchError {
    /// Sorts a transport level failure into the matching variant. Timeouts are checked first
    /// because a connect timeout reports itself as both.
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout(error)
        } else if error.is_connect() {
            FetchError::NetworkUnavailable(error)
        } else {
            FetchError::Transport(error)
        }
    }

    pub fn from_status(status: StatusCode) -> Option<Self> {
        match status {
            StatusCode::NOT_FOUND => Some(FetchError::UserNotFound),
            StatusCode::FORBIDDEN => Some(FetchError::RateLimited),
            status if !status.is_success() => Some(FetchError::HttpStatus(status)),
            _ => None,
        }
    }
}
