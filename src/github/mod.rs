//! Everything that talks to the GitHub events endpoint.
//!  - [EventFetcher] is the seam between the network and the rest of the application.
//!  - [client::GithubClient] is the real implementation on top of reqwest.
//!  - [cache::FetchCache] keeps the last few successful lookups in memory.

pub mod cache;
pub mod client;
pub mod error;

use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde_json::Value;

pub use error::FetchError;

/// Result of a successful lookup. Errors are never represented here so that they can't end up
/// in the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Raw, untrusted response body. Normally a list of event objects, newest first.
    Events(Arc<Value>),
    /// The endpoint answered but had nothing to show.
    NoActivity,
}

impl FetchOutcome {
    pub fn from_body(body: Value) -> Self {
        let empty = match &body {
            Value::Null => true,
            Value::Array(items) => items.is_empty(),
            Value::Object(fields) => fields.is_empty(),
            _ => false,
        };
        if empty {
            FetchOutcome::NoActivity
        } else {
            FetchOutcome::Events(Arc::new(body))
        }
    }
}

/// Retrieves the recent public events of a user.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EventFetcher: Send + Sync {
    async fn fetch(&self, username: &str) -> Result<FetchOutcome, FetchError>;
}
