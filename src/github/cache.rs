use std::num::NonZeroUsize;

use lru::LruCache;
use tracing::{debug, instrument};

use super::{EventFetcher, FetchError, FetchOutcome};

pub const CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Bounded LRU cache of lookups in front of an [EventFetcher]. Keys are usernames exactly as
/// the caller typed them. Only successful outcomes are stored, and nothing expires on its
/// own: an entry leaves through eviction or [FetchCache::clear].
///
/// A hit reorders the cache, so even reads need `&mut self`. Sharing this between tasks would
/// require wrapping it in a mutex.
pub struct FetchCache<F> {
    fetcher: F,
    entries: LruCache<String, FetchOutcome>,
}

impl<F: EventFetcher> FetchCache<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_capacity(fetcher, CACHE_CAPACITY)
    }

    pub fn with_capacity(fetcher: F, capacity: NonZeroUsize) -> Self {
        Self {
            fetcher,
            entries: LruCache::new(capacity),
        }
    }

    /// Returns the stored outcome for `username`, or asks the fetcher on a miss.
    #[instrument(skip(self))]
    pub async fn get(&mut self, username: &str) -> Result<FetchOutcome, FetchError> {
        if let Some(outcome) = self.entries.get(username) {
            debug!("Cache hit");
            return Ok(outcome.clone());
        }

        debug!("Cache miss");
        let outcome = self.fetcher.fetch(username).await?;
        if let Some((evicted, _)) = self.entries.push(username.to_owned(), outcome.clone()) {
            if evicted != username {
                debug!("Evicted {evicted}");
            }
        }
        Ok(outcome)
    }

    /// Drops every entry and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Checks presence without touching recency.
    pub fn contains(&self, username: &str) -> bool {
        self.entries.contains(username)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
