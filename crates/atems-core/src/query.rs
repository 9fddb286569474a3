//! Query cache policy for polled data (dashboard statistics)

use crate::{config::QueryConfig, error::Result};
use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use tracing::{debug, warn};

/// Retry and staleness rules for cached queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPolicy {
    /// Extra attempts after the first failure
    pub retry: u32,
    /// How long a stored value is served without refetching
    pub stale_time: Duration,
}

impl Default for QueryPolicy {
    fn default() -> Self {
        Self::from(&QueryConfig::default())
    }
}

impl From<&QueryConfig> for QueryPolicy {
    fn from(config: &QueryConfig) -> Self {
        let stale_secs = i64::try_from(config.stale_time_secs).unwrap_or(i64::MAX);
        Self {
            retry: config.retry,
            stale_time: Duration::try_seconds(stale_secs).unwrap_or(Duration::MAX),
        }
    }
}

/// What a polled view shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<T> {
    /// First fetch still outstanding
    Loading,
    /// Latest fetch succeeded
    Ready(T),
    /// Latest fetch failed
    Failed(String),
}

impl<T> QueryState<T> {
    /// True while the first fetch is outstanding
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Loaded value, if any
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Last fetched value of one query together with its fetch time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedQuery<T> {
    value: Option<T>,
    fetched_at: Option<DateTime<Utc>>,
    policy: QueryPolicy,
}

impl<T> CachedQuery<T> {
    /// Empty cache using `policy`
    pub const fn new(policy: QueryPolicy) -> Self {
        Self {
            value: None,
            fetched_at: None,
            policy,
        }
    }

    /// Policy this cache follows
    pub const fn policy(&self) -> QueryPolicy {
        self.policy
    }

    /// Store a freshly fetched value
    pub fn store(&mut self, value: T, now: DateTime<Utc>) {
        self.value = Some(value);
        self.fetched_at = Some(now);
    }

    /// Forget the stored value
    pub fn invalidate(&mut self) {
        self.value = None;
        self.fetched_at = None;
    }

    /// True when nothing is stored or the stored value is older than the
    /// stale window
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.fetched_at
            .is_none_or(|fetched_at| now - fetched_at >= self.policy.stale_time)
    }

    /// Stored value while it is still fresh
    pub fn fresh(&self, now: DateTime<Utc>) -> Option<&T> {
        if self.is_stale(now) {
            None
        } else {
            self.value.as_ref()
        }
    }

    /// Stored value regardless of age
    pub const fn last(&self) -> Option<&T> {
        self.value.as_ref()
    }
}

impl<T> Default for CachedQuery<T> {
    fn default() -> Self {
        Self::new(QueryPolicy::default())
    }
}

/// Run `fetch`, retrying up to `policy.retry` more times on failure.
///
/// A 401 is returned without retrying.
///
/// # Errors
///
/// Returns the error of the last attempt.
pub async fn fetch_with_retry<T, F, Fut>(policy: &QueryPolicy, mut fetch: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match fetch().await {
            Ok(value) => return Ok(value),
            Err(error) if error.is_unauthorized() || attempt >= policy.retry => {
                debug!(attempt, %error, "query failed, giving up");
                return Err(error);
            }
            Err(error) => {
                attempt += 1;
                warn!(attempt, %error, "query failed, retrying");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + seconds, 0).unwrap()
    }

    #[test]
    fn test_default_policy() {
        let policy = QueryPolicy::default();
        assert_eq!(policy.retry, 1);
        assert_eq!(policy.stale_time, Duration::seconds(10));
    }

    #[test]
    fn test_fresh_for_exactly_the_stale_window() {
        let mut cache = CachedQuery::new(QueryPolicy::default());
        assert!(cache.is_stale(at(0)));
        assert_eq!(cache.fresh(at(0)), None);

        cache.store(42, at(0));

        assert_eq!(cache.fresh(at(0)), Some(&42));
        assert_eq!(cache.fresh(at(9)), Some(&42));
        assert_eq!(cache.fresh(at(10)), None);
        assert_eq!(cache.last(), Some(&42));
    }

    #[test]
    fn test_invalidate() {
        let mut cache = CachedQuery::default();
        cache.store("stats", at(0));
        cache.invalidate();

        assert!(cache.is_stale(at(1)));
        assert_eq!(cache.last(), None);
    }

    #[test]
    fn test_query_state_accessors() {
        let loading: QueryState<u32> = QueryState::Loading;
        assert!(loading.is_loading());
        assert_eq!(loading.data(), None);

        assert_eq!(QueryState::Ready(7).data(), Some(&7));
        assert_eq!(QueryState::<u32>::Failed("x".to_string()).data(), None);
    }

    #[tokio::test]
    async fn test_retry_once_then_succeed() {
        let calls = Cell::new(0);
        let result = fetch_with_retry(&QueryPolicy::default(), || {
            calls.set(calls.get() + 1);
            let attempt = calls.get();
            async move {
                if attempt == 1 {
                    Err(Error::Transport("timeout".to_string()))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_policy() {
        let calls = Cell::new(0);
        let result: Result<()> = fetch_with_retry(&QueryPolicy::default(), || {
            calls.set(calls.get() + 1);
            async { Err(Error::Transport("down".to_string())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_unauthorized_is_not_retried() {
        let calls = Cell::new(0);
        let result: Result<()> = fetch_with_retry(&QueryPolicy::default(), || {
            calls.set(calls.get() + 1);
            async {
                Err(Error::Unauthorized {
                    login_url: "/login?next=%2Fapp".to_string(),
                })
            }
        })
        .await;

        assert!(result.unwrap_err().is_unauthorized());
        assert_eq!(calls.get(), 1);
    }
}
