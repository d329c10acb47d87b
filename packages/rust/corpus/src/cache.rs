//! Time-and-failure-aware corpus cache.
//!
//! Wraps a [`CorpusSource`] with a TTL policy and a stale-on-error
//! fallback, guaranteeing at most one full re-aggregation per TTL window
//! under normal operation. The cache is an injectable component —
//! constructed once at process start and shared by reference — so tests can
//! build instances with controlled clocks and scripted sources.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use inkling_shared::Result;

use crate::aggregate::CorpusSource;

/// Fixed time-to-live for cached content; no dynamic adjustment.
pub const CORPUS_TTL: Duration = Duration::from_secs(5 * 60);

/// Source of "now", injectable for tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The cached snapshot. Replaced wholesale on each successful aggregation,
/// never partially updated.
struct CacheEntry {
    content: String,
    fetched_at: DateTime<Utc>,
}

/// TTL cache over a [`CorpusSource`].
pub struct CorpusCache<A> {
    source: A,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
    entry: Mutex<Option<CacheEntry>>,
}

impl<A: CorpusSource> CorpusCache<A> {
    pub fn new(source: A) -> Self {
        Self::with_clock(source, Arc::new(SystemClock))
    }

    /// Build a cache with an injected clock (tests drive time manually).
    pub fn with_clock(source: A, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            ttl: TimeDelta::seconds(CORPUS_TTL.as_secs() as i64),
            entry: Mutex::new(None),
        }
    }

    /// Serve the current corpus.
    ///
    /// Fresh content is returned without network access. A stale or empty
    /// cache triggers a synchronous rebuild; the lock is not held across
    /// that await, so concurrent stale reads may each rebuild — wasteful
    /// but safe, since the update is a single atomic replace and the last
    /// successful writer wins.
    ///
    /// On rebuild failure, prior non-empty content is served unchanged and
    /// `fetched_at` is left alone so the next read retries instead of
    /// extending a stale TTL. With no prior content the failure propagates.
    pub async fn corpus(&self) -> Result<String> {
        {
            let entry = self.entry.lock().await;
            if let Some(cached) = entry.as_ref() {
                if self.clock.now() - cached.fetched_at < self.ttl {
                    debug!("serving fresh cached corpus");
                    return Ok(cached.content.clone());
                }
            }
        }

        match self.source.build_corpus().await {
            Ok(content) => {
                // A successful empty result legitimately overwrites prior
                // non-empty content.
                info!(chars = content.len(), "corpus cache refreshed");
                *self.entry.lock().await = Some(CacheEntry {
                    content: content.clone(),
                    fetched_at: self.clock.now(),
                });
                Ok(content)
            }
            Err(err) => {
                let entry = self.entry.lock().await;
                match entry.as_ref() {
                    Some(cached) if !cached.content.is_empty() => {
                        warn!(error = %err, "refresh failed, serving stale corpus");
                        Ok(cached.content.clone())
                    }
                    _ => Err(err),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use inkling_shared::InklingError;

    use super::*;

    /// Clock whose time is advanced explicitly by the test.
    struct ManualClock(StdMutex<DateTime<Utc>>);

    impl ManualClock {
        fn starting_now() -> Arc<Self> {
            Arc::new(Self(StdMutex::new(Utc::now())))
        }

        fn advance(&self, delta: TimeDelta) {
            let mut now = self.0.lock().unwrap();
            *now += delta;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    /// Source that replays a script of results and counts invocations.
    struct ScriptedSource {
        script: StdMutex<VecDeque<std::result::Result<String, String>>>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedSource {
        fn new(script: Vec<std::result::Result<&str, &str>>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            let source = Self {
                script: StdMutex::new(
                    script
                        .into_iter()
                        .map(|r| r.map(String::from).map_err(String::from))
                        .collect(),
                ),
                calls: calls.clone(),
            };
            (source, calls)
        }
    }

    #[async_trait]
    impl CorpusSource for ScriptedSource {
        async fn build_corpus(&self) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(Ok(content)) => Ok(content),
                Some(Err(msg)) => Err(InklingError::api(500, msg)),
                None => Err(InklingError::api(500, "script exhausted")),
            }
        }
    }

    fn past_ttl() -> TimeDelta {
        TimeDelta::seconds(CORPUS_TTL.as_secs() as i64 + 1)
    }

    #[tokio::test]
    async fn fresh_read_does_not_reaggregate() {
        let (source, calls) = ScriptedSource::new(vec![Ok("corpus v1")]);
        let cache = CorpusCache::with_clock(source, ManualClock::starting_now());

        assert_eq!(cache.corpus().await.unwrap(), "corpus v1");
        assert_eq!(cache.corpus().await.unwrap(), "corpus v1");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_read_triggers_refresh() {
        let (source, calls) = ScriptedSource::new(vec![Ok("v1"), Ok("v2")]);
        let clock = ManualClock::starting_now();
        let cache = CorpusCache::with_clock(source, clock.clone());

        assert_eq!(cache.corpus().await.unwrap(), "v1");
        clock.advance(past_ttl());
        assert_eq!(cache.corpus().await.unwrap(), "v2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_refresh_serves_stale_and_retries_next_read() {
        let (source, calls) = ScriptedSource::new(vec![Ok("v1"), Err("store down"), Ok("v2")]);
        let clock = ManualClock::starting_now();
        let cache = CorpusCache::with_clock(source, clock.clone());

        assert_eq!(cache.corpus().await.unwrap(), "v1");
        clock.advance(past_ttl());

        // Refresh fails: prior content served unchanged.
        assert_eq!(cache.corpus().await.unwrap(), "v1");
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // fetched_at was not advanced by the failure, so the very next read
        // retries aggregation rather than treating the stale entry as fresh.
        assert_eq!(cache.corpus().await.unwrap(), "v2");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn failure_with_no_prior_content_propagates() {
        let (source, calls) = ScriptedSource::new(vec![Err("store down")]);
        let cache = CorpusCache::with_clock(source, ManualClock::starting_now());

        let err = cache.corpus().await.unwrap_err();
        assert!(err.to_string().contains("store down"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn successful_empty_result_overwrites_previous_content() {
        let (source, calls) = ScriptedSource::new(vec![Ok("v1"), Ok("")]);
        let clock = ManualClock::starting_now();
        let cache = CorpusCache::with_clock(source, clock.clone());

        assert_eq!(cache.corpus().await.unwrap(), "v1");
        clock.advance(past_ttl());
        assert_eq!(cache.corpus().await.unwrap(), "");

        // The empty entry is fresh and is served without another rebuild.
        assert_eq!(cache.corpus().await.unwrap(), "");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn cached_empty_content_does_not_mask_failure() {
        let (source, _calls) = ScriptedSource::new(vec![Ok(""), Err("store down")]);
        let clock = ManualClock::starting_now();
        let cache = CorpusCache::with_clock(source, clock.clone());

        assert_eq!(cache.corpus().await.unwrap(), "");
        clock.advance(past_ttl());

        // The stale fallback covers prior non-empty content only.
        let err = cache.corpus().await.unwrap_err();
        assert!(err.to_string().contains("store down"));
    }
}
