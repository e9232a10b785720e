//! Async query abstraction with a short-lived cache and latest-wins ordering.
//!
//! A `CachedQuery<T>` holds exactly one cached value. Each call to `fetch()`
//! either answers from the cache (when still fresh) or spawns the given
//! producer and tags it with a freshly minted `RequestToken`. Results come back
//! over a channel and are only applied if their token is still the latest one,
//! so rapid successive fetches commit in the order they were issued no matter
//! which network call finishes first.
//!
//! # Example
//!
//! ```ignore
//! let mut query = CachedQuery::new(Duration::from_secs(30));
//!
//! let client = client.clone();
//! query.fetch(move || async move { client.list().await.map_err(|e| e.to_string()) });
//!
//! // In event loop tick
//! if query.poll() {
//!     // State changed, trigger re-render
//! }
//!
//! // In render: stale data stays visible while loading and after errors
//! let rows = query.data().map(Vec::as_slice).unwrap_or(&[]);
//! ```

use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Lifecycle of the most recently issued fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
  /// Nothing has been fetched yet
  Idle,
  /// A fetch is in flight
  Loading,
  /// The latest fetch succeeded
  Success,
  /// The latest fetch failed
  Error(String),
}

/// Identifier minted for every issued fetch. Later tokens compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(u64);

impl RequestToken {
  fn next(self) -> Self {
    RequestToken(self.0 + 1)
  }
}

/// What `fetch()` did with the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
  /// Cache was fresh; data is available through `data()` right away
  Cached,
  /// The producer was spawned under this token
  Started(RequestToken),
}

/// A cached value together with its age.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
  pub data: T,
  pub fetched_at: Instant,
  pub ttl: Duration,
  expired: bool,
}

impl<T> CacheEntry<T> {
  fn new(data: T, ttl: Duration) -> Self {
    Self {
      data,
      fetched_at: Instant::now(),
      ttl,
      expired: false,
    }
  }

  /// Fresh iff not invalidated and `now - fetched_at < ttl`
  pub fn is_fresh(&self, now: Instant) -> bool {
    !self.expired && now.saturating_duration_since(self.fetched_at) < self.ttl
  }
}

/// A producer result tagged with the token it was issued under
struct Resolution<T> {
  token: RequestToken,
  result: Result<T, String>,
}

/// Single-entry cache plus fetch state machine.
///
/// Earlier fetches are never aborted. They run to completion and their
/// results are dropped on arrival once a later fetch has been issued.
pub struct CachedQuery<T> {
  status: QueryStatus,
  entry: Option<CacheEntry<T>>,
  ttl: Duration,
  latest: RequestToken,
  tx: mpsc::UnboundedSender<Resolution<T>>,
  rx: mpsc::UnboundedReceiver<Resolution<T>>,
}

impl<T: Send + 'static> CachedQuery<T> {
  /// Create an empty query whose entries stay fresh for `ttl`.
  pub fn new(ttl: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      status: QueryStatus::Idle,
      entry: None,
      ttl,
      latest: RequestToken::default(),
      tx,
      rx,
    }
  }

  pub fn status(&self) -> &QueryStatus {
    &self.status
  }

  /// Last successfully fetched data, kept through later loading and errors.
  pub fn data(&self) -> Option<&T> {
    self.entry.as_ref().map(|e| &e.data)
  }

  pub fn is_loading(&self) -> bool {
    self.status == QueryStatus::Loading
  }

  pub fn is_error(&self) -> bool {
    matches!(self.status, QueryStatus::Error(_))
  }

  pub fn error(&self) -> Option<&str> {
    match &self.status {
      QueryStatus::Error(e) => Some(e),
      _ => None,
    }
  }

  /// Token of the most recently issued fetch (including cache hits).
  #[cfg(test)]
  pub fn latest_token(&self) -> RequestToken {
    self.latest
  }

  pub fn is_fresh(&self) -> bool {
    self
      .entry
      .as_ref()
      .map(|e| e.is_fresh(Instant::now()))
      .unwrap_or(false)
  }

  /// Force the next `fetch()` to bypass the cache. The data stays readable.
  pub fn invalidate(&mut self) {
    if let Some(entry) = &mut self.entry {
      entry.expired = true;
    }
  }

  /// Serve from cache when fresh, otherwise spawn `producer`.
  ///
  /// A cache hit still counts as the latest request: any fetch already in
  /// flight becomes superseded and its result will be ignored.
  pub fn fetch<F, Fut>(&mut self, producer: F) -> FetchOutcome
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    self.latest = self.latest.next();

    if self.is_fresh() {
      debug!(token = ?self.latest, "cache hit, producer not invoked");
      if self.is_loading() {
        self.status = QueryStatus::Success;
      }
      return FetchOutcome::Cached;
    }

    let token = self.latest;
    self.status = QueryStatus::Loading;
    debug!(?token, "issuing fetch");

    let future = producer();
    let tx = self.tx.clone();
    tokio::spawn(async move {
      // A panicking producer still resolves its token, so `settle` returns
      let result = AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .unwrap_or_else(|_| Err("fetch task panicked".to_string()));
      // Receiver lives as long as the query; a send error means it was dropped
      let _ = tx.send(Resolution { token, result });
    });

    FetchOutcome::Started(token)
  }

  /// Apply any resolved fetches without blocking.
  ///
  /// Returns `true` if the visible state changed. Call this from the tick.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;
    while let Ok(resolution) = self.rx.try_recv() {
      changed |= self.apply(resolution);
    }
    changed
  }

  /// Wait until the latest issued fetch has resolved and been applied.
  pub async fn settle(&mut self) {
    while self.is_loading() {
      match self.rx.recv().await {
        Some(resolution) => {
          self.apply(resolution);
        }
        None => break,
      }
    }
  }

  fn apply(&mut self, resolution: Resolution<T>) -> bool {
    if resolution.token != self.latest {
      debug!(
        token = ?resolution.token,
        latest = ?self.latest,
        "discarding superseded result"
      );
      return false;
    }

    match resolution.result {
      Ok(data) => {
        info!(token = ?resolution.token, "fetch committed");
        self.entry = Some(CacheEntry::new(data, self.ttl));
        self.status = QueryStatus::Success;
      }
      Err(error) => {
        warn!(token = ?resolution.token, %error, "fetch failed");
        self.status = QueryStatus::Error(error);
      }
    }
    true
  }
}

impl<T: std::fmt::Debug> std::fmt::Debug for CachedQuery<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CachedQuery")
      .field("status", &self.status)
      .field("entry", &self.entry)
      .field("ttl", &self.ttl)
      .field("latest", &self.latest)
      .finish_non_exhaustive()
  }
}
