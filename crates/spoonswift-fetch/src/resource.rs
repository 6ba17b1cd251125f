//! Consumer-facing request state machine.
//!
//! A [`Resource`] owns one [`RequestState`] and drives fetch cycles against
//! it. Every cycle is caller-initiated; there is no background polling or
//! scheduled backoff, so no silent traffic is ever generated against relays
//! outside our control.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::attempt::FetchAttempt;
use crate::engine::FetchEngine;
use crate::error::{CycleError, FetchError};
use crate::relay::RelayChain;
use crate::validate::Validator;
use spoonswift_core::UpstreamQuery;

/// Request lifecycle status.
///
/// Transitions are only `{Idle, Success, Error} -> Loading -> {Success,
/// Error}`; Loading is never skipped, and only an explicit `refetch`/`retry`
/// (or a superseding `submit`) re-enters it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Success,
    Error,
}

/// The state one consumer surface observes.
#[derive(Debug, Clone)]
pub struct RequestState<T> {
    pub status: Status,
    /// Number of cycles started so far. Incremented exactly once per cycle,
    /// never per relay try, so repeated failures stay distinguishable.
    pub attempts: u32,
    /// Summary of the most recent failed cycle; cleared when a new cycle
    /// starts.
    pub last_error: Option<CycleError>,
    /// Present iff `status == Success`.
    pub data: Option<T>,
    /// Attempt log of the most recently completed cycle.
    pub history: Vec<FetchAttempt>,
}

impl<T> RequestState<T> {
    fn idle() -> Self {
        Self {
            status: Status::Idle,
            attempts: 0,
            last_error: None,
            data: None,
            history: Vec::new(),
        }
    }
}

struct Inner<T> {
    state: RequestState<T>,
    query: UpstreamQuery,
    /// Monotonically increasing cycle token. An outcome is applied only if
    /// the token it was started with is still current, so a superseded
    /// cycle's late resolution can never overwrite newer state.
    cycle: u64,
}

/// Cloneable handle over one request's state; clones share the same state.
pub struct Resource<V: Validator> {
    engine: FetchEngine,
    chain: RelayChain,
    validator: V,
    inner: Arc<Mutex<Inner<V::Output>>>,
}

impl<V: Validator + Clone> Clone for Resource<V> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            chain: self.chain.clone(),
            validator: self.validator.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Validator> Resource<V> {
    /// Creates an idle resource; no cycle runs until the caller asks.
    #[must_use]
    pub fn new(engine: FetchEngine, chain: RelayChain, validator: V, query: UpstreamQuery) -> Self {
        Self {
            engine,
            chain,
            validator,
            inner: Arc::new(Mutex::new(Inner {
                state: RequestState::idle(),
                query,
                cycle: 0,
            })),
        }
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> RequestState<V::Output> {
        self.lock().state.clone()
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.lock().state.status
    }

    /// Starts a new cycle for the current query.
    ///
    /// Returns `false` without side effects if a cycle is already Loading:
    /// re-running is only ever explicit, and double-submission from an
    /// impatient caller must not stack cycles.
    pub async fn refetch(&self) -> bool {
        let Some((cycle, query)) = self.begin_cycle() else {
            tracing::debug!("refetch ignored: cycle already loading");
            return false;
        };
        self.run_cycle(cycle, &query).await;
        true
    }

    /// Alias for [`Resource::refetch`], the retry affordance surfaced next
    /// to an error state. Same idempotent Loading guard.
    pub async fn retry(&self) -> bool {
        self.refetch().await
    }

    /// Replaces the query and starts a new cycle immediately, superseding
    /// any cycle still in flight. The superseded cycle's resolution is
    /// discarded by the token check when it eventually lands.
    pub async fn submit(&self, query: UpstreamQuery) {
        let (cycle, query) = self.supersede(query);
        self.run_cycle(cycle, &query).await;
    }

    fn begin_cycle(&self) -> Option<(u64, UpstreamQuery)> {
        let mut inner = self.lock();
        if inner.state.status == Status::Loading {
            return None;
        }
        Some(Self::enter_loading(&mut inner))
    }

    fn supersede(&self, query: UpstreamQuery) -> (u64, UpstreamQuery) {
        let mut inner = self.lock();
        inner.query = query;
        Self::enter_loading(&mut inner)
    }

    fn enter_loading(inner: &mut Inner<V::Output>) -> (u64, UpstreamQuery) {
        inner.cycle += 1;
        inner.state.status = Status::Loading;
        inner.state.attempts += 1;
        inner.state.last_error = None;
        inner.state.data = None;
        inner.state.history.clear();
        (inner.cycle, inner.query.clone())
    }

    async fn run_cycle(&self, cycle: u64, query: &UpstreamQuery) {
        let outcome = self.engine.run(query, &self.chain, &self.validator).await;

        let mut inner = self.lock();
        if inner.cycle != cycle {
            tracing::debug!(cycle, current = inner.cycle, "stale cycle resolution discarded");
            return;
        }
        match outcome {
            Ok(success) => {
                inner.state.status = Status::Success;
                inner.state.data = Some(success.data);
                inner.state.history = success.attempts;
            }
            Err(err) => {
                inner.state.status = Status::Error;
                inner.state.last_error = Some(CycleError::from(&err));
                inner.state.history = match err {
                    FetchError::ChainExhausted { attempts, .. } => attempts,
                    FetchError::Client(_) | FetchError::RelayUrl { .. } => Vec::new(),
                };
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V::Output>> {
        // A panicked cycle leaves no torn state worth preserving.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Builds a resource and runs its first cycle — the one-call consumer
/// contract: `fetch_resource(query)` then observe
/// `{status, data, error, attempts, refetch(), retry()}`.
pub async fn fetch_resource<V: Validator>(
    engine: FetchEngine,
    chain: RelayChain,
    validator: V,
    query: UpstreamQuery,
) -> Resource<V> {
    let resource = Resource::new(engine, chain, validator, query);
    resource.refetch().await;
    resource
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ListingValidator;
    use spoonswift_core::query::GeoPoint;

    fn test_engine() -> FetchEngine {
        FetchEngine::new("https://www.swiggy.com", 1, "test-agent")
            .expect("engine construction should not fail")
    }

    fn listing_query() -> UpstreamQuery {
        UpstreamQuery::Listing {
            location: GeoPoint {
                lat: 23.1793,
                lng: 75.7849,
            },
            offset: 0,
        }
    }

    #[test]
    fn starts_idle_with_zero_attempts() {
        let resource = Resource::new(
            test_engine(),
            RelayChain::new(Vec::new()),
            ListingValidator,
            listing_query(),
        );
        let state = resource.state();
        assert_eq!(state.status, Status::Idle);
        assert_eq!(state.attempts, 0);
        assert!(state.data.is_none());
        assert!(state.last_error.is_none());
        assert!(state.history.is_empty());
    }

    #[tokio::test]
    async fn empty_chain_resolves_to_error_state() {
        let resource = Resource::new(
            test_engine(),
            RelayChain::new(Vec::new()),
            ListingValidator,
            listing_query(),
        );
        assert!(resource.refetch().await);

        let state = resource.state();
        assert_eq!(state.status, Status::Error);
        assert_eq!(state.attempts, 1);
        assert!(state.data.is_none());
        let err = state.last_error.expect("error state must carry a summary");
        assert_eq!(err.relays_tried, 0);
        assert!(err.message.contains("0 relays"), "{}", err.message);
    }

    #[tokio::test]
    async fn attempts_count_cycles_not_relays() {
        let resource = Resource::new(
            test_engine(),
            RelayChain::new(Vec::new()),
            ListingValidator,
            listing_query(),
        );
        resource.refetch().await;
        resource.retry().await;
        resource.retry().await;
        assert_eq!(resource.state().attempts, 3);
    }

    #[tokio::test]
    async fn error_state_retains_cumulative_attempts() {
        let resource = Resource::new(
            test_engine(),
            RelayChain::new(Vec::new()),
            ListingValidator,
            listing_query(),
        );
        resource.refetch().await;
        resource.retry().await;
        let state = resource.state();
        assert_eq!(state.status, Status::Error);
        assert_eq!(state.attempts, 2);
    }
}
