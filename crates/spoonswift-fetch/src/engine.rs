//! The fetch orchestrator: one cycle across the relay chain.

use reqwest::Url;

use crate::attempt::{AttemptOutcome, FetchAttempt};
use crate::client::TimedFetch;
use crate::error::FetchError;
use crate::relay::RelayChain;
use crate::validate::Validator;
use spoonswift_core::{AppConfig, UpstreamQuery};

/// A validated cycle outcome: the normalized data plus the attempt log,
/// whose final entry is always the winning relay's `Success`.
#[derive(Debug, Clone)]
pub struct ChainSuccess<T> {
    pub data: T,
    pub attempts: Vec<FetchAttempt>,
}

/// Drives one fetch cycle: builds each relay request in order, executes the
/// bounded fetch, parses and validates the body, and stops at the first
/// validated success.
///
/// Relay attempts run strictly sequentially, never raced in parallel. That
/// bounds load on shared unauthenticated relays and keeps error attribution
/// unambiguous: every failure in the attempt log belongs to exactly one
/// relay.
#[derive(Debug, Clone)]
pub struct FetchEngine {
    fetch: TimedFetch,
    upstream_base: Url,
}

impl FetchEngine {
    /// Creates an engine fetching through the given upstream origin.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the HTTP client cannot be built, or
    /// [`FetchError::RelayUrl`] if `upstream_base` is not a valid URL.
    pub fn new(
        upstream_base: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let upstream_base = Url::parse(upstream_base).map_err(|e| FetchError::RelayUrl {
            relay: "upstream".to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            fetch: TimedFetch::new(timeout_secs, user_agent)?,
            upstream_base,
        })
    }

    /// Creates an engine from application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`FetchEngine::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::new(
            &config.upstream_base_url,
            config.relay_timeout_secs,
            &config.user_agent,
        )
    }

    #[must_use]
    pub fn upstream_base(&self) -> &Url {
        &self.upstream_base
    }

    /// Runs one cycle for `query` across `chain`.
    ///
    /// Per-relay transport failures, unparseable bodies, and validation
    /// failures are recorded in the attempt log and recovered by moving on
    /// to the next relay. The first relay whose body validates wins; no
    /// further relays are tried.
    ///
    /// # Errors
    ///
    /// - [`FetchError::ChainExhausted`] when every relay failed; carries the
    ///   full attempt log.
    /// - [`FetchError::RelayUrl`] when a relay cannot build a request URL
    ///   for the target (a configuration defect, surfaced immediately).
    pub async fn run<V: Validator>(
        &self,
        query: &UpstreamQuery,
        chain: &RelayChain,
        validator: &V,
    ) -> Result<ChainSuccess<V::Output>, FetchError> {
        let target = query.upstream_url(&self.upstream_base);
        let mut attempts: Vec<FetchAttempt> = Vec::with_capacity(chain.len());

        for relay in chain {
            let url = relay.build_url(&target)?;
            tracing::debug!(relay = relay.name(), kind = query.kind(), %url, "trying relay");

            let body = match self.fetch.get(url, relay.headers()).await {
                Ok(body) => body,
                Err(err) => {
                    tracing::warn!(
                        relay = relay.name(),
                        kind = query.kind(),
                        error = %err,
                        "relay attempt failed"
                    );
                    attempts.push(FetchAttempt::now(relay.name(), err.outcome()));
                    continue;
                }
            };

            let parsed = match serde_json::from_str::<serde_json::Value>(&body) {
                Ok(value) => value,
                Err(err) => {
                    tracing::warn!(
                        relay = relay.name(),
                        kind = query.kind(),
                        error = %err,
                        "relay returned unparseable body"
                    );
                    attempts.push(FetchAttempt::now(relay.name(), AttemptOutcome::Validation));
                    continue;
                }
            };

            match validator.validate(&parsed) {
                Ok(data) => {
                    attempts.push(FetchAttempt::now(relay.name(), AttemptOutcome::Success));
                    tracing::debug!(
                        relay = relay.name(),
                        kind = query.kind(),
                        attempts = attempts.len(),
                        "validated response"
                    );
                    return Ok(ChainSuccess { data, attempts });
                }
                Err(failure) => {
                    tracing::warn!(
                        relay = relay.name(),
                        kind = query.kind(),
                        error = %failure,
                        "relay response failed validation"
                    );
                    attempts.push(FetchAttempt::now(relay.name(), AttemptOutcome::Validation));
                }
            }
        }

        let last = attempts
            .last()
            .map_or_else(|| "no relays configured".to_owned(), |a| a.outcome.to_string());
        Err(FetchError::ChainExhausted {
            count: attempts.len(),
            last,
            attempts,
        })
    }
}
