use thiserror::Error;

use crate::attempt::{AttemptOutcome, FetchAttempt};

/// Transport-level failure of a single relay attempt.
///
/// Each variant maps to one [`AttemptOutcome`] kind; none of them aborts the
/// chain — the engine records the attempt and moves on to the next relay.
#[derive(Debug, Error)]
pub enum TransportError {
    /// No response was reachable through this relay.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The per-attempt deadline elapsed; the in-flight call was cancelled.
    #[error("timed out after {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },

    /// A response arrived with a non-2xx status.
    #[error("unexpected HTTP status {status}")]
    Http { status: u16 },
}

impl TransportError {
    #[must_use]
    pub fn outcome(&self) -> AttemptOutcome {
        match self {
            TransportError::Network(_) => AttemptOutcome::Network,
            TransportError::Timeout { .. } => AttemptOutcome::Timeout,
            TransportError::Http { status } => AttemptOutcome::Http(*status),
        }
    }
}

/// A response that parsed as JSON but does not have the expected shape.
///
/// Always recoverable: the chain continues with the next relay. Relays are
/// known to return well-formed JSON error pages and truncated payloads with
/// a 200 status, which is exactly what this guards against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing or malformed {missing_path}")]
pub struct ValidationFailure {
    /// JSON pointer (or description) of the first requirement that failed.
    pub missing_path: String,
}

impl ValidationFailure {
    #[must_use]
    pub fn missing(path: &str) -> Self {
        Self {
            missing_path: path.to_owned(),
        }
    }
}

/// Errors surfaced by the fetch engine to its caller.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The underlying `reqwest::Client` could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// A relay's base URL cannot wrap the target into a valid request URL.
    /// This is a configuration defect, not a transient failure.
    #[error("invalid request URL for relay {relay}: {reason}")]
    RelayUrl { relay: String, reason: String },

    /// Every relay in the chain was tried and none produced validated data.
    /// Carries the full attempt log for diagnostics.
    #[error("all {count} relays failed (last failure: {last})")]
    ChainExhausted {
        count: usize,
        last: String,
        attempts: Vec<FetchAttempt>,
    },
}

/// Cloneable summary of a failed cycle, retained in [`crate::RequestState`]
/// until the next cycle clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    /// Number of relays tried before giving up.
    pub relays_tried: usize,
    /// Outcome of the last attempt, if any relay was tried at all.
    pub last_outcome: Option<AttemptOutcome>,
    /// Renderable message for the consumer surface.
    pub message: String,
}

impl std::fmt::Display for CycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<&FetchError> for CycleError {
    fn from(err: &FetchError) -> Self {
        match err {
            FetchError::ChainExhausted { count, attempts, .. } => Self {
                relays_tried: *count,
                last_outcome: attempts.last().map(|a| a.outcome),
                message: err.to_string(),
            },
            FetchError::Client(_) | FetchError::RelayUrl { .. } => Self {
                relays_tried: 0,
                last_outcome: None,
                message: err.to_string(),
            },
        }
    }
}
