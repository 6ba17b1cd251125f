//! Per-relay attempt records.
//!
//! One [`FetchAttempt`] is appended for every relay tried within a cycle.
//! The log is diagnostic output returned alongside the cycle outcome; it is
//! never persisted anywhere.

use chrono::{DateTime, Utc};

/// How a single relay attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Validated data came back through this relay.
    Success,
    /// A response arrived with a non-2xx status.
    Http(u16),
    /// No response was reachable (DNS, connect, TLS, reset).
    Network,
    /// The per-attempt deadline elapsed and the call was cancelled.
    Timeout,
    /// The body parsed but failed the structural check, or was not JSON.
    Validation,
}

impl std::fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptOutcome::Success => write!(f, "success"),
            AttemptOutcome::Http(status) => write!(f, "http {status}"),
            AttemptOutcome::Network => write!(f, "network error"),
            AttemptOutcome::Timeout => write!(f, "timeout"),
            AttemptOutcome::Validation => write!(f, "validation failure"),
        }
    }
}

/// One relay attempt within a fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchAttempt {
    /// Name of the relay tried.
    pub relay: String,
    pub outcome: AttemptOutcome,
    pub at: DateTime<Utc>,
}

impl FetchAttempt {
    #[must_use]
    pub fn now(relay: &str, outcome: AttemptOutcome) -> Self {
        Self {
            relay: relay.to_owned(),
            outcome,
            at: Utc::now(),
        }
    }
}
