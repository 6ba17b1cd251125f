//! Bounded single-attempt HTTP fetch.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::{FetchError, TransportError};

/// Executes one HTTP GET bounded by a deadline.
///
/// The deadline is enforced with [`tokio::time::timeout`]; when it elapses,
/// the in-flight request future is dropped, which aborts the underlying
/// connection. Cancellation therefore needs no explicit handle and nothing
/// can leak past the attempt.
#[derive(Debug, Clone)]
pub struct TimedFetch {
    client: Client,
    timeout: Duration,
}

impl TimedFetch {
    /// Creates a `TimedFetch` with the given per-attempt timeout.
    ///
    /// The User-Agent configured here is the client default; relays that
    /// carry their own header set override it per request.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Client`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends one GET with the relay's headers and returns the raw body text.
    ///
    /// # Errors
    ///
    /// - [`TransportError::Timeout`] — the deadline elapsed; the call was
    ///   cancelled and any late response is never observed.
    /// - [`TransportError::Network`] — no response was reachable.
    /// - [`TransportError::Http`] — a response arrived with a non-2xx status.
    pub async fn get(
        &self,
        url: Url,
        headers: &[(String, String)],
    ) -> Result<String, TransportError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        let classify = |err: reqwest::Error| classify_reqwest(err, timeout_ms);

        let attempt = async {
            let response = request.send().await.map_err(classify)?;
            let status = response.status();
            if !status.is_success() {
                return Err(TransportError::Http {
                    status: status.as_u16(),
                });
            }
            response.text().await.map_err(classify)
        };

        match tokio::time::timeout(self.timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout { timeout_ms }),
        }
    }
}

/// Maps a `reqwest` failure onto the transport taxonomy. Connect timeouts
/// from the client builder count as timeouts, everything else as network.
fn classify_reqwest(err: reqwest::Error, timeout_ms: u64) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout { timeout_ms }
    } else {
        TransportError::Network(err)
    }
}
