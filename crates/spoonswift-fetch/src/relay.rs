//! Relay descriptors and the ordered relay chain.
//!
//! Direct calls to the upstream are blocked by cross-origin policy, so every
//! request goes through a relay: either a first-party proxy mirroring the
//! upstream path space, or one of the public CORS relay services. Each relay
//! has its own URL-wrapping convention and header set; [`RelayDescriptor::build_url`]
//! is the single place where a target URL becomes a relay request URL.

use reqwest::Url;

use crate::error::FetchError;
use spoonswift_core::AppConfig;

/// How a relay wraps the target upstream URL into its own request URL.
#[derive(Debug, Clone)]
pub enum RelayMode {
    /// First-party proxy mirroring the upstream path space: the target's
    /// path and query are re-rooted onto the proxy base.
    Passthrough { base: Url },
    /// The full target URL is percent-encoded into one query parameter
    /// (e.g. `https://api.allorigins.win/raw?url=<encoded>`).
    QueryParam { base: Url, param: String },
    /// The full target URL is appended verbatim after a path prefix
    /// (e.g. `https://thingproxy.freeboard.io/fetch/<url>`).
    PathPrefix { base: String },
}

/// One relay's URL-building rule and header set.
#[derive(Debug, Clone)]
pub struct RelayDescriptor {
    name: String,
    mode: RelayMode,
    headers: Vec<(String, String)>,
}

impl RelayDescriptor {
    #[must_use]
    pub fn new(name: &str, mode: RelayMode, headers: Vec<(String, String)>) -> Self {
        Self {
            name: name.to_owned(),
            mode,
            headers,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Produces the fully formed request URL for the given upstream target.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::RelayUrl`] if the wrapped URL is not parseable,
    /// which indicates a misconfigured relay base rather than a transient
    /// failure.
    pub fn build_url(&self, target: &Url) -> Result<Url, FetchError> {
        match &self.mode {
            RelayMode::Passthrough { base } => {
                let mut url = base.clone();
                let path = format!("{}{}", base.path().trim_end_matches('/'), target.path());
                url.set_path(&path);
                url.set_query(target.query());
                Ok(url)
            }
            RelayMode::QueryParam { base, param } => {
                let mut url = base.clone();
                url.query_pairs_mut().append_pair(param, target.as_str());
                Ok(url)
            }
            RelayMode::PathPrefix { base } => {
                let combined = format!("{}/{}", base.trim_end_matches('/'), target.as_str());
                Url::parse(&combined).map_err(|e| FetchError::RelayUrl {
                    relay: self.name.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

/// Ordered, fixed chain of relays tried strictly in sequence.
///
/// The order is configuration, never reordered by past success, so behavior
/// stays deterministic and error attribution unambiguous.
#[derive(Debug, Clone)]
pub struct RelayChain {
    relays: Vec<RelayDescriptor>,
}

impl RelayChain {
    #[must_use]
    pub fn new(relays: Vec<RelayDescriptor>) -> Self {
        Self { relays }
    }

    /// Builds the production chain: the first-party proxy when configured,
    /// then the public relay services in fixed order.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::RelayUrl`] if a configured base URL does not
    /// parse.
    pub fn default_chain(config: &AppConfig) -> Result<Self, FetchError> {
        let browser = browser_headers(&config.user_agent);
        let mut relays = Vec::new();

        if let Some(base) = &config.first_party_base_url {
            let base = parse_base("first-party", base)?;
            relays.push(RelayDescriptor::new(
                "first-party",
                RelayMode::Passthrough { base },
                vec![("Content-Type".to_owned(), "application/json".to_owned())],
            ));
        }

        let allorigins = parse_base("allorigins", "https://api.allorigins.win/raw")?;
        relays.push(RelayDescriptor::new(
            "allorigins",
            RelayMode::QueryParam {
                base: allorigins,
                param: "url".to_owned(),
            },
            browser.clone(),
        ));
        relays.push(RelayDescriptor::new(
            "thingproxy",
            RelayMode::PathPrefix {
                base: "https://thingproxy.freeboard.io/fetch".to_owned(),
            },
            browser.clone(),
        ));
        relays.push(RelayDescriptor::new(
            "cors-anywhere",
            RelayMode::PathPrefix {
                base: "https://cors-anywhere.herokuapp.com".to_owned(),
            },
            browser,
        ));

        Ok(Self { relays })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.relays.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relays.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RelayDescriptor> {
        self.relays.iter()
    }
}

impl<'a> IntoIterator for &'a RelayChain {
    type Item = &'a RelayDescriptor;
    type IntoIter = std::slice::Iter<'a, RelayDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.relays.iter()
    }
}

/// Browser-like header block. Public relays forward these upstream, which
/// rejects obvious non-browser traffic.
fn browser_headers(user_agent: &str) -> Vec<(String, String)> {
    vec![
        ("User-Agent".to_owned(), user_agent.to_owned()),
        ("Accept".to_owned(), "application/json".to_owned()),
        ("Accept-Language".to_owned(), "en-US,en;q=0.9".to_owned()),
        ("Referer".to_owned(), "https://www.swiggy.com/".to_owned()),
        ("Cache-Control".to_owned(), "no-cache".to_owned()),
    ]
}

fn parse_base(relay: &str, base: &str) -> Result<Url, FetchError> {
    Url::parse(base).map_err(|e| FetchError::RelayUrl {
        relay: relay.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "relay_test.rs"]
mod tests;
