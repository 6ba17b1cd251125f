use thiserror::Error;

/// Errors raised while loading configuration from the environment.
///
/// Every variable has a production default, so the only failure mode is a
/// variable that is present but unparseable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Application configuration, sourced from environment variables.
///
/// Every field has a production default, so an empty environment yields a
/// working configuration pointed at the public catalog service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Origin of the upstream catalog service.
    pub upstream_base_url: String,
    /// Base URL of a first-party proxy exposing the same semantic queries,
    /// if one is deployed. When set, it is tried before the public relays.
    pub first_party_base_url: Option<String>,
    /// Fallback latitude when the caller supplies no location.
    pub default_lat: f64,
    /// Fallback longitude when the caller supplies no location.
    pub default_lng: f64,
    /// Per-relay attempt timeout in seconds.
    pub relay_timeout_secs: u64,
    /// User-Agent sent on every relay request. Public relays forward it
    /// upstream, which rejects non-browser agents.
    pub user_agent: String,
    pub log_level: String,
}
