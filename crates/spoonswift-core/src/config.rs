use crate::app_config::{AppConfig, ConfigError};

/// Default coordinates used when no location is supplied (Ujjain, the
/// original deployment's fallback city).
pub const DEFAULT_LAT: f64 = 23.1793;
pub const DEFAULT_LNG: f64 = 75.7849;

const DEFAULT_UPSTREAM_BASE_URL: &str = "https://www.swiggy.com";

/// Browser User-Agent forwarded through the relays; the upstream rejects
/// obvious non-browser agents.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but unparseable.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_config`], this does NOT load `.env` files — useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but unparseable.
pub fn load_config_from_env() -> Result<AppConfig, ConfigError> {
    build_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_f64 = |var: &str, default: f64| -> Result<f64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Ok(default),
        }
    };

    let upstream_base_url = or_default("SPOONSWIFT_UPSTREAM_BASE_URL", DEFAULT_UPSTREAM_BASE_URL);
    let first_party_base_url = lookup("SPOONSWIFT_FIRST_PARTY_BASE_URL").ok();
    let default_lat = parse_f64("SPOONSWIFT_DEFAULT_LAT", DEFAULT_LAT)?;
    let default_lng = parse_f64("SPOONSWIFT_DEFAULT_LNG", DEFAULT_LNG)?;
    let relay_timeout_secs = parse_u64("SPOONSWIFT_RELAY_TIMEOUT_SECS", "15")?;
    let user_agent = or_default("SPOONSWIFT_USER_AGENT", DEFAULT_USER_AGENT);
    let log_level = or_default("SPOONSWIFT_LOG_LEVEL", "info");

    Ok(AppConfig {
        upstream_base_url,
        first_party_base_url,
        default_lat,
        default_lng,
        relay_timeout_secs,
        user_agent,
        log_level,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn empty_env_yields_production_defaults() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.upstream_base_url, "https://www.swiggy.com");
        assert!(cfg.first_party_base_url.is_none());
        assert!((cfg.default_lat - 23.1793).abs() < f64::EPSILON);
        assert!((cfg.default_lng - 75.7849).abs() < f64::EPSILON);
        assert_eq!(cfg.relay_timeout_secs, 15);
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn first_party_base_url_is_picked_up() {
        let mut map = HashMap::new();
        map.insert(
            "SPOONSWIFT_FIRST_PARTY_BASE_URL",
            "https://spoonswift-api.netlify.app/.netlify/functions",
        );
        let cfg = build_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.first_party_base_url.as_deref(),
            Some("https://spoonswift-api.netlify.app/.netlify/functions")
        );
    }

    #[test]
    fn relay_timeout_override() {
        let mut map = HashMap::new();
        map.insert("SPOONSWIFT_RELAY_TIMEOUT_SECS", "5");
        let cfg = build_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.relay_timeout_secs, 5);
    }

    #[test]
    fn relay_timeout_invalid() {
        let mut map = HashMap::new();
        map.insert("SPOONSWIFT_RELAY_TIMEOUT_SECS", "soon");
        let result = build_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SPOONSWIFT_RELAY_TIMEOUT_SECS"),
            "expected InvalidEnvVar(SPOONSWIFT_RELAY_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn default_coordinates_override() {
        let mut map = HashMap::new();
        map.insert("SPOONSWIFT_DEFAULT_LAT", "19.0759837");
        map.insert("SPOONSWIFT_DEFAULT_LNG", "72.8776559");
        let cfg = build_config(lookup_from_map(&map)).unwrap();
        assert!((cfg.default_lat - 19.075_983_7).abs() < f64::EPSILON);
        assert!((cfg.default_lng - 72.877_655_9).abs() < f64::EPSILON);
    }

    #[test]
    fn default_lat_invalid() {
        let mut map = HashMap::new();
        map.insert("SPOONSWIFT_DEFAULT_LAT", "somewhere");
        let result = build_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SPOONSWIFT_DEFAULT_LAT"),
            "expected InvalidEnvVar(SPOONSWIFT_DEFAULT_LAT), got: {result:?}"
        );
    }
}
