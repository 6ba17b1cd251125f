pub mod app_config;
pub mod config;
pub mod query;

pub use app_config::{AppConfig, ConfigError};
pub use config::{load_config, load_config_from_env};
pub use query::{GeoPoint, SubmitAction, UpstreamQuery};
