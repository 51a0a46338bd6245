use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::core::location::{PositionOptions, FALLBACK_COORDINATE};
use crate::core::risk::{RiskClassifier, HIGH_RISK_CATEGORY_CODES};
use crate::models::Coordinate;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub location: LocationSettings,
    #[serde(default)]
    pub risk: RiskSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatasetSettings {
    /// File path or http(s) URL of the GeoJSON dataset
    #[serde(default = "default_dataset_source")]
    pub source: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            source: default_dataset_source(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_dataset_source() -> String { "data/factories.geojson".to_string() }
fn default_request_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSourceKind {
    #[default]
    None,
    Static,
    Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocationSettings {
    #[serde(default)]
    pub source: LocationSourceKind,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy_m: Option<f64>,
    pub url: Option<String>,
    #[serde(default = "default_high_accuracy")]
    pub high_accuracy: bool,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_maximum_age_ms")]
    pub maximum_age_ms: u64,
    #[serde(default = "default_fallback_latitude")]
    pub fallback_latitude: f64,
    #[serde(default = "default_fallback_longitude")]
    pub fallback_longitude: f64,
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            source: LocationSourceKind::None,
            latitude: None,
            longitude: None,
            accuracy_m: None,
            url: None,
            high_accuracy: default_high_accuracy(),
            timeout_ms: default_timeout_ms(),
            maximum_age_ms: default_maximum_age_ms(),
            fallback_latitude: default_fallback_latitude(),
            fallback_longitude: default_fallback_longitude(),
        }
    }
}

impl LocationSettings {
    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            high_accuracy: self.high_accuracy,
            timeout: Duration::from_millis(self.timeout_ms),
            maximum_age: Duration::from_millis(self.maximum_age_ms),
        }
    }

    pub fn fallback(&self) -> Coordinate {
        Coordinate::new(self.fallback_latitude, self.fallback_longitude)
    }
}

fn default_high_accuracy() -> bool { true }
fn default_timeout_ms() -> u64 { 10_000 }
fn default_maximum_age_ms() -> u64 { 300_000 }
fn default_fallback_latitude() -> f64 { FALLBACK_COORDINATE.latitude }
fn default_fallback_longitude() -> f64 { FALLBACK_COORDINATE.longitude }

#[derive(Debug, Clone, Deserialize)]
pub struct RiskSettings {
    #[serde(default = "default_risk_codes")]
    pub category_codes: Vec<String>,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            category_codes: default_risk_codes(),
        }
    }
}

impl RiskSettings {
    pub fn classifier(&self) -> RiskClassifier {
        RiskClassifier::new(self.category_codes.iter().cloned())
    }
}

fn default_risk_codes() -> Vec<String> {
    HIGH_RISK_CATEGORY_CODES.iter().map(|c| c.to_string()).collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_filter_cache_size")]
    pub filter_cache_size: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            filter_cache_size: default_filter_cache_size(),
        }
    }
}

fn default_filter_cache_size() -> u64 { 256 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with NEARBY__)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., NEARBY__SERVER__PORT -> server.port
            .add_source(environment())
            .build()?;

        settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("NEARBY")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Honour the conventional unprefixed `DATASET_SOURCE` and `LOG_LEVEL` variables
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(source) = env::var("DATASET_SOURCE") {
        builder = builder.set_override("dataset.source", source)?;
    }
    if let Ok(level) = env::var("LOG_LEVEL") {
        builder = builder.set_override("logging.level", level)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_location_settings() {
        let location = LocationSettings::default();

        assert_eq!(location.source, LocationSourceKind::None);
        assert_eq!(location.fallback(), Coordinate::new(14.0504, 101.3678));

        let options = location.position_options();
        assert!(options.high_accuracy);
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert_eq!(options.maximum_age, Duration::from_secs(300));
    }

    #[test]
    fn test_default_risk_codes() {
        let classifier = RiskSettings::default().classifier();

        assert!(classifier.is_high_risk("10100"));
        assert!(!classifier.is_high_risk("99999"));
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("nearby-settings-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            r#"
[server]
port = 9000

[location]
source = "static"
latitude = 13.98
longitude = 101.70

[risk]
category_codes = ["12345"]
"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.location.source, LocationSourceKind::Static);
        assert_eq!(settings.location.latitude, Some(13.98));
        assert_eq!(settings.location.timeout_ms, 10_000);
        assert_eq!(settings.dataset.source, "data/factories.geojson");
        assert!(settings.risk.classifier().is_high_risk("12345"));
    }
}
