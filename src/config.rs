use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::error::ConfigError;
use crate::models::TimeframeBucket;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PredictorConfig {
    /// Base of the CoinGecko v3 API; `/simple/price` is appended.
    pub api_base_url: String,
    pub asset_id: String,
    pub asset_symbol: String,
    pub vs_currency: String,

    pub poll_interval_secs: u64,
    // None means requests may hang until the next tick.
    pub request_timeout_secs: Option<u64>,

    pub buckets: Vec<TimeframeBucket>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.coingecko.com/api/v3".to_string(),
            asset_id: "elrond-erd-2".to_string(),
            asset_symbol: "EGLD".to_string(),
            vs_currency: "usd".to_string(),
            poll_interval_secs: 30,
            request_timeout_secs: Some(10),
            buckets: TimeframeBucket::reference_set(),
        }
    }
}

impl PredictorConfig {
    /// Loads `config.yaml` from the current working directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads configuration from `path`. A missing file falls back to the
    /// reference configuration; a file that exists but does not parse or
    /// validate is an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml_content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("⚙️ {} not found, using built-in defaults.", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        Self::from_yaml(&yaml_content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })
    }

    pub fn from_yaml(yaml_content: &str) -> Result<Self, ConfigError> {
        let config: PredictorConfig =
            serde_yaml::from_str(yaml_content).map_err(|source| ConfigError::Parse {
                path: "<inline>".to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if reqwest::Url::parse(&self.api_base_url).is_err() {
            return Err(ConfigError::Invalid(format!("api_base_url '{}' is not a URL", self.api_base_url)));
        }
        if self.asset_id.trim().is_empty() {
            return Err(ConfigError::Invalid("asset_id is empty".into()));
        }
        if self.vs_currency.trim().is_empty() {
            return Err(ConfigError::Invalid("vs_currency is empty".into()));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid("poll_interval_secs must be > 0".into()));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid("request_timeout_secs must be > 0".into()));
        }
        if self.buckets.is_empty() {
            return Err(ConfigError::Invalid("at least one bucket is required".into()));
        }

        let mut seen = HashSet::new();
        for bucket in &self.buckets {
            if !seen.insert(bucket.key.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate bucket key '{}'", bucket.key)));
            }
            if !bucket.min_percent.is_finite() || !bucket.max_percent.is_finite() {
                return Err(ConfigError::Invalid(format!("bucket '{}' has a non-finite range", bucket.key)));
            }
            if bucket.min_percent > bucket.max_percent {
                return Err(ConfigError::Invalid(format!(
                    "bucket '{}': min_percent {} exceeds max_percent {}",
                    bucket.key, bucket.min_percent, bucket.max_percent
                )));
            }
            // A move of -100% or less would predict a non-positive price.
            if bucket.min_percent <= -100.0 {
                return Err(ConfigError::Invalid(format!(
                    "bucket '{}': min_percent must be above -100",
                    bucket.key
                )));
            }
        }

        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
