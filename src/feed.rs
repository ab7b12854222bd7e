use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::PredictorConfig;
use crate::error::{ConfigError, FeedError};
use crate::models::{PriceSample, SimplePriceResponse, extract_price};

/// Anything the poller can ask for the current price.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_price(&self) -> Result<PriceSample, FeedError>;
}

/// CoinGecko `/simple/price` client for a single asset in a single currency.
pub struct CoinGeckoFeed {
    client: Client,
    base_url: String,
    asset_id: String,
    vs_currency: String,
}

impl CoinGeckoFeed {
    /// Builds the HTTP client from the configured base URL and timeout.
    /// Failure here is a startup error, not a poll outcome.
    pub fn from_config(cfg: &PredictorConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = cfg.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self::with_client(client, &cfg.api_base_url, &cfg.asset_id, &cfg.vs_currency))
    }

    /// Uses a pre-built client, e.g. one pointed at a mock server.
    pub fn with_client(client: Client, base_url: &str, asset_id: &str, vs_currency: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            asset_id: asset_id.to_string(),
            vs_currency: vs_currency.to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/simple/price", self.base_url)
    }
}

#[async_trait]
impl PriceSource for CoinGeckoFeed {
    async fn fetch_price(&self) -> Result<PriceSample, FeedError> {
        let response = self
            .client
            .get(self.endpoint())
            .query(&[("ids", self.asset_id.as_str()), ("vs_currencies", self.vs_currency.as_str())])
            .send()
            .await
            .map_err(|e| FeedError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::status(status.as_u16()));
        }

        let body = response.text().await.map_err(|e| FeedError::network(e.to_string()))?;
        let payload: SimplePriceResponse =
            serde_json::from_str(&body).map_err(|e| FeedError::malformed(e.to_string()))?;

        let value = extract_price(&payload, &self.asset_id, &self.vs_currency).ok_or_else(|| {
            FeedError::malformed(format!("no positive {}.{} price in response", self.asset_id, self.vs_currency))
        })?;

        debug!("💱 {} = {:.4} {}", self.asset_id, value, self.vs_currency);
        Ok(PriceSample::now(value))
    }
}
