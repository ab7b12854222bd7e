//! Price and prediction data model.
//!
//! `SimplePriceResponse` maps the CoinGecko `/simple/price` payload, which is
//! keyed first by asset id and then by quote currency:
//!
//! ```json
//! { "elrond-erd-2": { "usd": 31.42 } }
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Local};
use serde::Deserialize;

/// Raw `/simple/price` payload: asset id -> (currency -> price).
pub type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

/// The most recently fetched real price and its fetch time.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSample {
    pub value: f64,
    pub observed_at: DateTime<Local>,
}

impl PriceSample {
    pub fn new(value: f64, observed_at: DateTime<Local>) -> Self {
        Self { value, observed_at }
    }

    /// Sample stamped with the current wall-clock time.
    pub fn now(value: f64) -> Self {
        Self::new(value, Local::now())
    }
}

/// A named future horizon with the percentage range used to fabricate a move.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeframeBucket {
    pub key: String,
    pub label: String,
    pub min_percent: f64,
    pub max_percent: f64,
}

impl TimeframeBucket {
    pub fn new(key: &str, label: &str, min_percent: f64, max_percent: f64) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            min_percent,
            max_percent,
        }
    }

    /// Tomorrow, next week, next month and next year.
    pub fn reference_set() -> Vec<TimeframeBucket> {
        vec![
            TimeframeBucket::new("tomorrow", "Tomorrow", 8.0, 10.0),
            TimeframeBucket::new("week", "Next Week", 28.0, 30.0),
            TimeframeBucket::new("month", "Next Month", 220.0, 222.0),
            TimeframeBucket::new("year", "Next Year", 3000.0, 3006.0),
        ]
    }

    /// Lowest and highest price this bucket can produce from `price`.
    pub fn price_bounds(&self, price: f64) -> (f64, f64) {
        (
            price * (1.0 + self.min_percent / 100.0),
            price * (1.0 + self.max_percent / 100.0),
        )
    }
}

/// Fabricated future price and the percentage move used to derive it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub percent: f64,
    pub predicted_price: f64,
}

/// Pulls `payload[asset_id][vs_currency]` out of a `/simple/price` body.
/// Any other shape, or a price that is not a positive finite number, is `None`.
pub fn extract_price(payload: &SimplePriceResponse, asset_id: &str, vs_currency: &str) -> Option<f64> {
    payload
        .get(asset_id)
        .and_then(|quotes| quotes.get(vs_currency))
        .copied()
        .filter(|p| p.is_finite() && *p > 0.0)
}
