//! Fabricated price "prediction".
//!
//! There is no model behind this: a percentage is drawn uniformly from the
//! bucket's closed range and applied to the current price.

use rand::Rng;

use crate::models::{Prediction, TimeframeBucket};

/// Draws a fresh prediction for `current_price` within `bucket`'s range.
///
/// Returns `None` when the price is not a positive finite number. Every call
/// makes a new draw, so two calls with identical inputs usually differ.
pub fn generate<R: Rng>(current_price: f64, bucket: &TimeframeBucket, rng: &mut R) -> Option<Prediction> {
    if !current_price.is_finite() || current_price <= 0.0 {
        return None;
    }

    let percent = draw_percent(bucket, rng);
    let predicted_price = current_price * (1.0 + percent / 100.0);

    Some(Prediction { percent, predicted_price })
}

fn draw_percent<R: Rng>(bucket: &TimeframeBucket, rng: &mut R) -> f64 {
    if bucket.min_percent >= bucket.max_percent {
        return bucket.min_percent;
    }
    rng.random_range(bucket.min_percent..=bucket.max_percent)
}
