//! Two-screen session state.
//!
//! `Session` is an immutable value. Every change goes through
//! [`Session::apply`], which consumes the old state and returns the new one.

use rand::Rng;
use tracing::{debug, info};

use crate::models::{PriceSample, Prediction, TimeframeBucket};
use crate::poller::FeedEvent;
use crate::prediction;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Live price and bucket selector.
    Main,
    /// Generated prediction for the selected bucket.
    Prediction {
        bucket: TimeframeBucket,
        prediction: Option<Prediction>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    PriceFetched(PriceSample),
    FeedFailed,
    SelectBucket(String),
    Reselect,
}

impl From<FeedEvent> for Action {
    fn from(event: FeedEvent) -> Self {
        match event {
            FeedEvent::Price(sample) => Action::PriceFetched(sample),
            FeedEvent::Unavailable(_) => Action::FeedFailed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    buckets: Vec<TimeframeBucket>,
    price: Option<PriceSample>,
    feed_unavailable: bool,
    view: View,
}

impl Session {
    pub fn new(buckets: Vec<TimeframeBucket>) -> Self {
        Self {
            buckets,
            price: None,
            feed_unavailable: false,
            view: View::Main,
        }
    }

    pub fn apply<R: Rng>(self, action: Action, rng: &mut R) -> Session {
        match action {
            Action::PriceFetched(sample) => {
                // Only a changed price redraws the prediction on screen.
                let price_changed = self.price.as_ref().map(|p| p.value) != Some(sample.value);
                let view = match self.view {
                    View::Prediction { bucket, .. } if price_changed => {
                        let prediction = prediction::generate(sample.value, &bucket, rng);
                        View::Prediction { bucket, prediction }
                    }
                    view => view,
                };
                Session {
                    price: Some(sample),
                    feed_unavailable: false,
                    view,
                    ..self
                }
            }

            // Last good price stays on screen next to the error.
            Action::FeedFailed => Session {
                feed_unavailable: true,
                ..self
            },

            Action::SelectBucket(key) => {
                if !self.is_main() {
                    debug!("Ignoring selection of '{}' outside the main screen.", key);
                    return self;
                }
                let Some(current) = self.price.as_ref().map(|p| p.value) else {
                    debug!("Ignoring selection of '{}' before any price is known.", key);
                    return self;
                };
                let Some(bucket) = self.buckets.iter().find(|b| b.key == key).cloned() else {
                    debug!("Unknown bucket '{}'.", key);
                    return self;
                };

                let prediction = prediction::generate(current, &bucket, rng);
                if let Some(p) = &prediction {
                    info!("🔮 {}: {:.2} -> {:.2} (+{:.2}%)", bucket.key, current, p.predicted_price, p.percent);
                }
                Session {
                    view: View::Prediction { bucket, prediction },
                    ..self
                }
            }

            Action::Reselect => Session {
                view: View::Main,
                ..self
            },
        }
    }

    pub fn buckets(&self) -> &[TimeframeBucket] {
        &self.buckets
    }

    pub fn price(&self) -> Option<&PriceSample> {
        self.price.as_ref()
    }

    /// True from a failed poll until the next successful one.
    pub fn feed_unavailable(&self) -> bool {
        self.feed_unavailable
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn is_main(&self) -> bool {
        matches!(self.view, View::Main)
    }

    pub fn selected_bucket(&self) -> Option<&TimeframeBucket> {
        match &self.view {
            View::Prediction { bucket, .. } => Some(bucket),
            View::Main => None,
        }
    }

    pub fn prediction(&self) -> Option<&Prediction> {
        match &self.view {
            View::Prediction { prediction, .. } => prediction.as_ref(),
            View::Main => None,
        }
    }
}
