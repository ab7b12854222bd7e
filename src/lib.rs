// src/lib.rs

pub mod app;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod poller;
pub mod prediction;
pub mod render;
pub mod session;

pub use config::PredictorConfig;
pub use error::{ConfigError, FeedError, FeedFailure};
pub use feed::{CoinGeckoFeed, PriceSource};
pub use models::{Prediction, PriceSample, TimeframeBucket};
pub use poller::{FeedEvent, PollerHandle, spawn_poller};
pub use session::{Action, Session, View};
