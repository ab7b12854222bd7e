use thiserror::Error;

/// Message shown to the user whenever the price feed is unavailable.
pub fn feed_unavailable_message(asset_symbol: &str) -> String {
    format!("Could not fetch {} price.", asset_symbol)
}

/// Why a poll failed. Only used for logging; every cause surfaces to the
/// user as the same feed-unavailable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedFailure {
    #[error("network call failed: {0}")]
    Network(String),
    #[error("unexpected status: {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// The single error kind of the price feed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    #[error("price feed unavailable ({0})")]
    FeedUnavailable(FeedFailure),
}

impl FeedError {
    pub fn network(msg: impl Into<String>) -> Self {
        FeedError::FeedUnavailable(FeedFailure::Network(msg.into()))
    }

    pub fn status(code: u16) -> Self {
        FeedError::FeedUnavailable(FeedFailure::Status(code))
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        FeedError::FeedUnavailable(FeedFailure::Malformed(msg.into()))
    }

    pub fn failure(&self) -> &FeedFailure {
        match self {
            FeedError::FeedUnavailable(failure) => failure,
        }
    }

    pub fn user_message(&self, asset_symbol: &str) -> String {
        feed_unavailable_message(asset_symbol)
    }
}

/// Startup configuration errors. These are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}
