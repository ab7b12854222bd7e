use tracing::error;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

use egld_predictor::app;
use egld_predictor::config::PredictorConfig;

/// Formats log timestamps in the local timezone instead of UTC.
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Local::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f"))
    }
}

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the screens.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_timer(LocalTimer)
        .with_writer(std::io::stderr)
        .init();

    // Fail fast on a broken config file.
    let cfg = match PredictorConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("❌ Critical Error: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = app::run(&cfg).await {
        error!("❌ Failed to start: {}", e);
        std::process::exit(1);
    }
}
