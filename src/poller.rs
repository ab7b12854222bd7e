//! Periodic price polling.
//!
//! The poller fetches once on startup and then once per interval. Results are
//! delivered through the returned [`PollerHandle`]; shutting the handle down
//! consumes it, so nothing fetched by an in-flight request can be observed
//! afterwards.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::error::FeedError;
use crate::feed::PriceSource;
use crate::models::PriceSample;

// A full buffer blocks the poller until the consumer catches up.
const EVENT_BUFFER: usize = 4;

/// Outcome of one poll.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Price(PriceSample),
    Unavailable(FeedError),
}

pub struct PollerHandle {
    events: mpsc::Receiver<FeedEvent>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Waits for the next poll outcome. `None` if the poller task has exited.
    pub async fn next_event(&mut self) -> Option<FeedEvent> {
        self.events.recv().await
    }

    /// Stops the timer, drops any in-flight request and waits for the task to exit.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        self.events.close();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    warn!("⚠️ Poller task ended abnormally: {}", e);
                }
            }
        }
        info!("🛑 Price poller stopped.");
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Starts polling `source` every `interval` on the current tokio runtime.
pub fn spawn_poller<S>(source: S, interval: Duration) -> PollerHandle
where
    S: PriceSource + 'static,
{
    let (tx, events) = mpsc::channel(EVENT_BUFFER);
    let (shutdown, shutdown_rx) = watch::channel(false);

    info!("⏱️ Price poller started (interval: {}s)", interval.as_secs());
    let task = tokio::spawn(poll_loop(source, interval, shutdown_rx, tx));

    PollerHandle {
        events,
        shutdown,
        task: Some(task),
    }
}

async fn poll_loop<S: PriceSource>(
    source: S,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
    tx: mpsc::Sender<FeedEvent>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // First tick completes immediately, giving the startup fetch.
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {}
        }

        let outcome = tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            outcome = source.fetch_price() => outcome,
        };

        let event = match outcome {
            Ok(sample) => {
                debug!("✅ Poll succeeded: {:.4}", sample.value);
                FeedEvent::Price(sample)
            }
            Err(e) => {
                warn!("❌ Poll failed: {}", e);
                FeedEvent::Unavailable(e)
            }
        };

        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            sent = tx.send(event) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }
}
