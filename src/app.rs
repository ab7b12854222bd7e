//! Terminal front end: reads commands from stdin, feeds poll results and
//! user input through the session reducer, and redraws after every change.

use std::future::Future;
use std::io::{self, BufRead, Write};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::PredictorConfig;
use crate::error::ConfigError;
use crate::feed::CoinGeckoFeed;
use crate::models::TimeframeBucket;
use crate::poller::{PollerHandle, spawn_poller};
use crate::render;
use crate::session::{Action, Session};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Select(String),
    Reselect,
    Quit,
}

/// Accepts a bucket key, its 1-based menu index, `r`/`reselect`, or `q`/`quit`.
pub fn parse_command(line: &str, buckets: &[TimeframeBucket]) -> Option<Command> {
    let input = line.trim().to_lowercase();
    match input.as_str() {
        "" => None,
        "q" | "quit" | "exit" => Some(Command::Quit),
        "r" | "reselect" => Some(Command::Reselect),
        other => {
            if let Ok(index) = other.parse::<usize>() {
                return index
                    .checked_sub(1)
                    .and_then(|i| buckets.get(i))
                    .map(|b| Command::Select(b.key.clone()));
            }
            buckets
                .iter()
                .find(|b| b.key.to_lowercase() == other)
                .map(|b| Command::Select(b.key.clone()))
        }
    }
}

/// Reads stdin on a plain thread so a pending read never holds up runtime shutdown.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("⚠️ Failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

fn draw<W: Write>(out: &mut W, session: &Session, asset_symbol: &str) -> io::Result<()> {
    // Clear screen and home the cursor before each frame.
    write!(out, "\x1B[2J\x1B[H{}", render::render(session, asset_symbol))?;
    out.flush()
}

/// Feeds poll results and commands through the reducer, redrawing to `out`
/// after every change. Stops on quit, EOF, a failed write, or once `quit`
/// resolves. Quit takes priority over pending events.
pub async fn event_loop<W, Q, R>(
    poller: &mut PollerHandle,
    lines: &mut mpsc::Receiver<String>,
    quit: Q,
    out: &mut W,
    mut session: Session,
    asset_symbol: &str,
    rng: &mut R,
) -> Session
where
    W: Write,
    Q: Future<Output = ()>,
    R: Rng,
{
    // Created once so a quit signal raised mid-draw is still seen.
    tokio::pin!(quit);

    if let Err(e) = draw(out, &session, asset_symbol) {
        warn!("⚠️ Failed to write screen, stopping: {}", e);
        return session;
    }

    loop {
        let action = tokio::select! {
            biased;
            _ = &mut quit => break,
            event = poller.next_event() => match event {
                Some(event) => Action::from(event),
                None => break,
            },
            line = lines.recv() => match line {
                Some(line) => match parse_command(&line, session.buckets()) {
                    Some(Command::Select(key)) => Action::SelectBucket(key),
                    Some(Command::Reselect) => Action::Reselect,
                    Some(Command::Quit) => break,
                    None => {
                        if !line.trim().is_empty() {
                            warn!("Unrecognized input: {:?}", line.trim());
                        }
                        continue;
                    }
                },
                // EOF
                None => break,
            },
        };

        session = session.apply(action, rng);
        if let Err(e) = draw(out, &session, asset_symbol) {
            warn!("⚠️ Failed to write screen, stopping: {}", e);
            break;
        }
    }

    session
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("⚠️ Ctrl-C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Runs the session until the user quits, stdin closes, stdout closes, or Ctrl-C.
pub async fn run(cfg: &PredictorConfig) -> Result<(), ConfigError> {
    let feed = CoinGeckoFeed::from_config(cfg)?;
    info!(
        "🚀 Tracking {} in {} via {} every {}s",
        cfg.asset_id,
        cfg.vs_currency,
        feed.endpoint(),
        cfg.poll_interval_secs
    );

    let mut poller = spawn_poller(feed, cfg.poll_interval());
    let mut rng = StdRng::from_os_rng();
    let mut lines = spawn_stdin_reader();
    let mut stdout = std::io::stdout();

    event_loop(
        &mut poller,
        &mut lines,
        ctrl_c(),
        &mut stdout,
        Session::new(cfg.buckets.clone()),
        &cfg.asset_symbol,
        &mut rng,
    )
    .await;

    poller.shutdown().await;
    info!("👋 Session closed.");
    Ok(())
}
