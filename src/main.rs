//! quake-cli: run the earthquake pipeline against the live feed
//!
//! Fetches on startup and every five minutes, logs a summary of each
//! render pass, and reads control commands from stdin (`sort recent`,
//! `region europe`, `heatmap on`, `settings 3.5 7`, `select <id>`,
//! `deselect`, `quit`).

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use quake_vis::app::DrawCommand;
use quake_vis::feed::DEFAULT_FEED_URL;
use quake_vis::{FeedClient, RefreshScheduler, UserCommand, ViewState, REFRESH_INTERVAL};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,quake_vis=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let url = std::env::var("QUAKE_FEED_URL").unwrap_or_else(|_| DEFAULT_FEED_URL.to_string());
    info!(url = %url, "Starting quake pipeline");

    let state = Arc::new(Mutex::new(ViewState::new()));
    let scheduler = RefreshScheduler::spawn(
        FeedClient::with_base_url(url),
        state.clone(),
        REFRESH_INTERVAL,
        Box::new(|commands| log_pass(&commands)),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) if line.trim() == "quit" => break,
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => handle_command(line.trim(), &state, &scheduler),
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("Shutting down");
    scheduler.shutdown().await;
    Ok(())
}

/// Apply one control command and re-render; nudge the scheduler when the
/// feed query parameters changed.
fn handle_command(line: &str, state: &Arc<Mutex<ViewState>>, scheduler: &RefreshScheduler) {
    let command = match UserCommand::parse(line) {
        Ok(command) => command,
        Err(reason) => {
            warn!(line, %reason, "Ignoring command");
            return;
        }
    };

    let commands = {
        let mut state = state.lock();
        if state.apply_command(command) {
            scheduler.refresh_now();
        }
        state.render_pass(chrono::Utc::now().timestamp_millis())
    };
    log_pass(&commands);
}

/// Summarize one render pass for the log.
fn log_pass(commands: &[DrawCommand]) {
    let mut rings = 0usize;
    let mut heat_points = 0usize;
    let mut charts = 0usize;
    for command in commands {
        match command {
            DrawCommand::Ring { .. } => rings += 1,
            DrawCommand::HeatPoint { .. } => heat_points += 1,
            DrawCommand::BarChart { .. } | DrawCommand::LineChart { .. } => charts += 1,
            DrawCommand::ClearAll => {}
        }
    }
    info!(rings, heat_points, charts, total = commands.len(), "Render pass");
}
