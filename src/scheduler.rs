//! Periodic feed refresh with an explicit stop handle
//!
//! A background task fetches once at startup and then on a fixed
//! interval, replacing the view's events wholesale on success and
//! leaving prior state untouched on failure. The state lock is never
//! held across the fetch; overlap between a scheduled fetch and a
//! manual one is resolved by the view's sequence numbers.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::{info, warn};

use crate::app::{DrawCommand, ViewState};
use crate::feed::FeedClient;

/// Scheduled refresh period.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// Sink receiving the draw commands of each completed render pass.
pub type RenderSink = Box<dyn FnMut(Vec<DrawCommand>) + Send>;

/// Handle to the running refresh task.
pub struct RefreshScheduler {
    stop: watch::Sender<bool>,
    refresh_now: Arc<Notify>,
    task: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Spawn the refresh task: one fetch immediately, then one per
    /// `interval`, plus any `refresh_now` nudges in between.
    pub fn spawn(
        client: FeedClient,
        state: Arc<Mutex<ViewState>>,
        interval: Duration,
        mut sink: RenderSink,
    ) -> Self {
        let (stop, mut stop_rx) = watch::channel(false);
        let refresh_now = Arc::new(Notify::new());
        let nudge = refresh_now.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately: the startup fetch.
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        refresh_once(&client, &state, &mut sink).await;
                    }
                    _ = nudge.notified() => {
                        refresh_once(&client, &state, &mut sink).await;
                        ticker.reset();
                    }
                    _ = stop_rx.changed() => {
                        info!("Refresh scheduler stopping");
                        break;
                    }
                }
            }
        });

        Self { stop, refresh_now, task }
    }

    /// Request an out-of-band refresh (after a feed-settings change).
    pub fn refresh_now(&self) {
        self.refresh_now.notify_one();
    }

    /// Stop the timer and wait for the task to wind down. Does not
    /// interrupt a fetch already in flight.
    pub async fn shutdown(self) {
        let _ = self.stop.send(true);
        let _ = self.task.await;
    }
}

/// One refresh cycle: tag, fetch, apply, render.
///
/// The sequence number is taken under the lock at issue time and the
/// lock is released for the duration of the fetch, so a concurrent
/// manual fetch can overtake this one and win.
async fn refresh_once(
    client: &FeedClient,
    state: &Arc<Mutex<ViewState>>,
    sink: &mut RenderSink,
) {
    let (seq, min_magnitude, window_days) = {
        let mut state = state.lock();
        let settings = state.settings().clone();
        (state.begin_fetch(), settings.min_magnitude, settings.window_days)
    };

    match client.fetch_with_retry(min_magnitude, window_days).await {
        Ok(events) => {
            let commands = {
                let mut state = state.lock();
                if !state.apply_fetch(seq, events) {
                    return;
                }
                state.render_pass(chrono::Utc::now().timestamp_millis())
            };
            sink(commands);
        }
        Err(error) => {
            warn!(seq, %error, "Refresh failed, retaining previous view");
        }
    }
}
