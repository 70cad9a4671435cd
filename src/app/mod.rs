//! View state: the single mutable source of truth for a render pass
//!
//! `ViewState` owns the current event collection, the render settings,
//! the selection, and the fetch sequence bookkeeping. The coordinator it
//! embeds owns the lifecycle of everything drawn. There are no ambient
//! singletons; whoever holds the `ViewState` holds the whole picture.

mod filter;
mod render;

pub use filter::{filter_and_sort, filter_events, sort_events};
pub use render::{ChartKind, DrawCommand, LayerKind, RenderCoordinator};

use tracing::{debug, info};

use crate::core::{Event, RegionFilter, RenderSettings, SortKey};

/// Current pipeline state for one browser-session-equivalent lifetime.
#[derive(Debug, Default)]
pub struct ViewState {
    /// Post-fetch, pre-filter event collection, replaced wholesale
    events: Vec<Event>,
    settings: RenderSettings,
    /// Id of the focused event, if any
    selected: Option<String>,
    /// Sequence number handed to the next fetch at issue time
    next_seq: u64,
    /// Sequence number of the last applied fetch
    last_applied_seq: u64,
    coordinator: RenderCoordinator,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn coordinator(&self) -> &RenderCoordinator {
        &self.coordinator
    }

    // ------------------------------------------------------------------
    // Fetch sequencing
    // ------------------------------------------------------------------

    /// Tag a fetch at issue time.
    ///
    /// Sequence numbers increase monotonically, so of two overlapping
    /// fetches the later-issued one wins regardless of which response
    /// arrives first.
    pub fn begin_fetch(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Apply a fetch result, replacing the event collection wholesale.
    ///
    /// Returns false (and changes nothing) when a later-issued fetch has
    /// already been applied.
    pub fn apply_fetch(&mut self, seq: u64, events: Vec<Event>) -> bool {
        if seq <= self.last_applied_seq {
            debug!(seq, last_applied = self.last_applied_seq, "Discarding stale fetch result");
            return false;
        }
        info!(seq, count = events.len(), "Applying fetch result");
        self.events = events;
        self.last_applied_seq = seq;
        true
    }

    // ------------------------------------------------------------------
    // User commands
    // ------------------------------------------------------------------

    /// Apply a user command. Returns true when the command changed the
    /// feed query parameters and a new fetch should be issued.
    pub fn apply_command(&mut self, command: UserCommand) -> bool {
        match command {
            UserCommand::SetSort(key) => {
                debug!(sort = key.name(), "Sort changed");
                self.settings.sort_key = key;
                false
            }
            UserCommand::SetRegionFilter(region) => {
                self.settings.region_filter = region;
                false
            }
            UserCommand::SetHeatmap(enabled) => {
                self.settings.heatmap_enabled = enabled;
                false
            }
            UserCommand::ApplySettings { min_magnitude, window_days } => {
                info!(min_magnitude, window_days, "Feed settings changed");
                self.settings.min_magnitude = min_magnitude;
                self.settings.window_days = window_days;
                true
            }
            UserCommand::SelectEvent(id) => {
                self.selected = id;
                false
            }
        }
    }

    /// Run one render pass over the current state.
    pub fn render_pass(&mut self, now_ms: i64) -> Vec<DrawCommand> {
        self.coordinator
            .render(&self.events, &self.settings, self.selected.as_deref(), now_ms)
    }
}

/// A discrete user interaction, as it arrives from the control surface.
#[derive(Clone, Debug, PartialEq)]
pub enum UserCommand {
    SetSort(SortKey),
    SetRegionFilter(RegionFilter),
    SetHeatmap(bool),
    ApplySettings { min_magnitude: f64, window_days: u32 },
    SelectEvent(Option<String>),
}

impl UserCommand {
    /// Parse one command line from the CLI control surface.
    ///
    /// Grammar: `sort recent|magnitude|region`, `region <bucket>|all`,
    /// `heatmap on|off`, `settings <min_magnitude> <window_days>`,
    /// `select <id>`, `deselect`.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().ok_or("empty command")?;
        let command = match verb {
            "sort" => {
                let key = parts.next().ok_or("sort: missing key")?;
                Self::SetSort(SortKey::from_name(key).ok_or_else(|| format!("sort: unknown key '{key}'"))?)
            }
            "region" => {
                let name = parts.next().ok_or("region: missing bucket")?;
                if name == "all" {
                    Self::SetRegionFilter(RegionFilter::All)
                } else {
                    let bucket = crate::core::RegionBucket::from_name(name)
                        .ok_or_else(|| format!("region: unknown bucket '{name}'"))?;
                    Self::SetRegionFilter(RegionFilter::Region(bucket))
                }
            }
            "heatmap" => match parts.next() {
                Some("on") => Self::SetHeatmap(true),
                Some("off") => Self::SetHeatmap(false),
                other => return Err(format!("heatmap: expected on|off, got {other:?}")),
            },
            "settings" => {
                let min_magnitude: f64 = parts
                    .next()
                    .ok_or("settings: missing min magnitude")?
                    .parse()
                    .map_err(|_| "settings: min magnitude is not a number")?;
                let window_days: u32 = parts
                    .next()
                    .ok_or("settings: missing window days")?
                    .parse()
                    .map_err(|_| "settings: window days is not an integer")?;
                if min_magnitude < 0.0 {
                    return Err("settings: min magnitude must be non-negative".to_string());
                }
                Self::ApplySettings { min_magnitude, window_days }
            }
            "select" => {
                let id = parts.next().ok_or("select: missing event id")?;
                Self::SelectEvent(Some(id.to_string()))
            }
            "deselect" => Self::SelectEvent(None),
            other => return Err(format!("unknown command '{other}'")),
        };
        if parts.next().is_some() {
            return Err(format!("{verb}: trailing arguments"));
        }
        Ok(command)
    }
}
