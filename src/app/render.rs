//! Render pass: reconcile the event set against the map and chart
//! surfaces
//!
//! The coordinator owns the lifecycle of everything drawn. Each pass is
//! clear-and-redraw: an explicit `ClearAll` first, then the full command
//! list for the new state. The live inventory is tracked here as tagged
//! layer kinds, never inferred from the drawing engine's object types.

use chrono::DateTime;
use tracing::{debug, warn};

use crate::core::charts::{hourly_histogram, hourly_labels, magnitude_histogram};
use crate::core::style::{
    base_color, color, radius, ring_opacity, POPUP_RING_INDEX, RING_FRACTIONS,
};
use crate::core::{Event, RenderSettings};

use super::filter::filter_and_sort;

/// Heat weight multiplier applied to magnitude in heatmap mode.
const HEAT_WEIGHT_FACTOR: f64 = 5.0;

/// One instruction for the external map/chart collaborators.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Destroy every previously rendered primitive and chart
    ClearAll,
    Ring {
        lat: f64,
        lon: f64,
        radius: f64,
        color: &'static str,
        fill_opacity: f64,
        /// Popup text, present on exactly one ring per event
        popup: Option<String>,
    },
    HeatPoint {
        lat: f64,
        lon: f64,
        weight: f64,
    },
    BarChart {
        title: String,
        labels: Vec<String>,
        values: Vec<f64>,
        colors: Vec<&'static str>,
    },
    LineChart {
        title: String,
        labels: Vec<String>,
        values: Vec<f64>,
    },
}

/// Kind tag for a live map primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Ring,
    HeatPoint,
}

/// Kind tag for a live chart instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
    Magnitude,
    Hourly,
    Comparison,
}

/// Owns the rendered visual state across passes.
#[derive(Debug, Default)]
pub struct RenderCoordinator {
    live_layers: Vec<LayerKind>,
    live_charts: Vec<ChartKind>,
}

impl RenderCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce one fully-reconciled pass over the current view state.
    ///
    /// Filter, sort, clear, then redraw map layers and charts. Runs to
    /// completion without suspension. An event with non-finite numbers
    /// is skipped and the rest of the pass still renders.
    pub fn render(
        &mut self,
        events: &[Event],
        settings: &RenderSettings,
        selection: Option<&str>,
        now_ms: i64,
    ) -> Vec<DrawCommand> {
        let working = filter_and_sort(events, settings.region_filter, settings.sort_key);

        // Atomic clear: previous inventory is gone before anything new
        // is recorded, so nothing stale can survive the pass.
        self.live_layers.clear();
        self.live_charts.clear();
        let mut commands = vec![DrawCommand::ClearAll];

        for event in &working {
            if !event.magnitude.is_finite()
                || !event.latitude.is_finite()
                || !event.longitude.is_finite()
            {
                warn!(id = %event.id, "Skipping event with non-finite fields");
                continue;
            }

            if settings.heatmap_enabled {
                commands.push(DrawCommand::HeatPoint {
                    lat: event.latitude,
                    lon: event.longitude,
                    weight: event.magnitude * HEAT_WEIGHT_FACTOR,
                });
                self.live_layers.push(LayerKind::HeatPoint);
            } else {
                self.draw_rings(event, &mut commands);
            }
        }

        self.draw_charts(&working, events, selection, now_ms, &mut commands);

        debug!(
            events = working.len(),
            layers = self.live_layers.len(),
            charts = self.live_charts.len(),
            heatmap = settings.heatmap_enabled,
            "Render pass complete"
        );
        commands
    }

    /// Four concentric rings per event at decreasing radius fractions.
    /// Only the innermost ring carries the popup.
    fn draw_rings(&mut self, event: &Event, commands: &mut Vec<DrawCommand>) {
        let base_radius = radius(event.magnitude);
        for (ring_index, fraction) in RING_FRACTIONS.iter().enumerate() {
            let popup = (ring_index == POPUP_RING_INDEX).then(|| popup_content(event));
            commands.push(DrawCommand::Ring {
                lat: event.latitude,
                lon: event.longitude,
                radius: base_radius * fraction,
                color: color(event.magnitude, ring_index),
                fill_opacity: ring_opacity(ring_index),
                popup,
            });
            self.live_layers.push(LayerKind::Ring);
        }
    }

    /// Magnitude and hourly charts over the filtered set, plus the
    /// focused comparison chart when a selection is active.
    fn draw_charts(
        &mut self,
        working: &[Event],
        all_events: &[Event],
        selection: Option<&str>,
        now_ms: i64,
        commands: &mut Vec<DrawCommand>,
    ) {
        let histogram = magnitude_histogram(working);
        commands.push(DrawCommand::BarChart {
            title: "Earthquakes by Magnitude".to_string(),
            labels: histogram.keys().map(|k| k.to_string()).collect(),
            values: histogram.values().map(|&v| v as f64).collect(),
            colors: histogram.keys().map(|&k| base_color(k as f64)).collect(),
        });
        self.live_charts.push(ChartKind::Magnitude);

        let hourly = hourly_histogram(working, now_ms);
        commands.push(DrawCommand::LineChart {
            title: "Earthquakes in the Last 24 Hours".to_string(),
            labels: hourly_labels(),
            values: hourly.iter().map(|&v| v as f64).collect(),
        });
        self.live_charts.push(ChartKind::Hourly);

        // Comparison is against the maximum over the full event set,
        // not just the filtered view.
        let selected = selection.and_then(|id| all_events.iter().find(|e| e.id == id));
        if let Some(event) = selected {
            let max_magnitude = all_events
                .iter()
                .map(|e| e.magnitude)
                .fold(f64::NEG_INFINITY, f64::max);
            commands.push(DrawCommand::BarChart {
                title: "Magnitude Comparison".to_string(),
                labels: vec!["This Quake".to_string(), "Max Recorded".to_string()],
                values: vec![event.magnitude, max_magnitude],
                colors: vec![base_color(event.magnitude), base_color(max_magnitude)],
            });
            self.live_charts.push(ChartKind::Comparison);
        }
    }

    /// Number of live map primitives after the last pass
    pub fn live_layer_count(&self) -> usize {
        self.live_layers.len()
    }

    /// Number of live chart instances after the last pass
    pub fn live_chart_count(&self) -> usize {
        self.live_charts.len()
    }

    /// Kinds of the live map primitives, in draw order
    pub fn live_layers(&self) -> &[LayerKind] {
        &self.live_layers
    }
}

/// Detail text shown in an event's popup.
fn popup_content(event: &Event) -> String {
    let when = DateTime::from_timestamp_millis(event.occurred_at)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown time".to_string());
    format!(
        "M{:.1} Earthquake\nLocation: {}\nTime: {}\nDepth: {:.2} km",
        event.magnitude, event.place, when, event.depth_km
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RegionFilter, SortKey};

    fn event(id: &str, magnitude: f64, occurred_at: i64, lat: f64, lon: f64) -> Event {
        Event {
            id: id.to_string(),
            magnitude,
            place: format!("near {id}"),
            occurred_at,
            longitude: lon,
            latitude: lat,
            depth_km: 12.5,
        }
    }

    fn sample_events() -> Vec<Event> {
        vec![
            event("a", 4.2, 1_000, 38.0, 22.0),
            event("b", 6.0, 2_000, 36.0, 138.0),
            event("c", 2.8, 3_000, -30.0, -71.0),
        ]
    }

    #[test]
    fn test_pass_starts_with_clear() {
        let mut coordinator = RenderCoordinator::new();
        let commands = coordinator.render(&sample_events(), &RenderSettings::default(), None, 0);
        assert_eq!(commands[0], DrawCommand::ClearAll);
        assert_eq!(
            commands.iter().filter(|c| **c == DrawCommand::ClearAll).count(),
            1
        );
    }

    #[test]
    fn test_ring_mode_draws_four_rings_per_event() {
        let mut coordinator = RenderCoordinator::new();
        let events = sample_events();
        let commands = coordinator.render(&events, &RenderSettings::default(), None, 0);

        let rings: Vec<_> = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Ring { .. }))
            .collect();
        assert_eq!(rings.len(), events.len() * RING_FRACTIONS.len());
        assert_eq!(coordinator.live_layer_count(), rings.len());
        assert!(coordinator.live_layers().iter().all(|k| *k == LayerKind::Ring));
    }

    #[test]
    fn test_popup_on_innermost_ring_only() {
        let mut coordinator = RenderCoordinator::new();
        let events = vec![event("solo", 5.0, 1_000, 38.0, 22.0)];
        let commands = coordinator.render(&events, &RenderSettings::default(), None, 0);

        let mut with_popup = 0;
        let mut smallest_radius = f64::MAX;
        let mut popup_radius = None;
        for command in &commands {
            if let DrawCommand::Ring { radius, popup, .. } = command {
                smallest_radius = smallest_radius.min(*radius);
                if popup.is_some() {
                    with_popup += 1;
                    popup_radius = Some(*radius);
                }
            }
        }
        assert_eq!(with_popup, 1);
        assert_eq!(popup_radius, Some(smallest_radius));
    }

    #[test]
    fn test_popup_content_fields() {
        let events = vec![event("solo", 5.0, 1_717_300_000_000, 38.0, 22.0)];
        let mut coordinator = RenderCoordinator::new();
        let commands = coordinator.render(&events, &RenderSettings::default(), None, 0);

        let popup = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::Ring { popup: Some(p), .. } => Some(p.clone()),
                _ => None,
            })
            .unwrap();
        assert!(popup.contains("M5.0 Earthquake"));
        assert!(popup.contains("near solo"));
        assert!(popup.contains("Depth: 12.50 km"));
    }

    #[test]
    fn test_heatmap_mode_is_exclusive() {
        let mut coordinator = RenderCoordinator::new();
        let events = sample_events();
        let settings = RenderSettings {
            heatmap_enabled: true,
            ..RenderSettings::default()
        };
        let commands = coordinator.render(&events, &settings, None, 0);

        assert!(!commands.iter().any(|c| matches!(c, DrawCommand::Ring { .. })));
        let heat: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::HeatPoint { weight, .. } => Some(*weight),
                _ => None,
            })
            .collect();
        assert_eq!(heat.len(), events.len());
        // Weight is magnitude * 5
        assert!(heat.contains(&(6.0 * 5.0)));
        assert!(coordinator
            .live_layers()
            .iter()
            .all(|k| *k == LayerKind::HeatPoint));
    }

    #[test]
    fn test_idempotent_passes_no_accumulation() {
        let mut coordinator = RenderCoordinator::new();
        let events = sample_events();
        let settings = RenderSettings::default();

        let first = coordinator.render(&events, &settings, None, 0);
        let layers_after_first = coordinator.live_layer_count();
        let charts_after_first = coordinator.live_chart_count();

        let second = coordinator.render(&events, &settings, None, 0);
        assert_eq!(first, second);
        assert_eq!(coordinator.live_layer_count(), layers_after_first);
        assert_eq!(coordinator.live_chart_count(), charts_after_first);
    }

    #[test]
    fn test_two_charts_without_selection_three_with() {
        let mut coordinator = RenderCoordinator::new();
        let events = sample_events();
        let settings = RenderSettings::default();

        coordinator.render(&events, &settings, None, 0);
        assert_eq!(coordinator.live_chart_count(), 2);

        let commands = coordinator.render(&events, &settings, Some("a"), 0);
        assert_eq!(coordinator.live_chart_count(), 3);

        let comparison = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::BarChart { title, values, .. }
                    if title == "Magnitude Comparison" =>
                {
                    Some(values.clone())
                }
                _ => None,
            })
            .unwrap();
        // Selected magnitude vs max over the full set
        assert_eq!(comparison, vec![4.2, 6.0]);
    }

    #[test]
    fn test_unknown_selection_draws_no_comparison() {
        let mut coordinator = RenderCoordinator::new();
        coordinator.render(&sample_events(), &RenderSettings::default(), Some("ghost"), 0);
        assert_eq!(coordinator.live_chart_count(), 2);
    }

    #[test]
    fn test_region_filter_limits_layers_but_comparison_uses_full_set() {
        let mut coordinator = RenderCoordinator::new();
        let events = sample_events();
        let settings = RenderSettings {
            region_filter: RegionFilter::Region(crate::core::RegionBucket::Europe),
            sort_key: SortKey::Magnitude,
            ..RenderSettings::default()
        };

        // Only "a" is in Europe; the comparison still ranges over all events
        let commands = coordinator.render(&events, &settings, Some("a"), 0);
        assert_eq!(coordinator.live_layer_count(), RING_FRACTIONS.len());

        let comparison = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::BarChart { title, values, .. }
                    if title == "Magnitude Comparison" =>
                {
                    Some(values.clone())
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(comparison[1], 6.0);
    }

    #[test]
    fn test_magnitude_chart_reflects_filtered_set() {
        let mut coordinator = RenderCoordinator::new();
        let events = sample_events();
        let commands = coordinator.render(&events, &RenderSettings::default(), None, 0);

        let (labels, values) = commands
            .iter()
            .find_map(|c| match c {
                DrawCommand::BarChart { title, labels, values, .. }
                    if title == "Earthquakes by Magnitude" =>
                {
                    Some((labels.clone(), values.clone()))
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(labels, vec!["2", "4", "6"]);
        assert_eq!(values.iter().sum::<f64>(), events.len() as f64);
    }
}
