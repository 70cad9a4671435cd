//! Parser for the feed's GeoJSON feature collection
//!
//! Turns a feature collection body into `Event` records. A feature
//! missing its required numeric fields is dropped with a warning rather
//! than failing the whole batch; only a structurally invalid body is an
//! error for the caller.

use serde::Deserialize;
use tracing::{debug, warn};

use super::data::Event;

#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    properties: Option<Properties>,
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    mag: Option<f64>,
    place: Option<String>,
    time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// `[longitude, latitude, depth_km]`
    coordinates: Vec<f64>,
}

/// Parse a raw feed body into events.
///
/// Returns `Err` only when the body is not a feature collection at all;
/// individually malformed features are skipped.
pub fn parse_feed_body(body: &str) -> Result<Vec<Event>, serde_json::Error> {
    let collection: FeatureCollection = serde_json::from_str(body)?;
    Ok(events_from_collection(collection))
}

/// Extract well-formed events from a deserialized collection.
pub fn events_from_collection(collection: FeatureCollection) -> Vec<Event> {
    let total = collection.features.len();
    let events: Vec<Event> = collection
        .features
        .into_iter()
        .enumerate()
        .filter_map(|(idx, feature)| match event_from_feature(feature) {
            Ok(event) => Some(event),
            Err(reason) => {
                warn!(idx, reason, "Dropping malformed feature");
                None
            }
        })
        .collect();

    debug!(parsed = events.len(), total, "Feed batch parsed");
    events
}

/// Validate one feature. The error is a short human-readable reason used
/// only for the drop log.
fn event_from_feature(feature: Feature) -> Result<Event, &'static str> {
    let properties = feature.properties.ok_or("missing properties")?;
    let magnitude = properties.mag.ok_or("missing magnitude")?;
    let occurred_at = properties.time.ok_or("missing time")?;
    let geometry = feature.geometry.ok_or("missing geometry")?;

    let [longitude, latitude, depth_km] = match geometry.coordinates[..] {
        [lon, lat] => [lon, lat, 0.0],
        [lon, lat, depth, ..] => [lon, lat, depth],
        _ => return Err("incomplete coordinates"),
    };

    if !magnitude.is_finite() || !longitude.is_finite() || !latitude.is_finite() {
        return Err("non-finite field");
    }
    if magnitude < 0.0 {
        return Err("negative magnitude");
    }

    Ok(Event {
        id: feature.id.unwrap_or_default(),
        magnitude,
        place: properties.place.unwrap_or_default(),
        occurred_at,
        longitude,
        latitude,
        depth_km,
    })
}
