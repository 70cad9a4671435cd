//! Core data model: seismic events, region buckets, render settings
//!
//! Everything here is plain data plus pure functions. The feed parser
//! produces `Event` values; nothing mutates them afterwards.

/// One seismic occurrence, immutable once parsed from the feed.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    /// Feed-assigned id, unique within a fetch
    pub id: String,
    /// Magnitude, non-negative after the parse guard
    pub magnitude: f64,
    /// Free-text location label; empty when the feed reports null
    pub place: String,
    /// Origin time, epoch milliseconds
    pub occurred_at: i64,
    /// Degrees east
    pub longitude: f64,
    /// Degrees north
    pub latitude: f64,
    /// Depth in km, negative for above-sea-level sources
    pub depth_km: f64,
}

/// Coarse geographic classification used for filtering.
///
/// Derived from coordinates on demand, never stored on an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegionBucket {
    NorthAmerica,
    SouthAmerica,
    Europe,
    Asia,
    Africa,
    Australia,
    Other,
}

impl RegionBucket {
    /// Stable lowercase name, matching the feed-facing filter vocabulary
    pub fn name(self) -> &'static str {
        match self {
            Self::NorthAmerica => "north_america",
            Self::SouthAmerica => "south_america",
            Self::Europe => "europe",
            Self::Asia => "asia",
            Self::Africa => "africa",
            Self::Australia => "australia",
            Self::Other => "other",
        }
    }

    /// Parse a bucket name as used on the command surface
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "north_america" => Self::NorthAmerica,
            "south_america" => Self::SouthAmerica,
            "europe" => Self::Europe,
            "asia" => Self::Asia,
            "africa" => Self::Africa,
            "australia" => Self::Australia,
            "other" => Self::Other,
            _ => return None,
        })
    }
}

/// Classify coordinates into a region bucket.
///
/// Fixed rectangular bounds evaluated in a fixed priority order; the
/// first matching box wins. Boxes may overlap in their raw bounds, so
/// the evaluation order is part of the contract.
///
/// The exact origin is the feed's placeholder for unknown coordinates
/// and is never a real region.
pub fn classify(lat: f64, lon: f64) -> RegionBucket {
    if lat == 0.0 && lon == 0.0 {
        return RegionBucket::Other;
    }
    if lat > 15.0 && lat < 75.0 && lon > -170.0 && lon < -50.0 {
        return RegionBucket::NorthAmerica;
    }
    if lat < 15.0 && lat > -60.0 && lon > -80.0 && lon < -35.0 {
        return RegionBucket::SouthAmerica;
    }
    if lat > 35.0 && lat < 70.0 && lon > -25.0 && lon < 40.0 {
        return RegionBucket::Europe;
    }
    if lat > -10.0 && lat < 80.0 && lon > 40.0 && lon < 180.0 {
        return RegionBucket::Asia;
    }
    if lat > -40.0 && lat < 35.0 && lon > -20.0 && lon < 55.0 {
        return RegionBucket::Africa;
    }
    if lat < -10.0 && lat > -50.0 && lon > 110.0 && lon < 180.0 {
        return RegionBucket::Australia;
    }
    RegionBucket::Other
}

/// Region filter as selected by the user: everything, or one bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RegionFilter {
    #[default]
    All,
    Region(RegionBucket),
}

impl RegionFilter {
    /// Does an event at these coordinates pass the filter?
    pub fn matches(self, lat: f64, lon: f64) -> bool {
        match self {
            Self::All => true,
            Self::Region(bucket) => classify(lat, lon) == bucket,
        }
    }
}

/// Ordering applied to the filtered working set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Descending origin time
    #[default]
    Recent,
    /// Descending magnitude
    Magnitude,
    /// Ascending place label, case-sensitive, empty string first
    Region,
}

impl SortKey {
    pub fn name(self) -> &'static str {
        match self {
            Self::Recent => "recent",
            Self::Magnitude => "magnitude",
            Self::Region => "region",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "recent" => Self::Recent,
            "magnitude" => Self::Magnitude,
            "region" => Self::Region,
            _ => return None,
        })
    }
}

/// User-controlled view settings.
///
/// Mutated only by explicit user-intent operations on the view state;
/// the pipeline itself never touches these.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    /// Magnitude floor passed to the feed query
    pub min_magnitude: f64,
    /// Feed query window, days back from now
    pub window_days: u32,
    /// Active region filter
    pub region_filter: RegionFilter,
    /// Active sort key (the presentation layer derives its active-button
    /// highlight from this field)
    pub sort_key: SortKey,
    /// Exclusive render mode: heat surface instead of rings
    pub heatmap_enabled: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            min_magnitude: 2.0,
            window_days: 14,
            region_filter: RegionFilter::All,
            sort_key: SortKey::Recent,
            heatmap_enabled: false,
        }
    }
}
