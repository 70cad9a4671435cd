//! Region filtering and ordering of the working set
//!
//! Both operations are total over the filtered set and deterministic:
//! the sort is stable, so ties keep their original relative order.

use crate::core::{Event, RegionFilter, SortKey};

/// Narrow the event set to the active region, preserving order.
pub fn filter_events(events: &[Event], region: RegionFilter) -> Vec<Event> {
    events
        .iter()
        .filter(|e| region.matches(e.latitude, e.longitude))
        .cloned()
        .collect()
}

/// Order events in place by the chosen key.
///
/// `Recent` and `Magnitude` sort descending; `Region` sorts ascending by
/// the place label (case-sensitive, empty string first). `sort_by` is
/// stable, which the tie-determinism contract relies on.
pub fn sort_events(events: &mut [Event], key: SortKey) {
    match key {
        SortKey::Recent => events.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at)),
        SortKey::Magnitude => events.sort_by(|a, b| b.magnitude.total_cmp(&a.magnitude)),
        SortKey::Region => events.sort_by(|a, b| a.place.cmp(&b.place)),
    }
}

/// One-shot filter-then-sort used by the render pass.
pub fn filter_and_sort(events: &[Event], region: RegionFilter, key: SortKey) -> Vec<Event> {
    let mut working = filter_events(events, region);
    sort_events(&mut working, key);
    working
}
