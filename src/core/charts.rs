//! Chart aggregation: magnitude-bucket counts and 24-hour activity
//!
//! Both histograms are pure and recomputed fully on every render pass.
//! Event counts are small (bounded by the feed window and magnitude
//! floor), so incremental maintenance is not worth the state.

use std::collections::BTreeMap;

use super::data::Event;

/// Milliseconds in one hour.
const HOUR_MS: i64 = 60 * 60 * 1000;

/// Number of buckets in the hourly histogram.
pub const HOURLY_BUCKETS: usize = 24;

/// Count events per whole-magnitude bucket, keyed by `floor(magnitude)`.
///
/// `BTreeMap` iteration gives the ascending key order the chart wants.
pub fn magnitude_histogram(events: &[Event]) -> BTreeMap<i64, u64> {
    let mut counts = BTreeMap::new();
    for event in events {
        *counts.entry(event.magnitude.floor() as i64).or_insert(0) += 1;
    }
    counts
}

/// Count events per completed hour over the last 24 hours.
///
/// Bucket 23 is the most recent completed hour, bucket 0 is 23 hours
/// ago. Events older than 24 hours, and events timestamped after `now`,
/// fall outside the window and are excluded, so the bucket sum may be
/// less than the event count.
pub fn hourly_histogram(events: &[Event], now_ms: i64) -> [u64; HOURLY_BUCKETS] {
    let mut buckets = [0u64; HOURLY_BUCKETS];
    for event in events {
        let hours_ago = (now_ms - event.occurred_at).div_euclid(HOUR_MS);
        if (0..HOURLY_BUCKETS as i64).contains(&hours_ago) {
            buckets[HOURLY_BUCKETS - 1 - hours_ago as usize] += 1;
        }
    }
    buckets
}

/// Labels for the hourly histogram, oldest bucket first: "23h ago" .. "0h ago".
pub fn hourly_labels() -> Vec<String> {
    (0..HOURLY_BUCKETS).map(|i| format!("{}h ago", HOURLY_BUCKETS - 1 - i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, magnitude: f64, occurred_at: i64) -> Event {
        Event {
            id: id.to_string(),
            magnitude,
            place: String::new(),
            occurred_at,
            longitude: 0.0,
            latitude: 10.0,
            depth_km: 10.0,
        }
    }

    #[test]
    fn test_magnitude_histogram_buckets_and_order() {
        let events = vec![
            event("a", 4.2, 0),
            event("b", 4.9, 0),
            event("c", 6.1, 0),
            event("d", 2.0, 0),
        ];
        let hist = magnitude_histogram(&events);

        assert_eq!(hist.get(&4), Some(&2));
        assert_eq!(hist.get(&6), Some(&1));
        assert_eq!(hist.get(&2), Some(&1));

        let keys: Vec<i64> = hist.keys().copied().collect();
        assert_eq!(keys, vec![2, 4, 6]);
    }

    #[test]
    fn test_magnitude_histogram_sums_to_event_count() {
        let events: Vec<Event> = (0..50)
            .map(|i| event(&i.to_string(), (i % 9) as f64 + 0.5, 0))
            .collect();
        let total: u64 = magnitude_histogram(&events).values().sum();
        assert_eq!(total, events.len() as u64);
    }

    #[test]
    fn test_hourly_histogram_bucket_placement() {
        let now = 100 * HOUR_MS;
        let events = vec![
            event("a", 5.0, now - HOUR_MS / 2),      // 0h ago -> bucket 23
            event("b", 5.0, now - 3 * HOUR_MS),      // 3h ago -> bucket 20
            event("c", 5.0, now - 23 * HOUR_MS - 1), // 23h ago -> bucket 0
        ];
        let buckets = hourly_histogram(&events, now);

        assert_eq!(buckets[23], 1);
        assert_eq!(buckets[20], 1);
        assert_eq!(buckets[0], 1);
        assert_eq!(buckets.iter().sum::<u64>(), 3);
    }

    #[test]
    fn test_hourly_histogram_excludes_out_of_window() {
        let now = 100 * HOUR_MS;
        let events = vec![
            event("old", 5.0, now - 25 * HOUR_MS),
            event("future", 5.0, now + HOUR_MS),
            event("fresh", 5.0, now - HOUR_MS),
        ];
        let buckets = hourly_histogram(&events, now);
        assert_eq!(buckets.iter().sum::<u64>(), 1);
        assert!(buckets.iter().sum::<u64>() <= events.len() as u64);
    }

    #[test]
    fn test_hourly_labels() {
        let labels = hourly_labels();
        assert_eq!(labels.len(), HOURLY_BUCKETS);
        assert_eq!(labels[0], "23h ago");
        assert_eq!(labels[23], "0h ago");
    }
}
