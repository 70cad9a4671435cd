//! Platform-agnostic core: data model, feed parsing, styling, aggregation

pub mod charts;
pub mod data;
pub mod parser;
pub mod style;

pub use data::{classify, Event, RegionBucket, RegionFilter, RenderSettings, SortKey};
pub use parser::parse_feed_body;
