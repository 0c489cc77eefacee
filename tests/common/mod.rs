//! Common test utilities and assertion helpers.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use chrono::{DateTime, TimeDelta, Utc};
use xmltv_grid::timestamp::round_to_hour;
use xmltv_grid::{Grid, LoadReport, Programme};

// Re-export fixtures for convenience
pub use super::fixtures::*;

/// Parse an RFC 3339 instant into UTC.
///
/// This is a test helper that panics on parse failure.
#[must_use]
pub fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

#[must_use]
pub fn minutes(n: i64) -> TimeDelta {
    TimeDelta::minutes(n)
}

/// Load XMLTV bytes into a fresh grid, panicking on decode failure.
#[must_use]
pub fn load_grid(xml: &[u8]) -> (Grid, LoadReport) {
    let mut grid = Grid::new();
    let report = grid.load(xml).expect("document should load");
    (grid, report)
}

/// Titles of a list of programmes, in order.
#[must_use]
pub fn titles(programmes: &[&Programme]) -> Vec<String> {
    programmes.iter().map(|p| p.title.clone()).collect()
}

/// Assert every programme sits in the bucket its start time rounds to.
pub fn assert_bucket_placement(grid: &Grid) {
    for (key, programmes) in grid.buckets() {
        for p in programmes {
            assert_eq!(
                round_to_hour(&p.start()),
                *key,
                "programme {:?} starting {} is in bucket {}",
                p.title,
                p.start(),
                key
            );
        }
    }
}
