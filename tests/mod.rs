//! Integration tests for xmltv-grid.
//!
//! This module provides the test infrastructure shared by the test files:
//!
//! - `fixtures`: Builders for creating XMLTV documents in memory
//! - `common`: Assertion helpers and loading utilities
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use crate::common::{at, load_grid, ProgrammeBuilder, XmltvBuilder};
//!
//! fn test_news_is_on() {
//!     let xml = XmltvBuilder::new()
//!         .channel("1", "BBC One")
//!         .programme(ProgrammeBuilder::new("1", "20230115200000 +0000", "20230115203000 +0000").title("News"))
//!         .build();
//!
//!     let (grid, _) = load_grid(&xml);
//!     let now = grid.playing_at(&at("2023-01-15T20:10:00Z"));
//!     assert_eq!(now["BBC One"].current.unwrap().title, "News");
//! }
//! ```
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

pub mod common;
pub mod fixtures;

pub use common::{assert_bucket_placement, at, load_grid, minutes, titles};
pub use fixtures::{xmltv_timestamp, ProgrammeBuilder, XmltvBuilder};
