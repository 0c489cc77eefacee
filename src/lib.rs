//! xmltv-grid - what's on, from an XMLTV schedule
//!
//! Decodes an XMLTV document and indexes its programmes into an
//! hour-bucketed grid that answers two questions:
//! - everything airing within a couple of hours of a given time
//! - what is on each channel right now, and what comes next
//!
//! # Usage
//!
//! ```no_run
//! use xmltv_grid::Grid;
//!
//! # fn main() -> xmltv_grid::Result<()> {
//! let mut grid = Grid::new();
//! let report = grid.load_file("guide.xml")?;
//! for warning in &report.warnings {
//!     eprintln!("{warning}");
//! }
//! for now_next in grid.playing_now().values() {
//!     if let Some(current) = now_next.current {
//!         println!("{current}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod grid;
pub mod parser;
pub mod query;
pub mod timestamp;
pub mod types;
pub mod xml_helpers;

pub use error::{GridError, Result};
pub use grid::{Grid, LoadOptions, LoadReport, LoadWarning};
pub use query::NowNext;
pub use types::*;

/// Get the library version
#[must_use]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
