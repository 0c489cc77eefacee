//! Data types for the schedule grid.

mod document;
mod programme;

pub use document::*;
pub use programme::*;
