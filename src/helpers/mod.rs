//! Helper functions for post metadata
//!
//! Dates derived from filenames and read time estimates.

mod date;
mod reading;

pub use date::*;
pub use reading::*;
