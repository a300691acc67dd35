//! Flash chip identification
//!
//! This module holds the static table of chips with known quad-enable
//! parameters and the JEDEC ID matching rules.

mod table;
mod types;

pub use table::*;
pub use types::*;
