//! CLI command implementations
//!
//! `enable` drives the full quad I/O sequence against the dummy controller;
//! `lookup` and `list-chips` only consult the chip table.

mod enable;
mod list;
mod lookup;

pub use enable::run_enable;
pub use list::list_chips;
pub use lookup::run_lookup;
