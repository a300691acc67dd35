//! Boot-time flash protocol sequences
//!
//! Currently this is the quad I/O enable sequence run once before the main
//! application starts.

mod qio;

pub use qio::*;
