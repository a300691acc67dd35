//! SPI controller abstraction
//!
//! This module defines the narrow controller interface the enable sequence
//! needs and the blocking command executor built on top of it.

mod executor;
mod traits;

pub use executor::*;
pub use traits::*;
