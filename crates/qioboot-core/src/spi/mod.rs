//! SPI types and command structures
//!
//! This module provides the user-command transaction descriptor, the
//! controller read modes and the JEDEC opcodes the enable sequence uses.

mod command;
pub mod opcodes;
mod read_mode;

pub use command::{UserCommand, MAX_PHASE_BITS};
pub use read_mode::{ParseReadModeError, ReadMode};
