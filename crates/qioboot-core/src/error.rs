//! Error types for qioboot-core
//!
//! Errors only surface when a bounded poll limit is configured or a caller
//! builds an invalid user command. With the default unbounded polling the
//! enable sequence cannot fail, it can only hang on broken hardware.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The SPI controller did not report completion within the poll limit
    ControllerTimeout {
        /// Opcode of the stalled user command
        opcode: u8,
    },
    /// The flash chip stayed busy for the whole poll limit
    FlashBusyTimeout,
    /// A user command asked for more than 32 data bits in one phase
    InvalidBitLength {
        /// The rejected bit count
        bits: u8,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ControllerTimeout { opcode } => write!(
                f,
                "SPI controller did not complete command 0x{:02X}",
                opcode
            ),
            Self::FlashBusyTimeout => write!(f, "flash chip did not become idle"),
            Self::InvalidBitLength { bits } => {
                write!(f, "invalid data phase length: {} bits (max 32)", bits)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
