//! SPI flash opcodes used during boot
//!
//! These are on-the-wire commands sent to the flash chip, not controller
//! register bitmasks.

// ============================================================================
// Write control
// ============================================================================

/// Write Enable - sets the write enable latch before a status write
pub const WREN: u8 = 0x06;
/// Write Disable - clears the write enable latch
pub const WRDI: u8 = 0x04;

// ============================================================================
// Status register operations
// ============================================================================

/// Read Status Register 1
pub const RDSR: u8 = 0x05;
/// Read Status Register 2 (not all chips implement it)
pub const RDSR2: u8 = 0x35;
/// Write Status Register 1 (and 2, when given 16 data bits)
pub const WRSR: u8 = 0x01;
/// Write Status Register 2 (not all chips implement it)
pub const WRSR2: u8 = 0x31;

// ============================================================================
// Identification
// ============================================================================

/// Read JEDEC ID (manufacturer + device ID)
pub const RDID: u8 = 0x9F;

// ============================================================================
// Status register bit definitions
// ============================================================================

/// Status Register 1: Write In Progress / Busy
pub const SR1_WIP: u8 = 0x01;
/// Status Register 1: Write Enable Latch
pub const SR1_WEL: u8 = 0x02;
