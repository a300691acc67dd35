//! User command transaction descriptor

use crate::error::{Error, Result};

/// Largest data phase the controller's data word can carry, in bits
pub const MAX_PHASE_BITS: u8 = 32;

/// A single "user command" transaction
///
/// The controller always sends an 8-bit opcode with no address and no dummy
/// cycles, followed by an optional write (MOSI) phase and an optional read
/// (MISO) phase. Both phases share the controller's first 32-bit data word,
/// so a transaction moves at most 32 bits each way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserCommand {
    /// The opcode byte
    pub opcode: u8,
    /// Data shifted out after the opcode, LSB first
    pub mosi_data: u32,
    /// Number of bits to shift out (0 disables the write phase)
    pub mosi_bits: u8,
    /// Number of bits to shift in (0 disables the read phase)
    pub miso_bits: u8,
}

impl UserCommand {
    /// Create a command with explicit write and read phases
    pub const fn new(opcode: u8, mosi_data: u32, mosi_bits: u8, miso_bits: u8) -> Self {
        Self {
            opcode,
            mosi_data,
            mosi_bits,
            miso_bits,
        }
    }

    /// Create an opcode-only command (e.g., WREN, WRDI)
    pub const fn simple(opcode: u8) -> Self {
        Self::new(opcode, 0, 0, 0)
    }

    /// Create a read register command (e.g., RDSR, RDID)
    pub const fn read_reg(opcode: u8, bits: u8) -> Self {
        Self::new(opcode, 0, 0, bits)
    }

    /// Create a write register command (e.g., WRSR)
    pub const fn write_reg(opcode: u8, value: u32, bits: u8) -> Self {
        Self::new(opcode, value, bits, 0)
    }

    /// Reject phases that do not fit the controller's data word
    pub fn validate(&self) -> Result<()> {
        for bits in [self.mosi_bits, self.miso_bits] {
            if bits > MAX_PHASE_BITS {
                return Err(Error::InvalidBitLength { bits });
            }
        }
        Ok(())
    }

    /// Returns true if this command has a write phase
    pub const fn has_write(&self) -> bool {
        self.mosi_bits > 0
    }

    /// Returns true if this command has a read phase
    pub const fn has_read(&self) -> bool {
        self.miso_bits > 0
    }

    /// Write phase length as programmed into the controller (bits - 1)
    pub const fn mosi_bitlen(&self) -> u32 {
        bitlen(self.mosi_bits)
    }

    /// Read phase length as programmed into the controller (bits - 1)
    pub const fn miso_bitlen(&self) -> u32 {
        bitlen(self.miso_bits)
    }

    /// Mask covering the bits the read phase actually fills
    pub const fn miso_mask(&self) -> u32 {
        mask(self.miso_bits)
    }

    /// Mask covering the bits the write phase actually sends
    pub const fn mosi_mask(&self) -> u32 {
        mask(self.mosi_bits)
    }
}

const fn bitlen(bits: u8) -> u32 {
    if bits == 0 {
        0
    } else {
        bits as u32 - 1
    }
}

const fn mask(bits: u8) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spi::opcodes;

    #[test]
    fn test_phase_flags() {
        let wren = UserCommand::simple(opcodes::WREN);
        assert!(!wren.has_write());
        assert!(!wren.has_read());
        assert_eq!(wren.mosi_bitlen(), 0);
        assert_eq!(wren.miso_bitlen(), 0);

        let rdid = UserCommand::read_reg(opcodes::RDID, 24);
        assert!(rdid.has_read());
        assert!(!rdid.has_write());
        assert_eq!(rdid.miso_bitlen(), 23);
        assert_eq!(rdid.miso_mask(), 0x00FF_FFFF);

        let wrsr = UserCommand::write_reg(opcodes::WRSR, 0x40, 8);
        assert!(wrsr.has_write());
        assert_eq!(wrsr.mosi_bitlen(), 7);
        assert_eq!(wrsr.mosi_mask(), 0xFF);
    }

    #[test]
    fn test_validate() {
        assert!(UserCommand::read_reg(opcodes::RDSR, 32).validate().is_ok());
        assert_eq!(
            UserCommand::write_reg(opcodes::WRSR, 0, 40).validate(),
            Err(Error::InvalidBitLength { bits: 40 })
        );
    }
}
