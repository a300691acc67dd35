//! Chip record and probe types

/// Quad-enable parameters for one flash chip family
///
/// Records are compiled into a [`ChipTable`](super::ChipTable) and never
/// change at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct ChipRecord {
    /// Manufacturer name (None for the default entry)
    pub manufacturer: Option<&'static str>,
    /// 8-bit JEDEC manufacturer ID
    pub mfg_id: u8,
    /// 16-bit JEDEC device ID
    pub device_id: u16,
    /// Bits of the device ID that must match
    pub device_id_mask: u16,
    /// Opcode that reads the status register holding the QE bit
    pub read_status_opcode: u8,
    /// Opcode that writes the status register holding the QE bit
    pub write_status_opcode: u8,
    /// Index of the QE bit within the status value (may exceed 7)
    pub qe_bit: u8,
}

impl ChipRecord {
    /// Create a record for a named manufacturer
    pub const fn new(
        manufacturer: &'static str,
        mfg_id: u8,
        device_id: u16,
        device_id_mask: u16,
        read_status_opcode: u8,
        write_status_opcode: u8,
        qe_bit: u8,
    ) -> Self {
        Self {
            manufacturer: Some(manufacturer),
            mfg_id,
            device_id,
            device_id_mask,
            read_status_opcode,
            write_status_opcode,
            qe_bit,
        }
    }

    /// Check whether a probed ID pair matches this record
    pub const fn matches(&self, mfg_id: u8, device_id: u16) -> bool {
        mfg_id == self.mfg_id
            && (device_id & self.device_id_mask) == (self.device_id & self.device_id_mask)
    }

    /// Display name, "none" for the default entry
    pub fn label(&self) -> &'static str {
        self.manufacturer.unwrap_or("none")
    }

    /// Width in bits of the status value read and written for this chip
    pub const fn status_width(&self) -> u8 {
        status_width(self.qe_bit)
    }

    /// Mask selecting the QE bit within the status value
    pub const fn qe_mask(&self) -> u32 {
        1u32 << self.qe_bit
    }
}

/// Status value width for a QE bit index: 8, 16 or 24 bits
///
/// Rounds `bit + 1` up to the next multiple of 8.
pub const fn status_width(qe_bit: u8) -> u8 {
    (qe_bit + 8) & !7
}

/// JEDEC identification as read by RDID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct ProbeResult {
    /// Raw 24-bit data word returned by the controller
    pub raw: u32,
    /// 8-bit manufacturer ID
    pub mfg_id: u8,
    /// 16-bit device ID (memory type in the high byte, capacity in the low)
    pub device_id: u16,
}

impl ProbeResult {
    /// Split the controller's data word into manufacturer and device IDs
    ///
    /// The first byte on the wire lands in the low byte of the word, so the
    /// two device ID bytes arrive swapped.
    pub const fn from_raw(raw: u32) -> Self {
        let raw = raw & 0x00FF_FFFF;
        Self {
            raw,
            mfg_id: (raw & 0xFF) as u8,
            device_id: ((raw >> 16) | (raw & 0xFF00)) as u16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spi::opcodes;

    #[test]
    fn test_status_width() {
        for bit in 0..=7 {
            assert_eq!(status_width(bit), 8, "bit {}", bit);
        }
        for bit in 8..=15 {
            assert_eq!(status_width(bit), 16, "bit {}", bit);
        }
        for bit in 16..=23 {
            assert_eq!(status_width(bit), 24, "bit {}", bit);
        }
    }

    #[test]
    fn test_probe_byte_order() {
        // Wire order C2 20 16 (MX25L3206E)
        let probe = ProbeResult::from_raw(0x0016_20C2);
        assert_eq!(probe.mfg_id, 0xC2);
        assert_eq!(probe.device_id, 0x2016);

        let probe = ProbeResult::from_raw(0xFF40_16C8);
        assert_eq!(probe.raw, 0x0040_16C8);
        assert_eq!(probe.mfg_id, 0xC8);
        assert_eq!(probe.device_id, 0x1640);
    }

    #[test]
    fn test_matches_with_mask() {
        let mxic = ChipRecord::new("MXIC", 0xC2, 0x2000, 0xFF00, opcodes::RDSR, opcodes::WRSR, 6);
        assert!(mxic.matches(0xC2, 0x2005));
        assert!(mxic.matches(0xC2, 0x20FF));
        assert!(!mxic.matches(0xC2, 0x2105));
        assert!(!mxic.matches(0xC8, 0x2005));
        assert_eq!(mxic.qe_mask(), 0x40);
        assert_eq!(mxic.label(), "MXIC");
    }
}
