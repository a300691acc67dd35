//! Built-in quad-enable table
//!
//! Manufacturer & device ID can be checked by reading the JEDEC ID with any
//! SPI flash tool. If the manufacturer ID matches and the device ID matches
//! under the mask, the enable sequence reads the status register with the
//! record's read opcode, tests the QE bit and, if clear, writes it back set
//! with the record's write opcode.
//!
//! The lookup stops at the first match. Chips that need more than a single
//! status bit flip are not representable here.

use log::info;

use super::types::ChipRecord;
use crate::spi::opcodes::{RDSR, RDSR2, WRSR, WRSR2};

/// Ordered chip records with a terminating default
///
/// The default record is kept apart from the searchable records so a lookup
/// cannot fall off the end of the table.
#[derive(Debug, Clone, Copy)]
pub struct ChipTable {
    known: &'static [ChipRecord],
    default: ChipRecord,
}

/// Result of a table lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipMatch {
    /// The selected record
    pub record: &'static ChipRecord,
    /// True if no specific record matched and the default was used
    pub is_default: bool,
}

impl ChipTable {
    /// Build a table from known records and a default
    pub const fn new(known: &'static [ChipRecord], default: ChipRecord) -> Self {
        Self { known, default }
    }

    /// The records searched before falling back
    pub const fn known(&self) -> &'static [ChipRecord] {
        self.known
    }

    /// The record used when nothing else matches
    pub const fn default_record(&self) -> &ChipRecord {
        &self.default
    }

    /// All records in lookup order, the default last
    pub fn records(&self) -> impl Iterator<Item = &ChipRecord> + '_ {
        self.known.iter().chain(core::iter::once(&self.default))
    }

    /// Number of records including the default
    pub const fn len(&self) -> usize {
        self.known.len() + 1
    }

    /// Always false, the default record is always present
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// The default entry, used when no other ID matched
///
/// QE is bit 1 of the second status byte, accessed with the dedicated
/// RDSR2/WRSR2 pair. This works for chips including GigaDevice (mfg ID 0xC8,
/// device IDs including 4016) and FM25Q32 (mfg ID 0xA1, device IDs
/// including 4016).
pub const DEFAULT_CHIP: ChipRecord = ChipRecord {
    manufacturer: None,
    mfg_id: 0xFF,
    device_id: 0xFFFF,
    device_id_mask: 0xFFFF,
    read_status_opcode: RDSR2,
    write_status_opcode: WRSR2,
    qe_bit: 1,
};

#[rustfmt::skip]
static KNOWN_CHIPS: [ChipRecord; 2] = [
    //             Manufacturer, mfg_id, device_id, mask,  read, write, QE bit
    ChipRecord::new("MXIC",      0xC2,   0x2000,    0xFF00, RDSR, WRSR,  6),
    ChipRecord::new("ISSI",      0x9D,   0x4000,    0xFF00, RDSR, WRSR,  6),
];

/// The built-in chip table
pub static CHIP_TABLE: ChipTable = ChipTable::new(&KNOWN_CHIPS, DEFAULT_CHIP);

/// Look up quad-enable parameters in the built-in table
pub fn find_chip(mfg_id: u8, device_id: u16) -> ChipMatch {
    find_chip_in(&CHIP_TABLE, mfg_id, device_id)
}

/// Look up quad-enable parameters in `table`
///
/// Scans known records in order and returns the first match, or the
/// table's default record.
pub fn find_chip_in(table: &'static ChipTable, mfg_id: u8, device_id: u16) -> ChipMatch {
    match table.known.iter().find(|chip| chip.matches(mfg_id, device_id)) {
        Some(record) => {
            info!("Enabling QIO for flash chip {}", record.label());
            ChipMatch {
                record,
                is_default: false,
            }
        }
        None => {
            info!("Enabling default flash chip QIO");
            ChipMatch {
                record: &table.default,
                is_default: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mxic_match() {
        let m = find_chip(0xC2, 0x2005);
        assert!(!m.is_default);
        assert_eq!(m.record.label(), "MXIC");
        assert_eq!(m.record.read_status_opcode, 0x05);
        assert_eq!(m.record.write_status_opcode, 0x01);
        assert_eq!(m.record.qe_bit, 6);
        assert_eq!(m.record.status_width(), 8);
    }

    #[test]
    fn test_issi_match() {
        let m = find_chip(0x9D, 0x4011);
        assert!(!m.is_default);
        assert_eq!(m.record.label(), "ISSI");
        assert_eq!(m.record.read_status_opcode, RDSR);
        assert_eq!(m.record.write_status_opcode, WRSR);
        assert_eq!(m.record.qe_bit, 6);
    }

    #[test]
    fn test_unlisted_falls_back_to_default() {
        let m = find_chip(0xC8, 0x4016);
        assert!(m.is_default);
        assert_eq!(m.record.label(), "none");
        assert_eq!(m.record.read_status_opcode, 0x35);
        assert_eq!(m.record.write_status_opcode, 0x31);
        assert_eq!(m.record.qe_bit, 1);
        // The QE bit index is taken literally: bit 1 of the value read by
        // RDSR2, so an 8-bit transfer.
        assert_eq!(m.record.status_width(), 8);
    }

    #[test]
    fn test_mfg_match_requires_masked_device() {
        // MXIC manufacturer, but device family outside 0x20xx
        assert!(find_chip(0xC2, 0x2520).is_default);
    }

    #[test]
    fn test_lookup_always_yields_record() {
        for mfg_id in 0..=u8::MAX {
            for device_id in (0..=u16::MAX).step_by(0x0101) {
                let m = find_chip(mfg_id, device_id);
                assert_eq!(m.is_default, core::ptr::eq(m.record, CHIP_TABLE.default_record()));
            }
            // Including the exact default ID pair
            assert!(find_chip(0xFF, 0xFFFF).is_default);
        }
    }

    #[test]
    fn test_first_match_wins() {
        static OVERLAPPING: [ChipRecord; 2] = [
            ChipRecord::new("First", 0xEF, 0x4000, 0xFF00, RDSR, WRSR, 6),
            ChipRecord::new("Second", 0xEF, 0x4018, 0xFFFF, RDSR2, WRSR2, 1),
        ];
        static TABLE: ChipTable = ChipTable::new(&OVERLAPPING, DEFAULT_CHIP);

        let m = find_chip_in(&TABLE, 0xEF, 0x4018);
        assert_eq!(m.record.label(), "First");
        assert_eq!(m.record.qe_bit, 6);
    }

    #[test]
    fn test_no_known_record_is_catch_all() {
        for chip in CHIP_TABLE.known() {
            assert_ne!(chip.device_id_mask, 0, "{} matches any device", chip.label());
            assert!(chip.manufacturer.is_some());
        }
        assert_eq!(CHIP_TABLE.records().last(), Some(&DEFAULT_CHIP));
        assert_eq!(CHIP_TABLE.len(), 3);
    }
}
