//! Lookup command implementation

use qioboot_core::chip::find_chip;

/// Print the table record selected for a JEDEC ID
pub fn run_lookup(mfg_id: u8, device_id: u16) {
    let m = find_chip(mfg_id, device_id);
    let record = m.record;

    println!("JEDEC ID {:02X} {:04X}:", mfg_id, device_id);
    if m.is_default {
        println!("  Record:       default (no specific entry)");
    } else {
        println!("  Record:       {}", record.label());
    }
    println!("  Read status:  0x{:02X}", record.read_status_opcode);
    println!("  Write status: 0x{:02X}", record.write_status_opcode);
    println!("  QE bit:       {}", record.qe_bit);
    println!("  Status width: {} bits", record.status_width());
}
