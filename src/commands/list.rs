//! List command implementation

use qioboot_core::chip::CHIP_TABLE;

/// List the chip table in lookup order
pub fn list_chips() {
    println!("Quad-enable chip table (first match wins):");
    println!();
    println!(
        "{:<12} {:>6} {:>9} {:>6} {:>5} {:>6} {:>7}",
        "Vendor", "Mfg", "Device", "Mask", "Read", "Write", "QE bit"
    );
    println!("{}", "-".repeat(60));

    for chip in CHIP_TABLE.records() {
        println!(
            "{:<12} {:>6} {:>9} {:>6} {:>5} {:>6} {:>7}",
            chip.label(),
            format!("{:02X}", chip.mfg_id),
            format!("{:04X}", chip.device_id),
            format!("{:04X}", chip.device_id_mask),
            format!("{:02X}", chip.read_status_opcode),
            format!("{:02X}", chip.write_status_opcode),
            chip.qe_bit
        );
    }
    println!();
    println!("The last entry is used for any chip no other entry matches.");
}
