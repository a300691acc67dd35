//! Enable command implementation

use qioboot_core::protocol::{QioEnabler, QioOutcome, QioReport};
use qioboot_dummy::DummyController;

use crate::config::SimConfig;

/// Run the enable sequence on a dummy controller built from `config`
pub fn run_enable(config: &SimConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = DummyController::new(config.chip.to_dummy_config());
    log::debug!("Simulating {:?}", controller.config());

    let result = QioEnabler::new(&mut controller, config.qio).enable();

    match &result {
        Ok(report) => print_report(report, controller.status()),
        Err(e) => eprintln!("Enable sequence aborted: {}", e),
    }

    println!();
    println!("Transactions:");
    for (i, cmd) in controller.journal().iter().enumerate() {
        println!(
            "  {:>2}: cmd 0x{:02X}  mosi {:>2}b 0x{:06X}  miso {:>2}b",
            i,
            cmd.opcode,
            cmd.mosi_bits,
            cmd.mosi_data & cmd.mosi_mask(),
            cmd.miso_bits
        );
    }
    if controller.dropped() > 0 {
        println!("  ... {} more", controller.dropped());
    }
    println!("Controller read mode: {}", controller.read_mode());

    result.map(|_| ()).map_err(Into::into)
}

fn print_report(report: &QioReport, final_status: u16) {
    let record = report.chip.record;

    println!(
        "JEDEC ID:        {:02X} {:04X} (raw 0x{:06X})",
        report.probe.mfg_id, report.probe.device_id, report.probe.raw
    );
    if report.chip.is_default {
        println!("Chip record:     default");
    } else {
        println!("Chip record:     {}", record.label());
    }
    println!(
        "Status opcodes:  read 0x{:02X} / write 0x{:02X}, QE bit {} ({}-bit status)",
        record.read_status_opcode,
        record.write_status_opcode,
        record.qe_bit,
        record.status_width()
    );
    println!("Status before:   0x{:X}", report.status_before);

    match report.outcome {
        QioOutcome::AlreadyEnabled => println!("QE bit:          already set"),
        QioOutcome::Enabled { status } => {
            println!("QE bit:          set (status now 0x{:X})", status)
        }
        QioOutcome::VerifyFailed { status } => println!(
            "QE bit:          did not stick (status 0x{:X}), read mode unchanged",
            status
        ),
    }
    println!("Chip registers:  SR1 0x{:02X} SR2 0x{:02X}", final_status & 0xFF, final_status >> 8);

    if let Some(mode) = report.read_mode {
        println!("Applied mode:    {}", mode);
    }
}
