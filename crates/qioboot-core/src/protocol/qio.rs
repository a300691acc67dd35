//! Quad I/O enable sequence
//!
//! Probes the JEDEC ID, looks the chip up in the quad-enable table, sets the
//! QE status bit with a read-modify-write if it is clear, verifies it and
//! finally switches the controller's read path to a quad mode.
//!
//! Everything is synchronous. With [`PollLimit::Unbounded`] a controller that
//! never completes a transaction hangs the caller, matching what boot
//! firmware does.

use log::{debug, error};

use crate::chip::{find_chip_in, ChipMatch, ChipRecord, ChipTable, ProbeResult, CHIP_TABLE};
use crate::controller::{execute, wait_flash_idle, FlashIdle, PollLimit, SpiController};
use crate::error::Result;
use crate::spi::{opcodes, ReadMode, UserCommand};

/// Settings for the enable sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(default))]
pub struct QioConfig {
    /// Read mode applied once the QE bit is confirmed set
    pub read_mode: ReadMode,
    /// Bound on every busy-poll (controller completion and flash idle)
    pub poll_limit: PollLimit,
}

impl Default for QioConfig {
    fn default() -> Self {
        Self {
            read_mode: ReadMode::configured(),
            poll_limit: PollLimit::Unbounded,
        }
    }
}

impl QioConfig {
    /// Default settings with every busy-poll capped at `max_polls`
    pub fn bounded(max_polls: u32) -> Self {
        Self {
            poll_limit: PollLimit::Bounded(max_polls),
            ..Self::default()
        }
    }
}

/// What the enable sequence did to the QE bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub enum QioOutcome {
    /// The QE bit was already set, nothing was written
    AlreadyEnabled,
    /// The QE bit was written and read back set
    Enabled {
        /// Status value read back after the write
        status: u32,
    },
    /// The QE bit was written but read back clear; read mode left unchanged
    VerifyFailed {
        /// Status value read back after the write
        status: u32,
    },
}

impl QioOutcome {
    /// Returns true if the controller was switched to a quad read mode
    pub const fn quad_active(&self) -> bool {
        !matches!(self, Self::VerifyFailed { .. })
    }
}

/// Summary of one run of the enable sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QioReport {
    /// JEDEC ID read from the chip
    pub probe: ProbeResult,
    /// Table record used for the QE bit
    pub chip: ChipMatch,
    /// Status value read before any write
    pub status_before: u32,
    /// What happened to the QE bit
    pub outcome: QioOutcome,
    /// Read mode applied to the controller, if any
    pub read_mode: Option<ReadMode>,
}

/// Runs the quad I/O enable sequence over an owned controller handle
///
/// The handle can be the controller itself or a `&mut` borrow of it; the
/// enabler has exclusive use of it either way.
pub struct QioEnabler<C> {
    controller: C,
    config: QioConfig,
    table: &'static ChipTable,
}

impl<C: SpiController + FlashIdle> QioEnabler<C> {
    /// Create an enabler using the built-in chip table
    pub fn new(controller: C, config: QioConfig) -> Self {
        Self {
            controller,
            config,
            table: &CHIP_TABLE,
        }
    }

    /// Use a different chip table for the lookup
    pub fn with_table(mut self, table: &'static ChipTable) -> Self {
        self.table = table;
        self
    }

    /// The active configuration
    pub fn config(&self) -> &QioConfig {
        &self.config
    }

    /// Borrow the controller
    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// Mutably borrow the controller
    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// Release the controller
    pub fn into_inner(self) -> C {
        self.controller
    }

    /// Run the full sequence
    ///
    /// A QE bit that does not stick is reported as
    /// [`QioOutcome::VerifyFailed`], not as an error. Errors only come from
    /// exhausting a bounded poll limit.
    pub fn enable(&mut self) -> Result<QioReport> {
        debug!("Probing for QIO mode enable...");

        let probe = self.probe()?;
        let chip = find_chip_in(self.table, probe.mfg_id, probe.device_id);
        let (status_before, outcome) = self.enable_qe(chip.record)?;

        let read_mode = if outcome.quad_active() {
            debug!("Enabling {} mode...", self.config.read_mode);
            self.controller.set_read_mode(self.config.read_mode);
            Some(self.config.read_mode)
        } else {
            None
        };

        Ok(QioReport {
            probe,
            chip,
            status_before,
            outcome,
            read_mode,
        })
    }

    /// Wait for the flash, set up user commands and read the JEDEC ID
    pub fn probe(&mut self) -> Result<ProbeResult> {
        self.wait_idle()?;
        self.controller.prepare_user_commands();

        let raw = self.command(&UserCommand::read_reg(opcodes::RDID, 24))?;
        debug!("Raw SPI flash chip id 0x{:x}", raw);

        let probe = ProbeResult::from_raw(raw);
        debug!(
            "Manufacturer ID 0x{:02x} chip ID 0x{:04x}",
            probe.mfg_id, probe.device_id
        );
        Ok(probe)
    }

    /// Read the status value holding `chip`'s QE bit
    pub fn read_status(&mut self, chip: &ChipRecord) -> Result<u32> {
        self.command(&UserCommand::read_reg(
            chip.read_status_opcode,
            chip.status_width(),
        ))
    }

    /// Set `chip`'s QE bit if it is clear and verify it
    ///
    /// Returns the status value read before any write and the outcome.
    /// Does not touch the controller's read mode.
    pub fn enable_qe(&mut self, chip: &ChipRecord) -> Result<(u32, QioOutcome)> {
        let width = chip.status_width();
        let qe = chip.qe_mask();

        self.wait_idle()?;
        let initial = self.read_status(chip)?;
        debug!("Initial flash chip status 0x{:x}", initial);

        if initial & qe != 0 {
            debug!("QIO mode already enabled in flash");
            return Ok((initial, QioOutcome::AlreadyEnabled));
        }

        self.command(&UserCommand::simple(opcodes::WREN))?;
        self.command(&UserCommand::write_reg(
            chip.write_status_opcode,
            initial | qe,
            width,
        ))?;

        self.wait_idle()?;
        let status = self.read_status(chip)?;
        debug!("Updated flash chip status 0x{:x}", status);

        if status & qe == 0 {
            error!("Failed to set QIE bit, not enabling QIO mode");
            return Ok((initial, QioOutcome::VerifyFailed { status }));
        }

        Ok((initial, QioOutcome::Enabled { status }))
    }

    fn wait_idle(&mut self) -> Result<()> {
        wait_flash_idle(&mut self.controller, self.config.poll_limit)
    }

    fn command(&mut self, cmd: &UserCommand) -> Result<u32> {
        execute(&mut self.controller, cmd, self.config.poll_limit)
    }
}

/// Boot entry point: enable quad I/O with the built-in defaults
///
/// Quad mode is a performance optimisation, so nothing is returned; the
/// outcome is only visible in the log and in the controller's read mode.
pub fn enable_qio_mode<C: SpiController + FlashIdle>(controller: C) {
    let mut enabler = QioEnabler::new(controller, QioConfig::default());
    if let Err(e) = enabler.enable() {
        error!("QIO mode not enabled: {}", e);
    }
}
