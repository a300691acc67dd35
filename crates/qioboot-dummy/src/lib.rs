//! qioboot-dummy - Simulated SPI controller and flash chip for testing
//!
//! This crate provides a dummy SPI controller with an attached flash chip
//! model. It answers the user commands the quad I/O enable sequence issues,
//! can be made slow or broken on purpose, and keeps a journal of every
//! transaction so tests can check exactly what was sent.

#![cfg_attr(not(feature = "std"), no_std)]

use bitflags::bitflags;
use heapless::Vec;
use log::{debug, trace, warn};

use qioboot_core::controller::{FlashIdle, SpiController};
use qioboot_core::spi::{opcodes, ReadMode, UserCommand};

/// Number of transactions kept in the journal
pub const JOURNAL_LEN: usize = 32;

/// SR1 bits the chip drives itself; writes to them are ignored
const SR1_VOLATILE: u8 = opcodes::SR1_WIP | opcodes::SR1_WEL;

bitflags! {
    /// Faults the simulation can inject
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Faults: u8 {
        /// Status register writes are accepted but change nothing
        const STATUS_READ_ONLY = 1 << 0;
        /// The controller never clears its busy flag
        const CONTROLLER_HANG  = 1 << 1;
        /// The flash chip never reports idle
        const FLASH_HANG       = 1 << 2;
    }
}

/// Configuration for the dummy controller and flash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DummyConfig {
    /// JEDEC manufacturer ID
    pub manufacturer_id: u8,
    /// JEDEC device ID (memory type, capacity)
    pub device_id: u16,
    /// Initial status registers, SR1 in the low byte and SR2 in the high byte
    pub status: u16,
    /// Polls before the controller reports a transaction complete
    pub controller_latency: u32,
    /// Polls the flash stays busy after a status register write
    pub write_busy_polls: u32,
    /// Injected faults
    pub faults: Faults,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self::gigadevice()
    }
}

impl DummyConfig {
    /// GigaDevice GD25Q32, QE is bit 1 of SR2
    pub fn gigadevice() -> Self {
        Self::with_id(0xC8, 0x4016)
    }

    /// Macronix MX25L3206E, QE is bit 6 of SR1
    pub fn mxic() -> Self {
        Self::with_id(0xC2, 0x2016)
    }

    /// ISSI IS25LQ032, QE is bit 6 of SR1
    pub fn issi() -> Self {
        Self::with_id(0x9D, 0x4016)
    }

    /// A chip with the given JEDEC ID and otherwise default settings
    pub fn with_id(manufacturer_id: u8, device_id: u16) -> Self {
        Self {
            manufacturer_id,
            device_id,
            status: 0,
            controller_latency: 2,
            write_busy_polls: 3,
            faults: Faults::empty(),
        }
    }

    /// Data word the controller holds after RDID
    ///
    /// The first byte on the wire is the manufacturer ID and lands in the
    /// low byte of the word.
    pub fn raw_jedec_id(&self) -> u32 {
        let [memory_type, capacity] = self.device_id.to_be_bytes();
        (self.manufacturer_id as u32) | ((memory_type as u32) << 8) | ((capacity as u32) << 16)
    }
}

/// Dummy SPI controller
///
/// Emulates the user-command registers of an SPI flash controller and the
/// flash chip on its bus.
pub struct DummyController {
    config: DummyConfig,
    status_reg1: u8,
    status_reg2: u8,
    write_enabled: bool,
    flash_busy: u32,
    user_mode_ready: bool,
    usr_pending: u32,
    usr_active: bool,
    data_buf: u32,
    read_mode: ReadMode,
    journal: Vec<UserCommand, JOURNAL_LEN>,
    dropped: usize,
}

impl DummyController {
    /// Create a dummy controller with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        let [status_reg2, status_reg1] = config.status.to_be_bytes();
        Self {
            config,
            status_reg1: status_reg1 & !SR1_VOLATILE,
            status_reg2,
            write_enabled: false,
            flash_busy: 0,
            user_mode_ready: false,
            usr_pending: 0,
            usr_active: false,
            data_buf: 0,
            read_mode: ReadMode::default(),
            journal: Vec::new(),
            dropped: 0,
        }
    }

    /// Create a dummy controller with the default chip (GD25Q32)
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Current status registers, SR1 in the low byte and SR2 in the high byte
    pub fn status(&self) -> u16 {
        u16::from_be_bytes([self.status_reg2, self.sr1()])
    }

    /// SR1 including the busy and write-enable bits
    fn sr1(&self) -> u8 {
        let mut sr1 = self.status_reg1;
        if self.flash_busy > 0 {
            sr1 |= opcodes::SR1_WIP;
        }
        if self.write_enabled {
            sr1 |= opcodes::SR1_WEL;
        }
        sr1
    }

    /// Whether the write enable latch is set
    pub fn write_enabled(&self) -> bool {
        self.write_enabled
    }

    /// Read mode last applied to the controller
    pub fn read_mode(&self) -> ReadMode {
        self.read_mode
    }

    /// Transactions issued so far, oldest first
    pub fn journal(&self) -> &[UserCommand] {
        &self.journal
    }

    /// Opcodes of the journaled transactions
    pub fn opcodes(&self) -> impl Iterator<Item = u8> + '_ {
        self.journal.iter().map(|cmd| cmd.opcode)
    }

    /// Transactions that did not fit in the journal
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Forget all journaled transactions
    pub fn clear_journal(&mut self) {
        self.journal.clear();
        self.dropped = 0;
    }

    fn record(&mut self, cmd: &UserCommand) {
        if self.journal.push(*cmd).is_err() {
            self.dropped += 1;
        }
    }

    fn read_status(&self, opcode: u8, bits: u8) -> u32 {
        match opcode {
            // SR1 followed by SR2 when clocked past the first byte
            opcodes::RDSR if bits > 8 => self.status() as u32,
            opcodes::RDSR => self.sr1() as u32,
            _ => self.status_reg2 as u32,
        }
    }

    fn write_status(&mut self, cmd: &UserCommand) {
        if !self.write_enabled {
            debug!("Status write 0x{:02X} ignored, WEL clear", cmd.opcode);
            return;
        }
        self.write_enabled = false;
        self.flash_busy = self.config.write_busy_polls;

        if self.config.faults.contains(Faults::STATUS_READ_ONLY) {
            debug!("Status write 0x{:02X} dropped (read-only fault)", cmd.opcode);
            return;
        }

        let value = cmd.mosi_data & cmd.mosi_mask();
        match cmd.opcode {
            opcodes::WRSR => {
                self.status_reg1 = value as u8 & !SR1_VOLATILE;
                if cmd.mosi_bits >= 16 {
                    self.status_reg2 = (value >> 8) as u8;
                }
            }
            _ => self.status_reg2 = value as u8,
        }
    }

    /// Run the flash side of a transaction and return what MISO carried
    fn transfer(&mut self, cmd: &UserCommand) -> Option<u32> {
        match cmd.opcode {
            opcodes::RDID => Some(self.config.raw_jedec_id()),
            opcodes::RDSR | opcodes::RDSR2 => Some(self.read_status(cmd.opcode, cmd.miso_bits)),
            opcodes::WRSR | opcodes::WRSR2 => {
                self.write_status(cmd);
                None
            }
            opcodes::WREN => {
                self.write_enabled = true;
                None
            }
            opcodes::WRDI => {
                self.write_enabled = false;
                None
            }
            _ => {
                warn!("Dummy flash ignoring opcode 0x{:02X}", cmd.opcode);
                None
            }
        }
    }
}

impl SpiController for DummyController {
    fn prepare_user_commands(&mut self) {
        self.user_mode_ready = true;
    }

    fn start(&mut self, cmd: &UserCommand) {
        trace!(
            "USR cmd 0x{:02X} mosi {}b 0x{:08X} miso {}b",
            cmd.opcode,
            cmd.mosi_bits,
            cmd.mosi_data,
            cmd.miso_bits
        );
        self.record(cmd);
        self.data_buf = cmd.mosi_data;
        self.usr_active = true;
        self.usr_pending = self.config.controller_latency;

        if !self.user_mode_ready {
            // No command phase configured, the flash never sees the opcode
            warn!("USR transaction started before user mode was configured");
            if cmd.has_read() {
                self.data_buf = u32::MAX;
            }
            return;
        }

        if let Some(miso) = self.transfer(cmd) {
            if cmd.has_read() {
                self.data_buf = miso & cmd.miso_mask();
            }
        }
    }

    fn is_complete(&mut self) -> bool {
        if self.config.faults.contains(Faults::CONTROLLER_HANG) {
            return false;
        }
        if self.usr_pending > 0 {
            self.usr_pending -= 1;
            return false;
        }
        self.usr_active = false;
        true
    }

    fn response(&mut self) -> u32 {
        if self.usr_active {
            warn!("Data buffer read while a USR transaction is in flight");
        }
        self.data_buf
    }

    fn set_read_mode(&mut self, mode: ReadMode) {
        debug!("Controller read mode {} -> {}", self.read_mode, mode);
        self.read_mode = mode;
    }
}

impl FlashIdle for DummyController {
    fn is_flash_idle(&mut self) -> bool {
        if self.config.faults.contains(Faults::FLASH_HANG) {
            return false;
        }
        if self.flash_busy > 0 {
            self.flash_busy -= 1;
            return false;
        }
        true
    }
}
