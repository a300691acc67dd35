//! Controller trait definitions

use crate::spi::{ReadMode, UserCommand};

/// SPI flash controller driven through its "user command" registers
///
/// Implementations own the controller's register block. The trait is kept
/// to the primitives the boot sequence uses so a simulated controller can
/// stand in for the hardware:
///
/// 1. `prepare_user_commands()` once, to fix the transaction shape
/// 2. `start()` per transaction, `is_complete()` until it returns true,
///    then `response()` to fetch the data word
/// 3. `set_read_mode()` to switch the memory-mapped read path
///
/// ## Example: register-backed controller
///
/// ```ignore
/// impl SpiController for Spi1 {
///     fn start(&mut self, cmd: &UserCommand) {
///         self.regs.user2.write(cmd.opcode as u32 | (7 << 28));
///         self.regs.miso_dlen.write(cmd.miso_bitlen());
///         self.regs.mosi_dlen.write(cmd.mosi_bitlen());
///         self.regs.data_buf[0].write(cmd.mosi_data);
///         self.regs.cmd.write(CMD_USR);
///     }
///
///     fn is_complete(&mut self) -> bool {
///         self.regs.cmd.read() & CMD_USR == 0
///     }
///     // ...
/// }
/// ```
pub trait SpiController {
    /// Configure the fields that stay fixed while probing: an 8-bit command
    /// phase, no address phase and no dummy cycles
    fn prepare_user_commands(&mut self);

    /// Program the command, phase lengths and data word, then trigger the
    /// transaction
    ///
    /// The caller guarantees the previous transaction has completed and the
    /// command has passed [`UserCommand::validate`].
    fn start(&mut self, cmd: &UserCommand);

    /// Poll the controller's completion flag
    fn is_complete(&mut self) -> bool;

    /// Read the data word after completion
    ///
    /// Only meaningful when the command had a read phase.
    fn response(&mut self) -> u32;

    /// Switch the controller's flash read path to the given mode
    fn set_read_mode(&mut self, mode: ReadMode);
}

/// Flash idle check, normally provided by the boot ROM
///
/// Separate from [`SpiController`] because the executor never waits on the
/// flash itself; the enable sequence does so explicitly between phases.
pub trait FlashIdle {
    /// Returns true once the flash chip reports not-busy
    fn is_flash_idle(&mut self) -> bool;
}

impl<C: SpiController + ?Sized> SpiController for &mut C {
    fn prepare_user_commands(&mut self) {
        (**self).prepare_user_commands()
    }

    fn start(&mut self, cmd: &UserCommand) {
        (**self).start(cmd)
    }

    fn is_complete(&mut self) -> bool {
        (**self).is_complete()
    }

    fn response(&mut self) -> u32 {
        (**self).response()
    }

    fn set_read_mode(&mut self, mode: ReadMode) {
        (**self).set_read_mode(mode)
    }
}

impl<F: FlashIdle + ?Sized> FlashIdle for &mut F {
    fn is_flash_idle(&mut self) -> bool {
        (**self).is_flash_idle()
    }
}
