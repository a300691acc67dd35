//! Blocking user-command executor
//!
//! One transaction at a time: program, trigger, spin on the completion
//! flag, read back. The executor does not wait for the flash chip; callers
//! use [`wait_flash_idle`] before a phase that needs it.

use crate::error::{Error, Result};
use crate::spi::UserCommand;
use log::warn;

use super::{FlashIdle, SpiController};

/// Upper bound on busy-poll iterations
///
/// Boot firmware spins forever: nothing else can run yet and the hardware
/// answers within microseconds. Tests and host tools use `Bounded` so a
/// misbehaving simulation fails instead of hanging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum PollLimit {
    /// Spin until the condition holds
    #[default]
    Unbounded,
    /// Give up after this many polls
    Bounded(u32),
}

impl PollLimit {
    /// Poll `ready` until it returns true or the limit is used up
    ///
    /// Returns false only when a bounded limit was exhausted.
    pub fn poll_until<F: FnMut() -> bool>(self, mut ready: F) -> bool {
        match self {
            Self::Unbounded => loop {
                if ready() {
                    return true;
                }
                core::hint::spin_loop();
            },
            Self::Bounded(max_polls) => {
                for _ in 0..max_polls {
                    if ready() {
                        return true;
                    }
                    core::hint::spin_loop();
                }
                false
            }
        }
    }
}

/// Run a single user command and return the controller's data word
///
/// The returned word is masked to the read phase length; it is zero for
/// commands without a read phase.
pub fn execute<C: SpiController + ?Sized>(
    controller: &mut C,
    cmd: &UserCommand,
    limit: PollLimit,
) -> Result<u32> {
    cmd.validate()?;

    controller.start(cmd);
    if !limit.poll_until(|| controller.is_complete()) {
        warn!("SPI controller stuck on command 0x{:02X}", cmd.opcode);
        return Err(Error::ControllerTimeout { opcode: cmd.opcode });
    }

    if cmd.has_read() {
        Ok(controller.response() & cmd.miso_mask())
    } else {
        Ok(0)
    }
}

/// Send `opcode` with an optional write payload and read phase
///
/// A bit count of 0 disables the corresponding phase.
pub fn execute_flash_command<C: SpiController + ?Sized>(
    controller: &mut C,
    opcode: u8,
    write_value: u32,
    write_bits: u8,
    read_bits: u8,
    limit: PollLimit,
) -> Result<u32> {
    let cmd = UserCommand::new(opcode, write_value, write_bits, read_bits);
    execute(controller, &cmd, limit)
}

/// Block until the flash chip reports idle
pub fn wait_flash_idle<F: FlashIdle + ?Sized>(flash: &mut F, limit: PollLimit) -> Result<()> {
    if limit.poll_until(|| flash.is_flash_idle()) {
        Ok(())
    } else {
        warn!("Flash chip still busy after poll limit");
        Err(Error::FlashBusyTimeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spi::{opcodes, ReadMode};

    /// Completes after `latency` polls and echoes a fixed data word
    struct Scripted {
        latency: u32,
        remaining: u32,
        data: u32,
        started: Option<UserCommand>,
    }

    impl Scripted {
        fn new(latency: u32, data: u32) -> Self {
            Self {
                latency,
                remaining: 0,
                data,
                started: None,
            }
        }
    }

    impl SpiController for Scripted {
        fn prepare_user_commands(&mut self) {}

        fn start(&mut self, cmd: &UserCommand) {
            self.started = Some(*cmd);
            self.remaining = self.latency;
        }

        fn is_complete(&mut self) -> bool {
            if self.remaining == 0 {
                true
            } else {
                self.remaining -= 1;
                false
            }
        }

        fn response(&mut self) -> u32 {
            self.data
        }

        fn set_read_mode(&mut self, _mode: ReadMode) {}
    }

    #[test]
    fn test_poll_limit() {
        let mut n = 0;
        assert!(PollLimit::Bounded(5).poll_until(|| {
            n += 1;
            n == 3
        }));
        assert!(!PollLimit::Bounded(2).poll_until(|| false));
        assert!(!PollLimit::Bounded(0).poll_until(|| true));
        assert!(PollLimit::Unbounded.poll_until(|| true));
    }

    #[test]
    fn test_execute_masks_response() {
        let mut ctrl = Scripted::new(3, 0xAABB_CCDD);
        let data = execute_flash_command(&mut ctrl, opcodes::RDID, 0, 0, 24, PollLimit::Bounded(10))
            .unwrap();
        assert_eq!(data, 0x00BB_CCDD);
        assert_eq!(ctrl.started, Some(UserCommand::read_reg(opcodes::RDID, 24)));
    }

    #[test]
    fn test_execute_without_read_phase() {
        let mut ctrl = Scripted::new(0, 0xFFFF_FFFF);
        let data = execute(&mut ctrl, &UserCommand::simple(opcodes::WREN), PollLimit::Unbounded)
            .unwrap();
        assert_eq!(data, 0);
    }

    #[test]
    fn test_execute_timeout() {
        let mut ctrl = Scripted::new(100, 0);
        let err = execute(
            &mut ctrl,
            &UserCommand::read_reg(opcodes::RDSR, 8),
            PollLimit::Bounded(10),
        )
        .unwrap_err();
        assert_eq!(err, Error::ControllerTimeout { opcode: opcodes::RDSR });
    }

    #[test]
    fn test_execute_rejects_oversized_phase() {
        let mut ctrl = Scripted::new(0, 0);
        let err = execute_flash_command(&mut ctrl, opcodes::WRSR, 0, 33, 0, PollLimit::Unbounded)
            .unwrap_err();
        assert_eq!(err, Error::InvalidBitLength { bits: 33 });
        assert!(ctrl.started.is_none());
    }
}
