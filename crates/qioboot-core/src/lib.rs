//! qioboot-core - Boot-stage quad I/O enablement for SPI NOR flash
//!
//! This crate identifies the attached flash chip by its JEDEC ID, looks up
//! which status register bit enables quad I/O, sets that bit if needed and
//! switches the SPI controller's read path to a quad mode. It is `no_std`
//! and synchronous so it can run before any scheduler exists.
//!
//! # Features
//!
//! - `std` - Enable standard library support (serde derives, `std::error::Error`)
//! - `qout` - Apply quad-output (1-1-4) instead of quad-I/O (1-4-4)
//!
//! # Example
//!
//! ```ignore
//! use qioboot_core::protocol::{QioConfig, QioEnabler};
//!
//! fn boot<C: SpiController + FlashIdle>(controller: C) {
//!     let mut enabler = QioEnabler::new(controller, QioConfig::default());
//!     match enabler.enable() {
//!         Ok(report) => log::info!("{}: {:?}", report.chip.label(), report.outcome),
//!         Err(e) => log::error!("QIO enable failed: {}", e),
//!     }
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

pub mod chip;
pub mod controller;
pub mod error;
pub mod protocol;
pub mod spi;

pub use error::{Error, Result};
