//! Simulation file loading
//!
//! A simulation file describes the chip attached to the dummy controller and
//! the settings for the enable sequence:
//!
//! ```toml
//! [chip]
//! mfg_id = 0xC2
//! device_id = 0x2016
//! status = 0x0000
//!
//! [qio]
//! read_mode = "qout"
//! poll_limit = { bounded = 10000 }
//! ```

use std::path::{Path, PathBuf};

use qioboot_core::controller::PollLimit;
use qioboot_core::protocol::QioConfig;
use qioboot_dummy::{DummyConfig, Faults};
use serde::Deserialize;
use thiserror::Error;

use crate::cli::EnableArgs;

/// Poll bound used by the simulator unless told otherwise
pub const DEFAULT_SIM_POLLS: u32 = 100_000;

/// Errors loading a simulation file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the file
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML or has unknown fields
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Simulated chip description
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChipSim {
    pub mfg_id: u8,
    pub device_id: u16,
    pub status: u16,
    pub controller_latency: u32,
    pub write_busy_polls: u32,
    pub status_read_only: bool,
    pub controller_hang: bool,
    pub flash_hang: bool,
}

impl Default for ChipSim {
    fn default() -> Self {
        Self::from(DummyConfig::default())
    }
}

impl From<DummyConfig> for ChipSim {
    fn from(config: DummyConfig) -> Self {
        Self {
            mfg_id: config.manufacturer_id,
            device_id: config.device_id,
            status: config.status,
            controller_latency: config.controller_latency,
            write_busy_polls: config.write_busy_polls,
            status_read_only: config.faults.contains(Faults::STATUS_READ_ONLY),
            controller_hang: config.faults.contains(Faults::CONTROLLER_HANG),
            flash_hang: config.faults.contains(Faults::FLASH_HANG),
        }
    }
}

impl ChipSim {
    /// Build the dummy controller configuration
    pub fn to_dummy_config(&self) -> DummyConfig {
        let mut faults = Faults::empty();
        faults.set(Faults::STATUS_READ_ONLY, self.status_read_only);
        faults.set(Faults::CONTROLLER_HANG, self.controller_hang);
        faults.set(Faults::FLASH_HANG, self.flash_hang);

        DummyConfig {
            manufacturer_id: self.mfg_id,
            device_id: self.device_id,
            status: self.status,
            controller_latency: self.controller_latency,
            write_busy_polls: self.write_busy_polls,
            faults,
        }
    }
}

/// Complete simulation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub chip: ChipSim,
    pub qio: QioConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            chip: ChipSim::default(),
            qio: QioConfig::bounded(DEFAULT_SIM_POLLS),
        }
    }
}

impl SimConfig {
    /// Parse simulation settings from TOML text
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Load simulation settings from a TOML file
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the file named in `args` (if any) and apply flag overrides
    pub fn from_args(args: &EnableArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => {
                let config = Self::from_toml_file(path)?;
                log::info!("Loaded simulation from {}", path.display());
                config
            }
            None => Self::default(),
        };
        config.apply_overrides(args);
        Ok(config)
    }

    fn apply_overrides(&mut self, args: &EnableArgs) {
        if let Some(mfg_id) = args.mfg_id {
            self.chip.mfg_id = mfg_id;
        }
        if let Some(device_id) = args.device_id {
            self.chip.device_id = device_id;
        }
        if let Some(status) = args.status {
            self.chip.status = status;
        }
        if args.read_only_status {
            self.chip.status_read_only = true;
        }
        if let Some(mode) = args.mode {
            self.qio.read_mode = mode;
        }
        match args.poll_limit {
            Some(0) => self.qio.poll_limit = PollLimit::Unbounded,
            Some(n) => self.qio.poll_limit = PollLimit::Bounded(n),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qioboot_core::spi::ReadMode;

    #[test]
    fn test_defaults() {
        let config = SimConfig::from_toml_str("").unwrap();
        assert_eq!(config.chip.mfg_id, 0xC8);
        assert_eq!(config.qio.poll_limit, PollLimit::Bounded(DEFAULT_SIM_POLLS));
        assert!(config.chip.to_dummy_config().faults.is_empty());
    }

    #[test]
    fn test_parse_file_contents() {
        let config = SimConfig::from_toml_str(
            r#"
            [chip]
            mfg_id = 0xC2
            device_id = 0x2016
            status = 0x0040
            status_read_only = true

            [qio]
            read_mode = "qout"
            poll_limit = { bounded = 500 }
            "#,
        )
        .unwrap();

        assert_eq!(config.chip.mfg_id, 0xC2);
        assert_eq!(config.chip.device_id, 0x2016);
        assert_eq!(config.chip.status, 0x0040);
        assert_eq!(config.qio.read_mode, ReadMode::Qout);
        assert_eq!(config.qio.poll_limit, PollLimit::Bounded(500));

        let dummy = config.chip.to_dummy_config();
        assert_eq!(dummy.faults, Faults::STATUS_READ_ONLY);
    }

    #[test]
    fn test_unbounded_poll_limit() {
        let config = SimConfig::from_toml_str("[qio]\npoll_limit = \"unbounded\"\n").unwrap();
        assert_eq!(config.qio.poll_limit, PollLimit::Unbounded);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(SimConfig::from_toml_str("[chip]\nmanufacturer = 1\n").is_err());
    }

    #[test]
    fn test_overrides() {
        let args = EnableArgs {
            mfg_id: Some(0x9D),
            device_id: Some(0x4016),
            mode: Some(ReadMode::Qio),
            poll_limit: Some(0),
            read_only_status: true,
            ..Default::default()
        };
        let config = SimConfig::from_args(&args).unwrap();
        assert_eq!(config.chip.mfg_id, 0x9D);
        assert_eq!(config.chip.device_id, 0x4016);
        assert!(config.chip.status_read_only);
        assert_eq!(config.qio.read_mode, ReadMode::Qio);
        assert_eq!(config.qio.poll_limit, PollLimit::Unbounded);
    }

    #[test]
    fn test_missing_file() {
        let err = SimConfig::from_toml_file(Path::new("/nonexistent/sim.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
