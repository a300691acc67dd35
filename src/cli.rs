//! CLI argument parsing

use clap::{Args, Parser, Subcommand};
use qioboot_core::spi::ReadMode;
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Parse a string as a hex or decimal u8
fn parse_hex_u8(s: &str) -> Result<u8, String> {
    let value = parse_hex_u32(s)?;
    u8::try_from(value).map_err(|_| format!("Value 0x{:X} does not fit in 8 bits", value))
}

/// Parse a string as a hex or decimal u16
fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let value = parse_hex_u32(s)?;
    u16::try_from(value).map_err(|_| format!("Value 0x{:X} does not fit in 16 bits", value))
}

#[derive(Parser)]
#[command(name = "qioboot")]
#[command(author, version, about = "SPI flash quad I/O enablement", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options for running the enable sequence on the simulated controller
#[derive(Args, Debug, Clone, Default)]
pub struct EnableArgs {
    /// Simulation file (TOML format)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// JEDEC manufacturer ID of the simulated chip (hex, e.g., 0xC2)
    #[arg(long, value_parser = parse_hex_u8)]
    pub mfg_id: Option<u8>,

    /// JEDEC device ID of the simulated chip (hex, e.g., 0x2016)
    #[arg(long, value_parser = parse_hex_u16)]
    pub device_id: Option<u16>,

    /// Initial status registers, SR2 in the high byte (hex, e.g., 0x0200)
    #[arg(long, value_parser = parse_hex_u16)]
    pub status: Option<u16>,

    /// Make status register writes have no effect
    #[arg(long)]
    pub read_only_status: bool,

    /// Read mode to apply on success [qio, qout]
    #[arg(long)]
    pub mode: Option<ReadMode>,

    /// Give up after this many polls (0 spins forever)
    #[arg(long, value_parser = parse_hex_u32)]
    pub poll_limit: Option<u32>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the quad I/O enable sequence against a simulated chip
    Enable(EnableArgs),

    /// Show which table record a JEDEC ID selects
    Lookup {
        /// JEDEC manufacturer ID (hex, e.g., 0xC8)
        #[arg(long, value_parser = parse_hex_u8)]
        mfg_id: u8,

        /// JEDEC device ID (hex, e.g., 0x4016)
        #[arg(long, value_parser = parse_hex_u16)]
        device_id: u16,
    },

    /// List the quad-enable chip table
    ListChips,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex_u32("0x10"), Ok(16));
        assert_eq!(parse_hex_u32("10"), Ok(10));
        assert_eq!(parse_hex_u8("0xC2"), Ok(0xC2));
        assert!(parse_hex_u8("0x1C2").is_err());
        assert_eq!(parse_hex_u16("0X4016"), Ok(0x4016));
        assert!(parse_hex_u16("zz").is_err());
    }

    #[test]
    fn test_parse_enable() {
        let cli = Cli::try_parse_from([
            "qioboot",
            "-v",
            "enable",
            "--mfg-id",
            "0xC2",
            "--device-id",
            "0x2016",
            "--mode",
            "qout",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Enable(args) => {
                assert_eq!(args.mfg_id, Some(0xC2));
                assert_eq!(args.device_id, Some(0x2016));
                assert_eq!(args.mode, Some(ReadMode::Qout));
                assert!(!args.read_only_status);
            }
            _ => panic!("expected enable"),
        }
    }
}
