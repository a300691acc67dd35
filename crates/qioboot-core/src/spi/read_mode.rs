//! SPI controller read modes

use core::fmt;
use core::str::FromStr;

/// Read mode of the SPI controller's flash read path
///
/// Mirrors the modes the boot ROM's read-mode configuration accepts. Only
/// the two quad modes are ever applied by the enable sequence; the others
/// describe the state a controller may be left in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum ReadMode {
    /// Quad I/O: 1-4-4 (address and data on 4 lines)
    Qio,
    /// Quad Output: 1-1-4 (data phase on 4 lines)
    Qout,
    /// Dual I/O: 1-2-2
    Dio,
    /// Dual Output: 1-1-2
    Dout,
    /// Fast read on a single line
    #[default]
    #[cfg_attr(feature = "std", serde(rename = "fastrd"))]
    FastRead,
    /// Plain read on a single line
    #[cfg_attr(feature = "std", serde(rename = "slowrd"))]
    SlowRead,
}

impl ReadMode {
    /// The quad mode selected at build time via the `qout` feature
    pub const fn configured() -> Self {
        if cfg!(feature = "qout") {
            Self::Qout
        } else {
            Self::Qio
        }
    }

    /// Returns the number of data lines used for the address phase
    pub const fn addr_lines(&self) -> u8 {
        match self {
            Self::Qio => 4,
            Self::Dio => 2,
            Self::Qout | Self::Dout | Self::FastRead | Self::SlowRead => 1,
        }
    }

    /// Returns the number of data lines used for the data phase
    pub const fn data_lines(&self) -> u8 {
        match self {
            Self::Qio | Self::Qout => 4,
            Self::Dio | Self::Dout => 2,
            Self::FastRead | Self::SlowRead => 1,
        }
    }

    /// Returns true if this mode needs the flash's QE bit set
    pub const fn requires_quad(&self) -> bool {
        matches!(self, Self::Qio | Self::Qout)
    }

    /// Short lowercase name, as accepted by `FromStr`
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Qio => "qio",
            Self::Qout => "qout",
            Self::Dio => "dio",
            Self::Dout => "dout",
            Self::FastRead => "fastrd",
            Self::SlowRead => "slowrd",
        }
    }
}

impl fmt::Display for ReadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown read mode name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseReadModeError;

impl fmt::Display for ParseReadModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unknown read mode (expected qio, qout, dio, dout, fastrd or slowrd)")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseReadModeError {}

impl FromStr for ReadMode {
    type Err = ParseReadModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            Self::Qio,
            Self::Qout,
            Self::Dio,
            Self::Dout,
            Self::FastRead,
            Self::SlowRead,
        ]
        .into_iter()
        .find(|mode| s.eq_ignore_ascii_case(mode.name()))
        .ok_or(ParseReadModeError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_is_quad() {
        assert!(ReadMode::configured().requires_quad());
        #[cfg(feature = "qout")]
        assert_eq!(ReadMode::configured(), ReadMode::Qout);
        #[cfg(not(feature = "qout"))]
        assert_eq!(ReadMode::configured(), ReadMode::Qio);
    }

    #[test]
    fn test_lines() {
        assert_eq!(ReadMode::Qio.addr_lines(), 4);
        assert_eq!(ReadMode::Qout.addr_lines(), 1);
        assert_eq!(ReadMode::Qout.data_lines(), 4);
        assert_eq!(ReadMode::Dio.data_lines(), 2);
        assert!(!ReadMode::FastRead.requires_quad());
    }

    #[test]
    fn test_parse() {
        assert_eq!("qio".parse::<ReadMode>(), Ok(ReadMode::Qio));
        assert_eq!("QOUT".parse::<ReadMode>(), Ok(ReadMode::Qout));
        assert_eq!("quad".parse::<ReadMode>(), Err(ParseReadModeError));
    }
}
