//! Host configuration
//!
//! Where the PSG ports live and what clock drives the chip. Nothing here is
//! persisted; callers build a `PsgConfig` in code or from the command line.

use crate::{Result, SfxError};

/// ATARI ST register select latch (also reads back the selected register)
pub const ATARI_SELECT_PORT: usize = 0xFF8800;
/// ATARI ST write-data port
pub const ATARI_WRITE_PORT: usize = 0xFF8802;
/// ATARI ST PSG master clock
pub const ATARI_MASTER_CLOCK: u32 = 2_000_000;

/// Port layout and clock of a PSG installation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PsgConfig {
    /// Address of the register select latch
    pub select_port: usize,
    /// Address written to store data into the selected register
    pub write_port: usize,
    /// Address read to fetch the selected register
    pub read_port: usize,
    /// Master clock in Hz, used to convert periods to frequencies
    pub master_clock_hz: u32,
}

impl PsgConfig {
    /// Same ports, different clock (ZX Spectrum 128 runs at 1.7734 MHz,
    /// MSX at 1.7897 MHz)
    pub fn with_clock(self, master_clock_hz: u32) -> Self {
        Self {
            master_clock_hz,
            ..self
        }
    }

    /// Reject layouts that cannot work
    pub fn validate(&self) -> Result<()> {
        if self.master_clock_hz == 0 {
            return Err(SfxError::Config("master clock must be non-zero".into()));
        }
        if self.select_port == self.write_port {
            return Err(SfxError::Config(format!(
                "select and write ports must differ (both {:#x})",
                self.select_port
            )));
        }
        if self.select_port == 0 || self.write_port == 0 || self.read_port == 0 {
            return Err(SfxError::Config("port addresses must be non-null".into()));
        }
        Ok(())
    }
}

impl Default for PsgConfig {
    fn default() -> Self {
        Self {
            select_port: ATARI_SELECT_PORT,
            write_port: ATARI_WRITE_PORT,
            read_port: ATARI_SELECT_PORT,
            master_clock_hz: ATARI_MASTER_CLOCK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_atari_layout() {
        let config = PsgConfig::default();
        assert_eq!(config.select_port, 0xFF8800);
        assert_eq!(config.write_port, 0xFF8802);
        assert_eq!(config.read_port, config.select_port);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_clock() {
        let err = PsgConfig::default().with_clock(0).validate().unwrap_err();
        assert!(matches!(err, SfxError::Config(_)));
    }

    #[test]
    fn test_validate_rejects_shared_ports() {
        let config = PsgConfig {
            write_port: ATARI_SELECT_PORT,
            ..PsgConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
