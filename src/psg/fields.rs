//! Bit-field packing for multi-register values
//!
//! Tone periods are 12 bits spread over a fine byte and a rough nibble.
//! Envelope sustain is a full 16-bit value split into two bytes.

/// Largest valid 12-bit tone period
pub const MAX_TONE_PERIOD: u16 = 0x0FFF;
/// Largest valid noise period (5 bits)
pub const MAX_NOISE_PERIOD: u8 = 0x1F;
/// Largest static level
pub const MAX_LEVEL: u8 = 0x0F;
/// Largest envelope shape code
pub const MAX_ENVELOPE_SHAPE: u8 = 0x0F;
/// Level register bit that hands the channel over to the envelope generator
pub const LEVEL_ENVELOPE_MODE: u8 = 0x10;

const ROUGH_TONE_MASK: u8 = 0x0F;

/// A validated 12-bit tone period
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TonePeriod(u16);

impl TonePeriod {
    /// Accepts periods 0-4095
    pub fn new(period: u16) -> Option<Self> {
        (period <= MAX_TONE_PERIOD).then_some(TonePeriod(period))
    }

    /// Rebuild a period from a fine/rough register pair
    ///
    /// The upper nibble of the rough register is not part of the period.
    pub fn from_registers(fine: u8, rough: u8) -> Self {
        TonePeriod((((rough & ROUGH_TONE_MASK) as u16) << 8) | fine as u16)
    }

    /// Raw 12-bit value
    pub fn value(self) -> u16 {
        self.0
    }

    /// Low byte, written to the fine tone register
    pub fn fine(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// High nibble, written to the rough tone register
    pub fn rough(self) -> u8 {
        ((self.0 >> 8) as u8) & ROUGH_TONE_MASK
    }

    /// Output frequency in Hz for a given master clock
    ///
    /// `None` for period 0, which the chip treats as silent.
    pub fn frequency(self, master_clock_hz: u32) -> Option<f32> {
        if self.0 == 0 {
            None
        } else {
            Some(master_clock_hz as f32 / (16.0 * self.0 as f32))
        }
    }

    /// Closest period for a frequency, `None` when it does not fit 12 bits
    pub fn from_frequency(freq_hz: f32, master_clock_hz: u32) -> Option<Self> {
        if !freq_hz.is_finite() || freq_hz <= 0.0 {
            return None;
        }
        let period = (master_clock_hz as f32 / (16.0 * freq_hz)).round();
        if !(1.0..=MAX_TONE_PERIOD as f32).contains(&period) {
            return None;
        }
        TonePeriod::new(period as u16)
    }
}

/// Split a 16-bit envelope sustain into (fine, rough) register bytes
pub fn split_sustain(sustain: u16) -> (u8, u8) {
    let [fine, rough] = sustain.to_le_bytes();
    (fine, rough)
}

/// Short label for an envelope shape code
pub fn envelope_shape_name(shape: u8) -> &'static str {
    match shape & MAX_ENVELOPE_SHAPE {
        0x00..=0x03 | 0x09 => "DECAY",
        0x04..=0x07 | 0x0F => "ATTACK",
        0x08 => "SAWDN",
        0x0A => "TRI",
        0x0B => "DECAY-HOLD",
        0x0C => "SAWUP",
        0x0D => "ATTACK-HOLD",
        0x0E => "TRI-INV",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tone_period_range() {
        assert!(TonePeriod::new(0).is_some());
        assert!(TonePeriod::new(4095).is_some());
        assert!(TonePeriod::new(4096).is_none());
        assert!(TonePeriod::new(u16::MAX).is_none());
    }

    #[test]
    fn test_tone_period_split() {
        let period = TonePeriod::new(0x0ABC).unwrap();
        assert_eq!(period.fine(), 0xBC);
        assert_eq!(period.rough(), 0x0A);
        assert_eq!(TonePeriod::from_registers(0xBC, 0xFA), period);
    }

    #[test]
    fn test_frequency_at_atari_clock() {
        // 2 MHz / (16 * 284) ~= 440 Hz
        let period = TonePeriod::new(284).unwrap();
        assert_relative_eq!(period.frequency(2_000_000).unwrap(), 440.14, epsilon = 0.01);
        assert_eq!(TonePeriod::new(0).unwrap().frequency(2_000_000), None);
    }

    #[test]
    fn test_from_frequency() {
        assert_eq!(
            TonePeriod::from_frequency(440.0, 2_000_000).map(TonePeriod::value),
            Some(284)
        );
        // 2 MHz / 16 / 4095 ~= 30.5 Hz is the lowest reachable pitch
        assert!(TonePeriod::from_frequency(20.0, 2_000_000).is_none());
        assert!(TonePeriod::from_frequency(0.0, 2_000_000).is_none());
        assert!(TonePeriod::from_frequency(f32::NAN, 2_000_000).is_none());
    }

    #[test]
    fn test_split_sustain() {
        assert_eq!(split_sustain(0x1234), (0x34, 0x12));
        assert_eq!(split_sustain(0x00FF), (0xFF, 0x00));
    }

    #[test]
    fn test_envelope_shape_names() {
        assert_eq!(envelope_shape_name(0x00), "DECAY");
        assert_eq!(envelope_shape_name(0x0C), "SAWUP");
        assert_eq!(envelope_shape_name(0x1A), "TRI");
    }
}
