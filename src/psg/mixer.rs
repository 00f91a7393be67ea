//! Mixer Control Register (R7)
//!
//! Six active-low gates: a set bit silences the tone or noise of a channel,
//! a clear bit lets it through. Bits 6-7 belong to the I/O port direction
//! and are never touched here.

use bitflags::bitflags;

use super::registers::Channel;

bitflags! {
    /// Mixer Control Register (R7) bitflags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MixerFlags: u8 {
        /// Channel A tone gate (1 = disable, 0 = enable)
        const CH_A_TONE = 0x01;
        /// Channel B tone gate
        const CH_B_TONE = 0x02;
        /// Channel C tone gate
        const CH_C_TONE = 0x04;
        /// Channel A noise gate (1 = disable, 0 = enable)
        const CH_A_NOISE = 0x08;
        /// Channel B noise gate
        const CH_B_NOISE = 0x10;
        /// Channel C noise gate
        const CH_C_NOISE = 0x20;

        /// Every tone and noise gate closed
        const ALL_DISABLED = 0x3F;
    }
}

impl MixerFlags {
    /// Create mixer flags from raw register value
    pub fn from_register(value: u8) -> Self {
        MixerFlags::from_bits_truncate(value)
    }

    /// Tone gate bit of a channel
    pub fn tone(channel: Channel) -> Self {
        match channel {
            Channel::A => MixerFlags::CH_A_TONE,
            Channel::B => MixerFlags::CH_B_TONE,
            Channel::C => MixerFlags::CH_C_TONE,
        }
    }

    /// Noise gate bit of a channel
    pub fn noise(channel: Channel) -> Self {
        match channel {
            Channel::A => MixerFlags::CH_A_NOISE,
            Channel::B => MixerFlags::CH_B_NOISE,
            Channel::C => MixerFlags::CH_C_NOISE,
        }
    }

    /// Both gate bits of a channel
    pub fn channel(channel: Channel) -> Self {
        Self::tone(channel) | Self::noise(channel)
    }

    /// Gate bits for the requested on/off state of one channel
    ///
    /// The result is active-low: an output that should play has its bit clear.
    pub fn gates(channel: Channel, tone_on: bool, noise_on: bool) -> Self {
        let mut flags = MixerFlags::empty();
        flags.set(Self::tone(channel), !tone_on);
        flags.set(Self::noise(channel), !noise_on);
        flags
    }

    /// Replace one channel's gates in a raw R7 value, keeping every other bit
    pub fn apply(register: u8, channel: Channel, tone_on: bool, noise_on: bool) -> u8 {
        (register & !Self::channel(channel).bits()) | Self::gates(channel, tone_on, noise_on).bits()
    }

    /// Check if a channel's tone reaches the output
    pub fn is_tone_enabled(&self, channel: Channel) -> bool {
        !self.contains(Self::tone(channel))
    }

    /// Check if a channel's noise reaches the output
    pub fn is_noise_enabled(&self, channel: Channel) -> bool {
        !self.contains(Self::noise(channel))
    }
}
