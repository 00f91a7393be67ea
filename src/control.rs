//! Channel Control Layer
//!
//! Semantic PSG operations built on [`RegisterInterface`]. Every operation
//! validates all of its parameters first and performs no register access
//! at all when any of them is out of range. Rejection is silent: nothing is
//! returned, the chip is simply left as it was.
//!
//! Multi-register values are written low-order first (fine tone before
//! rough tone, sustain low before high before shape), each group inside one
//! transaction.

use std::fmt;

use log::debug;

use crate::psg::fields::{
    split_sustain, TonePeriod, LEVEL_ENVELOPE_MODE, MAX_ENVELOPE_SHAPE, MAX_LEVEL,
    MAX_NOISE_PERIOD,
};
use crate::psg::{Channel, MixerFlags, PsgHost, Register, RegisterBank, RegisterInterface};

/// An on/off switch for a mixer output
///
/// Built from a `bool`, or checked from a raw `u8` where only 0 and 1 are
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Toggle(bool);

/// Raw toggle value other than 0 or 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid toggle value {0}")]
pub struct InvalidToggle(pub u8);

impl Toggle {
    /// Output enabled
    pub const ON: Toggle = Toggle(true);
    /// Output disabled
    pub const OFF: Toggle = Toggle(false);

    /// Whether the output should play
    pub fn is_on(self) -> bool {
        self.0
    }
}

impl From<bool> for Toggle {
    fn from(on: bool) -> Self {
        Toggle(on)
    }
}

impl TryFrom<u8> for Toggle {
    type Error = InvalidToggle;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Toggle::OFF),
            1 => Ok(Toggle::ON),
            other => Err(InvalidToggle(other)),
        }
    }
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "on" } else { "off" })
    }
}

/// Validated channel-level control of one PSG
///
/// Channel arguments accept either a [`Channel`] or a raw `u8` index; raw
/// indices outside 0-2 make the call a no-op.
#[derive(Debug)]
pub struct SoundControl<H: PsgHost> {
    regs: RegisterInterface<H>,
}

impl<H: PsgHost> SoundControl<H> {
    /// Control the PSG reachable through `host`
    pub fn new(host: H) -> Self {
        Self::from_interface(RegisterInterface::new(host))
    }

    /// Build on an existing register interface
    pub fn from_interface(regs: RegisterInterface<H>) -> Self {
        Self { regs }
    }

    /// Inspect the host between operations
    ///
    /// Register writes only go through the validated operations below.
    pub fn with_host<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        self.regs.with_host(f)
    }

    /// Give the host back
    pub fn into_inner(self) -> H {
        self.regs.into_inner()
    }

    /// Set a channel's 12-bit tone period (0-4095)
    pub fn set_tone<C: TryInto<Channel>>(&self, channel: C, tuning: u16) {
        let (Some(channel), Some(period)) = (checked_channel(channel), TonePeriod::new(tuning))
        else {
            debug!("set_tone rejected (tuning {tuning})");
            return;
        };
        self.regs.transaction(|tx| {
            tx.write(channel.fine_tone(), period.fine());
            tx.write(channel.rough_tone(), period.rough());
        });
    }

    /// Set a channel's static level (0-15)
    ///
    /// This also takes the channel out of envelope mode.
    pub fn set_volume<C: TryInto<Channel>>(&self, channel: C, level: u8) {
        let Some(channel) = checked_channel(channel).filter(|_| level <= MAX_LEVEL) else {
            debug!("set_volume rejected (level {level})");
            return;
        };
        self.regs.transaction(|tx| tx.write(channel.level(), level));
    }

    /// Hand a channel's level over to the envelope generator
    ///
    /// Overwrites any static level previously set on the channel.
    pub fn enable_envelope<C: TryInto<Channel>>(&self, channel: C) {
        let Some(channel) = checked_channel(channel) else {
            debug!("enable_envelope rejected");
            return;
        };
        self.regs
            .transaction(|tx| tx.write(channel.level(), LEVEL_ENVELOPE_MODE));
    }

    /// Set the shared noise period (0-31)
    pub fn set_noise(&self, tuning: u8) {
        if tuning > MAX_NOISE_PERIOD {
            debug!("set_noise rejected (tuning {tuning})");
            return;
        }
        self.regs
            .transaction(|tx| tx.write(Register::NoiseFreq, tuning & MAX_NOISE_PERIOD));
    }

    /// Program the envelope generator: shape 0-15 and a 16-bit sustain period
    ///
    /// An invalid shape writes nothing, sustain included.
    pub fn set_envelope(&self, shape: u8, sustain: u16) {
        if shape > MAX_ENVELOPE_SHAPE {
            debug!("set_envelope rejected (shape {shape})");
            return;
        }
        let (fine, rough) = split_sustain(sustain);
        self.regs.transaction(|tx| {
            tx.write(Register::EnvelopeFine, fine);
            tx.write(Register::EnvelopeRough, rough);
            tx.write(Register::EnvelopeShape, shape);
        });
    }

    /// Gate a channel's tone and noise outputs
    ///
    /// Read-modify-write of R7 that touches only this channel's two bits.
    pub fn enable_channel<C, T, N>(&self, channel: C, tone_on: T, noise_on: N)
    where
        C: TryInto<Channel>,
        T: TryInto<Toggle>,
        N: TryInto<Toggle>,
    {
        let (Some(channel), Ok(tone), Ok(noise)) = (
            checked_channel(channel),
            tone_on.try_into(),
            noise_on.try_into(),
        ) else {
            debug!("enable_channel rejected");
            return;
        };
        self.regs.transaction(|tx| {
            let current = tx.read(Register::MixerCtrl);
            let next = MixerFlags::apply(current, channel, tone.is_on(), noise.is_on());
            tx.write(Register::MixerCtrl, next);
        });
    }

    /// Silence a channel: level 0, tone and noise gated off
    pub fn disable_channel<C: TryInto<Channel>>(&self, channel: C) {
        let Some(channel) = checked_channel(channel) else {
            debug!("disable_channel rejected");
            return;
        };
        self.set_volume(channel, 0);
        self.enable_channel(channel, Toggle::OFF, Toggle::OFF);
    }

    /// Zero every level and close every mixer gate, in one transaction
    pub fn stop_all_sound(&self) {
        self.regs.transaction(|tx| {
            for channel in Channel::ALL {
                tx.write(channel.level(), 0);
            }
            let current = tx.read(Register::MixerCtrl);
            tx.write(
                Register::MixerCtrl,
                current | MixerFlags::ALL_DISABLED.bits(),
            );
        });
    }

    /// Current tone period of a channel
    pub fn tone(&self, channel: Channel) -> TonePeriod {
        self.regs.transaction(|tx| {
            let fine = tx.read(channel.fine_tone());
            let rough = tx.read(channel.rough_tone());
            TonePeriod::from_registers(fine, rough)
        })
    }

    /// Current mixer gates
    pub fn mixer(&self) -> MixerFlags {
        MixerFlags::from_register(self.regs.read_register(Register::MixerCtrl.addr()))
    }

    /// Read all 16 registers in one transaction
    pub fn snapshot(&self) -> RegisterBank {
        self.regs.transaction(|tx| {
            let mut bank = RegisterBank::new();
            for reg in Register::ALL {
                bank.write(reg.addr(), tx.read(reg));
            }
            bank
        })
    }
}

fn checked_channel<C: TryInto<Channel>>(channel: C) -> Option<Channel> {
    channel.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::psg::{MemoryPsg, RegisterWrite};

    fn control() -> SoundControl<MemoryPsg> {
        SoundControl::new(MemoryPsg::new())
    }

    fn writes(ctl: &SoundControl<MemoryPsg>) -> Vec<RegisterWrite> {
        ctl.with_host(|psg| psg.writes().to_vec())
    }

    fn w(register: Register, value: u8) -> RegisterWrite {
        RegisterWrite {
            register: register.addr(),
            value,
        }
    }

    #[test]
    fn test_set_tone_writes_fine_then_rough() {
        let ctl = control();
        ctl.set_tone(Channel::B, 0x0ABC);
        assert_eq!(
            writes(&ctl),
            vec![w(Register::ChBFineTone, 0xBC), w(Register::ChBRoughTone, 0x0A)]
        );
        assert_eq!(ctl.tone(Channel::B).value(), 0x0ABC);
    }

    #[test]
    fn test_set_tone_every_valid_tuning() {
        for ch in Channel::ALL {
            for tuning in (0..=4095u16).step_by(7).chain([4095]) {
                let ctl = control();
                ctl.set_tone(ch, tuning);
                assert_eq!(
                    writes(&ctl),
                    vec![
                        w(ch.fine_tone(), (tuning & 0xFF) as u8),
                        w(ch.rough_tone(), ((tuning >> 8) & 0x0F) as u8),
                    ]
                );
            }
        }
    }

    #[test]
    fn test_set_tone_rejects_out_of_range() {
        let ctl = control();
        ctl.set_tone(Channel::A, 4096);
        ctl.set_tone(Channel::C, u16::MAX);
        ctl.set_tone(3u8, 100);
        assert!(writes(&ctl).is_empty());
    }

    #[test]
    fn test_raw_channel_index_accepted() {
        let ctl = control();
        ctl.set_volume(2u8, 9);
        assert_eq!(writes(&ctl), vec![w(Register::ChCLevel, 9)]);
    }

    #[test]
    fn test_set_volume_range() {
        let ctl = control();
        ctl.set_volume(Channel::A, 16);
        assert!(writes(&ctl).is_empty());
        ctl.set_volume(Channel::A, 15);
        assert_eq!(writes(&ctl), vec![w(Register::ChALevel, 15)]);
    }

    #[test]
    fn test_enable_envelope_overrides_volume() {
        let ctl = control();
        ctl.set_volume(Channel::C, 12);
        ctl.enable_envelope(Channel::C);
        assert_eq!(ctl.snapshot().get(Register::ChCLevel), 0x10);
        ctl.enable_envelope(7u8);
        assert_eq!(writes(&ctl).len(), 2);
    }

    #[test]
    fn test_set_noise_range() {
        let ctl = control();
        ctl.set_noise(32);
        assert!(writes(&ctl).is_empty());
        ctl.set_noise(31);
        assert_eq!(writes(&ctl), vec![w(Register::NoiseFreq, 31)]);
    }

    #[test]
    fn test_set_envelope_order() {
        let ctl = control();
        ctl.set_envelope(0x0E, 0x1234);
        assert_eq!(
            writes(&ctl),
            vec![
                w(Register::EnvelopeFine, 0x34),
                w(Register::EnvelopeRough, 0x12),
                w(Register::EnvelopeShape, 0x0E),
            ]
        );
    }

    #[test]
    fn test_set_envelope_invalid_shape_writes_nothing() {
        let ctl = control();
        let before = ctl.snapshot();
        ctl.set_envelope(16, 0xFFFF);
        assert!(writes(&ctl).is_empty());
        assert_eq!(ctl.snapshot(), before);
    }

    #[test]
    fn test_enable_channel_active_low() {
        let ctl = control();
        ctl.enable_channel(Channel::A, true, false);
        let mixer = ctl.mixer();
        assert!(mixer.is_tone_enabled(Channel::A));
        assert!(!mixer.is_noise_enabled(Channel::A));
        assert_eq!(ctl.snapshot().get(Register::MixerCtrl), 0x3E);

        ctl.enable_channel(Channel::C, Toggle::ON, Toggle::ON);
        assert_eq!(ctl.snapshot().get(Register::MixerCtrl), 0x1A);
    }

    #[test]
    fn test_enable_channel_leaves_other_channels() {
        for prior in [0x00u8, 0x3F, 0x15, 0x2A, 0xC7] {
            for ch in Channel::ALL {
                let mut bank = RegisterBank::new();
                bank.write(Register::MixerCtrl.addr(), prior);
                let ctl = SoundControl::new(MemoryPsg::with_registers(bank));

                ctl.enable_channel(ch, true, false);

                let others = !MixerFlags::channel(ch).bits();
                let after = ctl.snapshot().get(Register::MixerCtrl);
                assert_eq!(after & others, prior & others, "channel {ch}, prior {prior:#04x}");
            }
        }
    }

    #[test]
    fn test_enable_channel_rejects_non_boolean_toggle() {
        let ctl = control();
        ctl.enable_channel(Channel::A, 2u8, 0u8);
        ctl.enable_channel(Channel::A, 1u8, 2u8);
        ctl.enable_channel(Channel::A, 0u8, 7u8);
        ctl.enable_channel(5u8, true, true);
        assert!(writes(&ctl).is_empty());

        ctl.enable_channel(Channel::A, 1u8, 0u8);
        assert_eq!(writes(&ctl), vec![w(Register::MixerCtrl, 0x3E)]);
    }

    #[test]
    fn test_disable_channel() {
        let ctl = control();
        ctl.set_volume(Channel::B, 15);
        ctl.enable_channel(Channel::B, true, true);
        ctl.disable_channel(Channel::B);
        let bank = ctl.snapshot();
        assert_eq!(bank.get(Register::ChBLevel), 0);
        assert_eq!(bank.get(Register::MixerCtrl) & 0x12, 0x12);
    }

    #[test]
    fn test_stop_all_sound_from_any_state() {
        let mut bank = RegisterBank::new();
        bank.write(Register::ChALevel.addr(), 0x10);
        bank.write(Register::ChBLevel.addr(), 0x0F);
        bank.write(Register::ChCLevel.addr(), 0x07);
        bank.write(Register::MixerCtrl.addr(), 0xC0);
        let ctl = SoundControl::new(MemoryPsg::with_registers(bank));

        ctl.stop_all_sound();

        let after = ctl.snapshot();
        for ch in Channel::ALL {
            assert_eq!(after.get(ch.level()), 0);
        }
        assert_eq!(after.get(Register::MixerCtrl), 0xFF);
        ctl.with_host(|psg| {
            // one elevation for stop_all_sound, one for snapshot
            assert_eq!(psg.elevations(), 2);
            assert!(!psg.is_supervisor());
        });
    }

    #[test]
    fn test_toggle_conversions() {
        assert_eq!(Toggle::try_from(0u8), Ok(Toggle::OFF));
        assert_eq!(Toggle::try_from(1u8), Ok(Toggle::ON));
        assert_eq!(Toggle::try_from(2u8), Err(InvalidToggle(2)));
        assert!(Toggle::from(true).is_on());
        assert_eq!(Toggle::OFF.to_string(), "off");
    }

    #[test]
    fn test_with_host_is_read_only() {
        let ctl = control();
        ctl.set_volume(Channel::B, 9);
        let before = ctl.snapshot();

        let seen = ctl.with_host(|psg| (psg.writes().len(), psg.elevations()));
        assert_eq!(seen, (1, 2));

        assert_eq!(ctl.snapshot(), before);
        ctl.with_host(|psg| {
            assert_eq!(psg.writes().len(), 1);
            assert!(!psg.is_supervisor());
        });
    }
}
