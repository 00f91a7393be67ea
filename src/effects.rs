//! Sound effects
//!
//! Each effect replays one tone plus one envelope setup on a single channel:
//! disable the channel, set its tone, open its mixer gates, hand its level
//! to the envelope generator, then program the envelope.
//!
//! The death cue is the only stateful effect. It steps through three
//! falling notes, one per call, and wraps back to the first. Its position
//! lives in a [`DeathCue`] owned by the caller.

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::control::{SoundControl, Toggle};
use crate::psg::{Channel, PsgHost};
use crate::SfxError;

/// Envelope shape used by every built-in effect: single decay, then silence
pub const DECAY_SHAPE: u8 = 0x00;

/// A single-channel tone + envelope setup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectPatch {
    /// Channel the effect plays on
    pub channel: Channel,
    /// 12-bit tone period
    pub tone: u16,
    /// Noise period, when the effect mixes in noise
    pub noise: Option<u8>,
    /// Envelope shape code
    pub shape: u8,
    /// Envelope sustain period
    pub sustain: u16,
}

impl EffectPatch {
    /// Replay this patch through `control`
    pub fn play<H: PsgHost>(&self, control: &SoundControl<H>) {
        control.disable_channel(self.channel);
        control.set_tone(self.channel, self.tone);
        match self.noise {
            Some(noise) => {
                control.set_noise(noise);
                control.enable_channel(self.channel, Toggle::ON, Toggle::ON);
            }
            None => control.enable_channel(self.channel, Toggle::ON, Toggle::OFF),
        }
        control.enable_envelope(self.channel);
        control.set_envelope(self.shape, self.sustain);
    }
}

/// The three notes of the death cue, in playing order
pub const DEATH_NOTES: [EffectPatch; 3] = [
    EffectPatch {
        channel: Channel::A,
        tone: 0x1DE,
        noise: None,
        shape: DECAY_SHAPE,
        sustain: 0x0A00,
    },
    EffectPatch {
        channel: Channel::A,
        tone: 0x238,
        noise: None,
        shape: DECAY_SHAPE,
        sustain: 0x1400,
    },
    EffectPatch {
        channel: Channel::A,
        tone: 0x2CC,
        noise: None,
        shape: DECAY_SHAPE,
        sustain: 0x3000,
    },
];

const DEATH_FIRST: u8 = 3;

/// Position in the three-note death cue
///
/// The counter runs 3, 2, 1 and wraps back to 3. It only changes when the
/// cue is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathCue {
    counter: u8,
}

impl DeathCue {
    /// A cue that starts with its first note
    pub fn new() -> Self {
        Self {
            counter: DEATH_FIRST,
        }
    }

    /// Resume from a stored counter
    ///
    /// Counters outside 1-3 are kept as-is and make [`DeathCue::play`] a no-op.
    pub fn with_counter(counter: u8) -> Self {
        Self { counter }
    }

    /// Raw counter (3 = first note next, 1 = last note next)
    pub fn counter(&self) -> u8 {
        self.counter
    }

    /// Patch that the next call to [`DeathCue::play`] will use
    pub fn next_note(&self) -> Option<EffectPatch> {
        let index = match self.counter {
            3 => 0,
            2 => 1,
            1 => 2,
            _ => return None,
        };
        Some(DEATH_NOTES[index])
    }

    /// Play the next note and advance
    pub fn play<H: PsgHost>(&mut self, control: &SoundControl<H>) {
        let Some(note) = self.next_note() else {
            debug!("death cue counter {} out of range, not playing", self.counter);
            return;
        };
        note.play(control);
        self.counter = match self.counter {
            1 => DEATH_FIRST,
            n => n - 1,
        };
    }
}

impl Default for DeathCue {
    fn default() -> Self {
        Self::new()
    }
}

/// Stateless one-shot effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    /// Player hurt
    Pain,
    /// Footstep
    Walk,
    /// Train horn, tone plus noise
    TrainHorn,
    /// Item pickup
    Collect,
    /// Short UI beep
    Beep,
}

impl Effect {
    /// Every one-shot effect
    pub const ALL: [Effect; 5] = [
        Effect::Pain,
        Effect::Walk,
        Effect::TrainHorn,
        Effect::Collect,
        Effect::Beep,
    ];

    /// Name accepted by [`FromStr`]
    pub fn name(self) -> &'static str {
        match self {
            Effect::Pain => "pain",
            Effect::Walk => "walk",
            Effect::TrainHorn => "train",
            Effect::Collect => "collect",
            Effect::Beep => "beep",
        }
    }

    /// Register setup of this effect
    pub fn patch(self) -> EffectPatch {
        match self {
            Effect::Pain => EffectPatch {
                channel: Channel::A,
                tone: 0xC00,
                noise: None,
                shape: DECAY_SHAPE,
                sustain: 0x0600,
            },
            Effect::Walk => EffectPatch {
                channel: Channel::B,
                tone: 0x900,
                noise: None,
                shape: DECAY_SHAPE,
                sustain: 0x0200,
            },
            Effect::TrainHorn => EffectPatch {
                channel: Channel::C,
                tone: 0x200,
                noise: Some(0x1F),
                shape: DECAY_SHAPE,
                sustain: 0x2800,
            },
            Effect::Collect => EffectPatch {
                channel: Channel::B,
                tone: 0x050,
                noise: None,
                shape: DECAY_SHAPE,
                sustain: 0x0900,
            },
            Effect::Beep => EffectPatch {
                channel: Channel::A,
                tone: 0x0FE,
                noise: None,
                shape: DECAY_SHAPE,
                sustain: 0x0400,
            },
        }
    }

    /// Play the effect through `control`
    pub fn play<H: PsgHost>(self, control: &SoundControl<H>) {
        self.patch().play(control);
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Effect {
    type Err = SfxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Effect::ALL
            .into_iter()
            .find(|effect| effect.name() == lower)
            .ok_or_else(|| SfxError::UnknownEffect(s.to_string()))
    }
}

/// Name of the stateful death cue in [`Sfx::trigger`]
pub const DEATH_NAME: &str = "death";

/// Effect library with its sequencing state
///
/// Owns the death cue position so that any number of independent players
/// can coexist.
#[derive(Debug, Clone, Default)]
pub struct Sfx {
    death: DeathCue,
}

impl Sfx {
    /// Fresh library; the death cue starts at its first note
    pub fn new() -> Self {
        Self::default()
    }

    /// Current death cue position
    pub fn death_cue(&self) -> &DeathCue {
        &self.death
    }

    /// Play the next death cue note
    pub fn death<H: PsgHost>(&mut self, control: &SoundControl<H>) {
        self.death.play(control);
    }

    /// Play a one-shot effect; never touches the death cue position
    pub fn play<H: PsgHost>(&self, effect: Effect, control: &SoundControl<H>) {
        effect.play(control);
    }

    /// Play an effect by name (`death`, `pain`, `walk`, `train`, `collect`, `beep`)
    pub fn trigger<H: PsgHost>(
        &mut self,
        name: &str,
        control: &SoundControl<H>,
    ) -> crate::Result<()> {
        if name.eq_ignore_ascii_case(DEATH_NAME) {
            self.death(control);
        } else {
            self.play(name.parse()?, control);
        }
        Ok(())
    }
}
