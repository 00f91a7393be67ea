//! YM2149 / AY-3-8910 sound-effect layer for the ATARI ST
//!
//! Register-safe control of the three square-wave channels of the PSG,
//! plus a small library of sound effects built on top of it.
//!
//! # Layers
//! - [`psg`]: raw register access through the two-port select/data protocol,
//!   guarded by a mutex and a scoped privilege acquisition
//! - [`control`]: semantic channel operations (tone, volume, noise, envelope,
//!   mixer gating, global mute) that validate every parameter before writing
//! - [`effects`]: named sound effects, including the three-note death cue
//!
//! Invalid parameters never produce an error: the operation is simply not
//! performed. Only configuration and the command line harness are fallible.
//!
//! # Quick start
//! ```
//! use ym2149_sfx::psg::MemoryPsg;
//! use ym2149_sfx::{Channel, DeathCue, SoundControl};
//!
//! let control = SoundControl::new(MemoryPsg::new());
//! control.set_tone(Channel::A, 0x1C0);
//! control.set_volume(Channel::A, 15);
//! control.enable_channel(Channel::A, true, false);
//!
//! let mut death = DeathCue::new();
//! death.play(&control); // first note
//! death.play(&control); // second note
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod control;
pub mod effects;
pub mod psg;

/// Errors from configuration and effect lookup
#[derive(thiserror::Error, Debug)]
pub enum SfxError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Effect name not known to the sequencer
    #[error("Unknown effect: {0}")]
    UnknownEffect(String),
}

/// Result type for fallible operations
pub type Result<T> = std::result::Result<T, SfxError>;

// Public API exports
pub use config::PsgConfig;
pub use control::{SoundControl, Toggle};
pub use effects::{DeathCue, Effect, EffectPatch, Sfx};
pub use psg::{Channel, MixerFlags, Register, RegisterBank, RegisterInterface};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let errors = [
            PsgConfig::default().with_clock(0).validate().unwrap_err(),
            "siren".parse::<Effect>().unwrap_err(),
        ];
        for err in &errors {
            match err {
                SfxError::Config(msg) => assert!(err.to_string().ends_with(msg.as_str())),
                SfxError::UnknownEffect(name) => assert_eq!(name, "siren"),
            }
        }
        assert_eq!(errors[1].to_string(), "Unknown effect: siren");
    }
}
