//! YM2149 Register Definitions
//!
//! The 16 registers (R0-R13, R14-R15 for I/O ports) reachable through the
//! select/data port pair, and the three channels that own a subset of them.

use std::fmt;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

/// Number of addressable registers
pub const REGISTER_COUNT: usize = 16;

/// YM2149 Register Address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
pub enum Register {
    /// Channel A fine tone - R0
    ChAFineTone = 0x00,
    /// Channel A rough tone (low nibble) - R1
    ChARoughTone = 0x01,
    /// Channel B fine tone - R2
    ChBFineTone = 0x02,
    /// Channel B rough tone - R3
    ChBRoughTone = 0x03,
    /// Channel C fine tone - R4
    ChCFineTone = 0x04,
    /// Channel C rough tone - R5
    ChCRoughTone = 0x05,
    /// Noise frequency (5 bits) - R6
    NoiseFreq = 0x06,
    /// Mixer control, active-low tone/noise gates - R7
    MixerCtrl = 0x07,
    /// Channel A level - R8
    ChALevel = 0x08,
    /// Channel B level - R9
    ChBLevel = 0x09,
    /// Channel C level - R10
    ChCLevel = 0x0A,
    /// Envelope sustain (low byte) - R11
    EnvelopeFine = 0x0B,
    /// Envelope sustain (high byte) - R12
    EnvelopeRough = 0x0C,
    /// Envelope shape - R13
    EnvelopeShape = 0x0D,
    /// I/O Port A - R14
    PortA = 0x0E,
    /// I/O Port B - R15
    PortB = 0x0F,
}

impl Register {
    /// Every register in address order
    pub const ALL: [Register; REGISTER_COUNT] = [
        Register::ChAFineTone,
        Register::ChARoughTone,
        Register::ChBFineTone,
        Register::ChBRoughTone,
        Register::ChCFineTone,
        Register::ChCRoughTone,
        Register::NoiseFreq,
        Register::MixerCtrl,
        Register::ChALevel,
        Register::ChBLevel,
        Register::ChCLevel,
        Register::EnvelopeFine,
        Register::EnvelopeRough,
        Register::EnvelopeShape,
        Register::PortA,
        Register::PortB,
    ];

    /// Convert a raw register number to a `Register`
    ///
    /// Unlike the chip's own address decoder this does not wrap:
    /// anything above 15 is `None`.
    pub fn from_addr(addr: u8) -> Option<Self> {
        Register::from_u8(addr)
    }

    /// Get the register address value
    pub fn addr(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Register::ChAFineTone => "Channel A Fine Tone",
            Register::ChARoughTone => "Channel A Rough Tone",
            Register::ChBFineTone => "Channel B Fine Tone",
            Register::ChBRoughTone => "Channel B Rough Tone",
            Register::ChCFineTone => "Channel C Fine Tone",
            Register::ChCRoughTone => "Channel C Rough Tone",
            Register::NoiseFreq => "Noise Frequency",
            Register::MixerCtrl => "Mixer Control",
            Register::ChALevel => "Channel A Level",
            Register::ChBLevel => "Channel B Level",
            Register::ChCLevel => "Channel C Level",
            Register::EnvelopeFine => "Envelope Sustain Low",
            Register::EnvelopeRough => "Envelope Sustain High",
            Register::EnvelopeShape => "Envelope Shape",
            Register::PortA => "I/O Port A",
            Register::PortB => "I/O Port B",
        };
        write!(f, "R{} ({})", self.addr(), name)
    }
}

/// One of the three tone channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
pub enum Channel {
    /// Channel A
    A = 0,
    /// Channel B
    B = 1,
    /// Channel C
    C = 2,
}

/// Raw channel index outside 0-2
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid channel index {0}")]
pub struct InvalidChannel(pub u8);

impl Channel {
    /// All channels in register order
    pub const ALL: [Channel; 3] = [Channel::A, Channel::B, Channel::C];

    /// Fine tone register (low 8 bits of the period)
    pub fn fine_tone(self) -> Register {
        match self {
            Channel::A => Register::ChAFineTone,
            Channel::B => Register::ChBFineTone,
            Channel::C => Register::ChCFineTone,
        }
    }

    /// Rough tone register (high 4 bits of the period)
    pub fn rough_tone(self) -> Register {
        match self {
            Channel::A => Register::ChARoughTone,
            Channel::B => Register::ChBRoughTone,
            Channel::C => Register::ChCRoughTone,
        }
    }

    /// Level register (static volume or envelope mode)
    pub fn level(self) -> Register {
        match self {
            Channel::A => Register::ChALevel,
            Channel::B => Register::ChBLevel,
            Channel::C => Register::ChCLevel,
        }
    }
}

impl TryFrom<u8> for Channel {
    type Error = InvalidChannel;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Channel::from_u8(index).ok_or(InvalidChannel(index))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Channel::A => "A",
            Channel::B => "B",
            Channel::C => "C",
        };
        f.write_str(name)
    }
}

/// Raw register bank (16 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterBank {
    /// Register values R0-R15
    pub registers: [u8; REGISTER_COUNT],
}

impl RegisterBank {
    /// Create a new register bank with all values set to 0
    pub fn new() -> Self {
        RegisterBank {
            registers: [0; REGISTER_COUNT],
        }
    }

    /// Read a register value, 0 for addresses outside R0-R15
    pub fn read(&self, addr: u8) -> u8 {
        self.registers.get(addr as usize).copied().unwrap_or(0)
    }

    /// Write a register value, ignored for addresses outside R0-R15
    pub fn write(&mut self, addr: u8, value: u8) {
        if let Some(slot) = self.registers.get_mut(addr as usize) {
            *slot = value;
        }
    }

    /// Read a named register
    pub fn get(&self, reg: Register) -> u8 {
        self.registers[reg.addr() as usize]
    }

    /// Get all registers as a slice
    pub fn as_slice(&self) -> &[u8; REGISTER_COUNT] {
        &self.registers
    }
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::new()
    }
}
