//! In-memory PSG host
//!
//! Implements the same select-then-access protocol as the real ports on top
//! of a [`RegisterBank`], and keeps enough bookkeeping (write journal,
//! privilege transitions, unprivileged accesses) to verify callers without
//! hardware.

use serde::{Deserialize, Serialize};

use super::host::{Port, PortIo, Privilege};
use super::mixer::MixerFlags;
use super::registers::{Register, RegisterBank};

/// One completed data-port write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterWrite {
    /// Register number that was selected
    pub register: u8,
    /// Value written
    pub value: u8,
}

/// Software stand-in for the PSG and its supervisor-only ports
#[derive(Debug, Clone)]
pub struct MemoryPsg {
    bank: RegisterBank,
    selected: Option<Register>,
    privileged: bool,
    elevations: usize,
    restores: usize,
    violations: usize,
    journal: Vec<RegisterWrite>,
}

impl MemoryPsg {
    /// Power-on state: every gate in R7 closed, all other registers 0,
    /// caller in user mode
    pub fn new() -> Self {
        let mut bank = RegisterBank::new();
        bank.write(Register::MixerCtrl.addr(), MixerFlags::ALL_DISABLED.bits());
        Self::with_registers(bank)
    }

    /// Start from an arbitrary register image
    pub fn with_registers(bank: RegisterBank) -> Self {
        Self {
            bank,
            selected: None,
            privileged: false,
            elevations: 0,
            restores: 0,
            violations: 0,
            journal: Vec::new(),
        }
    }

    /// Start already in supervisor mode, so no elevation is ever needed
    pub fn privileged(mut self) -> Self {
        self.privileged = true;
        self
    }

    /// Current register image
    pub fn registers(&self) -> &RegisterBank {
        &self.bank
    }

    /// Data-port writes in the order they happened
    pub fn writes(&self) -> &[RegisterWrite] {
        &self.journal
    }

    /// Number of user-to-supervisor transitions performed
    pub fn elevations(&self) -> usize {
        self.elevations
    }

    /// Number of transitions back to the saved mode
    pub fn restores(&self) -> usize {
        self.restores
    }

    /// Port accesses attempted outside supervisor mode
    pub fn violations(&self) -> usize {
        self.violations
    }

    /// Whether the simulated CPU is currently privileged
    pub fn is_supervisor(&self) -> bool {
        self.privileged
    }

    fn check_privilege(&mut self) -> bool {
        if !self.privileged {
            self.violations += 1;
        }
        self.privileged
    }
}

impl Default for MemoryPsg {
    fn default() -> Self {
        Self::new()
    }
}

impl PortIo for MemoryPsg {
    fn read_port(&mut self, port: Port) -> u8 {
        if !self.check_privilege() {
            return 0xFF;
        }
        match (port, self.selected) {
            (Port::Data, Some(reg)) => self.bank.get(reg),
            _ => 0xFF,
        }
    }

    fn write_port(&mut self, port: Port, value: u8) {
        if !self.check_privilege() {
            return;
        }
        match port {
            Port::Select => self.selected = Register::from_addr(value),
            Port::Data => {
                if let Some(reg) = self.selected {
                    self.bank.write(reg.addr(), value);
                    self.journal.push(RegisterWrite {
                        register: reg.addr(),
                        value,
                    });
                }
            }
        }
    }
}

impl Privilege for MemoryPsg {
    /// Mode that was active before elevation
    type Saved = bool;

    fn is_privileged(&self) -> bool {
        self.privileged
    }

    fn elevate(&mut self) -> bool {
        let previous = self.privileged;
        self.privileged = true;
        self.elevations += 1;
        previous
    }

    fn restore(&mut self, saved: bool) {
        self.privileged = saved;
        self.restores += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_on_state() {
        let psg = MemoryPsg::new();
        assert_eq!(psg.registers().get(Register::MixerCtrl), 0x3F);
        assert!(!psg.is_supervisor());
        assert!(psg.writes().is_empty());
    }

    #[test]
    fn test_select_then_write() {
        let mut psg = MemoryPsg::new().privileged();
        psg.write_port(Port::Select, 8);
        psg.write_port(Port::Data, 0x0F);
        assert_eq!(psg.registers().get(Register::ChALevel), 0x0F);
        assert_eq!(psg.read_port(Port::Data), 0x0F);
        assert_eq!(
            psg.writes(),
            &[RegisterWrite {
                register: 8,
                value: 0x0F
            }]
        );
    }

    #[test]
    fn test_invalid_select_drops_data() {
        let mut psg = MemoryPsg::new().privileged();
        psg.write_port(Port::Select, 16);
        psg.write_port(Port::Data, 0xAA);
        assert!(psg.writes().is_empty());
        assert_eq!(psg.read_port(Port::Data), 0xFF);
    }

    #[test]
    fn test_unprivileged_access_is_refused() {
        let mut psg = MemoryPsg::new();
        psg.write_port(Port::Select, 0);
        psg.write_port(Port::Data, 0x12);
        assert_eq!(psg.violations(), 2);
        assert_eq!(psg.registers().get(Register::ChAFineTone), 0);
    }

    #[test]
    fn test_elevate_restore_round_trip() {
        let mut psg = MemoryPsg::new();
        let saved = psg.elevate();
        assert!(psg.is_privileged());
        psg.restore(saved);
        assert!(!psg.is_privileged());
        assert_eq!((psg.elevations(), psg.restores()), (1, 1));
    }
}
