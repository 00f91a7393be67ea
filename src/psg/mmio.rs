//! Memory-mapped PSG ports
//!
//! Volatile byte access at fixed addresses. On the ATARI ST the select latch
//! is at `$FF8800` (which also reads back the selected register) and the
//! write-data port at `$FF8802`.

use crate::config::PsgConfig;

use super::host::{Port, PortIo, Privilege};

/// PSG ports mapped into the address space
///
/// Privilege handling is delegated to `V`, which knows how the platform
/// switches modes (a TOS `Super()` trap, or nothing at all on bare metal).
#[derive(Debug)]
pub struct MmioPorts<V> {
    select: *mut u8,
    write_data: *mut u8,
    read_data: *const u8,
    privilege: V,
}

// SAFETY: the pointers are fixed device addresses, not aliases of Rust-owned
// memory; exclusive use is enforced by the RegisterInterface mutex.
unsafe impl<V: Send> Send for MmioPorts<V> {}

impl<V: Privilege> MmioPorts<V> {
    /// Map the ports described by `config`
    ///
    /// # Safety
    ///
    /// The three addresses must be valid for volatile byte access for the
    /// whole lifetime of the returned value, and nothing else may drive the
    /// same ports concurrently.
    pub unsafe fn new(config: &PsgConfig, privilege: V) -> Self {
        Self {
            select: config.select_port as *mut u8,
            write_data: config.write_port as *mut u8,
            read_data: config.read_port as *const u8,
            privilege,
        }
    }
}

impl<V> PortIo for MmioPorts<V> {
    fn read_port(&mut self, port: Port) -> u8 {
        match port {
            // SAFETY: address validity is a precondition of `MmioPorts::new`
            Port::Data => unsafe { self.read_data.read_volatile() },
            Port::Select => 0xFF,
        }
    }

    fn write_port(&mut self, port: Port, value: u8) {
        let target = match port {
            Port::Select => self.select,
            Port::Data => self.write_data,
        };
        // SAFETY: address validity is a precondition of `MmioPorts::new`
        unsafe { target.write_volatile(value) }
    }
}

impl<V: Privilege> Privilege for MmioPorts<V> {
    type Saved = V::Saved;

    fn is_privileged(&self) -> bool {
        self.privilege.is_privileged()
    }

    fn elevate(&mut self) -> V::Saved {
        self.privilege.elevate()
    }

    fn restore(&mut self, saved: V::Saved) {
        self.privilege.restore(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::psg::host::AlwaysPrivileged;
    use crate::psg::RegisterInterface;

    #[test]
    fn test_ports_hit_configured_addresses() {
        let mut window = [0u8; 4];
        let base = window.as_mut_ptr() as usize;
        let config = PsgConfig {
            select_port: base,
            write_port: base + 2,
            read_port: base,
            ..PsgConfig::default()
        };

        {
            let ports = unsafe { MmioPorts::new(&config, AlwaysPrivileged) };
            let regs = RegisterInterface::new(ports);
            regs.write_register(9, 0x0C);
        }

        assert_eq!(window, [9, 0, 0x0C, 0]);
    }

    #[test]
    fn test_out_of_range_never_touches_ports() {
        let mut window = [0x55u8; 4];
        let base = window.as_mut_ptr() as usize;
        let config = PsgConfig {
            select_port: base,
            write_port: base + 2,
            read_port: base,
            ..PsgConfig::default()
        };

        {
            let ports = unsafe { MmioPorts::new(&config, AlwaysPrivileged) };
            let regs = RegisterInterface::new(ports);
            regs.write_register(16, 0x00);
            assert_eq!(regs.read_register(200), 0);
        }

        assert_eq!(window, [0x55; 4]);
    }
}
