//! Host capabilities needed to reach the PSG
//!
//! The chip sits behind two byte-wide ports: writing the select port latches
//! a register number, after which the data port reads or writes that
//! register. On the ATARI ST both ports live in supervisor-only I/O space,
//! so every access also needs the CPU in a privileged mode.

/// One of the two PSG ports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Port {
    /// Register select latch
    Select,
    /// Data port of the selected register
    Data,
}

/// Byte access to the select and data ports
pub trait PortIo {
    /// Read one byte from a port
    fn read_port(&mut self, port: Port) -> u8;

    /// Write one byte to a port
    fn write_port(&mut self, port: Port, value: u8);
}

/// Query, elevate and restore the privilege level needed for port access
pub trait Privilege {
    /// Opaque state returned by [`Privilege::elevate`], handed back to
    /// [`Privilege::restore`] (the saved user stack pointer on TOS)
    type Saved;

    /// Whether the caller already runs privileged
    fn is_privileged(&self) -> bool;

    /// Switch to privileged mode
    fn elevate(&mut self) -> Self::Saved;

    /// Return to the mode that was active before [`Privilege::elevate`]
    fn restore(&mut self, saved: Self::Saved);
}

/// Everything [`RegisterInterface`](super::RegisterInterface) needs from its host
pub trait PsgHost: PortIo + Privilege + Send {}

impl<T: PortIo + Privilege + Send> PsgHost for T {}

/// Privilege implementation for code that always runs in supervisor mode
/// (bare-metal targets, interrupt handlers)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysPrivileged;

impl Privilege for AlwaysPrivileged {
    type Saved = ();

    fn is_privileged(&self) -> bool {
        true
    }

    fn elevate(&mut self) {}

    fn restore(&mut self, _saved: ()) {}
}
