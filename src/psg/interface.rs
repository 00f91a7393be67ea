//! Register Interface
//!
//! Raw access to R0-R15 through the select/data protocol. Each access runs
//! inside a [`Transaction`], which holds the host lock (so no other caller
//! can re-select between our select and our access) and a privilege scope
//! that is released on every exit path.

use log::trace;
use parking_lot::{Mutex, MutexGuard};

use super::host::{Port, PsgHost};
use super::registers::Register;

/// Serialized, privilege-scoped access to the 16 PSG registers
#[derive(Debug)]
pub struct RegisterInterface<H: PsgHost> {
    host: Mutex<H>,
}

impl<H: PsgHost> RegisterInterface<H> {
    /// Wrap a host
    pub fn new(host: H) -> Self {
        Self {
            host: Mutex::new(host),
        }
    }

    /// Run several accesses as one atomic unit under a single privilege scope
    ///
    /// Do not call other `RegisterInterface` methods from inside `f`: the
    /// lock is not reentrant.
    pub fn transaction<R>(&self, f: impl FnOnce(&mut Transaction<'_, H>) -> R) -> R {
        let mut tx = Transaction::begin(self.host.lock());
        f(&mut tx)
    }

    /// Write `value` to register `index`; indices above 15 are ignored
    pub fn write_register(&self, index: u8, value: u8) {
        self.transaction(|tx| tx.write_register(index, value))
    }

    /// Read register `index`; indices above 15 read as 0 without touching the ports
    pub fn read_register(&self, index: u8) -> u8 {
        self.transaction(|tx| tx.read_register(index))
    }

    /// Inspect the host between transactions
    pub fn with_host<R>(&self, f: impl FnOnce(&H) -> R) -> R {
        f(&*self.host.lock())
    }

    /// Give the host back
    pub fn into_inner(self) -> H {
        self.host.into_inner()
    }
}

/// An open register transaction
///
/// Holds the host lock and, if the caller was not already privileged, the
/// state needed to drop privileges again when the transaction ends.
pub struct Transaction<'a, H: PsgHost> {
    host: MutexGuard<'a, H>,
    saved: Option<H::Saved>,
}

impl<'a, H: PsgHost> Transaction<'a, H> {
    fn begin(mut host: MutexGuard<'a, H>) -> Self {
        let saved = if host.is_privileged() {
            None
        } else {
            Some(host.elevate())
        };
        Self { host, saved }
    }

    /// Write a raw register index; indices above 15 are ignored
    pub fn write_register(&mut self, index: u8, value: u8) {
        match Register::from_addr(index) {
            Some(reg) => self.write(reg, value),
            None => trace!("ignoring write of {value:#04x} to register {index}"),
        }
    }

    /// Read a raw register index; indices above 15 read as 0
    pub fn read_register(&mut self, index: u8) -> u8 {
        match Register::from_addr(index) {
            Some(reg) => self.read(reg),
            None => {
                trace!("ignoring read of register {index}");
                0
            }
        }
    }

    /// Select `reg`, then write `value` to the data port
    pub fn write(&mut self, reg: Register, value: u8) {
        trace!("{reg} <- {value:#04x}");
        self.host.write_port(Port::Select, reg.addr());
        self.host.write_port(Port::Data, value);
    }

    /// Select `reg`, then read the data port
    pub fn read(&mut self, reg: Register) -> u8 {
        self.host.write_port(Port::Select, reg.addr());
        self.host.read_port(Port::Data)
    }
}

impl<H: PsgHost> Drop for Transaction<'_, H> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.host.restore(saved);
        }
    }
}
