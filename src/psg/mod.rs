//! YM2149 PSG Register Access
//!
//! Everything between the channel control layer and the hardware:
//!
//! - `registers` - register addresses, channels and an in-memory register bank
//! - `mixer` - R7 gate bits
//! - `fields` - tone/envelope bit-field packing and value ranges
//! - `host` - port and privilege capabilities a host must provide
//! - `interface` - locked, privilege-scoped select/access transactions
//! - `memory` - in-memory host for tests and the harness
//! - `mmio` - memory-mapped host for real hardware

pub mod fields;
pub mod host;
pub mod interface;
pub mod memory;
pub mod mixer;
pub mod mmio;
pub mod registers;

// Re-export public API
pub use fields::TonePeriod;
pub use host::{AlwaysPrivileged, Port, PortIo, Privilege, PsgHost};
pub use interface::{RegisterInterface, Transaction};
pub use memory::{MemoryPsg, RegisterWrite};
pub use mixer::MixerFlags;
pub use mmio::MmioPorts;
pub use registers::{Channel, InvalidChannel, Register, RegisterBank};
