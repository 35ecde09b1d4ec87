//! MorpheusX Intel gigabit Ethernet control plane.
//!
//! Brings an Intel e1000e-family controller (82571/82572/82574/82583,
//! ICH8/9/10 and PCH LAN through Meteor Lake) from power-on into a
//! running Rx/Tx state, keeps it running across link changes, and
//! recovers it from firmware-induced faults.
//!
//! The crate only owns the control plane. PCI enumeration, BAR mapping,
//! descriptor memory, the packet queue and per-family PHY/MAC routines are
//! collaborators reached through traits:
//!
//! - [`pci::PciDevice`]: configuration space and BAR mapping
//! - [`driver::traits::PacketQueue`]: outbound queue and link notifications
//! - [`driver::intel::ChipVendor`] / [`driver::intel::ChipOps`]: chip-family routines
//! - [`time::Delay`]: blocking settle waits
//!
//! # Layout
//! ```text
//! mmio             Register window access (volatile MMIO)
//! pci              Config space contract, capability walk
//! time             Delays and timing constants
//! driver/intel     Chip model, reset/configure state machine, supervisors
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod config;
pub mod driver;
pub mod error;
pub mod mmio;
pub mod pci;
pub mod time;

#[cfg(test)]
mod testing;

pub use config::{NicConfig, RingConfig};
pub use driver::intel::{E1000eDriver, StatusHandle};
pub use error::{AttachError, HwError, RingError};
