//! Driver module.
//!
//! # Architecture
//!
//! The state machine owns the device instance outright: register windows,
//! descriptor ring bookkeeping and runtime state. Everything else (PCI
//! services, chip-family routines, the packet queue) is reached through
//! traits so the same code runs on hardware and in the simulated tests.

pub mod intel;
pub mod traits;

pub use intel::{E1000eDriver, StatusHandle};
pub use traits::PacketQueue;
