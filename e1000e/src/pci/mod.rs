//! PCI collaborator contract.
//!
//! The host owns enumeration and address-space mapping. The driver only
//! needs configuration space accessors and a way to turn a BAR index into a
//! register window.

pub mod capability;
pub mod config;

use crate::mmio::RegisterSpace;

/// Identifier tuple read from configuration space at attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PciId {
    /// Vendor ID.
    pub vendor: u16,
    /// Device ID.
    pub device: u16,
    /// Subsystem vendor ID.
    pub subsystem_vendor: u16,
    /// Subsystem device ID.
    pub subsystem_device: u16,
    /// Revision ID.
    pub revision: u8,
}

impl PciId {
    /// Read the identifier tuple of `dev`.
    pub fn read<P: PciDevice + ?Sized>(dev: &P) -> Self {
        Self {
            vendor: dev.config_read16(config::offset::VENDOR_ID),
            device: dev.config_read16(config::offset::DEVICE_ID),
            subsystem_vendor: dev.config_read16(config::offset::SUBSYS_VENDOR_ID),
            subsystem_device: dev.config_read16(config::offset::SUBSYS_ID),
            revision: dev.config_read8(config::offset::REVISION_ID),
        }
    }
}

/// Configuration space and BAR mapping services for one PCI function.
pub trait PciDevice {
    /// Register window handed out for a mapped BAR.
    ///
    /// Dropping the handle unmaps the BAR.
    type Bar: RegisterSpace;

    /// Read a config space byte.
    fn config_read8(&self, offset: u8) -> u8;
    /// Read a config space word.
    fn config_read16(&self, offset: u8) -> u16;
    /// Read a config space dword.
    fn config_read32(&self, offset: u8) -> u32;
    /// Write a config space word.
    fn config_write16(&mut self, offset: u8, value: u16);

    /// Map BAR `index`, or `None` if it is absent or cannot be mapped.
    fn map_bar(&mut self, index: u8) -> Option<Self::Bar>;

    /// Locate a standard capability.
    fn find_capability(&self, cap_id: u8) -> Option<u8> {
        capability::find_capability(self, cap_id)
    }
}
