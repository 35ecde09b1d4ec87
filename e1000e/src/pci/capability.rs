//! PCI capability chain walking.
//!
//! # Reference
//! - PCI Spec 3.0 §6.7 (Capability List)
//! - PCI Bus Power Management Interface Spec 1.2 §3.2
//! - PCI Express Base Spec 2.0 §7.8 (PCI Express Capability Structure)

use super::config::{offset, status};
use super::PciDevice;

// ═══════════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════

/// PCI capability ID: Power Management.
pub const PCI_CAP_ID_PM: u8 = 0x01;
/// PCI capability ID: PCI Express.
pub const PCI_CAP_ID_EXP: u8 = 0x10;

/// Upper bound on chain length (48 capabilities fit in 192 bytes).
const MAX_CAPABILITIES: usize = 48;

/// Power management capability register layout.
pub mod pm {
    /// PMC register offset from the capability.
    pub const PMC: u8 = 0x02;
    /// PMCSR register offset from the capability.
    pub const CTRL: u8 = 0x04;

    /// PME can be asserted from D3hot.
    pub const PMC_PME_D3HOT: u16 = 1 << 14;
    /// PME can be asserted from D3cold.
    pub const PMC_PME_D3COLD: u16 = 1 << 15;

    /// Power state field.
    pub const CTRL_STATE_MASK: u16 = 0x0003;
    /// D0.
    pub const CTRL_STATE_D0: u16 = 0x0000;
    /// D3hot.
    pub const CTRL_STATE_D3: u16 = 0x0003;
    /// PME enable.
    pub const CTRL_PME_ENABLE: u16 = 1 << 8;
    /// PME status (write 1 to clear).
    pub const CTRL_PME_STATUS: u16 = 1 << 15;
}

/// PCI Express capability register layout.
pub mod exp {
    /// Link capabilities offset from the capability.
    pub const LNKCAP: u8 = 0x0C;
    /// Link control offset from the capability.
    pub const LNKCTL: u8 = 0x10;

    /// ASPM L0s entry.
    pub const LNKCTL_ASPM_L0S: u16 = 1 << 0;
    /// ASPM L1 entry.
    pub const LNKCTL_ASPM_L1: u16 = 1 << 1;
}

// ═══════════════════════════════════════════════════════════════════════════
// CHAIN WALK
// ═══════════════════════════════════════════════════════════════════════════

/// Walk the standard capability list looking for `cap_id`.
///
/// # Returns
/// Config space offset of the capability header, or `None` if the device
/// has no capability list or the ID is absent.
pub fn find_capability<P: PciDevice + ?Sized>(dev: &P, cap_id: u8) -> Option<u8> {
    if dev.config_read16(offset::STATUS) & status::CAP_LIST == 0 {
        return None;
    }

    let mut ptr = dev.config_read8(offset::CAP_PTR) & 0xFC;
    for _ in 0..MAX_CAPABILITIES {
        if ptr < 0x40 {
            return None;
        }
        if dev.config_read8(ptr) == cap_id {
            return Some(ptr);
        }
        ptr = dev.config_read8(ptr + 1) & 0xFC;
    }

    None
}
