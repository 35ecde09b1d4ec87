//! Driver error types.
//!
//! Only [`AttachError`] ever stops the driver from existing. [`HwError`] is
//! what the chip-family routines report; the state machine logs it and
//! carries on. [`RingError`] rejects a tail advance before it reaches the
//! hardware.

use core::fmt;

use crate::driver::intel::chip::MacFamily;
use crate::pci::PciId;

/// Attach result alias.
pub type Result<T> = core::result::Result<T, AttachError>;

// ═══════════════════════════════════════════════════════════════════════════
// ATTACH ERRORS
// ═══════════════════════════════════════════════════════════════════════════

/// Attach-fatal errors. No device is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachError {
    /// Identifier tuple matches no known chip family.
    Unidentified(PciId),
    /// The vendor table has no routines for this family.
    NoChipOps(MacFamily),
    /// A required BAR could not be mapped.
    BarUnmappable(u8),
}

impl fmt::Display for AttachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unidentified(id) => write!(
                f,
                "Unsupported device {:04x}:{:04x} (subsystem {:04x}:{:04x}, rev {:#04x})",
                id.vendor, id.device, id.subsystem_vendor, id.subsystem_device, id.revision
            ),
            Self::NoChipOps(family) => write!(f, "No chip routines for {:?}", family),
            Self::BarUnmappable(bar) => write!(f, "Failed to map BAR{}", bar),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// HARDWARE ERRORS
// ═══════════════════════════════════════════════════════════════════════════

/// Errors reported by chip-family routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwError {
    /// PHY access failed (MDIC error or PHY not responding).
    Phy,
    /// NVM/flash read failed.
    Nvm,
    /// Invalid or unsupported configuration.
    Config,
    /// A bounded poll expired.
    Timeout,
    /// Firmware holds a resource (SW/FW semaphore, SOL/IDER session).
    Blocked,
}

impl fmt::Display for HwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phy => write!(f, "PHY access failed"),
            Self::Nvm => write!(f, "NVM access failed"),
            Self::Config => write!(f, "Invalid configuration"),
            Self::Timeout => write!(f, "Hardware poll timed out"),
            Self::Blocked => write!(f, "Resource held by firmware"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// RING ERRORS
// ═══════════════════════════════════════════════════════════════════════════

/// Rejected tail advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    /// Index is not a slot of this ring.
    IndexOutOfRange {
        /// Requested tail index.
        index: u16,
        /// Ring capacity.
        capacity: u16,
    },
    /// Advance would leave fewer than one free slot.
    Overrun {
        /// Requested tail index.
        index: u16,
        /// Current clean (head-side) index.
        clean: u16,
    },
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, capacity } => {
                write!(f, "Tail index {} outside ring of {}", index, capacity)
            }
            Self::Overrun { index, clean } => {
                write!(f, "Tail index {} overruns clean index {}", index, clean)
            }
        }
    }
}
