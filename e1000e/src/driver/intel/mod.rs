//! Intel e1000e control plane.
//!
//! # Supported Families
//! - 82571/82572 (copper, fiber, serdes)
//! - 82574L/82583V
//! - ICH8/ICH9/ICH10
//! - PCH (82577/82578), PCH2 (82579), LPT (I217/I218), SPT through MTP (I219)
//!
//! # Reference
//! - Intel 82574 Datasheet, Section 10 (Programming Interface)
//! - Intel 82579 Datasheet, Section 10 (Programming Interface)

pub mod adaptive;
pub mod chip;
pub mod configure;
pub mod e1000e;
pub mod io;
pub mod manageability;
pub mod ops;
pub mod phy;
pub mod power;
pub mod regs;
pub mod reset;
pub mod ring;
pub mod rss;
pub mod state;
pub mod stats;
pub mod status;
pub mod tail;

// Re-exports
pub use chip::{identify_chip, is_supported_device, ChipCapabilities, ChipFlags, MacFamily};
pub use e1000e::{E1000eDriver, InterruptCause};
pub use ops::{Chip, ChipOps, ChipVendor, Hw, LinkCheck, PhyInfo};
pub use phy::{LinkSpeed, LinkState, LinkStatus, PhySnapshot};
pub use state::DeviceState;
pub use stats::Statistics;
pub use status::StatusHandle;

/// Intel PCI Vendor ID.
pub const INTEL_VENDOR_ID: u16 = 0x8086;
