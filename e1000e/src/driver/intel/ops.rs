//! Chip-family routines.
//!
//! The low-level MAC/PHY sequences (register-level reset pulse, PHY
//! bit-banging, NVM reads, per-family workarounds) come from a vendor
//! table. The state machine only decides *when* they run. One
//! [`ChipOps`] object is chosen per device at attach and never swapped.

use alloc::boxed::Box;

use crate::error::HwError;
use crate::mmio::RegisterSpace;

use super::chip::ChipCapabilities;
use super::state::FlowControl;

// ═══════════════════════════════════════════════════════════════════════════
// REGISTER ACCESS FOR CHIP ROUTINES
// ═══════════════════════════════════════════════════════════════════════════

/// Borrowed register windows handed to a chip routine for one call.
pub struct Hw<'a> {
    /// BAR0 register window.
    pub regs: &'a mut dyn RegisterSpace,
    /// BAR1 flash window, when the chip has one.
    pub flash: Option<&'a mut dyn RegisterSpace>,
}

impl<'a> Hw<'a> {
    /// Borrow the device windows.
    pub fn new(regs: &'a mut dyn RegisterSpace, flash: Option<&'a mut dyn RegisterSpace>) -> Self {
        Self { regs, flash }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// RESULTS
// ═══════════════════════════════════════════════════════════════════════════

/// Outcome of a chip link check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkCheck {
    /// Link established (copper: auto-negotiation complete and MAC configured).
    pub established: bool,
    /// Internal serdes sync state.
    pub serdes_has_link: bool,
}

/// MDI-X state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MdixState {
    /// Normal pairs.
    #[default]
    Mdi,
    /// Crossed pairs.
    Mdix,
}

/// PHY capability info refreshed on every reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhyInfo {
    /// PHY identifier.
    pub id: u32,
    /// PHY revision.
    pub revision: u32,
    /// Reported MDI-X state.
    pub mdix: MdixState,
    /// Cable polarity reversed.
    pub polarity_reversed: bool,
    /// Downshifted from gigabit.
    pub downshift: bool,
    /// Estimated cable length in metres.
    pub cable_length: u16,
}

// ═══════════════════════════════════════════════════════════════════════════
// CHIP ROUTINES
// ═══════════════════════════════════════════════════════════════════════════

/// Routines one chip family provides.
///
/// Failures are reported but never abort the reset/configure sequence.
pub trait ChipOps {
    /// Register-level device reset pulse.
    fn reset_hw(&self, hw: &mut Hw<'_>) -> Result<(), HwError>;

    /// Post-reset MAC/PHY initialization, including link setup with the
    /// given flow-control watermarks.
    fn init_hw(&self, hw: &mut Hw<'_>, fc: &FlowControl) -> Result<(), HwError>;

    /// Probe for link.
    fn check_for_link(&self, hw: &mut Hw<'_>) -> Result<LinkCheck, HwError>;

    /// Program the collision distance into TCTL.
    fn config_collision_dist(&self, hw: &mut Hw<'_>);

    /// Take the software/firmware PHY semaphore.
    fn acquire_phy(&self, hw: &mut Hw<'_>) -> Result<(), HwError>;

    /// Release the PHY semaphore.
    fn release_phy(&self, hw: &mut Hw<'_>);

    /// Read a PHY register (page encoded as `page << 5 | reg`).
    fn read_phy(&self, hw: &mut Hw<'_>, reg: u32) -> Result<u16, HwError>;

    /// Write a PHY register.
    fn write_phy(&self, hw: &mut Hw<'_>, reg: u32, value: u16) -> Result<(), HwError>;

    /// Write an EMI register. Caller holds the PHY semaphore.
    fn write_emi_locked(&self, hw: &mut Hw<'_>, addr: u16, value: u16) -> Result<(), HwError>;

    /// Refresh PHY capability info.
    fn get_phy_info(&self, hw: &mut Hw<'_>) -> Result<PhyInfo, HwError>;

    /// Read one NVM word.
    fn read_nvm(&self, hw: &mut Hw<'_>, offset: u16) -> Result<u16, HwError>;

    /// Reset the PHY through the MAC.
    fn phy_hw_reset(&self, hw: &mut Hw<'_>) -> Result<(), HwError> {
        let _ = hw;
        Ok(())
    }

    /// Power the PHY down. Families without PHY power control do nothing.
    fn power_down_phy(&self, hw: &mut Hw<'_>) {
        let _ = hw;
    }

    /// Power the PHY up.
    fn power_up_phy(&self, hw: &mut Hw<'_>) {
        let _ = hw;
    }

    /// Toggle the low-voltage PHY jumbo-frame workaround (PCH2 and later).
    fn lv_jumbo_workaround(&self, hw: &mut Hw<'_>, enable: bool) -> Result<(), HwError> {
        let _ = (hw, enable);
        Ok(())
    }

    /// Reapply PHY workarounds lost across a power transition (PCH2 and later).
    fn resume_workarounds(&self, hw: &mut Hw<'_>) -> Result<(), HwError> {
        let _ = hw;
        Ok(())
    }
}

/// Vendor table: hands out the routines for a selected chip.
pub trait ChipVendor {
    /// Routines for `caps`, or `None` when the family is not provided.
    fn ops_for(&self, caps: &ChipCapabilities) -> Option<Box<dyn ChipOps>>;
}

/// Selected chip: the capability record and its routines, fixed at attach.
pub struct Chip {
    /// Capability record.
    pub caps: ChipCapabilities,
    /// Family routines.
    pub ops: Box<dyn ChipOps>,
}

/// Encode a paged PHY register address.
#[inline]
pub const fn phy_reg(page: u32, reg: u32) -> u32 {
    (page << 5) | (reg & 0x1F)
}
