//! Management pass-through.
//!
//! When a BMC or ME shares the port, RMCP traffic on UDP 623/664 has to
//! reach both the firmware and the host. Most families forward those ports
//! through fixed MANC2H bits. 82574/82583 route them through a table of
//! eight decision filters instead, which the driver reuses or fills.
//!
//! # Reference
//! - Intel 82574 Datasheet, Section 10.2.9 (Manageability Registers)
//! - Linux kernel drivers/net/ethernet/intel/e1000e/netdev.c (e1000_init_manageability_pt)

use crate::mmio::RegisterSpace;
use crate::time::Delay;

use super::chip::ChipFlags;
use super::io::DeviceIo;
use super::ops::Chip;
use super::regs;

/// Decision filter slots.
const MDEF_SLOTS: u32 = 8;

/// Filter matching both RMCP ports.
const MDEF_IPMI: u32 = regs::MDEF_PORT_623 | regs::MDEF_PORT_664;

/// MANC2H bit set after programming a fresh decision filter.
///
/// Always filter 1, whatever slot was programmed. Whether `1 << slot` was
/// meant is unconfirmed on hardware.
const MANC2H_NEW_FILTER: u32 = 1 << 1;

/// Whether the firmware expects management traffic through this port.
///
/// Probed once at attach.
pub fn pass_through_needed<R: RegisterSpace, D: Delay>(io: &mut DeviceIo<R, D>, chip: &Chip) -> bool {
    let manc = io.regs.read32(regs::MANC);
    if manc & regs::MANC_RCV_TCO_EN == 0 {
        return false;
    }

    let caps = &chip.caps;
    if caps.flags.contains(ChipFlags::HAS_FWSM) {
        let fwsm = io.regs.read32(regs::FWSM);
        let factps = io.regs.read32(regs::FACTPS);
        factps & regs::FACTPS_MNGCG == 0
            && fwsm & regs::FWSM_MODE_MASK == regs::MNG_MODE_PT << regs::FWSM_MODE_SHIFT
    } else if caps.has_mng_decision_filters() {
        let factps = io.regs.read32(regs::FACTPS);
        let data = match chip.ops.read_nvm(&mut io.hw(), regs::NVM_INIT_CONTROL2_REG) {
            Ok(data) => data,
            Err(e) => {
                log::debug!("e1000e: NVM read for manageability mode failed: {}", e);
                return false;
            }
        };
        factps & regs::FACTPS_MNGCG == 0
            && data & regs::NVM_INIT_CTRL2_MNGM == (regs::MNG_MODE_PT as u16) << 13
    } else {
        manc & regs::MANC_SMBUS_EN != 0 && manc & regs::MANC_ASF_EN == 0
    }
}

/// Forward management traffic to the host.
pub fn init_pass_through<R: RegisterSpace + ?Sized>(regs: &mut R, chip: &Chip) {
    let manc = regs.read32(regs::MANC) | regs::MANC_EN_MNG2HOST;
    let mut manc2h = regs.read32(regs::MANC2H);

    if chip.caps.has_mng_decision_filters() {
        manc2h |= decision_filters(regs);
    } else {
        manc2h |= regs::MANC2H_PORT_623 | regs::MANC2H_PORT_664;
    }

    regs.write32(regs::MANC2H, manc2h);
    regs.write32(regs::MANC, manc);
}

/// Enable existing RMCP filters, or program one into an empty slot.
///
/// Returns the MANC2H bits to add.
fn decision_filters<R: RegisterSpace + ?Sized>(regs: &mut R) -> u32 {
    let mut manc2h = 0;
    let mut ports = 0;

    for i in 0..MDEF_SLOTS {
        let mdef = regs.read32(regs::mdef(i));
        // Filters matching anything besides the RMCP ports belong to firmware.
        if mdef & !MDEF_IPMI != 0 {
            continue;
        }
        if mdef != 0 {
            manc2h |= 1 << i;
        }
        ports |= mdef;
    }

    if ports == MDEF_IPMI {
        return manc2h;
    }

    match (0..MDEF_SLOTS).find(|&i| regs.read32(regs::mdef(i)) == 0) {
        Some(slot) => {
            regs.write32(regs::mdef(slot), MDEF_IPMI);
            manc2h |= MANC2H_NEW_FILTER;
        }
        None => log::error!("e1000e: Unable to create IPMI pass-through filter"),
    }
    manc2h
}
