//! Descriptor tail supervisor.
//!
//! On parts with an ME behind the PCIm-to-PCI arbiter, the firmware can
//! overwrite TDT/RDT right after the driver writes them. Every tail write
//! therefore goes through [`write_tail`]:
//!
//! 1. Wait (bounded) for the firmware to release the arbiter
//! 2. Write the tail once
//! 3. If the arbiter was free, read the tail back
//! 4. On mismatch: disable that engine and raise force-reset
//!
//! There is no second write. Whatever corrupted the first one would corrupt
//! the retry too; the next supervisory check restarts the device instead.
//!
//! # Reference
//! Linux kernel drivers/net/ethernet/intel/e1000e/netdev.c (e1000e_update_tdt_wa)

use crate::mmio::RegisterSpace;
use crate::time::{timings, Delay};

use super::chip::{ChipCapabilities, ChipFlags};
use super::io::DeviceIo;
use super::regs;
use super::ring::RingKind;
use super::state::DeviceRuntimeState;

/// Outcome of a supervised tail write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailWrite {
    /// Read-back matched.
    Verified,
    /// Firmware held the arbiter; written but not verified.
    Unverified,
    /// Read-back mismatched; engine disabled, force-reset raised.
    Corrupted,
}

/// Whether the ME still owns the register block after the bounded wait.
pub fn firmware_contention<R: RegisterSpace, D: Delay>(
    io: &mut DeviceIo<R, D>,
    caps: &ChipCapabilities,
) -> bool {
    if !caps.flags.contains(ChipFlags::PCIM2PCI_ARBITER_WA) {
        return false;
    }

    let mut remaining = timings::PCIM2PCI_POLL_COUNT;
    while io.regs.read32(regs::FWSM) & regs::FWSM_PCIM2PCI != 0 {
        remaining -= 1;
        if remaining == 0 {
            return true;
        }
        io.delay.delay_us(timings::PCIM2PCI_POLL_US);
    }
    false
}

/// Write a ring tail register and verify it stuck.
pub fn write_tail<R: RegisterSpace, D: Delay>(
    io: &mut DeviceIo<R, D>,
    caps: &ChipCapabilities,
    state: &mut DeviceRuntimeState,
    kind: RingKind,
    index: u16,
) -> TailWrite {
    let contended = firmware_contention(io, caps);
    let tail_reg = kind.regs().tail;
    io.regs.write32(tail_reg, index as u32);

    if contended {
        log::warn!("e1000e: {:?} tail {} written while ME held the arbiter", kind, index);
        return TailWrite::Unverified;
    }

    if io.regs.read32(tail_reg) == index as u32 {
        return TailWrite::Verified;
    }

    let (ctrl_reg, enable, name) = match kind {
        RingKind::Tx => (regs::TCTL, regs::TCTL_EN, "TDT"),
        RingKind::Rx => (regs::RCTL, regs::RCTL_EN, "RDT"),
    };
    io.regs.clear_bits32(ctrl_reg, enable);
    state.force_reset = true;
    log::error!("e1000e: ME firmware caused invalid {} - resetting", name);
    TailWrite::Corrupted
}
