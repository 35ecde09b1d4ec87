//! Configuring sequence: multicast, manageability, RSS, VLAN, Tx, Rx.
//!
//! Runs right after every reset. Leaves both engines enabled with the rings
//! programmed: Tx head = tail = 0, Rx head = 0 and tail on the last
//! descriptor so the whole ring is available to hardware.
//!
//! # Reference
//! - Intel 82579 Datasheet, Section 10.2.2 (Receive) and 10.2.3 (Transmit)
//! - Linux kernel drivers/net/ethernet/intel/e1000e/netdev.c (e1000_configure)

use crate::config::NicConfig;
use crate::mmio::RegisterSpace;
use crate::time::{timings, Delay};

use super::chip::{ChipFlags, PhyFamily};
use super::io::DeviceIo;
use super::manageability;
use super::ops::{phy_reg, Chip};
use super::regs;
use super::ring::{DescriptorRing, RingKind};
use super::rss;
use super::state::DeviceRuntimeState;
use super::tail;

/// Multicast filter type (MO field).
const MC_FILTER_TYPE: u32 = 0;

/// Rings the configure sequence programs.
pub struct Rings<'a> {
    /// Transmit ring.
    pub tx: &'a mut DescriptorRing,
    /// Receive ring.
    pub rx: &'a mut DescriptorRing,
}

/// Run the full configuring sequence.
pub fn configure_device<R: RegisterSpace, D: Delay>(
    io: &mut DeviceIo<R, D>,
    chip: &Chip,
    config: &NicConfig,
    state: &mut DeviceRuntimeState,
    mng_pass_through: bool,
    rings: Rings<'_>,
) {
    // Receive all multicast.
    io.regs.set_bits32(regs::RCTL, regs::RCTL_MPE);

    if mng_pass_through {
        manageability::init_pass_through(&mut io.regs, chip);
    }

    rss::setup_rss_hash(&mut io.regs);
    rss::enable_vlan_strip(&mut io.regs);
    configure_tx(io, chip, config, rings.tx);
    setup_rx_control(io, chip, config);
    configure_rx(io, chip, config, state, rings.rx);
}

/// Write base, length and head of a ring. Software indices restart at 0.
fn program_ring<R: RegisterSpace + ?Sized>(regs: &mut R, ring: &mut DescriptorRing) {
    let r = ring.kind().regs();
    regs.write32(r.bal, ring.dma_base() as u32);
    regs.write32(r.bah, (ring.dma_base() >> 32) as u32);
    regs.write32(r.len, ring.len_bytes());
    regs.write32(r.head, 0);
    ring.clear();
}

// ═══════════════════════════════════════════════════════════════════════════
// TRANSMIT
// ═══════════════════════════════════════════════════════════════════════════

/// Program the Tx ring, interrupt delays and TCTL.
pub fn configure_tx<R: RegisterSpace, D: Delay>(
    io: &mut DeviceIo<R, D>,
    chip: &Chip,
    config: &NicConfig,
    ring: &mut DescriptorRing,
) {
    let regs = &mut io.regs;

    program_ring(regs, ring);
    regs.write32(regs::TDT, 0);

    regs.write32(regs::TIDV, config.tx_int_delay);
    regs.write32(regs::TADV, config.tx_abs_int_delay);

    // Erratum: both queues need the same TXDCTL.
    let txdctl = regs.read32(regs::txdctl(0));
    regs.write32(regs::txdctl(1), txdctl);

    let mut tctl = regs.read32(regs::TCTL);
    tctl &= !regs::TCTL_CT_MASK;
    tctl |= regs::TCTL_EN
        | regs::TCTL_PSP
        | regs::TCTL_RTLC
        | (regs::COLLISION_THRESHOLD << regs::TCTL_CT_SHIFT);

    // Erratum: unweighted round robin on both queues.
    if chip.caps.flags.contains(ChipFlags::TARC_SET_BIT_ZERO) {
        regs.set_bits32(regs::tarc(0), regs::TARC_BIT_ZERO);
        regs.set_bits32(regs::tarc(1), regs::TARC_BIT_ZERO);
    }
    regs.write32(regs::TCTL, tctl);

    chip.ops.config_collision_dist(&mut io.hw());
}

// ═══════════════════════════════════════════════════════════════════════════
// RECEIVE
// ═══════════════════════════════════════════════════════════════════════════

/// Program RCTL and RFCTL.
pub fn setup_rx_control<R: RegisterSpace, D: Delay>(
    io: &mut DeviceIo<R, D>,
    chip: &Chip,
    config: &NicConfig,
) {
    let jumbo = config.jumbo();

    if chip.caps.is_pch2_or_later() {
        if let Err(e) = chip.ops.lv_jumbo_workaround(&mut io.hw(), jumbo) {
            log::debug!("e1000e: failed to toggle jumbo frame workaround: {}", e);
        }
    }

    let mut rctl = io.regs.read32(regs::RCTL);
    rctl &= !regs::RCTL_MO_MASK;
    rctl |= regs::RCTL_EN
        | regs::RCTL_BAM
        | regs::RCTL_LBM_NO
        | regs::RCTL_RDMTS_HALF
        | (MC_FILTER_TYPE << regs::RCTL_MO_SHIFT);
    rctl &= !regs::RCTL_SBP;

    if jumbo {
        rctl |= regs::RCTL_LPE;
    } else {
        rctl &= !regs::RCTL_LPE;
    }

    if chip.caps.flags.contains(ChipFlags::CRC_STRIPPING) {
        rctl |= regs::RCTL_SECRC;
    }

    if chip.caps.phy == PhyFamily::I82577 && rctl & regs::RCTL_LPE != 0 {
        i82577_jumbo_ipg(io, chip);
    }

    // 2048-byte buffers.
    rctl &= !(regs::RCTL_SZ_256 | regs::RCTL_BSEX);

    io.regs.set_bits32(
        regs::RFCTL,
        regs::RFCTL_NEW_IPV6_EXT_DIS
            | regs::RFCTL_IPV6_EX_DIS
            | regs::RFCTL_EXTEN
            | regs::RFCTL_NFSW_DIS
            | regs::RFCTL_NFSR_DIS,
    );
    io.regs.write32(regs::RCTL, rctl);
}

/// 82577 erratum: inter-packet gap for jumbo frames. Best effort.
fn i82577_jumbo_ipg<R: RegisterSpace, D: Delay>(io: &mut DeviceIo<R, D>, chip: &Chip) {
    let ops = &chip.ops;
    let mut hw = io.hw();
    let ipg = phy_reg(regs::I82577_IPG_PAGE, regs::I82577_IPG_REG);

    if let Ok(data) = ops.read_phy(&mut hw, ipg) {
        let _ = ops.write_phy(&mut hw, ipg, (data & 0xFFF8) | (1 << 2));
    }
    if let Ok(data) = ops.read_phy(&mut hw, regs::I82577_RX_CONFIG) {
        let data = (data & 0x0FFF) | (1 << 14);
        let _ = ops.write_phy(&mut hw, 0x10, 0x2823);
        let _ = ops.write_phy(&mut hw, 0x11, 0x0003);
        let _ = ops.write_phy(&mut hw, regs::I82577_RX_CONFIG, data);
    }
}

/// Program the Rx ring, delays and offloads. Rx is held off meanwhile
/// unless the family must not disable it.
pub fn configure_rx<R: RegisterSpace, D: Delay>(
    io: &mut DeviceIo<R, D>,
    chip: &Chip,
    config: &NicConfig,
    state: &mut DeviceRuntimeState,
    ring: &mut DescriptorRing,
) {
    let caps = &chip.caps;
    let rctl = io.regs.read32(regs::RCTL);
    if !caps.flags.contains(ChipFlags::NO_DISABLE_RX) {
        io.regs.write32(regs::RCTL, rctl & !regs::RCTL_EN);
    }
    io.flush_and_wait_ms(timings::QUIESCE_MS);

    io.regs.write32(regs::RDTR, config.rx_int_delay);
    io.regs.write32(regs::RADV, config.rx_abs_int_delay);
    io.regs.write32(regs::ITR, config.itr);

    // Auto-mask on ICR read.
    let ctrl_ext = io.regs.read32(regs::CTRL_EXT) | regs::CTRL_EXT_IAME;
    io.regs.write32(regs::IAM, regs::INT_MASK_ALL);
    io.regs.write32(regs::CTRL_EXT, ctrl_ext);
    io.regs.flush();

    program_ring(&mut io.regs, ring);
    let last = ring.last_index();
    if caps.flags.contains(ChipFlags::PCIM2PCI_ARBITER_WA) {
        tail::write_tail(io, caps, state, RingKind::Rx, last);
    } else {
        io.regs.write32(regs::RDT, last as u32);
    }

    io.regs.set_bits32(regs::RXCSUM, regs::RXCSUM_TUOFL);

    if config.jumbo() && caps.is_ich() {
        io.regs.set_bits32(regs::rxdctl(0), regs::RXDCTL_JUMBO_PTHRESH);
    }

    io.regs.write32(regs::RCTL, rctl);
}
