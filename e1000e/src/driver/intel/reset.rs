//! Resetting sequence.
//!
//! Runs on every bring-up and restart. The order follows the hardware
//! timing requirements and must not be rearranged:
//!
//! 1. Packet buffer allocation, rebalanced for jumbo frames
//! 2. Flow control watermarks from the final allocation
//! 3. Tx FIFO limit, interrupt throttle
//! 4. Reset pulse, AMT handshake, wake-up control clear
//! 5. MAC/PHY init, VLAN ether type, adaptive IFS
//! 6. EEE advertisement, PHY info, smart power down
//!
//! Chip routine failures are logged and the sequence carries on.
//!
//! # Reference
//! Linux kernel drivers/net/ethernet/intel/e1000e/netdev.c (e1000e_reset)

use crate::config::{NicConfig, ETH_FCS_LEN, ETH_HLEN};
use crate::mmio::RegisterSpace;
use crate::time::Delay;

use super::chip::{ChipCapabilities, MacFamily, PhyFamily};
use super::io::DeviceIo;
use super::ops::Chip;
use super::regs;
use super::state::{DeviceRuntimeState, FlowControl};

/// Standard frame including FCS; larger frames trigger the rebalance.
const STD_FRAME: u32 = 1500 + ETH_HLEN + ETH_FCS_LEN;
/// Legacy Tx descriptor, stored in the Tx FIFO with each frame.
const TX_DESC_BYTES: u32 = 16;
/// Rx allocation (KB) forced for jumbo frames on ICH9/10 and PCH2+.
const JUMBO_RX_PBA: u32 = 14;
/// Ceiling on a single-descriptor transmit.
const TX_FIFO_CEILING: u32 = 24 << 10;

// ═══════════════════════════════════════════════════════════════════════════
// PACKET BUFFER AND WATERMARKS
// ═══════════════════════════════════════════════════════════════════════════

#[inline]
const fn kb_round_up(bytes: u32) -> u32 {
    (bytes + 1023) >> 10
}

/// Shift packet buffer from Rx to Tx so two full frames fit in Tx.
///
/// `pba` is the raw PBA register (Tx KB in 31:16, Rx KB in 15:0). Returns
/// the Rx allocation to write back. Rx never drops below one full frame.
pub fn rebalance_packet_buffer(pba: u32, max_frame: u32) -> u32 {
    let tx_space = pba >> 16;
    let mut rx_space = pba & 0xFFFF;

    let min_tx = kb_round_up((max_frame + TX_DESC_BYTES - ETH_FCS_LEN) * 2);
    let min_rx = kb_round_up(max_frame);

    if tx_space < min_tx && min_tx - tx_space < rx_space {
        rx_space -= min_tx - tx_space;
        rx_space = rx_space.max(min_rx);
    }
    rx_space
}

/// Watermarks and the Rx allocation they were computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Watermarks {
    /// Thresholds handed to `init_hw`.
    pub flow_control: FlowControl,
    /// Rx allocation that replaces the current one, if the family forces it.
    pub forced_pba: Option<u32>,
}

/// Flow control thresholds for an Rx allocation of `rx_pba_kb`.
///
/// Most families use min(90% of the buffer, buffer minus one frame) at
/// 8-byte granularity. PCH uses fixed values. ICH9/10 and PCH2+ shrink the
/// buffer for jumbo frames.
pub fn flow_control_watermarks(
    caps: &ChipCapabilities,
    rx_pba_kb: u32,
    max_frame: u32,
    jumbo: bool,
) -> Watermarks {
    let mut fc = FlowControl {
        high_water: 0,
        low_water: 0,
        pause_time: caps.flow_control.pause_time,
        refresh_time: caps.flow_control.refresh_time,
        send_xon: true,
    };
    let mut forced_pba = None;

    match caps.mac {
        MacFamily::Ich9 | MacFamily::Ich10 if jumbo => {
            forced_pba = Some(JUMBO_RX_PBA);
            fc.high_water = 0x2800;
            fc.low_water = fc.high_water - 8;
        }
        MacFamily::Pch => {
            if jumbo {
                fc.high_water = 0x3500;
                fc.low_water = 0x1500;
            } else {
                fc.high_water = 0x5000;
                fc.low_water = 0x3000;
            }
            fc.refresh_time = 0x1000;
        }
        mac if mac >= MacFamily::Pch2 => {
            fc.refresh_time = 0x0400;
            if jumbo {
                forced_pba = Some(JUMBO_RX_PBA);
                let bytes = JUMBO_RX_PBA << 10;
                fc.high_water = (bytes * 9 / 10) & regs::FCRTH_RTH;
                fc.low_water = (bytes * 8 / 10) & regs::FCRTH_RTH;
            } else {
                fc.high_water = 0x5C20;
                fc.low_water = 0x5048;
                fc.pause_time = 0x0650;
            }
        }
        _ => {
            let bytes = rx_pba_kb << 10;
            let hwm = (bytes * 9 / 10).min(bytes.saturating_sub(max_frame));
            fc.high_water = hwm & regs::FCRTH_RTH;
            fc.low_water = fc.high_water.saturating_sub(8);
        }
    }

    Watermarks {
        flow_control: fc,
        forced_pba,
    }
}

/// Largest single-descriptor transmit for a PBA register value.
#[inline]
pub fn tx_fifo_limit(pba: u32) -> u32 {
    ((pba >> 16) << 10).saturating_sub(96).min(TX_FIFO_CEILING)
}

// ═══════════════════════════════════════════════════════════════════════════
// AMT HANDSHAKE
// ═══════════════════════════════════════════════════════════════════════════

/// Tell the management firmware the driver owns the interface.
pub fn get_hw_control<R: RegisterSpace + ?Sized>(regs: &mut R) {
    regs.set_bits32(regs::CTRL_EXT, regs::CTRL_EXT_DRV_LOAD);
}

/// Hand the interface back to the management firmware.
pub fn release_hw_control<R: RegisterSpace + ?Sized>(regs: &mut R) {
    regs.clear_bits32(regs::CTRL_EXT, regs::CTRL_EXT_DRV_LOAD);
}

// ═══════════════════════════════════════════════════════════════════════════
// RESET
// ═══════════════════════════════════════════════════════════════════════════

/// Run the full resetting sequence. Clears `force_reset` on completion.
pub fn reset_device<R: RegisterSpace, D: Delay>(
    io: &mut DeviceIo<R, D>,
    chip: &Chip,
    config: &NicConfig,
    state: &mut DeviceRuntimeState,
) {
    let caps = &chip.caps;
    let max_frame = config.max_frame_size();

    let mut pba = config.pba_override.unwrap_or(caps.pba);
    io.regs.write32(regs::PBA, pba);

    if max_frame > STD_FRAME {
        pba = rebalance_packet_buffer(io.regs.read32(regs::PBA), max_frame);
        io.regs.write32(regs::PBA, pba);
    }

    let wm = flow_control_watermarks(caps, pba & 0xFFFF, max_frame, config.jumbo());
    if let Some(forced) = wm.forced_pba {
        io.regs.write32(regs::PBA, forced);
    }
    state.flow_control = wm.flow_control;
    state.tx_fifo_limit = tx_fifo_limit(io.regs.read32(regs::PBA));

    io.regs.write32(regs::ITR, config.itr);

    if let Err(e) = chip.ops.reset_hw(&mut io.hw()) {
        log::error!("e1000e: reset_hw failed: {}", e);
    }

    if caps.has_amt() {
        get_hw_control(&mut io.regs);
    }

    io.regs.write32(regs::WUC, 0);

    if let Err(e) = chip.ops.init_hw(&mut io.hw(), &state.flow_control) {
        log::error!("e1000e: hardware error: {}", e);
    }

    io.regs.write32(regs::VET, regs::ETH_P_8021Q);
    state.adaptive.reset(&mut io.regs);

    if caps.has_eee() {
        state.eee_active = write_eee_advertisement(io, chip, config);
    }

    match chip.ops.get_phy_info(&mut io.hw()) {
        Ok(info) => state.phy_info = info,
        Err(e) => log::debug!("e1000e: get_phy_info failed: {}", e),
    }

    if caps.has_smart_power_down() && !config.smart_power_down {
        disable_smart_power_down(io, chip);
    }

    state.force_reset = false;
}

/// Program the EEE advertisement for the PHY family.
///
/// Returns whether EEE is being advertised. Lock failure skips EEE only.
fn write_eee_advertisement<R: RegisterSpace, D: Delay>(
    io: &mut DeviceIo<R, D>,
    chip: &Chip,
    config: &NicConfig,
) -> bool {
    let addr = match chip.caps.phy {
        PhyFamily::I82579 => regs::I82579_EEE_ADVERTISEMENT,
        PhyFamily::I217 => regs::I217_EEE_ADVERTISEMENT,
        other => {
            log::warn!("e1000e: invalid PHY type {:?} setting EEE advertisement", other);
            return false;
        }
    };

    let mut hw = io.hw();
    if let Err(e) = chip.ops.acquire_phy(&mut hw) {
        log::warn!("e1000e: EEE advertisement - unable to acquire PHY: {}", e);
        return false;
    }
    let advert = if config.eee_enabled { config.eee_advert } else { 0 };
    let written = chip.ops.write_emi_locked(&mut hw, addr, advert);
    chip.ops.release_phy(&mut hw);

    match written {
        Ok(()) => advert != 0,
        Err(e) => {
            log::warn!("e1000e: EEE advertisement write failed: {}", e);
            false
        }
    }
}

/// Clear the smart power down bit. Best effort.
fn disable_smart_power_down<R: RegisterSpace, D: Delay>(io: &mut DeviceIo<R, D>, chip: &Chip) {
    let mut hw = io.hw();
    if let Ok(data) = chip.ops.read_phy(&mut hw, regs::IGP02E1000_PHY_POWER_MGMT) {
        let _ = chip
            .ops
            .write_phy(&mut hw, regs::IGP02E1000_PHY_POWER_MGMT, data & !regs::IGP02E1000_PM_SPD);
    }
}
