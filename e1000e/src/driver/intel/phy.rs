//! Link and PHY status tracking.
//!
//! Link detection branches on media type. Copper only re-probes after an
//! interrupt raised "link status unknown"; fiber and serdes re-run the chip
//! link check every time. The PHY register snapshot is only read live while
//! copper link is up; otherwise it carries the power-on defaults so status
//! readers never see a stale "link was up" picture.
//!
//! # Reference
//! - IEEE 802.3 Clause 22 (MII management registers)
//! - Linux kernel drivers/net/ethernet/intel/e1000e/netdev.c (e1000e_has_link, e1000_phy_read_status)

use crate::error::HwError;
use crate::mmio::RegisterSpace;
use crate::time::Delay;

use super::chip::{ChipCapabilities, MediaType, PhyFamily};
use super::io::DeviceIo;
use super::ops::ChipOps;
use super::regs;
use super::state::DeviceRuntimeState;

// ═══════════════════════════════════════════════════════════════════════════
// LINK STATUS
// ═══════════════════════════════════════════════════════════════════════════

/// Link speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSpeed {
    /// 10 Mbps.
    Speed10,
    /// 100 Mbps.
    Speed100,
    /// 1000 Mbps (1 Gbps).
    Speed1000,
    /// Unknown speed.
    Unknown,
}

impl LinkSpeed {
    /// Get speed in Mbps.
    pub fn mbps(&self) -> u32 {
        match self {
            LinkSpeed::Speed10 => 10,
            LinkSpeed::Speed100 => 100,
            LinkSpeed::Speed1000 => 1000,
            LinkSpeed::Unknown => 0,
        }
    }

    /// Decode the STATUS speed field.
    pub fn from_status(status: u32) -> Self {
        match status & regs::STATUS_SPEED_MASK {
            regs::STATUS_SPEED_1000 | regs::STATUS_SPEED_MASK => LinkSpeed::Speed1000,
            regs::STATUS_SPEED_100 => LinkSpeed::Speed100,
            _ => LinkSpeed::Speed10,
        }
    }
}

/// Link state machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No link.
    Down,
    /// Auto-negotiation in progress.
    Establishing,
    /// Link up.
    Up,
}

/// Link status information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkStatus {
    /// Link is up.
    pub link_up: bool,
    /// Full duplex mode.
    pub full_duplex: bool,
    /// Link speed.
    pub speed: LinkSpeed,
}

impl LinkStatus {
    /// Link-down status.
    pub const DOWN: Self = Self {
        link_up: false,
        full_duplex: false,
        speed: LinkSpeed::Unknown,
    };

    /// Decode link, duplex and speed from STATUS.
    pub fn from_status(status: u32) -> Self {
        if status & regs::STATUS_LU == 0 {
            return Self::DOWN;
        }
        Self {
            link_up: true,
            full_duplex: status & regs::STATUS_FD != 0,
            speed: LinkSpeed::from_status(status),
        }
    }
}

impl Default for LinkStatus {
    fn default() -> Self {
        Self::DOWN
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// LINK CHECK
// ═══════════════════════════════════════════════════════════════════════════

/// Whether the link is active.
///
/// Copper trusts the cached state unless `get_link_status` is raised.
/// Unknown media never reports link.
pub fn check_link<R: RegisterSpace, D: Delay>(
    io: &mut DeviceIo<R, D>,
    caps: &ChipCapabilities,
    ops: &dyn ChipOps,
    state: &mut DeviceRuntimeState,
) -> bool {
    let (active, outcome) = match caps.media {
        MediaType::Copper => {
            if state.get_link_status {
                let outcome = ops.check_for_link(&mut io.hw());
                if let Ok(check) = outcome {
                    state.get_link_status = !check.established;
                }
                (!state.get_link_status, outcome.map(|_| ()))
            } else {
                (true, Ok(()))
            }
        }
        MediaType::Fiber => {
            let outcome = ops.check_for_link(&mut io.hw());
            let active = io.regs.read32(regs::STATUS) & regs::STATUS_LU != 0;
            (active, outcome.map(|_| ()))
        }
        MediaType::InternalSerdes => {
            let outcome = ops.check_for_link(&mut io.hw());
            if let Ok(check) = outcome {
                state.serdes_has_link = check.serdes_has_link;
            }
            (state.serdes_has_link, outcome.map(|_| ()))
        }
        MediaType::Unknown => (false, Ok(())),
    };

    match outcome {
        Err(HwError::Phy)
            if caps.phy == PhyFamily::Igp3
                && io.regs.read32(regs::PHY_CTRL) & regs::PHY_CTRL_GBE_DISABLE != 0 =>
        {
            log::info!("e1000e: Gigabit has been disabled, downgrading speed");
        }
        Err(e) => log::debug!("e1000e: link check failed: {}", e),
        Ok(()) => {}
    }

    active
}

// ═══════════════════════════════════════════════════════════════════════════
// PHY SNAPSHOT
// ═══════════════════════════════════════════════════════════════════════════

/// Cached MII register picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhySnapshot {
    /// Basic mode control.
    pub bmcr: u16,
    /// Basic mode status.
    pub bmsr: u16,
    /// Our advertisement.
    pub advertise: u16,
    /// Link partner ability.
    pub lpa: u16,
    /// Auto-negotiation expansion.
    pub expansion: u16,
    /// 1000BASE-T control.
    pub ctrl1000: u16,
    /// 1000BASE-T status.
    pub stat1000: u16,
    /// Extended status.
    pub estatus: u16,
}

impl PhySnapshot {
    /// Power-on register values reported while link is down.
    pub const POWER_ON_DEFAULT: Self = Self {
        // ANENABLE | FULLDPLX | SPEED1000
        bmcr: 0x1140,
        // 10/100 half/full, ERCAP, ANEGCAPABLE, ESTATEN, no link
        bmsr: 0x7909,
        // CSMA, 10/100 half/full, pause
        advertise: 0x0DE1,
        lpa: 0,
        // NPAGE capable
        expansion: 0x0004,
        // 1000 full
        ctrl1000: 0x0200,
        stat1000: 0,
        // 1000T half/full
        estatus: 0x3000,
    };
}

impl Default for PhySnapshot {
    fn default() -> Self {
        Self::POWER_ON_DEFAULT
    }
}

/// Build the PHY snapshot.
///
/// Reads live registers only for copper with STATUS.LU set. A register that
/// fails to read keeps its default.
pub fn refresh_phy_snapshot<R: RegisterSpace, D: Delay>(
    io: &mut DeviceIo<R, D>,
    caps: &ChipCapabilities,
    ops: &dyn ChipOps,
) -> PhySnapshot {
    let mut snap = PhySnapshot::POWER_ON_DEFAULT;
    let link_up = io.regs.read32(regs::STATUS) & regs::STATUS_LU != 0;
    if !link_up || caps.media != MediaType::Copper {
        return snap;
    }

    let fields: [(u32, &mut u16); 8] = [
        (regs::PHY_BMCR, &mut snap.bmcr),
        (regs::PHY_BMSR, &mut snap.bmsr),
        (regs::PHY_ANAR, &mut snap.advertise),
        (regs::PHY_ANLPAR, &mut snap.lpa),
        (regs::PHY_ANER, &mut snap.expansion),
        (regs::PHY_1000T_CTRL, &mut snap.ctrl1000),
        (regs::PHY_1000T_STATUS, &mut snap.stat1000),
        (regs::PHY_EXT_STATUS, &mut snap.estatus),
    ];
    for (reg, slot) in fields {
        match ops.read_phy(&mut io.hw(), reg) {
            Ok(value) => *slot = value,
            Err(e) => log::warn!("e1000e: error reading PHY register {:#x}: {}", reg, e),
        }
    }

    snap
}
