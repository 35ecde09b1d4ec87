//! Host-visible link status.
//!
//! A status reporter on another context reads link state and the PHY
//! snapshot while the driver keeps running. The driver is the only writer.
//! Fields are separate atomics: a reader may see a half-updated snapshot,
//! which is fine for status display. Statistics sit behind a spin lock
//! since a torn 64-bit total is not.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU8, Ordering};

use spin::Mutex;

use super::phy::{LinkSpeed, LinkState, LinkStatus, PhySnapshot};
use super::stats::Statistics;

struct Shared {
    link: AtomicU8,
    speed_mbps: AtomicU32,
    full_duplex: AtomicBool,
    phy: [AtomicU16; 8],
    stats: Mutex<Statistics>,
}

/// Cloneable read side of the device status.
#[derive(Clone)]
pub struct StatusHandle {
    shared: Arc<Shared>,
}

const LINK_DOWN: u8 = 0;
const LINK_ESTABLISHING: u8 = 1;
const LINK_UP: u8 = 2;

impl StatusHandle {
    pub(crate) fn new() -> Self {
        let handle = Self {
            shared: Arc::new(Shared {
                link: AtomicU8::new(LINK_DOWN),
                speed_mbps: AtomicU32::new(0),
                full_duplex: AtomicBool::new(false),
                phy: Default::default(),
                stats: Mutex::new(Statistics::default()),
            }),
        };
        handle.publish_phy(&PhySnapshot::POWER_ON_DEFAULT);
        handle
    }

    // ═══════════════════════════════════════════════════════════════════════
    // READERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Current link state.
    pub fn link_state(&self) -> LinkState {
        match self.shared.link.load(Ordering::Acquire) {
            LINK_UP => LinkState::Up,
            LINK_ESTABLISHING => LinkState::Establishing,
            _ => LinkState::Down,
        }
    }

    /// Current link status.
    pub fn link_status(&self) -> LinkStatus {
        if self.link_state() != LinkState::Up {
            return LinkStatus::DOWN;
        }
        let speed = match self.shared.speed_mbps.load(Ordering::Relaxed) {
            10 => LinkSpeed::Speed10,
            100 => LinkSpeed::Speed100,
            1000 => LinkSpeed::Speed1000,
            _ => LinkSpeed::Unknown,
        };
        LinkStatus {
            link_up: true,
            full_duplex: self.shared.full_duplex.load(Ordering::Relaxed),
            speed,
        }
    }

    /// PHY register snapshot.
    pub fn phy_snapshot(&self) -> PhySnapshot {
        let r = |i: usize| self.shared.phy[i].load(Ordering::Relaxed);
        PhySnapshot {
            bmcr: r(0),
            bmsr: r(1),
            advertise: r(2),
            lpa: r(3),
            expansion: r(4),
            ctrl1000: r(5),
            stat1000: r(6),
            estatus: r(7),
        }
    }

    /// Statistics as of the last refresh.
    pub fn statistics(&self) -> Statistics {
        *self.shared.stats.lock()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // WRITERS (driver only)
    // ═══════════════════════════════════════════════════════════════════════

    pub(crate) fn publish_link(&self, state: LinkState, status: LinkStatus) {
        self.shared.speed_mbps.store(status.speed.mbps(), Ordering::Relaxed);
        self.shared.full_duplex.store(status.full_duplex, Ordering::Relaxed);
        let raw = match state {
            LinkState::Down => LINK_DOWN,
            LinkState::Establishing => LINK_ESTABLISHING,
            LinkState::Up => LINK_UP,
        };
        self.shared.link.store(raw, Ordering::Release);
    }

    pub(crate) fn publish_phy(&self, snap: &PhySnapshot) {
        let values = [
            snap.bmcr,
            snap.bmsr,
            snap.advertise,
            snap.lpa,
            snap.expansion,
            snap.ctrl1000,
            snap.stat1000,
            snap.estatus,
        ];
        for (slot, value) in self.shared.phy.iter().zip(values) {
            slot.store(value, Ordering::Relaxed);
        }
    }

    pub(crate) fn publish_stats(&self, stats: &Statistics) {
        *self.shared.stats.lock() = *stats;
    }
}
