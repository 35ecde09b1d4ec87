//! Mutable runtime state of one device instance.
//!
//! Owned exclusively by the driver instance and only touched by the state
//! machine, the tail supervisor and the link tracker.

use super::adaptive::AdaptiveIfs;
use super::ops::PhyInfo;
use super::phy::{LinkSpeed, LinkState};

/// State machine position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Rx/Tx disabled in hardware, interrupts masked.
    Down,
    /// Register-level reset in progress.
    Resetting,
    /// Tx/Rx/RSS/VLAN/multicast setup in progress.
    Configuring,
    /// Interrupts enabled, link status unknown until the first check.
    Up,
}

/// Flow control thresholds recomputed on every reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowControl {
    /// Rx FIFO level that triggers XOFF (bytes, 8-byte granularity).
    pub high_water: u32,
    /// Rx FIFO level that triggers XON.
    pub low_water: u32,
    /// Pause time in XOFF frames.
    pub pause_time: u16,
    /// XOFF refresh interval.
    pub refresh_time: u16,
    /// Send XON at the low watermark.
    pub send_xon: bool,
}

/// Runtime state.
#[derive(Debug, Clone)]
pub struct DeviceRuntimeState {
    /// State machine position.
    pub state: DeviceState,
    /// Link state reported to the host.
    pub link: LinkState,
    /// Negotiated speed.
    pub link_speed: LinkSpeed,
    /// Negotiated duplex.
    pub full_duplex: bool,
    /// Interrupt causes unmasked while up.
    pub intr_mask: u32,
    /// Set while quiescing; status handlers must not schedule work.
    pub down: bool,
    /// A supervisory check must restart the device. Cleared only by a reset.
    pub force_reset: bool,
    /// A link-change interrupt arrived; re-probe copper link.
    pub get_link_status: bool,
    /// Internal serdes sync state from the last link check.
    pub serdes_has_link: bool,
    /// Consecutive checks with a stalled Tx head.
    pub deadlock_warn: u32,
    /// Hardware Tx head seen at the previous check.
    pub last_tx_head: u16,
    /// Tx hang detection must re-check before reporting.
    pub tx_hang_recheck: bool,
    /// PHY hang detections since the last restart.
    pub phy_hang_count: u32,
    /// EEE is active on the current link.
    pub eee_active: bool,
    /// Current flow control thresholds.
    pub flow_control: FlowControl,
    /// Largest single-descriptor transmit (bytes).
    pub tx_fifo_limit: u32,
    /// PHY info cached at the last reset.
    pub phy_info: PhyInfo,
    /// Adaptive inter-frame spacing.
    pub adaptive: AdaptiveIfs,
}

impl DeviceRuntimeState {
    /// Fresh state at attach: down, link unknown.
    pub fn new(intr_mask: u32) -> Self {
        Self {
            state: DeviceState::Down,
            link: LinkState::Down,
            link_speed: LinkSpeed::Unknown,
            full_duplex: false,
            intr_mask,
            down: true,
            force_reset: false,
            get_link_status: true,
            serdes_has_link: false,
            deadlock_warn: 0,
            last_tx_head: 0,
            tx_hang_recheck: false,
            phy_hang_count: 0,
            eee_active: false,
            flow_control: FlowControl::default(),
            tx_fifo_limit: 0,
            phy_info: PhyInfo::default(),
            adaptive: AdaptiveIfs::default(),
        }
    }

    /// Whether the interface is running.
    #[inline]
    pub fn is_up(&self) -> bool {
        self.state == DeviceState::Up
    }

    /// Clear the fault counters a restart starts over with.
    pub fn clear_fault_counters(&mut self) {
        self.deadlock_warn = 0;
        self.last_tx_head = 0;
        self.eee_active = false;
        self.phy_hang_count = 0;
    }
}
