//! Intel e1000e driver instance.
//!
//! Owns one controller from attach to detach and drives the state machine:
//!
//! ```text
//!          bring_up()                       supervise() / interrupts
//! Down ──► Resetting ──► Configuring ──► Up ◄──────────────────────┐
//!  ▲                                      │                          │
//!  └──────────── bring_down() ────────────┘── restart() ─────────────┘
//! ```
//!
//! Every call must be serialized by the caller (one work loop per device).
//! The only concurrent access is the read side of [`StatusHandle`].
//!
//! # Reference
//! - Intel 82579 Datasheet, Section 10 (Programming Interface)
//! - Linux kernel drivers/net/ethernet/intel/e1000e/netdev.c (e1000e_up, e1000e_down, e1000_watchdog_task)

use bitflags::bitflags;
use smoltcp::wire::EthernetAddress;

use crate::config::NicConfig;
use crate::driver::traits::PacketQueue;
use crate::error::{AttachError, Result, RingError};
use crate::mmio::RegisterSpace;
use crate::pci::{PciDevice, PciId};
use crate::time::{timings, Delay};

use super::adaptive::AdaptiveIfs;
use super::chip::{identify_chip, ChipCapabilities, ChipFlags};
use super::configure::{self, Rings};
use super::io::DeviceIo;
use super::manageability;
use super::ops::{Chip, ChipVendor};
use super::phy::{self, LinkSpeed, LinkState, LinkStatus};
use super::power::{self, LtrLimits, PowerManager};
use super::regs;
use super::reset;
use super::ring::{DescriptorRing, RingKind};
use super::state::{DeviceRuntimeState, DeviceState};
use super::stats::Statistics;
use super::status::StatusHandle;
use super::tail::{self, TailWrite};

bitflags! {
    /// Interrupt causes decoded from ICR.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InterruptCause: u32 {
        /// Tx descriptor written back.
        const TXDW = regs::ICR_TXDW;
        /// Link status change.
        const LSC = regs::ICR_LSC;
        /// Rx sequence error.
        const RXSEQ = regs::ICR_RXSEQ;
        /// Rx descriptor minimum threshold.
        const RXDMT0 = regs::ICR_RXDMT0;
        /// Rx overrun.
        const RXO = regs::ICR_RXO;
        /// Rx timer.
        const RXT0 = regs::ICR_RXT0;
    }
}

impl InterruptCause {
    /// Causes unmasked while the device is up.
    pub const ENABLE_MASK: Self = Self::LSC
        .union(Self::RXSEQ)
        .union(Self::RXDMT0)
        .union(Self::RXT0)
        .union(Self::TXDW)
        .union(Self::RXO);

    /// Causes after which the link must be re-probed.
    pub const LINK: Self = Self::LSC.union(Self::RXSEQ);
}

// ═══════════════════════════════════════════════════════════════════════════
// DRIVER
// ═══════════════════════════════════════════════════════════════════════════

/// One attached e1000e controller.
pub struct E1000eDriver<P: PciDevice, D: Delay, Q: PacketQueue> {
    /// PCI function.
    pci: P,
    /// Mapped BARs and delay source.
    io: DeviceIo<P::Bar, D>,
    /// Capability record and family routines.
    chip: Chip,
    /// Tunables.
    config: NicConfig,
    /// Runtime state.
    state: DeviceRuntimeState,
    /// Transmit ring bookkeeping.
    tx_ring: DescriptorRing,
    /// Receive ring bookkeeping.
    rx_ring: DescriptorRing,
    /// Outbound packet queue.
    queue: Q,
    /// PCI power management.
    power: PowerManager,
    /// Management traffic must reach the host.
    mng_pass_through: bool,
    /// LTR limits (LPT only).
    ltr: Option<LtrLimits>,
    /// Station address.
    mac: EthernetAddress,
    /// Accumulated hardware counters.
    stats: Statistics,
    /// Host-visible status.
    status: StatusHandle,
    /// Interface was up when suspended.
    resume_up: bool,
}

impl<P: PciDevice, D: Delay, Q: PacketQueue> E1000eDriver<P, D, Q> {
    /// Attach to a PCI function.
    ///
    /// Identifies the chip, selects its routines, enables the function and
    /// maps its BARs. The device is left down; call [`open`](Self::open).
    ///
    /// # Errors
    /// - [`AttachError::Unidentified`]: no known chip matches the IDs
    /// - [`AttachError::NoChipOps`]: the vendor table lacks the family
    /// - [`AttachError::BarUnmappable`]: BAR0, or BAR1 on flash parts
    pub fn attach<V: ChipVendor + ?Sized>(
        mut pci: P,
        vendor: &V,
        delay: D,
        queue: Q,
        mut config: NicConfig,
    ) -> Result<Self> {
        let id = PciId::read(&pci);
        let caps = identify_chip(&id).ok_or(AttachError::Unidentified(id))?;
        log::info!(
            "e1000e: {} ({:04x}:{:04x}) rev {:#04x}",
            caps.name,
            id.vendor,
            id.device,
            id.revision
        );

        if config.mtu > caps.max_mtu() {
            log::warn!(
                "e1000e: MTU {} exceeds {} limit, using {}",
                config.mtu,
                caps.name,
                caps.max_mtu()
            );
            config.mtu = caps.max_mtu();
        }

        let ops = vendor
            .ops_for(&caps)
            .ok_or(AttachError::NoChipOps(caps.mac))?;

        let ltr = power::read_ltr_limits(&pci, &caps);
        power::enable_device(&mut pci);

        let Some(regs) = pci.map_bar(0) else {
            log::error!("e1000e: region #0 not an MMIO resource, aborting");
            return Err(AttachError::BarUnmappable(0));
        };
        let flash = if caps.has_flash() {
            match pci.map_bar(1) {
                Some(flash) => Some(flash),
                None => {
                    // BAR0 is released when `regs` drops.
                    log::error!("e1000e: region #1 not an MMIO resource, aborting");
                    return Err(AttachError::BarUnmappable(1));
                }
            }
        } else {
            None
        };

        let power = PowerManager::init(&mut pci, &caps);
        let mut io = DeviceIo::new(regs, flash, delay);
        let chip = Chip { caps, ops };

        let mng_pass_through = manageability::pass_through_needed(&mut io, &chip);
        if mng_pass_through {
            log::info!("e1000e: management pass-through enabled");
        }

        let mac = read_mac_address(&io.regs);
        log::info!("e1000e: MAC {}", mac);

        let mut state = DeviceRuntimeState::new(InterruptCause::ENABLE_MASK.bits());
        state.adaptive = AdaptiveIfs::new(
            config.adaptive_ifs && caps.flags.contains(ChipFlags::HAS_ADAPTIVE_IFS),
        );

        Ok(Self {
            pci,
            io,
            chip,
            tx_ring: DescriptorRing::new(RingKind::Tx, config.tx_ring),
            rx_ring: DescriptorRing::new(RingKind::Rx, config.rx_ring),
            config,
            state,
            queue,
            power,
            mng_pass_through,
            ltr,
            mac,
            stats: Statistics::default(),
            status: StatusHandle::new(),
            resume_up: false,
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // ACCESSORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Capability record selected at attach.
    #[inline]
    pub fn capabilities(&self) -> &ChipCapabilities {
        &self.chip.caps
    }

    /// Station MAC address.
    #[inline]
    pub fn mac_address(&self) -> EthernetAddress {
        self.mac
    }

    /// State machine position.
    #[inline]
    pub fn device_state(&self) -> DeviceState {
        self.state.state
    }

    /// Runtime state, read-only.
    #[inline]
    pub fn runtime_state(&self) -> &DeviceRuntimeState {
        &self.state
    }

    /// LTR limits read at attach.
    #[inline]
    pub fn ltr_limits(&self) -> Option<LtrLimits> {
        self.ltr
    }

    /// Whether management pass-through is configured.
    #[inline]
    pub fn mng_pass_through(&self) -> bool {
        self.mng_pass_through
    }

    /// Read side of the device status, for another context.
    pub fn status_handle(&self) -> StatusHandle {
        self.status.clone()
    }

    /// Transmit ring bookkeeping.
    #[inline]
    pub fn tx_ring(&self) -> &DescriptorRing {
        &self.tx_ring
    }

    /// Receive ring bookkeeping.
    #[inline]
    pub fn rx_ring(&self) -> &DescriptorRing {
        &self.rx_ring
    }

    // ═══════════════════════════════════════════════════════════════════════
    // OPEN / CLOSE
    // ═══════════════════════════════════════════════════════════════════════

    /// Bring the interface up from a powered PHY reset.
    pub fn open(&mut self) {
        if self.state.is_up() {
            return;
        }

        let ops = &self.chip.ops;
        if let Err(e) = ops.phy_hw_reset(&mut self.io.hw()) {
            log::warn!("e1000e: PHY reset failed: {}", e);
        }
        if self.chip.caps.is_pch2_or_later() {
            if let Err(e) = ops.resume_workarounds(&mut self.io.hw()) {
                log::warn!("e1000e: PHY resume workarounds failed: {}", e);
            }
        }
        ops.power_up_phy(&mut self.io.hw());

        if self.chip.caps.has_amt() {
            reset::get_hw_control(&mut self.io.regs);
        }

        self.bring_up();
        log::info!("e1000e: interface up");
    }

    /// Take the interface down and hand it back to the firmware.
    pub fn close(&mut self) {
        self.bring_down(true);
        if self.chip.caps.has_amt() {
            reset::release_hw_control(&mut self.io.regs);
        }
        log::info!("e1000e: interface down");
    }

    // ═══════════════════════════════════════════════════════════════════════
    // STATE MACHINE
    // ═══════════════════════════════════════════════════════════════════════

    /// Down → Resetting → Configuring → Up.
    pub fn bring_up(&mut self) {
        self.reset_and_configure();
        self.enable_interrupts();
        self.set_link_unknown();
    }

    /// Up → Down.
    ///
    /// A second call while already down only masks interrupts and folds the
    /// counters; engines are not touched again.
    pub fn bring_down(&mut self, do_reset: bool) {
        if self.state.down {
            self.mask_interrupts();
            self.update_statistics();
            return;
        }
        self.state.down = true;

        self.io.regs.clear_bits32(regs::RCTL, regs::RCTL_EN);
        self.io.regs.clear_bits32(regs::TCTL, regs::TCTL_EN);
        self.io.flush_and_wait_ms(timings::QUIESCE_MS);

        self.mask_interrupts();
        self.update_statistics();
        self.tx_ring.clear();
        self.rx_ring.clear();

        self.state.link_speed = LinkSpeed::Unknown;
        self.state.full_duplex = false;

        if self.chip.caps.is_pch2_or_later() && self.config.jumbo() {
            if let Err(e) = self.chip.ops.lv_jumbo_workaround(&mut self.io.hw(), false) {
                log::debug!("e1000e: failed to disable jumbo frame workaround mode: {}", e);
            }
        }

        if do_reset {
            self.state.state = DeviceState::Resetting;
            reset::reset_device(&mut self.io, &self.chip, &self.config, &mut self.state);
        }
        self.state.state = DeviceState::Down;
        self.state.link = LinkState::Down;
        self.status.publish_link(LinkState::Down, LinkStatus::DOWN);
    }

    /// Tear down and rebuild after a fault. Runs even when already down.
    pub fn restart(&mut self) {
        self.queue.stop();
        self.queue.flush();
        self.report_link_down();

        self.mask_interrupts();
        self.state.clear_fault_counters();
        self.reset_and_configure();
        self.enable_interrupts();
        self.set_link_unknown();
        log::info!("e1000e: restarted");
    }

    fn reset_and_configure(&mut self) {
        self.state.state = DeviceState::Resetting;
        reset::reset_device(&mut self.io, &self.chip, &self.config, &mut self.state);

        self.state.state = DeviceState::Configuring;
        configure::configure_device(
            &mut self.io,
            &self.chip,
            &self.config,
            &mut self.state,
            self.mng_pass_through,
            Rings {
                tx: &mut self.tx_ring,
                rx: &mut self.rx_ring,
            },
        );

        self.state.down = false;
        self.state.state = DeviceState::Up;
    }

    fn set_link_unknown(&mut self) {
        self.state.tx_hang_recheck = false;
        self.state.get_link_status = true;
        self.state.link = LinkState::Establishing;
        self.status.publish_link(LinkState::Establishing, LinkStatus::DOWN);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // INTERRUPTS
    // ═══════════════════════════════════════════════════════════════════════

    fn enable_interrupts(&mut self) {
        self.io.regs.write32(regs::IMS, self.state.intr_mask);
        self.io.regs.flush();
    }

    /// Mask every interrupt cause.
    pub fn mask_interrupts(&mut self) {
        self.io.regs.write32(regs::IMC, regs::INT_MASK_ALL);
        self.io.regs.flush();
    }

    /// Read and decode ICR.
    ///
    /// Link causes raise "link status unknown" so the next
    /// [`supervise`](Self::supervise) re-probes. Nothing is scheduled while
    /// the device is down.
    pub fn handle_interrupt(&mut self) -> InterruptCause {
        let cause = InterruptCause::from_bits_truncate(self.io.regs.read32(regs::ICR));
        if self.state.down {
            return cause;
        }
        if cause.intersects(InterruptCause::LINK) {
            self.state.get_link_status = true;
        }
        cause
    }

    // ═══════════════════════════════════════════════════════════════════════
    // SUPERVISOR
    // ═══════════════════════════════════════════════════════════════════════

    /// Periodic check: pending restarts, link, statistics, Tx hang.
    pub fn supervise(&mut self) {
        if self.state.down {
            return;
        }
        if self.state.force_reset {
            log::warn!("e1000e: forced reset pending, restarting");
            self.restart();
            return;
        }

        self.track_link();
        self.update_statistics();

        if self.tx_hung() {
            log::error!("e1000e: Tx hang detected, restarting");
            self.restart();
        }
    }

    fn track_link(&mut self) {
        let active = phy::check_link(
            &mut self.io,
            &self.chip.caps,
            self.chip.ops.as_ref(),
            &mut self.state,
        );

        if active && self.state.link != LinkState::Up {
            let status = LinkStatus::from_status(self.io.regs.read32(regs::STATUS));
            self.state.link = LinkState::Up;
            self.state.link_speed = status.speed;
            self.state.full_duplex = status.full_duplex;
            self.status.publish_link(LinkState::Up, status);
            self.queue.link_changed(status);
            log::info!(
                "e1000e: link up, {} Mbps, {} duplex",
                status.speed.mbps(),
                if status.full_duplex { "full" } else { "half" }
            );
        } else if !active && self.state.link == LinkState::Up {
            self.report_link_down();
            log::info!("e1000e: link down");
        } else if !active && self.state.link == LinkState::Establishing {
            self.state.link = LinkState::Down;
            self.status.publish_link(LinkState::Down, LinkStatus::DOWN);
            log::debug!("e1000e: link not active");
        }

        let snap = phy::refresh_phy_snapshot(&mut self.io, &self.chip.caps, self.chip.ops.as_ref());
        self.status.publish_phy(&snap);
    }

    fn report_link_down(&mut self) {
        self.state.link = LinkState::Down;
        self.state.link_speed = LinkSpeed::Unknown;
        self.state.full_duplex = false;
        self.status.publish_link(LinkState::Down, LinkStatus::DOWN);
        self.queue.link_changed(LinkStatus::DOWN);
    }

    /// Whether TDH has stalled with descriptors in flight long enough.
    fn tx_hung(&mut self) -> bool {
        let head = self.io.regs.read32(regs::TDH) as u16;
        // Hardware still owns descriptors only while its head trails the tail.
        let stalled = head != self.tx_ring.tail() && head == self.state.last_tx_head;
        self.state.last_tx_head = head;

        if !stalled {
            self.state.deadlock_warn = 0;
            self.state.tx_hang_recheck = false;
            return false;
        }

        self.state.deadlock_warn += 1;
        self.state.tx_hang_recheck = true;
        log::warn!(
            "e1000e: Tx head stuck at {} ({}/{})",
            head,
            self.state.deadlock_warn,
            timings::TX_DEADLOCK_THRESHOLD
        );
        self.state.deadlock_warn >= timings::TX_DEADLOCK_THRESHOLD
    }

    /// Fold the hardware counters and step adaptive IFS.
    pub fn update_statistics(&mut self) {
        let delta = self.stats.update(&self.io.regs);
        self.status.publish_stats(&self.stats);
        self.state
            .adaptive
            .update(&mut self.io.regs, delta.collisions, delta.tx_packets);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // RINGS
    // ═══════════════════════════════════════════════════════════════════════

    /// Hand Tx descriptors up to `index` to hardware.
    pub fn advance_tx_tail(&mut self, index: u16) -> core::result::Result<TailWrite, RingError> {
        self.tx_ring.validate_tail(index)?;
        let written = tail::write_tail(
            &mut self.io,
            &self.chip.caps,
            &mut self.state,
            RingKind::Tx,
            index,
        );
        self.tx_ring.set_tail(index);
        Ok(written)
    }

    /// Return Rx descriptors up to `index` to hardware.
    pub fn advance_rx_tail(&mut self, index: u16) -> core::result::Result<TailWrite, RingError> {
        self.rx_ring.validate_tail(index)?;
        let written = tail::write_tail(
            &mut self.io,
            &self.chip.caps,
            &mut self.state,
            RingKind::Rx,
            index,
        );
        self.rx_ring.set_tail(index);
        Ok(written)
    }

    /// Reclaim Tx descriptors up to the hardware head.
    pub fn reclaim_tx(&mut self) -> u16 {
        let head = self.io.regs.read32(regs::TDH) as u16;
        self.tx_ring.reclaim_to(head)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // POWER
    // ═══════════════════════════════════════════════════════════════════════

    /// Close if running, arm wake-up when asked and possible, enter D3.
    pub fn suspend(&mut self, wol: bool) {
        self.resume_up = self.state.is_up();
        if self.resume_up {
            self.close();
        }

        let armed =
            wol && self.power.wol_capable() && self.chip.caps.flags.contains(ChipFlags::HAS_WOL);
        if armed {
            self.io.regs.write32(regs::WUC, regs::WUC_PME_EN);
            self.io.regs.write32(regs::WUFC, regs::WUFC_MAG);
        } else {
            self.io.regs.write32(regs::WUC, 0);
            self.io.regs.write32(regs::WUFC, 0);
            self.chip.ops.power_down_phy(&mut self.io.hw());
        }
        log::info!("e1000e: entering D3 (wake-on-LAN {})", if armed { "armed" } else { "off" });

        self.power.enter_d3(&mut self.pci, armed);
    }

    /// Enter D0 and reopen if the interface was running.
    pub fn resume(&mut self) {
        self.power.enter_d0(&mut self.pci);
        if self.resume_up {
            self.resume_up = false;
            self.open();
        }
    }
}

/// Station address from receive address register 0.
fn read_mac_address<R: RegisterSpace + ?Sized>(regs: &R) -> EthernetAddress {
    let low = regs.read32(regs::RAL0).to_le_bytes();
    let high = regs.read32(regs::RAH0).to_le_bytes();
    EthernetAddress([low[0], low[1], low[2], low[3], high[0], high[1]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::intel::ops::LinkCheck;
    use crate::pci::capability::pm;
    use crate::testing::{MockDelay, MockPci, MockQueue, MockRegs, MockVendor, QueueEvent, PM_CAP};
    use alloc::rc::Rc;
    use core::cell::Cell;

    type Driver = E1000eDriver<MockPci, MockDelay, MockQueue>;

    fn attach(pci: MockPci) -> (Driver, MockVendor, MockQueue) {
        let vendor = MockVendor::default();
        let queue = MockQueue::default();
        let drv = Driver::attach(
            pci,
            &vendor,
            MockDelay::default(),
            queue.clone(),
            NicConfig::default(),
        )
        .unwrap();
        (drv, vendor, queue)
    }

    fn pci_82574() -> MockPci {
        let mut pci = MockPci::with_caps(0x10D3);
        let regs = pci.bars[0].as_mut().unwrap();
        regs.set(regs::RAL0, 0x5634_1200);
        regs.set(regs::RAH0, regs::RAH_AV | 0x9A78);
        pci
    }

    fn link_up(vendor: &MockVendor, drv: &mut Driver) {
        vendor.log.borrow_mut().link = Some(Ok(LinkCheck {
            established: true,
            serdes_has_link: false,
        }));
        drv.io
            .regs
            .set(regs::STATUS, regs::STATUS_LU | regs::STATUS_FD | regs::STATUS_SPEED_1000);
    }

    #[test]
    fn test_attach_reads_mac_and_enables_device() {
        let (drv, _, _) = attach(pci_82574());
        assert_eq!(
            drv.mac_address(),
            EthernetAddress([0x00, 0x12, 0x34, 0x56, 0x78, 0x9A])
        );
        assert_eq!(drv.device_state(), DeviceState::Down);
        assert_ne!(
            drv.pci.get16(crate::pci::config::offset::COMMAND)
                & crate::pci::config::command::BUS_MASTER,
            0
        );
        assert_eq!(drv.ltr_limits(), None);
    }

    #[test]
    fn test_attach_with_unknown_subsystem_uses_family_defaults() {
        let mut pci = MockPci::new(0x1502, 0x1234, 0x5678);
        pci.bars[1] = Some(MockRegs::new());
        let (drv, _, _) = attach(pci);
        let base = crate::driver::intel::chip::family_defaults(drv.capabilities().mac);
        assert_eq!(drv.capabilities().flags, base.flags);
        assert_eq!(drv.capabilities().aspm_disable, base.aspm_disable);
    }

    #[test]
    fn test_attach_errors() {
        let vendor = MockVendor::default();
        let unknown = MockPci::new(0x1234, 0, 0);
        let err = Driver::attach(
            unknown,
            &vendor,
            MockDelay::default(),
            MockQueue::default(),
            NicConfig::default(),
        )
        .err();
        assert!(matches!(err, Some(AttachError::Unidentified(_))));

        let unsupported = MockVendor {
            unsupported: true,
            ..MockVendor::default()
        };
        let err = Driver::attach(
            MockPci::new(0x10D3, 0, 0),
            &unsupported,
            MockDelay::default(),
            MockQueue::default(),
            NicConfig::default(),
        )
        .err();
        assert!(matches!(err, Some(AttachError::NoChipOps(_))));

        let mut no_bar = MockPci::new(0x10D3, 0, 0);
        no_bar.bars[0] = None;
        let err = Driver::attach(
            no_bar,
            &vendor,
            MockDelay::default(),
            MockQueue::default(),
            NicConfig::default(),
        )
        .err();
        assert_eq!(err, Some(AttachError::BarUnmappable(0)));
    }

    #[test]
    fn test_missing_flash_bar_releases_bar0() {
        let released = Rc::new(Cell::new(false));
        let mut pci = MockPci::new(0x1502, 0, 0);
        pci.bars[0] = Some(MockRegs::tracked(released.clone()));

        let err = Driver::attach(
            pci,
            &MockVendor::default(),
            MockDelay::default(),
            MockQueue::default(),
            NicConfig::default(),
        )
        .err();

        assert_eq!(err, Some(AttachError::BarUnmappable(1)));
        assert!(released.get());
    }

    #[test]
    fn test_bring_up_leaves_rings_with_one_reserved_slot() {
        let (mut drv, _, _) = attach(pci_82574());
        drv.bring_up();

        assert_eq!(drv.device_state(), DeviceState::Up);
        assert!(!drv.runtime_state().down);
        assert!(drv.runtime_state().get_link_status);
        assert_eq!(drv.tx_ring().free_slots(), drv.tx_ring().capacity() - 1);
        assert_eq!(drv.rx_ring().free_slots(), drv.rx_ring().capacity() - 1);
        assert_eq!((drv.tx_ring().tail(), drv.tx_ring().clean()), (0, 0));
        assert_eq!(drv.io.regs.get(regs::IMS), InterruptCause::ENABLE_MASK.bits());
        assert_eq!(drv.status_handle().link_state(), LinkState::Establishing);
    }

    #[test]
    fn test_open_runs_phy_bring_up_and_amt_handshake() {
        let (mut drv, vendor, _) = attach(MockPci::new(0x10F6, 0, 0));
        drv.open();

        let log = vendor.log.borrow();
        assert!(log.position("phy_hw_reset") < log.position("power_up_phy"));
        assert!(log.position("power_up_phy") < log.position("reset_hw"));
        assert_eq!(log.count("resume_workarounds"), 0);
        assert_ne!(drv.io.regs.get(regs::CTRL_EXT) & regs::CTRL_EXT_DRV_LOAD, 0);
        drop(log);

        drv.close();
        assert_eq!(drv.io.regs.get(regs::CTRL_EXT) & regs::CTRL_EXT_DRV_LOAD, 0);
        assert_eq!(drv.device_state(), DeviceState::Down);
    }

    #[test]
    fn test_bring_down_quiesces_then_masks() {
        let (mut drv, _, _) = attach(pci_82574());
        drv.bring_up();
        drv.advance_tx_tail(4).unwrap();
        drv.io.regs.clear_log();
        drv.io.delay = MockDelay::default();

        drv.bring_down(false);

        assert!(drv.runtime_state().down);
        assert_eq!(drv.io.regs.get(regs::RCTL) & regs::RCTL_EN, 0);
        assert_eq!(drv.io.regs.get(regs::TCTL) & regs::TCTL_EN, 0);
        assert_eq!(drv.io.delay.total_us, 10_000);
        assert!(drv.io.regs.last_write(regs::TCTL) < drv.io.regs.first_write(regs::IMC));
        assert_eq!(drv.tx_ring().in_flight(), 0);
    }

    #[test]
    fn test_double_bring_down_is_idempotent() {
        let (mut drv, vendor, _) = attach(pci_82574());
        drv.bring_up();
        drv.bring_down(true);
        let resets = vendor.log.borrow().count("reset_hw");
        drv.io.regs.clear_log();

        drv.bring_down(true);

        assert_eq!(vendor.log.borrow().count("reset_hw"), resets);
        assert_eq!(drv.io.regs.write_count(regs::RCTL), 0);
        assert_eq!(drv.io.regs.write_count(regs::TCTL), 0);
        assert_eq!(drv.io.regs.write_count(regs::IMC), 1);
        assert_eq!(drv.device_state(), DeviceState::Down);
        assert_eq!(drv.tx_ring().free_slots(), drv.tx_ring().capacity() - 1);
    }

    #[test]
    fn test_restart_while_down() {
        let (mut drv, vendor, queue) = attach(pci_82574());
        assert!(drv.runtime_state().down);

        drv.restart();
        drv.restart();

        assert_eq!(queue.count(QueueEvent::Stop), 2);
        assert_eq!(queue.count(QueueEvent::Flush), 2);
        assert_eq!(queue.last_link(), Some(LinkStatus::DOWN));
        assert_eq!(vendor.log.borrow().count("reset_hw"), 2);
        assert!(!drv.runtime_state().down);
        assert_eq!(drv.device_state(), DeviceState::Up);
    }

    #[test]
    fn test_restart_stops_queue_before_touching_hardware() {
        let (mut drv, vendor, queue) = attach(pci_82574());
        drv.bring_up();
        vendor.log.borrow_mut().calls.clear();
        drv.io.regs.clear_log();

        drv.restart();

        let events = queue.events.borrow();
        assert_eq!(events[0], QueueEvent::Stop);
        assert_eq!(events[1], QueueEvent::Flush);
        assert_eq!(drv.io.regs.first_write(regs::IMC), Some(0));
        assert_eq!(vendor.log.borrow().calls[0], "reset_hw");
    }

    #[test]
    fn test_corrupted_tail_forces_restart_on_next_check() {
        let (mut drv, vendor, queue) = attach(pci_82574());
        drv.bring_up();
        drv.io.regs.overwrite_after_write(regs::TDT, 0);

        assert_eq!(drv.advance_tx_tail(3), Ok(TailWrite::Corrupted));
        assert_eq!(drv.io.regs.write_count(regs::TDT), 2);
        assert!(drv.runtime_state().force_reset);
        assert_eq!(drv.io.regs.get(regs::TCTL) & regs::TCTL_EN, 0);

        let resets = vendor.log.borrow().count("reset_hw");
        drv.supervise();

        assert_eq!(vendor.log.borrow().count("reset_hw"), resets + 1);
        assert!(!drv.runtime_state().force_reset);
        assert_eq!(queue.count(QueueEvent::Stop), 1);
        assert_ne!(drv.io.regs.get(regs::TCTL) & regs::TCTL_EN, 0);
    }

    #[test]
    fn test_rejected_tail_never_reaches_hardware() {
        let (mut drv, _, _) = attach(pci_82574());
        drv.bring_up();
        let capacity = drv.rx_ring().capacity();
        let writes = drv.io.regs.write_count(regs::RDT);

        assert_eq!(
            drv.advance_rx_tail(capacity),
            Err(RingError::IndexOutOfRange {
                index: capacity,
                capacity
            })
        );
        assert_eq!(drv.io.regs.write_count(regs::RDT), writes);
        assert_eq!(drv.advance_rx_tail(10), Ok(TailWrite::Verified));
        assert_eq!(drv.io.regs.get(regs::RDT), 10);
    }

    #[test]
    fn test_tx_hang_restarts_after_threshold() {
        let (mut drv, _, queue) = attach(pci_82574());
        drv.bring_up();
        drv.advance_tx_tail(5).unwrap();

        drv.supervise();
        drv.supervise();
        assert_eq!(queue.count(QueueEvent::Stop), 0);
        assert!(drv.runtime_state().tx_hang_recheck);

        drv.supervise();
        assert_eq!(queue.count(QueueEvent::Stop), 1);
        assert_eq!(drv.runtime_state().deadlock_warn, 0);
    }

    #[test]
    fn test_drained_ring_without_reclaim_is_not_hung() {
        let (mut drv, _, queue) = attach(pci_82574());
        drv.bring_up();
        drv.advance_tx_tail(5).unwrap();
        drv.io.regs.set(regs::TDH, 5);

        for _ in 0..4 {
            drv.supervise();
        }
        assert_eq!(drv.tx_ring().in_flight(), 5);
        assert_eq!(drv.runtime_state().deadlock_warn, 0);
        assert!(!drv.runtime_state().tx_hang_recheck);
        assert_eq!(queue.count(QueueEvent::Stop), 0);
    }

    #[test]
    fn test_tx_progress_clears_hang_counter() {
        let (mut drv, _, queue) = attach(pci_82574());
        drv.bring_up();
        drv.advance_tx_tail(5).unwrap();

        drv.supervise();
        drv.supervise();
        drv.io.regs.set(regs::TDH, 2);
        drv.supervise();
        assert_eq!(drv.runtime_state().deadlock_warn, 0);
        assert_eq!(drv.reclaim_tx(), 2);
        assert_eq!(drv.tx_ring().in_flight(), 3);
        assert_eq!(queue.count(QueueEvent::Stop), 0);
    }

    #[test]
    fn test_link_up_and_down_notify_queue() {
        let (mut drv, vendor, queue) = attach(pci_82574());
        drv.bring_up();
        drv.supervise();
        assert_eq!(drv.status_handle().link_state(), LinkState::Down);
        assert_eq!(queue.last_link(), None);

        link_up(&vendor, &mut drv);
        drv.supervise();
        let up = LinkStatus {
            link_up: true,
            full_duplex: true,
            speed: LinkSpeed::Speed1000,
        };
        assert_eq!(queue.last_link(), Some(up));
        assert_eq!(drv.status_handle().link_status(), up);
        assert!(!drv.runtime_state().get_link_status);

        // Link change interrupt, then the PHY reports no link.
        drv.io.regs.set(regs::ICR, regs::ICR_LSC);
        drv.io.regs.clear_on_read(regs::ICR);
        let cause = drv.handle_interrupt();
        assert!(cause.contains(InterruptCause::LSC));
        assert!(drv.runtime_state().get_link_status);

        vendor.log.borrow_mut().link = Some(Ok(LinkCheck::default()));
        drv.io.regs.set(regs::STATUS, 0);
        drv.supervise();
        assert_eq!(queue.last_link(), Some(LinkStatus::DOWN));
        assert_eq!(drv.status_handle().link_state(), LinkState::Down);
    }

    #[test]
    fn test_interrupt_while_down_schedules_nothing() {
        let (mut drv, _, _) = attach(pci_82574());
        drv.state.get_link_status = false;
        drv.io.regs.set(regs::ICR, regs::ICR_LSC | regs::ICR_RXT0);
        let cause = drv.handle_interrupt();
        assert_eq!(cause, InterruptCause::LSC | InterruptCause::RXT0);
        assert!(!drv.runtime_state().get_link_status);
    }

    #[test]
    fn test_supervise_is_noop_while_down() {
        let (mut drv, vendor, _) = attach(pci_82574());
        drv.state.force_reset = true;
        drv.supervise();
        assert_eq!(vendor.log.borrow().count("reset_hw"), 0);
    }

    #[test]
    fn test_statistics_published() {
        let (mut drv, _, _) = attach(pci_82574());
        drv.bring_up();
        drv.io.regs.set(regs::GPRC, 7);
        drv.io.regs.clear_on_read(regs::GPRC);
        drv.supervise();
        drv.supervise();
        assert_eq!(drv.status_handle().statistics().rx_packets, 7);
    }

    #[test]
    fn test_suspend_with_wol_then_resume() {
        let (mut drv, vendor, _) = attach(pci_82574());
        drv.open();

        drv.suspend(true);
        let ctrl = PM_CAP + pm::CTRL;
        assert_eq!(
            drv.pci.get16(ctrl),
            pm::CTRL_STATE_D3 | pm::CTRL_PME_STATUS | pm::CTRL_PME_ENABLE
        );
        assert_eq!(drv.io.regs.get(regs::WUC), regs::WUC_PME_EN);
        assert_eq!(drv.io.regs.get(regs::WUFC), regs::WUFC_MAG);
        assert_eq!(vendor.log.borrow().count("power_down_phy"), 0);
        assert_eq!(drv.device_state(), DeviceState::Down);

        drv.resume();
        assert_eq!(drv.pci.get16(ctrl) & pm::CTRL_STATE_MASK, pm::CTRL_STATE_D0);
        assert_eq!(drv.device_state(), DeviceState::Up);
    }

    #[test]
    fn test_suspend_without_wol_powers_down_phy() {
        let (mut drv, vendor, _) = attach(pci_82574());
        drv.suspend(false);
        assert_eq!(drv.pci.get16(PM_CAP + pm::CTRL), pm::CTRL_STATE_D3);
        assert_eq!(vendor.log.borrow().count("power_down_phy"), 1);

        drv.resume();
        assert_eq!(drv.device_state(), DeviceState::Down);
    }

    #[test]
    fn test_jumbo_mtu_clamped_on_non_jumbo_family() {
        let mut pci = MockPci::new(0x104C, 0, 0);
        pci.bars[1] = Some(MockRegs::new());
        let config = NicConfig {
            mtu: 9000,
            ..NicConfig::default()
        };
        let mut drv = Driver::attach(
            pci,
            &MockVendor::default(),
            MockDelay::default(),
            MockQueue::default(),
            config,
        )
        .unwrap();
        assert_eq!(drv.config.mtu, 1500);

        drv.bring_up();
        assert_eq!(drv.io.regs.get(regs::RCTL) & regs::RCTL_LPE, 0);
    }

    #[test]
    fn test_jumbo_workaround_disabled_on_bring_down() {
        let mut pci = MockPci::new(0x1502, 0, 0);
        pci.bars[1] = Some(MockRegs::new());
        let vendor = MockVendor::default();
        let config = NicConfig {
            mtu: 9000,
            ..NicConfig::default()
        };
        let mut drv =
            Driver::attach(pci, &vendor, MockDelay::default(), MockQueue::default(), config).unwrap();
        drv.bring_up();
        drv.bring_down(false);
        assert_eq!(vendor.log.borrow().jumbo_workaround, vec![true, false]);
    }
}
