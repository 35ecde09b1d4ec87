//! Simulated collaborators for unit tests.

use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::driver::intel::chip::ChipCapabilities;
use crate::driver::intel::ops::{ChipOps, ChipVendor, Hw, LinkCheck, PhyInfo};
use crate::driver::intel::phy::LinkStatus;
use crate::driver::intel::state::FlowControl;
use crate::driver::traits::PacketQueue;
use crate::error::HwError;
use crate::mmio::RegisterSpace;
use crate::pci::capability::{PCI_CAP_ID_EXP, PCI_CAP_ID_PM};
use crate::pci::config::{offset, status};
use crate::pci::PciDevice;
use crate::time::Delay;

// ═══════════════════════════════════════════════════════════════════════════
// REGISTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Register file with write log and firmware-overwrite hooks.
#[derive(Default)]
pub struct MockRegs {
    values: RefCell<BTreeMap<u32, u32>>,
    writes: Vec<(u32, u32)>,
    overwrite: BTreeMap<u32, u32>,
    clear_on_read: BTreeSet<u32>,
    dropped: Option<Rc<Cell<bool>>>,
}

impl MockRegs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register that reports `dropped` when the window is unmapped.
    pub fn tracked(dropped: Rc<Cell<bool>>) -> Self {
        let mut regs = Self::default();
        regs.dropped = Some(dropped);
        regs
    }

    pub fn set(&mut self, offset: u32, value: u32) {
        self.values.borrow_mut().insert(offset, value);
    }

    pub fn get(&self, offset: u32) -> u32 {
        self.values.borrow().get(&offset).copied().unwrap_or(0)
    }

    /// After every write to `offset` the register reads `value`.
    pub fn overwrite_after_write(&mut self, offset: u32, value: u32) {
        self.overwrite.insert(offset, value);
    }

    /// Reads of `offset` return the value, then zero.
    pub fn clear_on_read(&mut self, offset: u32) {
        self.clear_on_read.insert(offset);
    }

    pub fn writes(&self) -> &[(u32, u32)] {
        &self.writes
    }

    pub fn write_count(&self, offset: u32) -> usize {
        self.writes.iter().filter(|(o, _)| *o == offset).count()
    }

    /// Index of the first write to `offset` in the log.
    pub fn first_write(&self, offset: u32) -> Option<usize> {
        self.writes.iter().position(|(o, _)| *o == offset)
    }

    /// Index of the last write to `offset` in the log.
    pub fn last_write(&self, offset: u32) -> Option<usize> {
        self.writes.iter().rposition(|(o, _)| *o == offset)
    }

    pub fn clear_log(&mut self) {
        self.writes.clear();
    }
}

impl Drop for MockRegs {
    fn drop(&mut self) {
        if let Some(flag) = &self.dropped {
            flag.set(true);
        }
    }
}

impl RegisterSpace for MockRegs {
    fn read8(&self, offset: u32) -> u8 {
        (self.read32(offset & !3) >> ((offset & 3) * 8)) as u8
    }

    fn read16(&self, offset: u32) -> u16 {
        (self.read32(offset & !3) >> ((offset & 2) * 8)) as u16
    }

    fn read32(&self, offset: u32) -> u32 {
        let mut values = self.values.borrow_mut();
        let value = values.get(&offset).copied().unwrap_or(0);
        if self.clear_on_read.contains(&offset) {
            values.insert(offset, 0);
        }
        value
    }

    fn write16(&mut self, offset: u32, value: u16) {
        let aligned = offset & !3;
        let shift = (offset & 2) * 8;
        let old = self.get(aligned);
        let new = (old & !(0xFFFF << shift)) | ((value as u32) << shift);
        self.write32(aligned, new);
    }

    fn write32(&mut self, offset: u32, value: u32) {
        self.writes.push((offset, value));
        let stored = self.overwrite.get(&offset).copied().unwrap_or(value);
        self.values.borrow_mut().insert(offset, stored);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DELAY
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct MockDelay {
    pub total_us: u64,
    pub calls: u32,
}

impl Delay for MockDelay {
    fn delay_us(&mut self, us: u32) {
        self.total_us += us as u64;
        self.calls += 1;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_us += ms as u64 * 1000;
        self.calls += 1;
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PCI
// ═══════════════════════════════════════════════════════════════════════════

/// PM capability offset in [`MockPci::with_caps`].
pub const PM_CAP: u8 = 0xC8;
/// PCIe capability offset in [`MockPci::with_caps`].
pub const EXP_CAP: u8 = 0xE0;

/// 256-byte config space with mappable BARs.
pub struct MockPci {
    pub config: [u8; 256],
    pub bars: [Option<MockRegs>; 2],
    pub config_writes: Vec<(u8, u16)>,
}

impl MockPci {
    /// Bare function: identifiers only, no capabilities, BAR0 mapped.
    pub fn new(device: u16, subsystem_vendor: u16, subsystem_device: u16) -> Self {
        let mut pci = Self {
            config: [0; 256],
            bars: [Some(MockRegs::new()), None],
            config_writes: Vec::new(),
        };
        pci.put16(offset::VENDOR_ID, 0x8086);
        pci.put16(offset::DEVICE_ID, device);
        pci.put16(offset::SUBSYS_VENDOR_ID, subsystem_vendor);
        pci.put16(offset::SUBSYS_ID, subsystem_device);
        pci.config[offset::REVISION_ID as usize] = 0x04;
        pci
    }

    /// Function with PM (PME from D3hot and D3cold) and PCIe capabilities.
    pub fn with_caps(device: u16) -> Self {
        let mut pci = Self::new(device, 0x8086, 0x0001);
        pci.put16(offset::STATUS, status::CAP_LIST);
        pci.config[offset::CAP_PTR as usize] = PM_CAP;
        pci.config[PM_CAP as usize] = PCI_CAP_ID_PM;
        pci.config[PM_CAP as usize + 1] = EXP_CAP;
        pci.put16(PM_CAP + 2, 0xC823);
        pci.config[EXP_CAP as usize] = PCI_CAP_ID_EXP;
        pci.config[EXP_CAP as usize + 1] = 0;
        pci.put16(EXP_CAP + 0x10, 0x0043);
        pci
    }

    pub fn put16(&mut self, offset: u8, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.config[offset as usize] = lo;
        self.config[offset as usize + 1] = hi;
    }

    pub fn get16(&self, offset: u8) -> u16 {
        u16::from_le_bytes([self.config[offset as usize], self.config[offset as usize + 1]])
    }
}

impl PciDevice for MockPci {
    type Bar = MockRegs;

    fn config_read8(&self, offset: u8) -> u8 {
        self.config[offset as usize]
    }

    fn config_read16(&self, offset: u8) -> u16 {
        self.get16(offset)
    }

    fn config_read32(&self, offset: u8) -> u32 {
        let o = offset as usize;
        u32::from_le_bytes([
            self.config[o],
            self.config[o + 1],
            self.config[o + 2],
            self.config[o + 3],
        ])
    }

    fn config_write16(&mut self, offset: u8, value: u16) {
        self.config_writes.push((offset, value));
        self.put16(offset, value);
    }

    fn map_bar(&mut self, index: u8) -> Option<MockRegs> {
        self.bars.get_mut(index as usize)?.take()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CHIP ROUTINES
// ═══════════════════════════════════════════════════════════════════════════

/// Shared record of chip routine calls and canned results.
#[derive(Default)]
pub struct OpsLog {
    pub calls: Vec<&'static str>,
    pub phy_writes: Vec<(u32, u16)>,
    pub emi_writes: Vec<(u16, u16)>,
    pub jumbo_workaround: Vec<bool>,
    pub phy_regs: BTreeMap<u32, u16>,
    pub nvm: BTreeMap<u16, u16>,
    pub init_fc: Option<FlowControl>,
    pub fail_init: bool,
    pub fail_acquire: bool,
    pub fail_phy: bool,
    pub link: Option<Result<LinkCheck, HwError>>,
}

impl OpsLog {
    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls.iter().position(|c| *c == call)
    }
}

pub struct MockOps {
    pub log: Rc<RefCell<OpsLog>>,
}

impl ChipOps for MockOps {
    fn reset_hw(&self, _hw: &mut Hw<'_>) -> Result<(), HwError> {
        self.log.borrow_mut().calls.push("reset_hw");
        Ok(())
    }

    fn init_hw(&self, _hw: &mut Hw<'_>, fc: &FlowControl) -> Result<(), HwError> {
        let mut log = self.log.borrow_mut();
        log.calls.push("init_hw");
        log.init_fc = Some(*fc);
        if log.fail_init {
            Err(HwError::Config)
        } else {
            Ok(())
        }
    }

    fn check_for_link(&self, _hw: &mut Hw<'_>) -> Result<LinkCheck, HwError> {
        let mut log = self.log.borrow_mut();
        log.calls.push("check_for_link");
        log.link.unwrap_or(Ok(LinkCheck::default()))
    }

    fn config_collision_dist(&self, _hw: &mut Hw<'_>) {
        self.log.borrow_mut().calls.push("config_collision_dist");
    }

    fn acquire_phy(&self, _hw: &mut Hw<'_>) -> Result<(), HwError> {
        let mut log = self.log.borrow_mut();
        log.calls.push("acquire_phy");
        if log.fail_acquire {
            Err(HwError::Blocked)
        } else {
            Ok(())
        }
    }

    fn release_phy(&self, _hw: &mut Hw<'_>) {
        self.log.borrow_mut().calls.push("release_phy");
    }

    fn read_phy(&self, _hw: &mut Hw<'_>, reg: u32) -> Result<u16, HwError> {
        let mut log = self.log.borrow_mut();
        log.calls.push("read_phy");
        if log.fail_phy {
            return Err(HwError::Phy);
        }
        Ok(log.phy_regs.get(&reg).copied().unwrap_or(0))
    }

    fn write_phy(&self, _hw: &mut Hw<'_>, reg: u32, value: u16) -> Result<(), HwError> {
        let mut log = self.log.borrow_mut();
        log.calls.push("write_phy");
        if log.fail_phy {
            return Err(HwError::Phy);
        }
        log.phy_writes.push((reg, value));
        log.phy_regs.insert(reg, value);
        Ok(())
    }

    fn write_emi_locked(&self, _hw: &mut Hw<'_>, addr: u16, value: u16) -> Result<(), HwError> {
        let mut log = self.log.borrow_mut();
        log.calls.push("write_emi");
        log.emi_writes.push((addr, value));
        Ok(())
    }

    fn get_phy_info(&self, _hw: &mut Hw<'_>) -> Result<PhyInfo, HwError> {
        self.log.borrow_mut().calls.push("get_phy_info");
        Ok(PhyInfo {
            id: 0x0154_10C0,
            cable_length: 20,
            ..PhyInfo::default()
        })
    }

    fn read_nvm(&self, _hw: &mut Hw<'_>, offset: u16) -> Result<u16, HwError> {
        let mut log = self.log.borrow_mut();
        log.calls.push("read_nvm");
        log.nvm.get(&offset).copied().ok_or(HwError::Nvm)
    }

    fn phy_hw_reset(&self, _hw: &mut Hw<'_>) -> Result<(), HwError> {
        self.log.borrow_mut().calls.push("phy_hw_reset");
        Ok(())
    }

    fn power_down_phy(&self, _hw: &mut Hw<'_>) {
        self.log.borrow_mut().calls.push("power_down_phy");
    }

    fn power_up_phy(&self, _hw: &mut Hw<'_>) {
        self.log.borrow_mut().calls.push("power_up_phy");
    }

    fn lv_jumbo_workaround(&self, _hw: &mut Hw<'_>, enable: bool) -> Result<(), HwError> {
        let mut log = self.log.borrow_mut();
        log.calls.push("lv_jumbo_workaround");
        log.jumbo_workaround.push(enable);
        Ok(())
    }

    fn resume_workarounds(&self, _hw: &mut Hw<'_>) -> Result<(), HwError> {
        self.log.borrow_mut().calls.push("resume_workarounds");
        Ok(())
    }
}

/// Vendor table handing out [`MockOps`] sharing one log.
#[derive(Default)]
pub struct MockVendor {
    pub log: Rc<RefCell<OpsLog>>,
    pub unsupported: bool,
}

impl MockVendor {
    pub fn ops(&self) -> MockOps {
        MockOps {
            log: self.log.clone(),
        }
    }
}

impl ChipVendor for MockVendor {
    fn ops_for(&self, _caps: &ChipCapabilities) -> Option<Box<dyn ChipOps>> {
        if self.unsupported {
            return None;
        }
        Some(Box::new(self.ops()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PACKET QUEUE
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueueEvent {
    Stop,
    Flush,
    Link(LinkStatus),
}

#[derive(Default, Clone)]
pub struct MockQueue {
    pub events: Rc<RefCell<Vec<QueueEvent>>>,
}

impl MockQueue {
    pub fn count(&self, event: QueueEvent) -> usize {
        self.events.borrow().iter().filter(|e| **e == event).count()
    }

    pub fn last_link(&self) -> Option<LinkStatus> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            QueueEvent::Link(status) => Some(*status),
            _ => None,
        })
    }
}

impl PacketQueue for MockQueue {
    fn stop(&mut self) {
        self.events.borrow_mut().push(QueueEvent::Stop);
    }

    fn flush(&mut self) {
        self.events.borrow_mut().push(QueueEvent::Flush);
    }

    fn link_changed(&mut self, status: LinkStatus) {
        self.events.borrow_mut().push(QueueEvent::Link(status));
    }
}
