//! PCI power sequencing.
//!
//! Capability discovery at attach, D0/D3 transitions and Wake-on-LAN
//! arming. Every transition is a single read-modify-write of PMCSR with no
//! read-back: the state change is not observable synchronously on all
//! platforms.
//!
//! # Reference
//! - PCI Bus Power Management Interface Spec 1.2, Section 3.2.4 (PMCSR)
//! - PCI Express Base Spec 2.0, Section 7.8.7 (Link Control)

use crate::pci::capability::{exp, pm, PCI_CAP_ID_EXP, PCI_CAP_ID_PM};
use crate::pci::config::{command, offset};
use crate::pci::PciDevice;

use super::chip::{AspmDisable, ChipCapabilities, MacFamily};

/// Config space offset of the LTR capability on LPT.
pub const PCI_LTR_CAP_LPT: u8 = 0xA8;

/// Latency tolerance limits the platform reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LtrLimits {
    /// Max snoop latency.
    pub max_snoop: u16,
    /// Max no-snoop latency.
    pub max_no_snoop: u16,
}

/// Read the LTR limits. Only LPT exposes them at this offset.
pub fn read_ltr_limits<P: PciDevice + ?Sized>(dev: &P, caps: &ChipCapabilities) -> Option<LtrLimits> {
    if caps.mac != MacFamily::PchLpt {
        return None;
    }
    Some(LtrLimits {
        max_snoop: dev.config_read16(PCI_LTR_CAP_LPT),
        max_no_snoop: dev.config_read16(PCI_LTR_CAP_LPT + 2),
    })
}

/// Enable memory decoding, bus mastering and MWI; disable I/O decoding.
pub fn enable_device<P: PciDevice + ?Sized>(dev: &mut P) {
    let mut cmd = dev.config_read16(offset::COMMAND);
    cmd |= command::BUS_MASTER | command::MEM_SPACE | command::MEM_WR_INVALIDATE;
    cmd &= !command::IO_SPACE;
    dev.config_write16(offset::COMMAND, cmd);
}

// ═══════════════════════════════════════════════════════════════════════════
// POWER MANAGER
// ═══════════════════════════════════════════════════════════════════════════

/// Config space offset of a 16-bit register inside a capability, if the
/// register fits below the end of the 256-byte header space.
fn cap_register(cap: u8, reg: u8) -> Option<u8> {
    cap.checked_add(reg).filter(|&off| off < u8::MAX)
}

/// Power-management state discovered at attach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PowerManager {
    /// PMCSR offset.
    pmcsr: Option<u8>,
    /// PCIe capability offset.
    exp_cap: Option<u8>,
    /// PME can be asserted from D3hot or D3cold.
    wol_capable: bool,
}

impl PowerManager {
    /// Discover the PM and PCIe capabilities and apply the ASPM policy.
    pub fn init<P: PciDevice + ?Sized>(dev: &mut P, caps: &ChipCapabilities) -> Self {
        let mut pmgr = Self::default();

        match dev.find_capability(PCI_CAP_ID_PM) {
            Some(cap) => match (cap_register(cap, pm::PMC), cap_register(cap, pm::CTRL)) {
                (Some(pmc_off), Some(pmcsr)) => {
                    let pmc = dev.config_read16(pmc_off);
                    log::debug!("e1000e: PCI power management capabilities: {:#06x}", pmc);
                    pmgr.wol_capable = pmc & (pm::PMC_PME_D3COLD | pm::PMC_PME_D3HOT) != 0;
                    pmgr.pmcsr = Some(pmcsr);
                }
                _ => log::warn!("e1000e: PM capability at {:#04x} overruns config space", cap),
            },
            None => log::info!("e1000e: PCI power management unsupported"),
        }

        if let Some(cap) = dev.find_capability(PCI_CAP_ID_EXP) {
            let Some(lnkctl_off) = cap_register(cap, exp::LNKCTL) else {
                log::warn!("e1000e: PCIe capability at {:#04x} overruns config space", cap);
                return pmgr;
            };
            let lnkctl = dev.config_read16(lnkctl_off);
            let disable = aspm_bits(caps.aspm_disable);
            if disable != 0 {
                dev.config_write16(lnkctl_off, lnkctl & !disable);
            }
            log::debug!(
                "e1000e: PCIe link control {:#06x} -> {:#06x}",
                lnkctl,
                lnkctl & !disable
            );
            pmgr.exp_cap = Some(cap);
        }

        pmgr
    }

    /// Whether Wake-on-LAN can be armed.
    #[inline]
    pub fn wol_capable(&self) -> bool {
        self.wol_capable
    }

    /// PCIe capability offset, if present.
    #[inline]
    pub fn exp_cap(&self) -> Option<u8> {
        self.exp_cap
    }

    /// Enter D0 and restore the command register.
    pub fn enter_d0<P: PciDevice + ?Sized>(&self, dev: &mut P) {
        if let Some(off) = self.pmcsr {
            let pmcsr = Self::cleared_pmcsr(dev, off) | pm::CTRL_STATE_D0;
            dev.config_write16(off, pmcsr);
        }
        // Some platforms drop bus mastering across D3.
        enable_device(dev);
    }

    /// Enter D3hot, arming PME when `wol` is set and supported.
    pub fn enter_d3<P: PciDevice + ?Sized>(&self, dev: &mut P, wol: bool) {
        let Some(off) = self.pmcsr else {
            return;
        };
        let mut pmcsr = Self::cleared_pmcsr(dev, off) | pm::CTRL_STATE_D3;
        if wol && self.wol_capable {
            pmcsr |= pm::CTRL_PME_STATUS | pm::CTRL_PME_ENABLE;
        }
        dev.config_write16(off, pmcsr);
    }

    fn cleared_pmcsr<P: PciDevice + ?Sized>(dev: &P, off: u8) -> u16 {
        dev.config_read16(off)
            & !(pm::CTRL_STATE_MASK | pm::CTRL_PME_STATUS | pm::CTRL_PME_ENABLE)
    }
}

/// LNKCTL bits for an ASPM disable mask.
fn aspm_bits(disable: AspmDisable) -> u16 {
    let mut bits = 0;
    if disable.contains(AspmDisable::L0S) {
        bits |= exp::LNKCTL_ASPM_L0S;
    }
    if disable.contains(AspmDisable::L1) {
        bits |= exp::LNKCTL_ASPM_L1;
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::intel::chip::identify_chip;
    use crate::pci::PciId;
    use crate::testing::{MockPci, EXP_CAP, PM_CAP};

    fn caps(device: u16) -> ChipCapabilities {
        identify_chip(&PciId::read(&MockPci::new(device, 0, 0))).unwrap()
    }

    #[test]
    fn test_init_discovers_caps_and_wol() {
        let mut pci = MockPci::with_caps(0x1502);
        let pmgr = PowerManager::init(&mut pci, &caps(0x1502));
        assert!(pmgr.wol_capable());
        assert_eq!(pmgr.exp_cap(), Some(EXP_CAP));
        // No ASPM policy on 82579: link control untouched.
        assert!(pci.config_writes.is_empty());
    }

    #[test]
    fn test_init_disables_aspm_per_family() {
        let mut pci = MockPci::with_caps(0x10D3);
        PowerManager::init(&mut pci, &caps(0x10D3));
        assert_eq!(pci.get16(EXP_CAP + exp::LNKCTL), 0x0040);

        let mut pci = MockPci::with_caps(0x105E);
        PowerManager::init(&mut pci, &caps(0x105E));
        assert_eq!(pci.get16(EXP_CAP + exp::LNKCTL), 0x0041);
    }

    #[test]
    fn test_no_pme_from_d3_means_no_wol() {
        let mut pci = MockPci::with_caps(0x1502);
        pci.put16(PM_CAP + pm::PMC, 0x0023);
        let pmgr = PowerManager::init(&mut pci, &caps(0x1502));
        assert!(!pmgr.wol_capable());
    }

    #[test]
    fn test_missing_capabilities() {
        let mut pci = MockPci::new(0x1502, 0, 0);
        let pmgr = PowerManager::init(&mut pci, &caps(0x1502));
        assert!(!pmgr.wol_capable());
        assert_eq!(pmgr.exp_cap(), None);

        pmgr.enter_d3(&mut pci, true);
        assert!(pci.config_writes.is_empty());
    }

    #[test]
    fn test_d3_with_and_without_wol() {
        let mut pci = MockPci::with_caps(0x1502);
        let pmgr = PowerManager::init(&mut pci, &caps(0x1502));
        let ctrl = PM_CAP + pm::CTRL;

        pci.put16(ctrl, 0x0100);
        pmgr.enter_d3(&mut pci, false);
        assert_eq!(pci.get16(ctrl), pm::CTRL_STATE_D3);

        pmgr.enter_d3(&mut pci, true);
        assert_eq!(
            pci.get16(ctrl),
            pm::CTRL_STATE_D3 | pm::CTRL_PME_STATUS | pm::CTRL_PME_ENABLE
        );
    }

    #[test]
    fn test_d0_clears_pme_and_restores_command() {
        let mut pci = MockPci::with_caps(0x1502);
        let pmgr = PowerManager::init(&mut pci, &caps(0x1502));
        let ctrl = PM_CAP + pm::CTRL;
        pci.put16(ctrl, pm::CTRL_STATE_D3 | pm::CTRL_PME_STATUS | pm::CTRL_PME_ENABLE | 0x0008);
        pci.put16(offset::COMMAND, command::IO_SPACE);

        pmgr.enter_d0(&mut pci);

        assert_eq!(pci.get16(ctrl), 0x0008);
        assert_eq!(
            pci.get16(offset::COMMAND),
            command::BUS_MASTER | command::MEM_SPACE | command::MEM_WR_INVALIDATE
        );
    }

    #[test]
    fn test_capabilities_at_end_of_config_space_are_ignored() {
        let mut pci = MockPci::new(0x10D3, 0, 0);
        pci.put16(offset::STATUS, crate::pci::config::status::CAP_LIST);
        pci.config[offset::CAP_PTR as usize] = 0xFC;
        pci.config[0xFC] = PCI_CAP_ID_PM;
        pci.config[0xFD] = 0xF0;
        pci.config[0xF0] = PCI_CAP_ID_EXP;
        pci.config[0xF1] = 0;

        let pmgr = PowerManager::init(&mut pci, &caps(0x10D3));
        assert!(!pmgr.wol_capable());
        assert_eq!(pmgr.exp_cap(), None);

        pmgr.enter_d3(&mut pci, true);
        assert!(pci.config_writes.is_empty());
    }

    #[test]
    fn test_ltr_limits_only_on_lpt() {
        let mut pci = MockPci::new(0x153A, 0, 0);
        pci.put16(PCI_LTR_CAP_LPT, 0x1003);
        pci.put16(PCI_LTR_CAP_LPT + 2, 0x1004);
        let lpt = caps(0x153A);
        assert_eq!(
            read_ltr_limits(&pci, &lpt),
            Some(LtrLimits {
                max_snoop: 0x1003,
                max_no_snoop: 0x1004
            })
        );
        assert_eq!(read_ltr_limits(&pci, &caps(0x1502)), None);
    }
}
