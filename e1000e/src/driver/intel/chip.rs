//! Chip capability model.
//!
//! One immutable [`ChipCapabilities`] record is selected at attach from the
//! PCI identifier tuple. Every later decision (workarounds, watermarks,
//! manageability, EEE) reads this record; nothing probes the chip to find
//! out what it is.
//!
//! Selection is a static lookup in three steps:
//! 1. device ID → MAC family, PHY family, media type
//! 2. MAC family → base flags, ASPM mask, packet buffer, flow control
//! 3. (device, subsystem, revision) → optional platform quirk on top
//!
//! # Reference
//! Linux kernel drivers/net/ethernet/intel/e1000e/{82571.c, ich8lan.c, netdev.c}

use bitflags::bitflags;

use crate::config::{ETH_DATA_LEN, ETH_FCS_LEN, ETH_HLEN, MAX_JUMBO_MTU};
use crate::pci::PciId;

use super::regs::FC_PAUSE_TIME;
use super::INTEL_VENDOR_ID;

// ═══════════════════════════════════════════════════════════════════════════
// FAMILIES
// ═══════════════════════════════════════════════════════════════════════════

/// MAC family. Declaration order is hardware generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MacFamily {
    /// 82571EB.
    E82571,
    /// 82572EI.
    E82572,
    /// 82574L.
    E82574,
    /// 82583V.
    E82583,
    /// ICH8 LAN.
    Ich8,
    /// ICH9 LAN.
    Ich9,
    /// ICH10 LAN.
    Ich10,
    /// PCH (Ibex Peak, 82577/82578).
    Pch,
    /// PCH2 (Cougar/Panther Point, 82579).
    Pch2,
    /// Lynx Point (I217/I218).
    PchLpt,
    /// Sunrise Point (I219).
    PchSpt,
    /// Cannon Lake and Ice Lake (I219).
    PchCnp,
    /// Tiger Lake and Comet Lake (I219).
    PchTgp,
    /// Alder Lake (I219).
    PchAdp,
    /// Meteor Lake (I219).
    PchMtp,
}

/// PHY family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhyFamily {
    /// No copper PHY (fiber or serdes).
    None,
    /// IGP2 (82571/82572 copper).
    Igp2,
    /// IGP3 (ICH8/ICH9).
    Igp3,
    /// IFE 10/100 (ICH8/ICH9).
    Ife,
    /// BM (82574/82583, ICH9/ICH10).
    Bm,
    /// 82577 (PCH mobile).
    I82577,
    /// 82578 (PCH desktop).
    I82578,
    /// 82579 (PCH2).
    I82579,
    /// I217 and later (LPT onwards).
    I217,
}

/// Physical media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// Twisted pair through a PHY.
    Copper,
    /// Fiber through an external transceiver.
    Fiber,
    /// Internal SerDes (backplane).
    InternalSerdes,
    /// Not determined.
    Unknown,
}

bitflags! {
    /// Per-family quirks and features.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChipFlags: u32 {
        /// ICH/PCH integrated MAC.
        const IS_ICH = 1 << 0;
        /// NVM lives behind a separate flash BAR (BAR1).
        const HAS_FLASH = 1 << 1;
        /// AMT co-processor shares the LAN; driver-load handshake required.
        const HAS_AMT = 1 << 2;
        /// PME-based wake supported.
        const HAS_WOL = 1 << 3;
        /// Frames above 1518 bytes supported.
        const HAS_JUMBO_FRAMES = 1 << 4;
        /// PHY implements smart power down.
        const HAS_SMART_POWER_DOWN = 1 << 5;
        /// Energy-Efficient Ethernet.
        const HAS_EEE = 1 << 6;
        /// Use 0xFFFF as the flow-control pause time.
        const DISABLE_FC_PAUSE_TIME = 1 << 7;
        /// TARC0/TARC1 bit 0 must be set.
        const TARC_SET_BIT_ZERO = 1 << 8;
        /// Hardware strips the Ethernet CRC.
        const CRC_STRIPPING = 1 << 9;
        /// ME firmware can overwrite tail registers through the PCIm arbiter.
        const PCIM2PCI_ARBITER_WA = 1 << 10;
        /// FWSM reports the firmware mode.
        const HAS_FWSM = 1 << 11;
        /// Rx must not be disabled while reprogramming the ring.
        const NO_DISABLE_RX = 1 << 12;
        /// Adaptive IFS is meaningful on this MAC.
        const HAS_ADAPTIVE_IFS = 1 << 13;
    }
}

bitflags! {
    /// ASPM sub-states to turn off in PCIe link control.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AspmDisable: u16 {
        /// L0s.
        const L0S = 1 << 0;
        /// L1.
        const L1 = 1 << 1;
    }
}

/// Flow control defaults of a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlowControlDefaults {
    /// Pause time advertised in XOFF frames.
    pub pause_time: u16,
    /// XOFF refresh interval.
    pub refresh_time: u16,
    /// Send XON when the FIFO drains below the low watermark.
    pub send_xon: bool,
}

// ═══════════════════════════════════════════════════════════════════════════
// CAPABILITY RECORD
// ═══════════════════════════════════════════════════════════════════════════

/// Immutable capability record for one attached controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChipCapabilities {
    /// Identifier tuple this record was selected for.
    pub id: PciId,
    /// Marketing name.
    pub name: &'static str,
    /// MAC family.
    pub mac: MacFamily,
    /// PHY family.
    pub phy: PhyFamily,
    /// Media.
    pub media: MediaType,
    /// Quirks and features.
    pub flags: ChipFlags,
    /// ASPM states to disable.
    pub aspm_disable: AspmDisable,
    /// Flow control defaults.
    pub flow_control: FlowControlDefaults,
    /// Default packet buffer allocation (Rx KB).
    pub pba: u32,
    /// Largest frame the MAC accepts.
    pub max_hw_frame: u32,
}

impl ChipCapabilities {
    /// Whether NVM is behind a flash BAR.
    #[inline]
    pub fn has_flash(&self) -> bool {
        self.flags.contains(ChipFlags::HAS_FLASH)
    }

    /// Whether the AMT driver-load handshake applies.
    #[inline]
    pub fn has_amt(&self) -> bool {
        self.flags.contains(ChipFlags::HAS_AMT)
    }

    /// Whether EEE can be advertised.
    #[inline]
    pub fn has_eee(&self) -> bool {
        self.flags.contains(ChipFlags::HAS_EEE)
    }

    /// Whether the PHY supports smart power down.
    #[inline]
    pub fn has_smart_power_down(&self) -> bool {
        self.flags.contains(ChipFlags::HAS_SMART_POWER_DOWN)
    }

    /// Whether this is an ICH/PCH integrated MAC.
    #[inline]
    pub fn is_ich(&self) -> bool {
        self.flags.contains(ChipFlags::IS_ICH)
    }

    /// Whether the chip takes the low-voltage PHY workarounds (PCH2 and later).
    #[inline]
    pub fn is_pch2_or_later(&self) -> bool {
        self.mac >= MacFamily::Pch2
    }

    /// Largest MTU the MAC can carry.
    pub fn max_mtu(&self) -> u16 {
        if !self.flags.contains(ChipFlags::HAS_JUMBO_FRAMES) {
            return ETH_DATA_LEN;
        }
        let mtu = self.max_hw_frame.saturating_sub(ETH_HLEN + ETH_FCS_LEN);
        mtu.min(MAX_JUMBO_MTU as u32) as u16
    }

    /// Whether the chip keeps a fixed management decision-filter table.
    #[inline]
    pub fn has_mng_decision_filters(&self) -> bool {
        matches!(self.mac, MacFamily::E82574 | MacFamily::E82583)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DEVICE TABLE
// ═══════════════════════════════════════════════════════════════════════════

/// One supported device ID.
#[derive(Debug, Clone, Copy)]
struct DeviceEntry {
    device: u16,
    name: &'static str,
    mac: MacFamily,
    phy: PhyFamily,
    media: MediaType,
}

const fn dev(
    device: u16,
    name: &'static str,
    mac: MacFamily,
    phy: PhyFamily,
    media: MediaType,
) -> DeviceEntry {
    DeviceEntry {
        device,
        name,
        mac,
        phy,
        media,
    }
}

use MacFamily as M;
use MediaType::{Copper, Fiber, InternalSerdes};
use PhyFamily as P;

/// Supported Intel device IDs.
static DEVICES: &[DeviceEntry] = &[
    dev(0x105E, "82571EB Copper", M::E82571, P::Igp2, Copper),
    dev(0x105F, "82571EB Fiber", M::E82571, P::None, Fiber),
    dev(0x1060, "82571EB SerDes", M::E82571, P::None, InternalSerdes),
    dev(0x10D9, "82571EB SerDes Dual", M::E82571, P::None, InternalSerdes),
    dev(0x10DA, "82571EB SerDes Quad", M::E82571, P::None, InternalSerdes),
    dev(0x10A4, "82571EB Quad Copper", M::E82571, P::Igp2, Copper),
    dev(0x10A5, "82571EB Quad Fiber", M::E82571, P::None, Fiber),
    dev(0x10BC, "82571EB Quad Copper LP", M::E82571, P::Igp2, Copper),
    dev(0x10D5, "82571PT Quad Copper", M::E82571, P::Igp2, Copper),
    dev(0x107D, "82572EI Copper", M::E82572, P::Igp2, Copper),
    dev(0x107E, "82572EI Fiber", M::E82572, P::None, Fiber),
    dev(0x107F, "82572EI SerDes", M::E82572, P::None, InternalSerdes),
    dev(0x10B9, "82572EI", M::E82572, P::Igp2, Copper),
    dev(0x10D3, "82574L", M::E82574, P::Bm, Copper),
    dev(0x10F6, "82574LA", M::E82574, P::Bm, Copper),
    dev(0x150C, "82583V", M::E82583, P::Bm, Copper),
    dev(0x1049, "82566MM", M::Ich8, P::Igp3, Copper),
    dev(0x104A, "82566DM", M::Ich8, P::Igp3, Copper),
    dev(0x104B, "82566DC", M::Ich8, P::Igp3, Copper),
    dev(0x104C, "82562V", M::Ich8, P::Ife, Copper),
    dev(0x10C4, "82562GT", M::Ich8, P::Ife, Copper),
    dev(0x10C5, "82562G", M::Ich8, P::Ife, Copper),
    dev(0x104D, "82566MC", M::Ich8, P::Igp3, Copper),
    dev(0x1501, "82567V-3", M::Ich8, P::Igp3, Copper),
    dev(0x10BF, "82567LF", M::Ich9, P::Igp3, Copper),
    dev(0x10F5, "82567LM", M::Ich9, P::Igp3, Copper),
    dev(0x10CB, "82567V", M::Ich9, P::Igp3, Copper),
    dev(0x10BD, "82566DM-2", M::Ich9, P::Igp3, Copper),
    dev(0x10E5, "82567LM-4", M::Ich9, P::Bm, Copper),
    dev(0x294C, "82566DC-2", M::Ich9, P::Igp3, Copper),
    dev(0x10C0, "82562V-2", M::Ich9, P::Ife, Copper),
    dev(0x10C3, "82562GT-2", M::Ich9, P::Ife, Copper),
    dev(0x10C2, "82562G-2", M::Ich9, P::Ife, Copper),
    dev(0x10CC, "82567LM-2", M::Ich10, P::Bm, Copper),
    dev(0x10CD, "82567LF-2", M::Ich10, P::Bm, Copper),
    dev(0x10CE, "82567V-2", M::Ich10, P::Bm, Copper),
    dev(0x10DE, "82567LM-3", M::Ich10, P::Bm, Copper),
    dev(0x10DF, "82567LF-3", M::Ich10, P::Bm, Copper),
    dev(0x1525, "82567V-4", M::Ich10, P::Bm, Copper),
    dev(0x10EA, "82577LM", M::Pch, P::I82577, Copper),
    dev(0x10EB, "82577LC", M::Pch, P::I82577, Copper),
    dev(0x10EF, "82578DM", M::Pch, P::I82578, Copper),
    dev(0x10F0, "82578DC", M::Pch, P::I82578, Copper),
    dev(0x1502, "82579LM", M::Pch2, P::I82579, Copper),
    dev(0x1503, "82579V", M::Pch2, P::I82579, Copper),
    dev(0x153A, "I217-LM", M::PchLpt, P::I217, Copper),
    dev(0x153B, "I217-V", M::PchLpt, P::I217, Copper),
    dev(0x155A, "I218-LM", M::PchLpt, P::I217, Copper),
    dev(0x1559, "I218-V", M::PchLpt, P::I217, Copper),
    dev(0x15A0, "I218-LM2", M::PchLpt, P::I217, Copper),
    dev(0x15A1, "I218-V2", M::PchLpt, P::I217, Copper),
    dev(0x15A2, "I218-LM3", M::PchLpt, P::I217, Copper),
    dev(0x15A3, "I218-V3", M::PchLpt, P::I217, Copper),
    dev(0x156F, "I219-LM", M::PchSpt, P::I217, Copper),
    dev(0x1570, "I219-V", M::PchSpt, P::I217, Copper),
    dev(0x15B7, "I219-LM2", M::PchSpt, P::I217, Copper),
    dev(0x15B8, "I219-V2", M::PchSpt, P::I217, Copper),
    dev(0x15B9, "I219-LM3", M::PchSpt, P::I217, Copper),
    dev(0x15D7, "I219-LM4", M::PchSpt, P::I217, Copper),
    dev(0x15D8, "I219-V4", M::PchSpt, P::I217, Copper),
    dev(0x15E3, "I219-LM5", M::PchSpt, P::I217, Copper),
    dev(0x15D6, "I219-V5", M::PchSpt, P::I217, Copper),
    dev(0x15BD, "I219-LM6", M::PchCnp, P::I217, Copper),
    dev(0x15BE, "I219-V6", M::PchCnp, P::I217, Copper),
    dev(0x15BB, "I219-LM7", M::PchCnp, P::I217, Copper),
    dev(0x15BC, "I219-V7", M::PchCnp, P::I217, Copper),
    dev(0x15DF, "I219-LM8", M::PchCnp, P::I217, Copper),
    dev(0x15E0, "I219-V8", M::PchCnp, P::I217, Copper),
    dev(0x15E1, "I219-LM9", M::PchCnp, P::I217, Copper),
    dev(0x15E2, "I219-V9", M::PchCnp, P::I217, Copper),
    dev(0x0D4E, "I219-LM10", M::PchTgp, P::I217, Copper),
    dev(0x0D4F, "I219-V10", M::PchTgp, P::I217, Copper),
    dev(0x0D4C, "I219-LM11", M::PchTgp, P::I217, Copper),
    dev(0x0D4D, "I219-V11", M::PchTgp, P::I217, Copper),
    dev(0x0D53, "I219-LM12", M::PchTgp, P::I217, Copper),
    dev(0x0D55, "I219-V12", M::PchTgp, P::I217, Copper),
    dev(0x15FB, "I219-LM13", M::PchTgp, P::I217, Copper),
    dev(0x15FC, "I219-V13", M::PchTgp, P::I217, Copper),
    dev(0x15F9, "I219-LM14", M::PchTgp, P::I217, Copper),
    dev(0x15FA, "I219-V14", M::PchTgp, P::I217, Copper),
    dev(0x15F4, "I219-LM15", M::PchTgp, P::I217, Copper),
    dev(0x15F5, "I219-V15", M::PchTgp, P::I217, Copper),
    dev(0x1A1E, "I219-LM16", M::PchAdp, P::I217, Copper),
    dev(0x1A1F, "I219-V16", M::PchAdp, P::I217, Copper),
    dev(0x1A1C, "I219-LM17", M::PchAdp, P::I217, Copper),
    dev(0x1A1D, "I219-V17", M::PchAdp, P::I217, Copper),
    dev(0x550A, "I219-LM18", M::PchMtp, P::I217, Copper),
    dev(0x550B, "I219-V18", M::PchMtp, P::I217, Copper),
    dev(0x550C, "I219-LM19", M::PchMtp, P::I217, Copper),
    dev(0x550D, "I219-V19", M::PchMtp, P::I217, Copper),
];

/// Whether `(vendor, device)` is handled by this driver.
#[inline]
pub fn is_supported_device(vendor_id: u16, device_id: u16) -> bool {
    vendor_id == INTEL_VENDOR_ID && DEVICES.iter().any(|d| d.device == device_id)
}

// ═══════════════════════════════════════════════════════════════════════════
// FAMILY DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════

/// Base record of a MAC family before device and platform adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FamilyDefaults {
    /// Quirks and features.
    pub flags: ChipFlags,
    /// ASPM states to disable.
    pub aspm_disable: AspmDisable,
    /// Default packet buffer allocation (Rx KB).
    pub pba: u32,
    /// Largest frame the MAC accepts.
    pub max_hw_frame: u32,
    /// Flow control defaults.
    pub flow_control: FlowControlDefaults,
}

const ETH_FRAME: u32 = 1518;
const JUMBO_FRAME: u32 = 9018;

/// Base record for `family`.
pub const fn family_defaults(family: MacFamily) -> FamilyDefaults {
    const ICH: ChipFlags = ChipFlags::IS_ICH
        .union(ChipFlags::HAS_WOL)
        .union(ChipFlags::HAS_AMT)
        .union(ChipFlags::HAS_FLASH)
        .union(ChipFlags::HAS_FWSM)
        .union(ChipFlags::CRC_STRIPPING)
        .union(ChipFlags::HAS_ADAPTIVE_IFS);
    const LV: ChipFlags = ICH.union(ChipFlags::HAS_JUMBO_FRAMES).union(ChipFlags::HAS_EEE);

    let (flags, aspm_disable, pba, max_hw_frame) = match family {
        MacFamily::E82571 | MacFamily::E82572 => (
            ChipFlags::HAS_JUMBO_FRAMES
                .union(ChipFlags::HAS_WOL)
                .union(ChipFlags::HAS_SMART_POWER_DOWN)
                .union(ChipFlags::HAS_FWSM)
                .union(ChipFlags::TARC_SET_BIT_ZERO)
                .union(ChipFlags::CRC_STRIPPING)
                .union(ChipFlags::HAS_ADAPTIVE_IFS),
            AspmDisable::L1,
            38,
            JUMBO_FRAME,
        ),
        MacFamily::E82574 => (
            ChipFlags::HAS_WOL
                .union(ChipFlags::HAS_JUMBO_FRAMES)
                .union(ChipFlags::HAS_SMART_POWER_DOWN)
                .union(ChipFlags::HAS_AMT)
                .union(ChipFlags::NO_DISABLE_RX)
                .union(ChipFlags::CRC_STRIPPING)
                .union(ChipFlags::HAS_ADAPTIVE_IFS),
            AspmDisable::L0S.union(AspmDisable::L1),
            32,
            JUMBO_FRAME,
        ),
        MacFamily::E82583 => (
            ChipFlags::HAS_WOL
                .union(ChipFlags::HAS_JUMBO_FRAMES)
                .union(ChipFlags::NO_DISABLE_RX)
                .union(ChipFlags::CRC_STRIPPING)
                .union(ChipFlags::HAS_ADAPTIVE_IFS),
            AspmDisable::L0S,
            32,
            JUMBO_FRAME,
        ),
        MacFamily::Ich8 => (ICH, AspmDisable::empty(), 8, ETH_FRAME),
        MacFamily::Ich9 | MacFamily::Ich10 => (
            ICH.union(ChipFlags::HAS_JUMBO_FRAMES),
            AspmDisable::empty(),
            18,
            JUMBO_FRAME,
        ),
        MacFamily::Pch => (
            ICH.union(ChipFlags::HAS_JUMBO_FRAMES)
                .union(ChipFlags::DISABLE_FC_PAUSE_TIME),
            AspmDisable::empty(),
            26,
            4096,
        ),
        MacFamily::Pch2 => (
            LV.union(ChipFlags::PCIM2PCI_ARBITER_WA),
            AspmDisable::empty(),
            26,
            JUMBO_FRAME,
        ),
        MacFamily::PchLpt
        | MacFamily::PchSpt
        | MacFamily::PchCnp
        | MacFamily::PchTgp
        | MacFamily::PchAdp
        | MacFamily::PchMtp => (LV, AspmDisable::empty(), 26, JUMBO_FRAME),
    };

    let pause_time = if flags.contains(ChipFlags::DISABLE_FC_PAUSE_TIME) {
        0xFFFF
    } else {
        FC_PAUSE_TIME
    };
    let refresh_time = match family {
        MacFamily::Pch => 0x1000,
        MacFamily::Pch2
        | MacFamily::PchLpt
        | MacFamily::PchSpt
        | MacFamily::PchCnp
        | MacFamily::PchTgp
        | MacFamily::PchAdp
        | MacFamily::PchMtp => 0x0400,
        _ => FC_PAUSE_TIME,
    };

    FamilyDefaults {
        flags,
        aspm_disable,
        pba,
        max_hw_frame,
        flow_control: FlowControlDefaults {
            pause_time,
            refresh_time,
            send_xon: true,
        },
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PLATFORM QUIRKS
// ═══════════════════════════════════════════════════════════════════════════

/// Board-specific adjustment keyed on the subsystem IDs.
#[derive(Debug, Clone, Copy)]
struct SubsystemQuirk {
    device: u16,
    subsystem_vendor: u16,
    subsystem_device: u16,
    /// `None` matches every revision.
    revision: Option<u8>,
    set: ChipFlags,
    clear: ChipFlags,
    aspm_disable: AspmDisable,
}

/// No board overrides are known for the supported parts yet.
#[cfg(not(test))]
static SUBSYSTEM_QUIRKS: &[SubsystemQuirk] = &[];

#[cfg(test)]
static SUBSYSTEM_QUIRKS: &[SubsystemQuirk] = &[
    SubsystemQuirk {
        device: 0x10D3,
        subsystem_vendor: 0xFFF0,
        subsystem_device: 0x0001,
        revision: None,
        set: ChipFlags::empty(),
        clear: ChipFlags::HAS_AMT,
        aspm_disable: AspmDisable::empty(),
    },
    SubsystemQuirk {
        device: 0x1502,
        subsystem_vendor: 0xFFF0,
        subsystem_device: 0x0002,
        revision: None,
        set: ChipFlags::empty(),
        clear: ChipFlags::empty(),
        aspm_disable: AspmDisable::L1,
    },
    SubsystemQuirk {
        device: 0x156F,
        subsystem_vendor: 0xFFF0,
        subsystem_device: 0x0003,
        revision: Some(0x21),
        set: ChipFlags::empty(),
        clear: ChipFlags::HAS_EEE,
        aspm_disable: AspmDisable::empty(),
    },
];

fn find_quirk(id: &PciId) -> Option<&'static SubsystemQuirk> {
    SUBSYSTEM_QUIRKS.iter().find(|q| {
        q.device == id.device
            && q.subsystem_vendor == id.subsystem_vendor
            && q.subsystem_device == id.subsystem_device
            && q.revision.map_or(true, |rev| rev == id.revision)
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// IDENTIFICATION
// ═══════════════════════════════════════════════════════════════════════════

/// Select the capability record for an identifier tuple.
///
/// Pure: the same tuple always yields the same record.
///
/// # Returns
/// `None` when the tuple matches no known chip. Attach must abort.
pub fn identify_chip(id: &PciId) -> Option<ChipCapabilities> {
    if id.vendor != INTEL_VENDOR_ID {
        return None;
    }
    let entry = DEVICES.iter().find(|d| d.device == id.device)?;
    let base = family_defaults(entry.mac);

    let mut flags = base.flags;
    let mut aspm_disable = base.aspm_disable;
    if let Some(quirk) = find_quirk(id) {
        flags = (flags | quirk.set) - quirk.clear;
        aspm_disable |= quirk.aspm_disable;
    }

    Some(ChipCapabilities {
        id: *id,
        name: entry.name,
        mac: entry.mac,
        phy: entry.phy,
        media: entry.media,
        flags,
        aspm_disable,
        flow_control: base.flow_control,
        pba: base.pba,
        max_hw_frame: base.max_hw_frame,
    })
}
