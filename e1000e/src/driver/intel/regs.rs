//! Intel e1000e register definitions.
//!
//! Register offsets and bit definitions for the 8257x and ICH/PCH LAN
//! families, as used by the reset/configure state machine.
//!
//! # Reference
//! - Intel 82579 Datasheet, Section 10 (Programming Interface)
//! - Intel 82574 Datasheet, Section 10
//! - Linux kernel drivers/net/ethernet/intel/e1000e/defines.h, regs.h

// ═══════════════════════════════════════════════════════════════════════════
// DEVICE CONTROL & STATUS
// ═══════════════════════════════════════════════════════════════════════════

/// Device Control Register.
pub const CTRL: u32 = 0x0000;
/// Device Status Register (RO).
pub const STATUS: u32 = 0x0008;
/// Extended Device Control Register.
pub const CTRL_EXT: u32 = 0x0018;
/// MDI Control Register (PHY access).
pub const MDIC: u32 = 0x0020;
/// VLAN Ether Type.
pub const VET: u32 = 0x0038;
/// PHY Control Register (ICH/PCH).
pub const PHY_CTRL: u32 = 0x0F10;

// ═══════════════════════════════════════════════════════════════════════════
// INTERRUPT REGISTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Interrupt Cause Read (clear on read).
pub const ICR: u32 = 0x00C0;
/// Interrupt Throttling Rate.
pub const ITR: u32 = 0x00C4;
/// Interrupt Cause Set (WO).
pub const ICS: u32 = 0x00C8;
/// Interrupt Mask Set/Read.
pub const IMS: u32 = 0x00D0;
/// Interrupt Mask Clear (WO).
pub const IMC: u32 = 0x00D8;
/// Interrupt Acknowledge Auto Mask.
pub const IAM: u32 = 0x00E0;

// ═══════════════════════════════════════════════════════════════════════════
// RECEIVE REGISTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Receive Control Register.
pub const RCTL: u32 = 0x0100;
/// Receive Descriptor Base Address Low.
pub const RDBAL: u32 = 0x2800;
/// Receive Descriptor Base Address High.
pub const RDBAH: u32 = 0x2804;
/// Receive Descriptor Length (bytes).
pub const RDLEN: u32 = 0x2808;
/// Receive Descriptor Head.
pub const RDH: u32 = 0x2810;
/// Receive Descriptor Tail.
pub const RDT: u32 = 0x2818;
/// Receive Delay Timer.
pub const RDTR: u32 = 0x2820;
/// Receive Interrupt Absolute Delay Timer.
pub const RADV: u32 = 0x282C;
/// Receive Checksum Control.
pub const RXCSUM: u32 = 0x5000;
/// Receive Filter Control.
pub const RFCTL: u32 = 0x5008;
/// Multiple Receive Queues Command.
pub const MRQC: u32 = 0x5818;

/// Receive Descriptor Control for queue `n`.
#[inline]
pub const fn rxdctl(n: u32) -> u32 {
    0x2828 + n * 0x100
}

// ═══════════════════════════════════════════════════════════════════════════
// TRANSMIT REGISTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Transmit Control Register.
pub const TCTL: u32 = 0x0400;
/// Adaptive IFS Throttle.
pub const AIT: u32 = 0x0458;
/// Transmit Descriptor Base Address Low.
pub const TDBAL: u32 = 0x3800;
/// Transmit Descriptor Base Address High.
pub const TDBAH: u32 = 0x3804;
/// Transmit Descriptor Length (bytes).
pub const TDLEN: u32 = 0x3808;
/// Transmit Descriptor Head.
pub const TDH: u32 = 0x3810;
/// Transmit Descriptor Tail.
pub const TDT: u32 = 0x3818;
/// Transmit Interrupt Delay Value.
pub const TIDV: u32 = 0x3820;
/// Transmit Absolute Interrupt Delay Value.
pub const TADV: u32 = 0x382C;

/// Transmit Descriptor Control for queue `n`.
#[inline]
pub const fn txdctl(n: u32) -> u32 {
    0x3828 + n * 0x100
}

/// Transmit Arbitration Count for queue `n`.
#[inline]
pub const fn tarc(n: u32) -> u32 {
    0x3840 + n * 0x100
}

// ═══════════════════════════════════════════════════════════════════════════
// PACKET BUFFER, WAKE-UP, FLOW CONTROL
// ═══════════════════════════════════════════════════════════════════════════

/// Packet Buffer Allocation (Rx KB in 15:0, Tx KB in 31:16).
pub const PBA: u32 = 0x1000;
/// Wake Up Control.
pub const WUC: u32 = 0x5800;
/// Wake Up Filter Control.
pub const WUFC: u32 = 0x5808;

/// Wake up: PME enable.
pub const WUC_PME_EN: u32 = 1 << 1;
/// Wake up filter: magic packet.
pub const WUFC_MAG: u32 = 1 << 1;

/// Receive threshold mask for FCRTH/FCRTL (8-byte granularity).
pub const FCRTH_RTH: u32 = 0x0000_FFF8;
/// Default pause time.
pub const FC_PAUSE_TIME: u16 = 0x0680;

// ═══════════════════════════════════════════════════════════════════════════
// RECEIVE ADDRESS REGISTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Receive Address Low (MAC bytes 0-3).
pub const RAL0: u32 = 0x5400;
/// Receive Address High (MAC bytes 4-5 + flags).
pub const RAH0: u32 = 0x5404;

/// Address Valid.
pub const RAH_AV: u32 = 1 << 31;

// ═══════════════════════════════════════════════════════════════════════════
// RSS REGISTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Redirection table entry `n` (32 entries).
#[inline]
pub const fn reta(n: u32) -> u32 {
    0x5C00 + n * 4
}

/// RSS random key word `n` (10 words).
#[inline]
pub const fn rssrk(n: u32) -> u32 {
    0x5C80 + n * 4
}

// ═══════════════════════════════════════════════════════════════════════════
// MANAGEABILITY REGISTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Management Control.
pub const MANC: u32 = 0x5820;
/// Management Control To Host.
pub const MANC2H: u32 = 0x5860;
/// Function Active and Power State to MNG.
pub const FACTPS: u32 = 0x5B30;
/// Firmware Semaphore.
pub const FWSM: u32 = 0x5B54;

/// Management Decision Filter `n` (8 slots).
#[inline]
pub const fn mdef(n: u32) -> u32 {
    0x5890 + n * 4
}

// ═══════════════════════════════════════════════════════════════════════════
// STATISTICS REGISTERS (clear on read)
// ═══════════════════════════════════════════════════════════════════════════

/// CRC Error Count.
pub const CRCERRS: u32 = 0x4000;
/// Alignment Error Count.
pub const ALGNERRC: u32 = 0x4004;
/// Receive Error Count.
pub const RXERRC: u32 = 0x400C;
/// Missed Packets Count.
pub const MPC: u32 = 0x4010;
/// Single Collision Count.
pub const SCC: u32 = 0x4014;
/// Excessive Collisions Count.
pub const ECOL: u32 = 0x4018;
/// Multiple Collision Count.
pub const MCC: u32 = 0x401C;
/// Late Collisions Count.
pub const LATECOL: u32 = 0x4020;
/// Collision Count.
pub const COLC: u32 = 0x4028;
/// Defer Count.
pub const DC: u32 = 0x4030;
/// XON Received Count.
pub const XONRXC: u32 = 0x4048;
/// XON Transmitted Count.
pub const XONTXC: u32 = 0x404C;
/// XOFF Received Count.
pub const XOFFRXC: u32 = 0x4050;
/// XOFF Transmitted Count.
pub const XOFFTXC: u32 = 0x4054;
/// Good Packets Received Count.
pub const GPRC: u32 = 0x4074;
/// Broadcast Packets Received Count.
pub const BPRC: u32 = 0x4078;
/// Multicast Packets Received Count.
pub const MPRC: u32 = 0x407C;
/// Good Packets Transmitted Count.
pub const GPTC: u32 = 0x4080;
/// Good Octets Received Count Low.
pub const GORCL: u32 = 0x4088;
/// Good Octets Received Count High.
pub const GORCH: u32 = 0x408C;
/// Good Octets Transmitted Count Low.
pub const GOTCL: u32 = 0x4090;
/// Good Octets Transmitted Count High.
pub const GOTCH: u32 = 0x4094;
/// Receive No Buffers Count.
pub const RNBC: u32 = 0x40A0;
/// Receive Undersize Count.
pub const RUC: u32 = 0x40A4;
/// Receive Oversize Count.
pub const ROC: u32 = 0x40AC;
/// Total Packets Transmitted.
pub const TPT: u32 = 0x40D4;

// ═══════════════════════════════════════════════════════════════════════════
// CTRL / STATUS / CTRL_EXT BITS
// ═══════════════════════════════════════════════════════════════════════════

/// VLAN Mode Enable (tag strip on receive, insert on transmit).
pub const CTRL_VME: u32 = 1 << 30;

/// Full Duplex.
pub const STATUS_FD: u32 = 1 << 0;
/// Link Up.
pub const STATUS_LU: u32 = 1 << 1;
/// Speed (bits 6-7).
pub const STATUS_SPEED_MASK: u32 = 3 << 6;
/// Speed 100 Mb/s.
pub const STATUS_SPEED_100: u32 = 1 << 6;
/// Speed 1000 Mb/s.
pub const STATUS_SPEED_1000: u32 = 2 << 6;

/// Driver loaded (AMT handshake).
pub const CTRL_EXT_DRV_LOAD: u32 = 1 << 28;
/// Interrupt Acknowledge Auto-mask Enable.
pub const CTRL_EXT_IAME: u32 = 1 << 27;

/// Gigabit disabled by strap (PHY_CTRL).
pub const PHY_CTRL_GBE_DISABLE: u32 = 1 << 6;

// ═══════════════════════════════════════════════════════════════════════════
// RCTL / RFCTL / RXCSUM / RXDCTL BITS
// ═══════════════════════════════════════════════════════════════════════════

/// Receiver Enable.
pub const RCTL_EN: u32 = 1 << 1;
/// Store Bad Packets.
pub const RCTL_SBP: u32 = 1 << 2;
/// Multicast Promiscuous Enable.
pub const RCTL_MPE: u32 = 1 << 4;
/// Long Packet Enable.
pub const RCTL_LPE: u32 = 1 << 5;
/// No loopback.
pub const RCTL_LBM_NO: u32 = 0;
/// Rx descriptor minimum threshold: half of ring.
pub const RCTL_RDMTS_HALF: u32 = 0;
/// Multicast Offset (bits 12-13).
pub const RCTL_MO_MASK: u32 = 3 << 12;
/// Multicast Offset shift.
pub const RCTL_MO_SHIFT: u32 = 12;
/// Broadcast Accept Mode.
pub const RCTL_BAM: u32 = 1 << 15;
/// Buffer Size 256 bytes; cleared gives the 2048-byte default.
pub const RCTL_SZ_256: u32 = 3 << 16;
/// Buffer Size Extension.
pub const RCTL_BSEX: u32 = 1 << 25;
/// Strip Ethernet CRC.
pub const RCTL_SECRC: u32 = 1 << 26;

/// NFS write filtering disable.
pub const RFCTL_NFSW_DIS: u32 = 1 << 6;
/// NFS read filtering disable.
pub const RFCTL_NFSR_DIS: u32 = 1 << 7;
/// Extended status enable.
pub const RFCTL_EXTEN: u32 = 1 << 15;
/// IPv6 extension header disable.
pub const RFCTL_IPV6_EX_DIS: u32 = 1 << 16;
/// New IPv6 extension header disable.
pub const RFCTL_NEW_IPV6_EXT_DIS: u32 = 1 << 17;

/// TCP/UDP checksum offload.
pub const RXCSUM_TUOFL: u32 = 1 << 9;
/// Packet checksum disable (RSS hash reported instead).
pub const RXCSUM_PCSD: u32 = 1 << 13;

/// Prefetch threshold bits set for jumbo frames on ICH parts.
pub const RXDCTL_JUMBO_PTHRESH: u32 = 0x3;

// ═══════════════════════════════════════════════════════════════════════════
// TCTL / TARC BITS
// ═══════════════════════════════════════════════════════════════════════════

/// Transmitter Enable.
pub const TCTL_EN: u32 = 1 << 1;
/// Pad Short Packets.
pub const TCTL_PSP: u32 = 1 << 3;
/// Collision Threshold (bits 4-11).
pub const TCTL_CT_MASK: u32 = 0xFF << 4;
/// Collision Threshold shift.
pub const TCTL_CT_SHIFT: u32 = 4;
/// Re-transmit on Late Collision.
pub const TCTL_RTLC: u32 = 1 << 24;
/// Collision Threshold written at configure.
pub const COLLISION_THRESHOLD: u32 = 15;

/// TARC bit 0 (required set on 82571/82572).
pub const TARC_BIT_ZERO: u32 = 1 << 0;

// ═══════════════════════════════════════════════════════════════════════════
// MRQC BITS
// ═══════════════════════════════════════════════════════════════════════════

/// Enable RSS on queue 0 only.
pub const MRQC_RSS_ENABLE_1Q: u32 = 0x0000_0001;
/// Hash on IPv4 + TCP.
pub const MRQC_RSS_FIELD_IPV4_TCP: u32 = 0x0001_0000;
/// Hash on IPv4.
pub const MRQC_RSS_FIELD_IPV4: u32 = 0x0002_0000;
/// Hash on IPv6 + TCP with extension headers.
pub const MRQC_RSS_FIELD_IPV6_TCP_EX: u32 = 0x0004_0000;
/// Hash on IPv6.
pub const MRQC_RSS_FIELD_IPV6: u32 = 0x0010_0000;
/// Hash on IPv6 + TCP.
pub const MRQC_RSS_FIELD_IPV6_TCP: u32 = 0x0020_0000;

// ═══════════════════════════════════════════════════════════════════════════
// MANAGEABILITY BITS
// ═══════════════════════════════════════════════════════════════════════════

/// SMBus enabled.
pub const MANC_SMBUS_EN: u32 = 1 << 0;
/// ASF mode enabled.
pub const MANC_ASF_EN: u32 = 1 << 1;
/// Receive TCO packets enabled.
pub const MANC_RCV_TCO_EN: u32 = 1 << 17;
/// Forward management packets to the host.
pub const MANC_EN_MNG2HOST: u32 = 1 << 21;

/// Forward RMCP port 623 to the host.
pub const MANC2H_PORT_623: u32 = 1 << 5;
/// Forward RMCP port 664 to the host.
pub const MANC2H_PORT_664: u32 = 1 << 6;

/// Decision filter: match port 623.
pub const MDEF_PORT_623: u32 = 1 << 11;
/// Decision filter: match port 664.
pub const MDEF_PORT_664: u32 = 1 << 10;

/// Firmware mode field.
pub const FWSM_MODE_MASK: u32 = 0x0000_000E;
/// Firmware mode shift.
pub const FWSM_MODE_SHIFT: u32 = 1;
/// ME owns the PCIm-to-PCI arbiter.
pub const FWSM_PCIM2PCI: u32 = 1 << 24;
/// Management clock gated.
pub const FACTPS_MNGCG: u32 = 1 << 29;

/// Firmware mode: pass-through.
pub const MNG_MODE_PT: u32 = 0x2;

/// NVM word holding the manageability mode.
pub const NVM_INIT_CONTROL2_REG: u16 = 0x000F;
/// Manageability mode field in INIT_CONTROL2.
pub const NVM_INIT_CTRL2_MNGM: u16 = 0x6000;

// ═══════════════════════════════════════════════════════════════════════════
// PHY REGISTERS (MII, accessed through ChipOps)
// ═══════════════════════════════════════════════════════════════════════════

/// Basic Mode Control Register.
pub const PHY_BMCR: u32 = 0x00;
/// Basic Mode Status Register.
pub const PHY_BMSR: u32 = 0x01;
/// Auto-Negotiation Advertisement Register.
pub const PHY_ANAR: u32 = 0x04;
/// Auto-Negotiation Link Partner Ability Register.
pub const PHY_ANLPAR: u32 = 0x05;
/// Auto-Negotiation Expansion Register.
pub const PHY_ANER: u32 = 0x06;
/// 1000BASE-T Control Register.
pub const PHY_1000T_CTRL: u32 = 0x09;
/// 1000BASE-T Status Register.
pub const PHY_1000T_STATUS: u32 = 0x0A;
/// Extended Status Register.
pub const PHY_EXT_STATUS: u32 = 0x0F;

/// IGP PHY power management register.
pub const IGP02E1000_PHY_POWER_MGMT: u32 = 0x19;
/// Smart power down enable.
pub const IGP02E1000_PM_SPD: u16 = 1 << 0;

/// 82577 receive configuration register.
pub const I82577_RX_CONFIG: u32 = 0x16;
/// 82577 inter-packet gap tuning register (page 770, reg 26).
pub const I82577_IPG_PAGE: u32 = 770;
/// 82577 inter-packet gap register within the page.
pub const I82577_IPG_REG: u32 = 26;

/// EEE advertisement EMI address, 82579.
pub const I82579_EEE_ADVERTISEMENT: u16 = 0x040E;
/// EEE advertisement EMI address, I217 and later.
pub const I217_EEE_ADVERTISEMENT: u16 = 0x8001;

// ═══════════════════════════════════════════════════════════════════════════
// INTERRUPT BITS
// ═══════════════════════════════════════════════════════════════════════════

/// TX Descriptor Written Back.
pub const ICR_TXDW: u32 = 1 << 0;
/// Link Status Change.
pub const ICR_LSC: u32 = 1 << 2;
/// Rx sequence error (link loss on fiber/serdes).
pub const ICR_RXSEQ: u32 = 1 << 3;
/// RX Descriptor Minimum Threshold.
pub const ICR_RXDMT0: u32 = 1 << 4;
/// RX Overrun.
pub const ICR_RXO: u32 = 1 << 6;
/// RX Timer Interrupt.
pub const ICR_RXT0: u32 = 1 << 7;

/// All interrupt bits (for masking/clearing).
pub const INT_MASK_ALL: u32 = 0xFFFF_FFFF;

// ═══════════════════════════════════════════════════════════════════════════
// VLAN
// ═══════════════════════════════════════════════════════════════════════════

/// 802.1Q ether type.
pub const ETH_P_8021Q: u32 = 0x8100;

// ═══════════════════════════════════════════════════════════════════════════
// DESCRIPTOR CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════

/// Size of one descriptor in bytes.
pub const DESC_SIZE: u32 = 16;
