//! RSS hash and VLAN offload setup.
//!
//! RSS is programmed with a fixed key and a redirection table that sends
//! everything to queue 0, so the hash lands in the descriptor for the
//! stack to use without spreading load.
//!
//! # Reference
//! Intel 82574 Datasheet, Section 7.1.10 (Receive-Side Scaling)

use crate::mmio::RegisterSpace;

use super::regs;

/// RSS random key.
pub const RSS_KEY: [u32; 10] = [
    0xda56_5a6d, 0xc20e_5b25, 0x3d25_6741, 0xb08f_a343, 0xcb2b_cad0,
    0xb430_7bae, 0xa32d_cb77, 0x0cf2_3080, 0x3bb7_426a, 0xfa01_acbe,
];

/// Redirection table entries.
const RETA_ENTRIES: u32 = 32;

/// Hash fields enabled in MRQC.
const MRQC_FIELDS: u32 = regs::MRQC_RSS_FIELD_IPV4
    | regs::MRQC_RSS_FIELD_IPV4_TCP
    | regs::MRQC_RSS_FIELD_IPV6
    | regs::MRQC_RSS_FIELD_IPV6_TCP
    | regs::MRQC_RSS_FIELD_IPV6_TCP_EX;

/// Program key, redirection table and hash fields.
pub fn setup_rss_hash<R: RegisterSpace + ?Sized>(regs: &mut R) {
    for (i, word) in RSS_KEY.iter().enumerate() {
        regs.write32(regs::rssrk(i as u32), *word);
    }

    for i in 0..RETA_ENTRIES {
        regs.write32(regs::reta(i), 0);
    }

    // Report the hash instead of the raw packet checksum.
    regs.set_bits32(regs::RXCSUM, regs::RXCSUM_PCSD);

    regs.write32(regs::MRQC, MRQC_FIELDS | regs::MRQC_RSS_ENABLE_1Q);
}

/// Enable VLAN tag strip on receive and insert on transmit.
#[inline]
pub fn enable_vlan_strip<R: RegisterSpace + ?Sized>(regs: &mut R) {
    regs.set_bits32(regs::CTRL, regs::CTRL_VME);
}
