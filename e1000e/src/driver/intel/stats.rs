//! Hardware statistics.
//!
//! The MAC counters clear on read, so every read has to be folded into the
//! 64-bit totals straight away. `bringDown` takes a last snapshot before a
//! reset wipes them.
//!
//! # Reference
//! Intel 82574 Datasheet, Section 10.2.7 (Statistics Registers)

use crate::mmio::RegisterSpace;

use super::regs;

/// Accumulated hardware counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    /// CRC errors.
    pub crc_errors: u64,
    /// Alignment errors.
    pub align_errors: u64,
    /// Receive symbol errors.
    pub rx_errors: u64,
    /// Packets dropped for lack of Rx FIFO space.
    pub missed_packets: u64,
    /// Single collisions.
    pub single_collisions: u64,
    /// Excessive collisions.
    pub excessive_collisions: u64,
    /// Multiple collisions.
    pub multiple_collisions: u64,
    /// Late collisions.
    pub late_collisions: u64,
    /// Total collisions.
    pub collisions: u64,
    /// Deferred transmits.
    pub defers: u64,
    /// XON frames received.
    pub xon_rx: u64,
    /// XON frames sent.
    pub xon_tx: u64,
    /// XOFF frames received.
    pub xoff_rx: u64,
    /// XOFF frames sent.
    pub xoff_tx: u64,
    /// Good packets received.
    pub rx_packets: u64,
    /// Broadcast packets received.
    pub rx_broadcast: u64,
    /// Multicast packets received.
    pub rx_multicast: u64,
    /// Good packets transmitted.
    pub tx_packets: u64,
    /// Good octets received.
    pub rx_bytes: u64,
    /// Good octets transmitted.
    pub tx_bytes: u64,
    /// Receive-no-buffer events.
    pub rx_no_buffer: u64,
    /// Undersize frames.
    pub rx_undersize: u64,
    /// Oversize frames.
    pub rx_oversize: u64,
    /// Total packets transmitted, including aborted ones.
    pub total_tx_packets: u64,
}

/// What one refresh added, for adaptive IFS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsDelta {
    /// Collisions since the previous refresh.
    pub collisions: u32,
    /// Packets transmitted since the previous refresh.
    pub tx_packets: u32,
}

impl Statistics {
    /// Fold the clear-on-read counters into the totals.
    pub fn update<R: RegisterSpace + ?Sized>(&mut self, regs: &R) -> StatsDelta {
        let add = |total: &mut u64, reg: u32| -> u32 {
            let value = regs.read32(reg);
            *total += value as u64;
            value
        };

        add(&mut self.crc_errors, regs::CRCERRS);
        add(&mut self.align_errors, regs::ALGNERRC);
        add(&mut self.rx_errors, regs::RXERRC);
        add(&mut self.missed_packets, regs::MPC);
        add(&mut self.single_collisions, regs::SCC);
        add(&mut self.excessive_collisions, regs::ECOL);
        add(&mut self.multiple_collisions, regs::MCC);
        add(&mut self.late_collisions, regs::LATECOL);
        let collisions = add(&mut self.collisions, regs::COLC);
        add(&mut self.defers, regs::DC);
        add(&mut self.xon_rx, regs::XONRXC);
        add(&mut self.xon_tx, regs::XONTXC);
        add(&mut self.xoff_rx, regs::XOFFRXC);
        add(&mut self.xoff_tx, regs::XOFFTXC);
        add(&mut self.rx_packets, regs::GPRC);
        add(&mut self.rx_broadcast, regs::BPRC);
        add(&mut self.rx_multicast, regs::MPRC);
        let tx_packets = add(&mut self.tx_packets, regs::GPTC);
        add(&mut self.rx_no_buffer, regs::RNBC);
        add(&mut self.rx_undersize, regs::RUC);
        add(&mut self.rx_oversize, regs::ROC);
        add(&mut self.total_tx_packets, regs::TPT);

        // Low dword first; reading the high dword clears both.
        self.rx_bytes += read_octets(regs, regs::GORCL, regs::GORCH);
        self.tx_bytes += read_octets(regs, regs::GOTCL, regs::GOTCH);

        StatsDelta {
            collisions,
            tx_packets,
        }
    }
}

fn read_octets<R: RegisterSpace + ?Sized>(regs: &R, low: u32, high: u32) -> u64 {
    let lo = regs.read32(low) as u64;
    let hi = regs.read32(high) as u64;
    (hi << 32) | lo
}
