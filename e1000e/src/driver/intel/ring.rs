//! Descriptor ring geometry and index bookkeeping.
//!
//! Ring memory belongs to the DMA allocator. This module only tracks where
//! the ring lives, how big it is, and the software view of the head and
//! tail indices. Tx and Rx rings share the same type.
//!
//! # Index Semantics
//! - `tail` (next_to_use): advanced by software, written to TDT/RDT
//! - `clean` (next_to_clean): last head position reclaimed by software
//! - one slot is always kept free so a full ring differs from an empty one

use crate::config::RingConfig;
use crate::error::RingError;

use super::regs::{self, DESC_SIZE};

/// Direction of a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingKind {
    /// Transmit.
    Tx,
    /// Receive.
    Rx,
}

/// Registers of one descriptor queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingRegs {
    /// Base address low.
    pub bal: u32,
    /// Base address high.
    pub bah: u32,
    /// Length in bytes.
    pub len: u32,
    /// Head.
    pub head: u32,
    /// Tail.
    pub tail: u32,
}

impl RingKind {
    /// Queue 0 registers for this direction.
    pub const fn regs(self) -> RingRegs {
        match self {
            RingKind::Tx => RingRegs {
                bal: regs::TDBAL,
                bah: regs::TDBAH,
                len: regs::TDLEN,
                head: regs::TDH,
                tail: regs::TDT,
            },
            RingKind::Rx => RingRegs {
                bal: regs::RDBAL,
                bah: regs::RDBAH,
                len: regs::RDLEN,
                head: regs::RDH,
                tail: regs::RDT,
            },
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DESCRIPTOR RING
// ═══════════════════════════════════════════════════════════════════════════

/// Fixed-capacity descriptor ring.
#[derive(Debug, Clone)]
pub struct DescriptorRing {
    /// Direction.
    kind: RingKind,
    /// Bus address of descriptor 0.
    dma_base: u64,
    /// Number of descriptors.
    capacity: u16,
    /// Next descriptor software will hand to hardware.
    tail: u16,
    /// Next descriptor software will reclaim.
    clean: u16,
}

impl DescriptorRing {
    /// Create an empty ring.
    pub fn new(kind: RingKind, config: RingConfig) -> Self {
        Self {
            kind,
            dma_base: config.dma_base,
            capacity: config.descriptors.max(2),
            tail: 0,
            clean: 0,
        }
    }

    /// Direction.
    #[inline]
    pub fn kind(&self) -> RingKind {
        self.kind
    }

    /// Bus address of descriptor 0.
    #[inline]
    pub fn dma_base(&self) -> u64 {
        self.dma_base
    }

    /// Number of descriptors.
    #[inline]
    pub fn capacity(&self) -> u16 {
        self.capacity
    }

    /// Ring length in bytes, as written to xDLEN.
    #[inline]
    pub fn len_bytes(&self) -> u32 {
        self.capacity as u32 * DESC_SIZE
    }

    /// Software tail index.
    #[inline]
    pub fn tail(&self) -> u16 {
        self.tail
    }

    /// Software clean index.
    #[inline]
    pub fn clean(&self) -> u16 {
        self.clean
    }

    /// Last descriptor index.
    #[inline]
    pub fn last_index(&self) -> u16 {
        self.capacity - 1
    }

    /// Descriptors owned by hardware (produced but not reclaimed).
    #[inline]
    pub fn in_flight(&self) -> u16 {
        Self::distance(self.clean, self.tail, self.capacity)
    }

    /// Free slots: capacity minus in-flight minus the reserved slot.
    #[inline]
    pub fn free_slots(&self) -> u16 {
        self.capacity - self.in_flight() - 1
    }

    /// Drop all bookkeeping. Descriptor memory is left untouched.
    pub fn clear(&mut self) {
        self.tail = 0;
        self.clean = 0;
    }

    /// Check that `index` is a legal new tail.
    ///
    /// The new tail may lead the clean index by at most `capacity - 1`.
    pub fn validate_tail(&self, index: u16) -> Result<(), RingError> {
        if index >= self.capacity {
            return Err(RingError::IndexOutOfRange {
                index,
                capacity: self.capacity,
            });
        }
        let advance = Self::distance(self.tail, index, self.capacity);
        if advance > self.free_slots() {
            return Err(RingError::Overrun {
                index,
                clean: self.clean,
            });
        }
        Ok(())
    }

    /// Record a new tail. Call after [`validate_tail`](Self::validate_tail).
    #[inline]
    pub fn set_tail(&mut self, index: u16) {
        self.tail = index % self.capacity;
    }

    /// Reclaim everything up to the hardware head.
    ///
    /// Heads outside the in-flight window are ignored.
    pub fn reclaim_to(&mut self, head: u16) -> u16 {
        if head >= self.capacity {
            return 0;
        }
        let reclaimed = Self::distance(self.clean, head, self.capacity);
        if reclaimed > self.in_flight() {
            return 0;
        }
        self.clean = head;
        reclaimed
    }

    #[inline]
    fn distance(from: u16, to: u16, capacity: u16) -> u16 {
        if to >= from {
            to - from
        } else {
            capacity - from + to
        }
    }
}
