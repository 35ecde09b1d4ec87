//! Time and timing module.
//!
//! Blocking delays for the hardware settle intervals, plus the driver's
//! timing constants. Delays are deliberately synchronous: the quiesce wait
//! after disabling Rx/Tx must run to completion.

mod tsc;

pub use tsc::read_tsc;

// ═══════════════════════════════════════════════════════════════════════════
// DELAY CONTRACT
// ═══════════════════════════════════════════════════════════════════════════

/// Blocking delay provider.
pub trait Delay {
    /// Busy-wait for at least `us` microseconds.
    fn delay_us(&mut self, us: u32);

    /// Busy-wait for at least `ms` milliseconds.
    #[inline]
    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1_000);
        }
    }
}

/// TSC-calibrated spin delay.
#[derive(Debug, Clone, Copy)]
pub struct TscDelay {
    ticks_per_us: u64,
}

impl TscDelay {
    /// Create from TSC frequency (ticks per second).
    pub fn new(tsc_freq: u64) -> Self {
        Self {
            ticks_per_us: (tsc_freq / 1_000_000).max(1),
        }
    }

    /// Convert microseconds to ticks.
    #[inline]
    pub fn us_to_ticks(&self, us: u64) -> u64 {
        us * self.ticks_per_us
    }
}

impl Delay for TscDelay {
    fn delay_us(&mut self, us: u32) {
        // No counter to spin on.
        if cfg!(not(target_arch = "x86_64")) {
            return;
        }
        let start = read_tsc();
        let ticks = self.us_to_ticks(us as u64);
        while read_tsc().wrapping_sub(start) < ticks {
            core::hint::spin_loop();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// DRIVER TIMINGS
// ═══════════════════════════════════════════════════════════════════════════

/// Fixed hardware timing requirements.
pub mod timings {
    /// Settle interval after disabling Rx/Tx (lower bound of 10-20 ms).
    pub const QUIESCE_MS: u32 = 10;
    /// Polls of FWSM while the ME owns the PCIm-to-PCI arbiter.
    pub const PCIM2PCI_POLL_COUNT: u32 = 2000;
    /// Interval between arbiter polls.
    pub const PCIM2PCI_POLL_US: u32 = 50;
    /// Consecutive stalled supervisory checks before a Tx deadlock restart.
    pub const TX_DEADLOCK_THRESHOLD: u32 = 3;
}
