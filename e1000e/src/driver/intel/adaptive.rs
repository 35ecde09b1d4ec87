//! Adaptive inter-frame spacing.
//!
//! On half-duplex links with heavy collisions, stretching the IFS through
//! AIT trades a little latency for fewer retries. The state is cleared on
//! every reset and stepped from the statistics refresh.
//!
//! # Reference
//! Linux kernel drivers/net/ethernet/intel/e1000e/mac.c (e1000e_reset_adaptive, e1000e_update_adaptive)

use crate::mmio::RegisterSpace;

use super::regs;

/// First AIT value once spacing kicks in.
pub const IFS_MIN: u16 = 40;
/// Largest AIT value.
pub const IFS_MAX: u16 = 80;
/// AIT increment per update.
pub const IFS_STEP: u16 = 10;
/// Collisions-to-transmits ratio that triggers spacing.
pub const IFS_RATIO: u32 = 4;
/// Transmits per interval below which spacing is dropped.
pub const MIN_NUM_XMITS: u32 = 1000;

/// Adaptive IFS state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdaptiveIfs {
    /// Feature enabled for this device.
    pub enabled: bool,
    /// Currently programmed AIT value.
    pub current: u16,
    /// Lower bound.
    pub min: u16,
    /// Upper bound.
    pub max: u16,
    /// Increment.
    pub step: u16,
    /// Trigger ratio.
    pub ratio: u32,
    /// Spacing is active.
    pub in_ifs_mode: bool,
}

impl AdaptiveIfs {
    /// Disabled state. [`reset`](Self::reset) loads the tuning constants.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    /// Restore defaults and clear AIT.
    pub fn reset<R: RegisterSpace + ?Sized>(&mut self, regs: &mut R) {
        if !self.enabled {
            log::debug!("e1000e: not in adaptive IFS mode");
            return;
        }

        self.current = 0;
        self.min = IFS_MIN;
        self.max = IFS_MAX;
        self.step = IFS_STEP;
        self.ratio = IFS_RATIO;
        self.in_ifs_mode = false;
        regs.write32(regs::AIT, 0);
    }

    /// Step AIT from the latest collision and transmit deltas.
    pub fn update<R: RegisterSpace + ?Sized>(
        &mut self,
        regs: &mut R,
        collision_delta: u32,
        tx_packet_delta: u32,
    ) {
        if !self.enabled {
            log::debug!("e1000e: not in adaptive IFS mode");
            return;
        }

        let crowded = collision_delta.saturating_mul(self.ratio) > tx_packet_delta;
        if crowded {
            if tx_packet_delta > MIN_NUM_XMITS {
                self.in_ifs_mode = true;
                if self.current < self.max {
                    self.current = if self.current == 0 {
                        self.min
                    } else {
                        self.current + self.step
                    };
                    regs.write32(regs::AIT, self.current as u32);
                }
            }
        } else if self.in_ifs_mode && tx_packet_delta <= MIN_NUM_XMITS {
            self.current = 0;
            self.in_ifs_mode = false;
            regs.write32(regs::AIT, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRegs;

    #[test]
    fn test_reset_loads_defaults() {
        let mut regs = MockRegs::new();
        regs.set(regs::AIT, 60);
        let mut ifs = AdaptiveIfs::new(true);
        ifs.reset(&mut regs);
        assert_eq!((ifs.min, ifs.max, ifs.step, ifs.ratio), (40, 80, 10, 4));
        assert_eq!(regs.get(regs::AIT), 0);
    }

    #[test]
    fn test_disabled_never_touches_ait() {
        let mut regs = MockRegs::new();
        let mut ifs = AdaptiveIfs::new(false);
        ifs.reset(&mut regs);
        ifs.update(&mut regs, 5000, 5000);
        assert_eq!(regs.write_count(regs::AIT), 0);
    }

    #[test]
    fn test_steps_up_to_max_and_holds() {
        let mut regs = MockRegs::new();
        let mut ifs = AdaptiveIfs::new(true);
        ifs.reset(&mut regs);

        ifs.update(&mut regs, 600, 2000);
        assert_eq!(regs.get(regs::AIT), 40);
        for _ in 0..10 {
            ifs.update(&mut regs, 600, 2000);
        }
        assert_eq!(ifs.current, 80);
        assert_eq!(regs.get(regs::AIT), 80);
        assert!(ifs.in_ifs_mode);
    }

    #[test]
    fn test_crowded_but_quiet_keeps_spacing() {
        let mut regs = MockRegs::new();
        let mut ifs = AdaptiveIfs::new(true);
        ifs.reset(&mut regs);

        ifs.update(&mut regs, 600, 2000);
        regs.clear_log();
        // Collisions still dominate, traffic below the minimum.
        ifs.update(&mut regs, 600, 900);
        assert_eq!(ifs.current, 40);
        assert!(ifs.in_ifs_mode);
        assert_eq!(regs.write_count(regs::AIT), 0);
        assert_eq!(regs.get(regs::AIT), 40);
    }

    #[test]
    fn test_drops_once_collisions_and_traffic_subside() {
        let mut regs = MockRegs::new();
        let mut ifs = AdaptiveIfs::new(true);
        ifs.reset(&mut regs);

        ifs.update(&mut regs, 600, 2000);
        ifs.update(&mut regs, 600, 2000);
        assert_eq!(ifs.current, 50);

        // Low collisions but heavy traffic: spacing stays.
        ifs.update(&mut regs, 10, 5000);
        assert_eq!(ifs.current, 50);

        ifs.update(&mut regs, 10, 900);
        assert_eq!(ifs.current, 0);
        assert!(!ifs.in_ifs_mode);
        assert_eq!(regs.get(regs::AIT), 0);
    }

    #[test]
    fn test_at_max_still_enters_ifs_mode() {
        let mut regs = MockRegs::new();
        let mut ifs = AdaptiveIfs::new(true);
        ifs.reset(&mut regs);
        ifs.current = ifs.max;
        regs.clear_log();

        ifs.update(&mut regs, 600, 2000);
        assert!(ifs.in_ifs_mode);
        assert_eq!(regs.write_count(regs::AIT), 0);
    }

    #[test]
    fn test_low_collision_ratio_is_ignored() {
        let mut regs = MockRegs::new();
        let mut ifs = AdaptiveIfs::new(true);
        ifs.reset(&mut regs);
        regs.clear_log();
        ifs.update(&mut regs, 100, 5000);
        assert_eq!(regs.write_count(regs::AIT), 0);
    }
}
