//! Device register windows and the delay source, owned by the driver.

use crate::mmio::RegisterSpace;
use crate::time::Delay;

use super::ops::Hw;

/// Mapped windows plus delay provider of one device.
pub struct DeviceIo<R: RegisterSpace, D: Delay> {
    /// BAR0 registers.
    pub regs: R,
    /// BAR1 flash window.
    pub flash: Option<R>,
    /// Blocking delays.
    pub delay: D,
}

impl<R: RegisterSpace, D: Delay> DeviceIo<R, D> {
    /// Bundle the mapped windows.
    pub fn new(regs: R, flash: Option<R>, delay: D) -> Self {
        Self { regs, flash, delay }
    }

    /// Borrow the windows for a chip routine.
    #[inline]
    pub fn hw(&mut self) -> Hw<'_> {
        Hw::new(
            &mut self.regs,
            self.flash.as_mut().map(|f| f as &mut dyn RegisterSpace),
        )
    }

    /// Flush posted writes, then wait `ms`.
    #[inline]
    pub fn flush_and_wait_ms(&mut self, ms: u32) {
        self.regs.flush();
        self.delay.delay_ms(ms);
    }
}
