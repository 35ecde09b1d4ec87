//! Register window access.
//!
//! Everything in the driver talks to the device through [`RegisterSpace`].
//! [`MmioRegion`] is the real implementation over a mapped BAR; tests plug in
//! a simulated register file.
//!
//! No locking happens at this layer. The owner of the device instance
//! serializes access.
//!
//! # Safety
//! - The mapped window must stay valid for the lifetime of the region
//! - Offsets must be naturally aligned for the access width
//!
//! # Reference
//! Intel 82579 Datasheet, Section 10.2 (Register Access)

/// Offset of the device STATUS register, read back to push posted writes.
const FLUSH_OFFSET: u32 = 0x0008;

// ═══════════════════════════════════════════════════════════════════════════
// REGISTER SPACE CONTRACT
// ═══════════════════════════════════════════════════════════════════════════

/// A memory-mapped register window.
pub trait RegisterSpace {
    /// Read an 8-bit register.
    fn read8(&self, offset: u32) -> u8;
    /// Read a 16-bit register.
    fn read16(&self, offset: u32) -> u16;
    /// Read a 32-bit register.
    fn read32(&self, offset: u32) -> u32;
    /// Write a 16-bit register.
    fn write16(&mut self, offset: u32, value: u16);
    /// Write a 32-bit register.
    fn write32(&mut self, offset: u32, value: u32);

    /// Force posted writes to complete.
    ///
    /// Reads a side-effect-free register so that every earlier write has
    /// reached the device before a delay or a dependent read.
    #[inline]
    fn flush(&self) {
        let _ = self.read32(FLUSH_OFFSET);
    }

    /// Read-modify-write: set `bits`.
    #[inline]
    fn set_bits32(&mut self, offset: u32, bits: u32) {
        let value = self.read32(offset);
        self.write32(offset, value | bits);
    }

    /// Read-modify-write: clear `bits`.
    #[inline]
    fn clear_bits32(&mut self, offset: u32, bits: u32) {
        let value = self.read32(offset);
        self.write32(offset, value & !bits);
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// MMIO REGION
// ═══════════════════════════════════════════════════════════════════════════

/// A mapped BAR accessed with volatile loads and stores.
#[derive(Debug)]
pub struct MmioRegion {
    /// Virtual address of the first register.
    base: u64,
    /// Window length in bytes.
    len: u32,
}

impl MmioRegion {
    /// Wrap a mapped register window.
    ///
    /// # Arguments
    /// - `base`: Virtual address the BAR is mapped at
    /// - `len`: Size of the mapping in bytes
    ///
    /// # Safety
    /// `base..base + len` must be a live uncached device mapping for as long
    /// as the region exists.
    pub unsafe fn new(base: u64, len: u32) -> Self {
        Self { base, len }
    }

    /// Virtual base address.
    #[inline]
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Window length in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether the window is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn addr(&self, offset: u32, width: u32) -> Option<u64> {
        if offset.checked_add(width)? > self.len {
            return None;
        }
        Some(self.base + offset as u64)
    }
}

impl RegisterSpace for MmioRegion {
    #[inline]
    fn read8(&self, offset: u32) -> u8 {
        match self.addr(offset, 1) {
            // SAFETY: inside the mapping, guaranteed live by `new`.
            Some(addr) => unsafe { core::ptr::read_volatile(addr as *const u8) },
            None => 0xFF,
        }
    }

    #[inline]
    fn read16(&self, offset: u32) -> u16 {
        match self.addr(offset, 2) {
            // SAFETY: inside the mapping, guaranteed live by `new`.
            Some(addr) => unsafe { core::ptr::read_volatile(addr as *const u16) },
            None => 0xFFFF,
        }
    }

    #[inline]
    fn read32(&self, offset: u32) -> u32 {
        match self.addr(offset, 4) {
            // SAFETY: inside the mapping, guaranteed live by `new`.
            Some(addr) => unsafe { core::ptr::read_volatile(addr as *const u32) },
            None => 0xFFFF_FFFF,
        }
    }

    #[inline]
    fn write16(&mut self, offset: u32, value: u16) {
        if let Some(addr) = self.addr(offset, 2) {
            #[cfg(feature = "serial_debug")]
            log::trace!("e1000e: w16 {:#06x} <- {:#06x}", offset, value);
            // SAFETY: inside the mapping, guaranteed live by `new`.
            unsafe { core::ptr::write_volatile(addr as *mut u16, value) }
        }
    }

    #[inline]
    fn write32(&mut self, offset: u32, value: u32) {
        if let Some(addr) = self.addr(offset, 4) {
            #[cfg(feature = "serial_debug")]
            log::trace!("e1000e: w32 {:#06x} <- {:#010x}", offset, value);
            // SAFETY: inside the mapping, guaranteed live by `new`.
            unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
        }
    }
}

// Safety: MmioRegion only holds the address of a device mapping that is
// valid for the lifetime of the driver.
unsafe impl Send for MmioRegion {}
