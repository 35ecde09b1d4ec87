//! TSC (Time Stamp Counter) access.
//!
//! # Safety
//! TSC reads are always safe. Requires invariant TSC (verify via CPUID at boot).

/// Read TSC (non-serializing).
///
/// Fast but may be reordered with surrounding instructions. Good enough
/// for spin delays measured in microseconds.
#[cfg(target_arch = "x86_64")]
#[inline]
pub fn read_tsc() -> u64 {
    // SAFETY: RDTSC has no memory side effects.
    unsafe { core::arch::x86_64::_rdtsc() }
}

/// Stub for non-x86_64 targets.
#[cfg(not(target_arch = "x86_64"))]
#[inline]
pub fn read_tsc() -> u64 {
    0
}
