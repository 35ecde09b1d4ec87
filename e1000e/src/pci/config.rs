//! PCI configuration space layout.
//!
//! # Reference
//! PCI Local Bus Spec 3.0, Section 6.1 (Configuration Space Organization)

/// Type 0 header offsets.
pub mod offset {
    pub const VENDOR_ID: u8 = 0x00;
    pub const DEVICE_ID: u8 = 0x02;
    pub const COMMAND: u8 = 0x04;
    pub const STATUS: u8 = 0x06;
    pub const REVISION_ID: u8 = 0x08;
    pub const SUBSYS_VENDOR_ID: u8 = 0x2C;
    pub const SUBSYS_ID: u8 = 0x2E;
    pub const CAP_PTR: u8 = 0x34;
}

/// PCI command register bits.
pub mod command {
    /// I/O space decoding.
    pub const IO_SPACE: u16 = 1 << 0;
    /// Memory space decoding.
    pub const MEM_SPACE: u16 = 1 << 1;
    /// Bus master.
    pub const BUS_MASTER: u16 = 1 << 2;
    /// Memory write and invalidate.
    pub const MEM_WR_INVALIDATE: u16 = 1 << 4;
}

/// PCI status register bits.
pub mod status {
    pub const CAP_LIST: u16 = 1 << 4;
}
