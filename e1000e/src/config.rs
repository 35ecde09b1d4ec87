//! Driver configuration.
//!
//! Everything the reset/configure sequence reads that is not a property of
//! the chip itself. The chip-dependent defaults live in the capability
//! table; `NicConfig` only overrides them where a field says so.

/// Ethernet header length.
pub const ETH_HLEN: u32 = 14;
/// Frame check sequence length.
pub const ETH_FCS_LEN: u32 = 4;
/// Standard Ethernet payload.
pub const ETH_DATA_LEN: u16 = 1500;
/// Largest MTU any supported family accepts (9018-byte frames).
pub const MAX_JUMBO_MTU: u16 = 9000;

/// EEE advertisement: 100BASE-TX.
pub const EEE_ADV_100TX: u16 = 1 << 1;
/// EEE advertisement: 1000BASE-T.
pub const EEE_ADV_1000T: u16 = 1 << 2;

// ═══════════════════════════════════════════════════════════════════════════
// RING GEOMETRY
// ═══════════════════════════════════════════════════════════════════════════

/// Descriptor ring geometry handed over by the DMA allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingConfig {
    /// Bus address of the first descriptor.
    pub dma_base: u64,
    /// Number of descriptors (multiple of 8, at least 8).
    pub descriptors: u16,
}

impl RingConfig {
    /// Create a ring geometry.
    pub const fn new(dma_base: u64, descriptors: u16) -> Self {
        Self {
            dma_base,
            descriptors,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// NIC CONFIGURATION
// ═══════════════════════════════════════════════════════════════════════════

/// E1000e driver configuration.
#[derive(Debug, Clone)]
pub struct NicConfig {
    /// Configured MTU.
    pub mtu: u16,
    /// Receive ring.
    pub rx_ring: RingConfig,
    /// Transmit ring.
    pub tx_ring: RingConfig,
    /// Interrupt throttle register value (256 ns units).
    pub itr: u32,
    /// Tx interrupt delay (TIDV, 1.024 us units).
    pub tx_int_delay: u32,
    /// Tx absolute interrupt delay (TADV).
    pub tx_abs_int_delay: u32,
    /// Rx interrupt delay (RDTR).
    pub rx_int_delay: u32,
    /// Rx absolute interrupt delay (RADV).
    pub rx_abs_int_delay: u32,
    /// Advertise Energy-Efficient Ethernet.
    pub eee_enabled: bool,
    /// EEE speeds to advertise when enabled.
    pub eee_advert: u16,
    /// Keep smart power down on when the PHY supports it.
    pub smart_power_down: bool,
    /// Adaptive inter-frame spacing.
    pub adaptive_ifs: bool,
    /// Packet buffer allocation override (Rx KB in bits 15:0).
    pub pba_override: Option<u32>,
}

impl NicConfig {
    /// Maximum frame size on the wire: MTU + header + FCS.
    #[inline]
    pub fn max_frame_size(&self) -> u32 {
        self.mtu as u32 + ETH_HLEN + ETH_FCS_LEN
    }

    /// Whether the configured MTU needs long packet support.
    #[inline]
    pub fn jumbo(&self) -> bool {
        self.mtu > ETH_DATA_LEN
    }
}

impl Default for NicConfig {
    fn default() -> Self {
        Self {
            mtu: ETH_DATA_LEN,
            rx_ring: RingConfig::new(0, 256),
            tx_ring: RingConfig::new(0, 256),
            // ~20000 interrupts/s
            itr: 195,
            tx_int_delay: 8,
            tx_abs_int_delay: 32,
            rx_int_delay: 0,
            rx_abs_int_delay: 8,
            eee_enabled: true,
            eee_advert: EEE_ADV_100TX | EEE_ADV_1000T,
            smart_power_down: false,
            adaptive_ifs: true,
            pba_override: None,
        }
    }
}
