//! Driver-side collaborator contracts.

use super::intel::phy::LinkStatus;

/// Outbound packet queue owned by the network stack.
///
/// The driver never resumes the queue itself. The stack starts sending again
/// once [`link_changed`](Self::link_changed) reports link up.
pub trait PacketQueue {
    /// Stop handing packets to the driver.
    fn stop(&mut self);

    /// Drop everything queued but not yet on a descriptor.
    fn flush(&mut self);

    /// Link state changed.
    fn link_changed(&mut self, status: LinkStatus);
}
