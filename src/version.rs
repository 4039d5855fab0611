//! Protocol version constants and negotiation.

/// Protocol version 1.0.
pub const V1_0: u16 = 1;

/// Versions implemented by this build, in ascending order.
pub const SUPPORTED_VERSIONS: &[u16] = &[V1_0];

/// Picks the protocol version both endpoints implement.
pub struct VersionNegotiator;

impl VersionNegotiator {
    /// Returns the highest version present in both lists, or `None` when the
    /// intersection is empty. The order of either input does not affect the
    /// result.
    pub fn negotiate(client_supported: &[u16], server_supported: &[u16]) -> Option<u16> {
        client_supported
            .iter()
            .copied()
            .filter(|v| server_supported.contains(v))
            .max()
    }
}
