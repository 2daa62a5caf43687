//! Wire-level identifiers for the peer protocol.

/// Protocol identifier announced on peer streams.
pub const PROTOCOL_ID: &str = "/keel";

/// Service name and version tag exchanged during handshakes.
pub const SERVICE_TAG: &str = "keel/0.0.1";
