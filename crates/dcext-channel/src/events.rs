//! Lifecycle event names raised by the channel itself.
//!
//! These share the `on` namespace with application events. Application
//! names are namespaced with a `:` (`frame:height:get`), lifecycle names
//! never are.

/// Host acknowledged the hello; `emit` and `request` are usable.
pub const CONNECTED: &str = "connected";

/// No acceptable `connected` reply arrived within the handshake window.
pub const CONNECTION_TIMEOUT: &str = "connection-timeout";

/// The connection was torn down locally or by the host.
pub const DISCONNECTED: &str = "disconnected";

/// Returns true if `event` is raised by the channel rather than the host.
pub fn is_lifecycle(event: &str) -> bool {
    matches!(event, CONNECTED | CONNECTION_TIMEOUT | DISCONNECTED)
}
