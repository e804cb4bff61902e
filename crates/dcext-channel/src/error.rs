use std::time::Duration;

/// Errors that can occur on the extension/host channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// `emit` or `request` was called before the handshake completed.
    #[error("channel not connected (state: {0})")]
    NotConnected(&'static str),

    /// `connect` was called on a connection that already left `Disconnected`.
    #[error("connect already attempted (state: {0})")]
    AlreadyConnecting(&'static str),

    /// The transport refused to post a message.
    #[error("transport closed")]
    TransportClosed,

    /// The connection was torn down while a request was pending.
    #[error("channel disconnected: {0}")]
    Disconnected(String),

    /// The host answered a correlated request with a rejection.
    #[error("request '{event}' rejected: {reason}")]
    Rejected { event: String, reason: String },

    /// A correlated request got no answer within the configured window.
    #[error("request '{event}' timed out after {timeout:?}")]
    Timeout { event: String, timeout: Duration },

    /// Hello exchange carried an unusable protocol name or version.
    #[error("invalid hello: {0}")]
    InvalidHello(String),
}

pub type Result<T> = std::result::Result<T, ChannelError>;
