use std::time::Duration;

use dcext_channel::ChannelError;

/// Errors that end an `init` attempt.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// No acceptable `connected` reply within the configured window.
    #[error("Failed to establish connection to DC Application (no reply within {0:?})")]
    ConnectionTimeout(Duration),

    /// Connected, but the execution context could not be fetched or decoded.
    #[error("Failed to fetch context for UI Extension: {0}")]
    ContextFetch(#[source] ContextError),

    /// The transport refused the connect attempt before any handshake.
    #[error("Failed to start connection: {0}")]
    Connect(#[source] ChannelError),
}

/// Errors from the one-shot context request.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// The correlated request failed on the channel.
    #[error("context request failed: {0}")]
    Request(#[from] ChannelError),

    /// The host answered with a payload of the wrong shape.
    #[error("malformed context: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors from frame sizing calls.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Height override was NaN or infinite.
    #[error("setHeight() only accepts an optional finite number argument (got {0})")]
    InvalidHeight(f64),

    /// The event could not be sent.
    #[error("frame event not sent: {0}")]
    Channel(#[from] ChannelError),
}

/// Errors from a single HTTP-over-channel call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The remote API answered with something other than 200.
    #[error("API responded with a non 200 status code. Error: {detail}")]
    Status { status: u16, detail: String },

    /// The bridge request failed on the channel.
    #[error("request failed: {0}")]
    Channel(#[from] ChannelError),

    /// Response or body did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Errors from identity lookups. Each layer prefixes the message of the
/// layer beneath it.
#[derive(Debug, thiserror::Error)]
pub enum UsersError {
    #[error("Unable to get users: {0}")]
    List(#[source] ApiError),

    #[error("Unable to get permissions: {0}")]
    Permissions(#[source] ApiError),

    #[error("Unable to get current user: {0}")]
    CurrentUser(#[source] Box<UsersError>),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors from the content-item, field and link accessors.
#[derive(Debug, thiserror::Error)]
pub enum AccessorError {
    /// A content browser was opened without any content type to browse.
    #[error("Please provide content type ids")]
    NoContentTypeIds,

    #[error("accessor request failed: {0}")]
    Channel(#[from] ChannelError),

    #[error("malformed accessor payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The dashboard's location href has no `#!/<hub>` route to navigate from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("location href has no hub route: {0}")]
pub struct NavigationError(pub String);
