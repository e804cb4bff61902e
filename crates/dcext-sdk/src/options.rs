use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dcext_channel::{ConnectionConfig, HelloConfig};

use crate::frame::{DetachedViewport, Viewport};
use crate::navigator::{DetachedLocation, Location};

/// Default handshake window.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_millis(1000);

/// Caller-supplied initialization options.
#[derive(Clone)]
pub struct Options {
    /// Measures the extension's root element. Stands in for the window.
    pub viewport: Arc<dyn Viewport>,
    /// Navigated by the dashboard's application navigator.
    pub location: Arc<dyn Location>,
    /// How long to wait for the host to answer the hello.
    pub connection_timeout: Duration,
    /// Log every envelope at `debug` level.
    pub debug: bool,
    /// Per-request upper bound enforced by the channel. `None` waits forever.
    pub request_timeout: Option<Duration>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            viewport: Arc::new(DetachedViewport),
            location: Arc::new(DetachedLocation),
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            debug: false,
            request_timeout: None,
        }
    }
}

impl Options {
    pub fn with_viewport(mut self, viewport: impl Viewport) -> Self {
        self.viewport = Arc::new(viewport);
        self
    }

    pub fn with_location(mut self, location: impl Location) -> Self {
        self.location = Arc::new(location);
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub(crate) fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            hello: HelloConfig {
                timeout: self.connection_timeout,
                ..HelloConfig::default()
            },
            request_timeout: self.request_timeout,
            debug: self.debug,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("viewport", &format_args!("<dyn Viewport>"))
            .field("location", &format_args!("<dyn Location>"))
            .field("connection_timeout", &self.connection_timeout)
            .field("debug", &self.debug)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
