use std::fmt;

use tokio::sync::mpsc;

use crate::error::Result;
use crate::message::Envelope;

/// Outbound half of the boundary between extension and host.
///
/// Implementations post one envelope to the other side (postMessage,
/// a socket, an in-process queue). Delivery is assumed to be reliable and
/// FIFO once the connection is up; the implementation does not interpret
/// envelopes.
pub trait Transport: Send + Sync + 'static {
    /// Post a single envelope. Must not block.
    fn post(&self, envelope: Envelope) -> Result<()>;
}

/// A transport paired with the queue its incoming envelopes arrive on.
///
/// The embedder feeds received messages into the sender matching `inbound`.
/// [`crate::memory::pair`] builds two cross-wired endpoints.
pub struct Endpoint {
    transport: Box<dyn Transport>,
    inbound: mpsc::UnboundedReceiver<Envelope>,
}

impl Endpoint {
    /// Create an endpoint from its two halves.
    pub fn new(transport: impl Transport, inbound: mpsc::UnboundedReceiver<Envelope>) -> Self {
        Self {
            transport: Box::new(transport),
            inbound,
        }
    }

    /// Post an envelope to the other side.
    pub fn post(&self, envelope: Envelope) -> Result<()> {
        self.transport.post(envelope)
    }

    /// Receive the next envelope, or `None` once the other side is gone.
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.inbound.recv().await
    }

    pub(crate) fn into_parts(self) -> (Box<dyn Transport>, mpsc::UnboundedReceiver<Envelope>) {
        (self.transport, self.inbound)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint").finish_non_exhaustive()
    }
}
