//! In-process transport over unbounded tokio queues.

use tokio::sync::mpsc;

use crate::error::{ChannelError, Result};
use crate::message::Envelope;
use crate::transport::{Endpoint, Transport};

/// Transport posting into an in-process queue.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    tx: mpsc::UnboundedSender<Envelope>,
}

impl Transport for MemoryTransport {
    fn post(&self, envelope: Envelope) -> Result<()> {
        self.tx
            .send(envelope)
            .map_err(|_| ChannelError::TransportClosed)
    }
}

/// Create two cross-wired endpoints: whatever one posts, the other receives.
pub fn pair() -> (Endpoint, Endpoint) {
    let (left_tx, left_rx) = mpsc::unbounded_channel();
    let (right_tx, right_rx) = mpsc::unbounded_channel();
    (
        Endpoint::new(MemoryTransport { tx: right_tx }, left_rx),
        Endpoint::new(MemoryTransport { tx: left_tx }, right_rx),
    )
}
