use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use dcext_channel::{ChannelError, ClientConnection, CONNECTED, CONNECTION_TIMEOUT};
use tokio::sync::oneshot;

use crate::error::InitError;

/// Terminal result of one connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeOutcome {
    Connected,
    TimedOut,
}

/// Passes on the first outcome it is given and ignores every later one.
#[derive(Debug, Clone)]
pub struct HandshakeLatch {
    tx: Arc<Mutex<Option<oneshot::Sender<HandshakeOutcome>>>>,
}

impl HandshakeLatch {
    pub fn new() -> (Self, oneshot::Receiver<HandshakeOutcome>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                tx: Arc::new(Mutex::new(Some(tx))),
            },
            rx,
        )
    }

    /// Returns true if this call decided the outcome.
    pub fn settle(&self, outcome: HandshakeOutcome) -> bool {
        let tx = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match tx {
            Some(tx) => {
                let _ = tx.send(outcome);
                true
            }
            None => {
                tracing::debug!(?outcome, "ignoring handshake outcome after terminal state");
                false
            }
        }
    }
}

/// Drive `connection` to a terminal state.
///
/// Handlers are registered before the hello goes out, so neither lifecycle
/// event can be missed.
pub async fn handshake(connection: &ClientConnection, timeout: Duration) -> Result<(), InitError> {
    let (latch, outcome) = HandshakeLatch::new();
    {
        let latch = latch.clone();
        connection.on(CONNECTED, move |_| {
            latch.settle(HandshakeOutcome::Connected);
        });
    }
    connection.on(CONNECTION_TIMEOUT, move |_| {
        latch.settle(HandshakeOutcome::TimedOut);
    });

    connection.connect().map_err(InitError::Connect)?;

    match outcome.await {
        Ok(HandshakeOutcome::Connected) => Ok(()),
        Ok(HandshakeOutcome::TimedOut) => Err(InitError::ConnectionTimeout(timeout)),
        Err(_) => Err(InitError::Connect(ChannelError::Disconnected(
            "connection dropped during handshake".to_string(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use dcext_channel::{memory, ConnectionConfig, Envelope, HelloConfig};

    use super::*;
    use crate::testing::host_hello;

    fn config(timeout: Duration) -> ConnectionConfig {
        ConnectionConfig {
            hello: HelloConfig {
                timeout,
                ..HelloConfig::default()
            },
            ..ConnectionConfig::default()
        }
    }

    #[tokio::test]
    async fn latch_keeps_first_outcome() {
        let (latch, rx) = HandshakeLatch::new();
        assert!(latch.settle(HandshakeOutcome::Connected));
        assert!(!latch.settle(HandshakeOutcome::TimedOut));
        assert_eq!(rx.await.unwrap(), HandshakeOutcome::Connected);

        let (latch, rx) = HandshakeLatch::new();
        assert!(latch.settle(HandshakeOutcome::TimedOut));
        assert!(!latch.settle(HandshakeOutcome::Connected));
        assert_eq!(rx.await.unwrap(), HandshakeOutcome::TimedOut);
    }

    #[tokio::test]
    async fn connected_host_completes_handshake() {
        let (extension, mut host) = memory::pair();
        let conn = ClientConnection::new(extension, config(Duration::from_millis(500)));

        let host_task = tokio::spawn(async move {
            assert!(matches!(host.recv().await, Some(Envelope::Connect { .. })));
            host.post(host_hello()).unwrap();
            host
        });

        handshake(&conn, Duration::from_millis(500)).await.unwrap();
        host_task.await.unwrap();
    }

    #[tokio::test]
    async fn silent_host_times_out() {
        let (extension, _host) = memory::pair();
        let timeout = Duration::from_millis(30);
        let conn = ClientConnection::new(extension, config(timeout));

        let err = handshake(&conn, timeout).await.unwrap_err();
        assert!(matches!(err, InitError::ConnectionTimeout(t) if t == timeout));
    }

    #[tokio::test]
    async fn late_connected_after_timeout_is_ignored() {
        let (extension, mut host) = memory::pair();
        let timeout = Duration::from_millis(30);
        let conn = ClientConnection::new(extension, config(timeout));

        let err = handshake(&conn, timeout).await.unwrap_err();
        assert!(matches!(err, InitError::ConnectionTimeout(_)));

        // The channel reports the late reply; the settled latch swallows it.
        assert!(matches!(host.recv().await, Some(Envelope::Connect { .. })));
        host.post(host_hello()).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(conn.state(), dcext_channel::ConnectionState::Connected);
    }

    #[tokio::test]
    async fn refused_transport_is_a_connect_error() {
        let (extension, host) = memory::pair();
        drop(host);
        let conn = ClientConnection::new(extension, config(Duration::from_millis(30)));

        let err = handshake(&conn, Duration::from_millis(30)).await.unwrap_err();
        assert!(matches!(
            err,
            InitError::Connect(ChannelError::TransportClosed)
        ));
    }
}
