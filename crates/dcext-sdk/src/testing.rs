//! Test helpers: a connected channel with the raw host endpoint on the other end.

use std::sync::Mutex;
use std::time::Duration;

use dcext_channel::{
    memory, ClientConnection, ConnectionConfig, Endpoint, Envelope, HelloConfig, RequestId,
    CONNECTED,
};
use serde_json::Value;
use tokio::sync::oneshot;

pub(crate) fn host_hello() -> Envelope {
    Envelope::Connected {
        protocol: "dc-extensions".to_string(),
        version: "1.0".to_string(),
    }
}

pub(crate) async fn connected() -> (ClientConnection, Endpoint) {
    let (extension, mut host) = memory::pair();
    let conn = ClientConnection::new(
        extension,
        ConnectionConfig {
            hello: HelloConfig {
                timeout: Duration::from_millis(200),
                ..HelloConfig::default()
            },
            ..ConnectionConfig::default()
        },
    );

    let (tx, rx) = oneshot::channel();
    let tx = Mutex::new(Some(tx));
    conn.on(CONNECTED, move |_| {
        if let Some(tx) = tx.lock().unwrap().take() {
            let _ = tx.send(());
        }
    });
    conn.connect().unwrap();

    assert!(matches!(host.recv().await, Some(Envelope::Connect { .. })));
    host.post(host_hello()).unwrap();
    rx.await.unwrap();
    (conn, host)
}

pub(crate) async fn next_request(host: &mut Endpoint) -> (RequestId, String, Value) {
    match host.recv().await {
        Some(Envelope::Request { id, event, payload }) => {
            (id, event, payload.unwrap_or(Value::Null))
        }
        other => panic!("expected request, got {other:?}"),
    }
}
