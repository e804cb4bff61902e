use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::{ChannelError, Result};
use crate::events::{CONNECTED, CONNECTION_TIMEOUT, DISCONNECTED};
use crate::hello::HelloConfig;
use crate::message::{Envelope, RequestId};
use crate::transport::{Endpoint, Transport};

type EventHandler = Arc<dyn Fn(&Value) + Send + Sync>;
type Responder = Arc<dyn Fn(&Value) -> std::result::Result<Value, String> + Send + Sync>;

/// Lifecycle of a [`ClientConnection`].
///
/// `Disconnected -> Connecting -> Connected`, or `Connecting -> TimedOut`.
/// A `connected` reply arriving after the timeout still moves the state to
/// `Connected`; callers that need a single outcome arbitrate themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    TimedOut,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::TimedOut => "timed-out",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a [`ClientConnection`].
#[derive(Debug, Clone, Default)]
pub struct ConnectionConfig {
    /// Hello exchange settings, including the handshake timeout.
    pub hello: HelloConfig,
    /// Upper bound on each correlated request. `None` waits for the host.
    pub request_timeout: Option<Duration>,
    /// Log every envelope at `debug` instead of `trace`.
    pub debug: bool,
}

/// Extension side of the channel.
///
/// Cheap to clone; all clones share one session. The session is torn down
/// when the last clone is dropped or [`ClientConnection::disconnect`] is
/// called. Handlers registered with `on`/`respond` run on the reader task
/// and must not block.
#[derive(Clone)]
pub struct ClientConnection {
    inner: Arc<Inner>,
}

struct Pending {
    event: String,
    tx: oneshot::Sender<Result<Value>>,
}

struct Inner {
    transport: Box<dyn Transport>,
    inbound: Mutex<Option<mpsc::UnboundedReceiver<Envelope>>>,
    config: ConnectionConfig,
    state: Mutex<ConnectionState>,
    pending: Mutex<HashMap<RequestId, Pending>>,
    handlers: Mutex<HashMap<String, Vec<EventHandler>>>,
    responders: Mutex<HashMap<String, Responder>>,
    next_id: AtomicU64,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ClientConnection {
    /// Wrap an endpoint. Nothing is sent until [`ClientConnection::connect`].
    pub fn new(endpoint: Endpoint, config: ConnectionConfig) -> Self {
        let (transport, inbound) = endpoint.into_parts();
        Self {
            inner: Arc::new(Inner {
                transport,
                inbound: Mutex::new(Some(inbound)),
                config,
                state: Mutex::new(ConnectionState::Disconnected),
                pending: Mutex::new(HashMap::new()),
                handlers: Mutex::new(HashMap::new()),
                responders: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        *lock(&self.inner.state)
    }

    /// Number of correlated requests still waiting for an answer.
    pub fn pending_requests(&self) -> usize {
        lock(&self.inner.pending).len()
    }

    /// Begin the connection attempt.
    ///
    /// Sends the hello, starts the reader task and arms the handshake timer.
    /// The outcome is reported through the `connected` or
    /// `connection-timeout` events. Must be called inside a tokio runtime.
    pub fn connect(&self) -> Result<()> {
        let hello = self.inner.config.hello.connect_envelope()?;
        let inbound = {
            let mut state = lock(&self.inner.state);
            if *state != ConnectionState::Disconnected {
                return Err(ChannelError::AlreadyConnecting(state.as_str()));
            }
            let inbound = lock(&self.inner.inbound).take().ok_or_else(|| {
                ChannelError::Disconnected("connection already torn down".to_string())
            })?;
            *state = ConnectionState::Connecting;
            inbound
        };

        let weak = Arc::downgrade(&self.inner);
        let reader = tokio::spawn(read_loop(weak.clone(), inbound));
        let timeout = self.inner.config.hello.timeout;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(inner) = weak.upgrade() {
                inner.hello_timed_out();
            }
        });
        lock(&self.inner.tasks).extend([reader, timer]);

        tracing::info!(timeout_ms = timeout.as_millis() as u64, "connecting to host");
        if let Err(err) = self.inner.post(hello) {
            self.inner.teardown("hello could not be posted");
            return Err(err);
        }
        Ok(())
    }

    /// Tear down the session and fail every pending request.
    pub fn disconnect(&self) {
        if self.state() == ConnectionState::Connected {
            if let Err(err) = self.inner.post(Envelope::Disconnect) {
                tracing::debug!(error = %err, "disconnect notice not delivered");
            }
        }
        self.inner.teardown("disconnected locally");
    }

    /// Register a handler invoked for every subsequent `event`.
    ///
    /// Lifecycle events (`connected`, `connection-timeout`, `disconnected`)
    /// are delivered here too.
    pub fn on(&self, event: &str, handler: impl Fn(&Value) + Send + Sync + 'static) {
        lock(&self.inner.handlers)
            .entry(event.to_string())
            .or_default()
            .push(Arc::new(handler));
    }

    /// Register the answerer for host-initiated requests tagged `event`.
    ///
    /// The returned value is posted back as the response for that request's
    /// id; an `Err` is posted as a rejection. Replaces any earlier answerer.
    pub fn respond(
        &self,
        event: &str,
        handler: impl Fn(&Value) -> std::result::Result<Value, String> + Send + Sync + 'static,
    ) {
        let previous = lock(&self.inner.responders).insert(event.to_string(), Arc::new(handler));
        if previous.is_some() {
            tracing::debug!(event, "replaced responder");
        }
    }

    /// Send a one-way event.
    pub fn emit(&self, event: &str, payload: Option<Value>) -> Result<()> {
        self.inner.ensure_connected()?;
        self.inner.post(Envelope::Emit {
            event: event.to_string(),
            payload,
        })
    }

    /// Send a correlated request and wait for its answer.
    pub async fn request(&self, event: &str, payload: Option<Value>) -> Result<Value> {
        self.request_within(event, payload, self.inner.config.request_timeout)
            .await
    }

    /// Like [`ClientConnection::request`], but never applies the configured
    /// request timeout. For requests answered only after the user acts,
    /// such as a browser dialog on the host.
    pub async fn request_untimed(&self, event: &str, payload: Option<Value>) -> Result<Value> {
        self.request_within(event, payload, None).await
    }

    async fn request_within(
        &self,
        event: &str,
        payload: Option<Value>,
        timeout: Option<Duration>,
    ) -> Result<Value> {
        self.inner.ensure_connected()?;

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        lock(&self.inner.pending).insert(
            id,
            Pending {
                event: event.to_string(),
                tx,
            },
        );

        let envelope = Envelope::Request {
            id,
            event: event.to_string(),
            payload,
        };
        if let Err(err) = self.inner.post(envelope) {
            lock(&self.inner.pending).remove(&id);
            return Err(err);
        }

        let answer = match timeout {
            Some(timeout) => match tokio::time::timeout(timeout, rx).await {
                Ok(answer) => answer,
                Err(_) => {
                    lock(&self.inner.pending).remove(&id);
                    tracing::warn!(id, event, "request timed out");
                    return Err(ChannelError::Timeout {
                        event: event.to_string(),
                        timeout,
                    });
                }
            },
            None => rx.await,
        };

        answer.map_err(|_| ChannelError::Disconnected("request abandoned".to_string()))?
    }
}

impl fmt::Debug for ClientConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConnection")
            .field("state", &self.state())
            .field("pending_requests", &self.pending_requests())
            .finish()
    }
}

async fn read_loop(inner: Weak<Inner>, mut inbound: mpsc::UnboundedReceiver<Envelope>) {
    while let Some(envelope) = inbound.recv().await {
        let Some(session) = inner.upgrade() else {
            return;
        };
        session.dispatch(envelope);
    }
    if let Some(session) = inner.upgrade() {
        session.teardown("transport closed");
    }
}

impl Inner {
    fn ensure_connected(&self) -> Result<()> {
        let state = *lock(&self.state);
        if state != ConnectionState::Connected {
            return Err(ChannelError::NotConnected(state.as_str()));
        }
        Ok(())
    }

    fn post(&self, envelope: Envelope) -> Result<()> {
        self.log_envelope("out", &envelope);
        self.transport.post(envelope)
    }

    fn log_envelope(&self, direction: &'static str, envelope: &Envelope) {
        let kind = envelope.kind();
        let event = envelope.event().unwrap_or("-");
        if self.config.debug {
            tracing::debug!(direction, kind, event, "envelope");
        } else {
            tracing::trace!(direction, kind, event, "envelope");
        }
    }

    fn dispatch(&self, envelope: Envelope) {
        self.log_envelope("in", &envelope);
        match envelope {
            Envelope::Connected { protocol, version } => self.hello_received(&protocol, &version),
            Envelope::Emit { event, payload } => {
                self.fire(&event, &payload.unwrap_or(Value::Null));
            }
            Envelope::Request { id, event, payload } => {
                self.answer(id, &event, &payload.unwrap_or(Value::Null));
            }
            Envelope::Resolve { id, payload } => self.complete(id, Ok(payload)),
            Envelope::Reject { id, reason } => self.complete(id, Err(reason)),
            Envelope::Disconnect => self.teardown("host disconnected"),
            Envelope::Connect { .. } => {
                tracing::warn!("ignoring connect from host side");
            }
        }
    }

    fn hello_received(&self, protocol: &str, version: &str) {
        let hello = match self.config.hello.accept(protocol, version) {
            Ok(hello) => hello,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unacceptable connected reply");
                return;
            }
        };

        {
            let mut state = lock(&self.state);
            match *state {
                ConnectionState::Connecting | ConnectionState::TimedOut => {
                    *state = ConnectionState::Connected;
                }
                other => {
                    tracing::warn!(state = %other, "ignoring connected reply");
                    return;
                }
            }
        }

        tracing::info!(version = %hello.version, "connected to host");
        self.fire(
            CONNECTED,
            &json!({ "protocol": hello.protocol, "version": hello.version }),
        );
    }

    fn hello_timed_out(&self) {
        {
            let mut state = lock(&self.state);
            if *state != ConnectionState::Connecting {
                return;
            }
            *state = ConnectionState::TimedOut;
        }
        tracing::warn!(
            timeout_ms = self.config.hello.timeout.as_millis() as u64,
            "no connected reply from host"
        );
        self.fire(CONNECTION_TIMEOUT, &Value::Null);
    }

    fn fire(&self, event: &str, payload: &Value) {
        let handlers = lock(&self.handlers).get(event).cloned().unwrap_or_default();
        if handlers.is_empty() {
            tracing::debug!(event, "no handlers for event");
        }
        for handler in handlers {
            handler(payload);
        }
    }

    fn answer(&self, id: RequestId, event: &str, payload: &Value) {
        let responder = lock(&self.responders).get(event).cloned();
        let reply = match responder {
            Some(responder) => match responder(payload) {
                Ok(payload) => Envelope::Resolve { id, payload },
                Err(reason) => Envelope::Reject { id, reason },
            },
            None => {
                tracing::warn!(id, event, "host request for unhandled event");
                Envelope::Reject {
                    id,
                    reason: format!("no handler for '{event}'"),
                }
            }
        };
        if let Err(err) = self.post(reply) {
            tracing::warn!(id, event, error = %err, "failed to answer host request");
        }
    }

    fn complete(&self, id: RequestId, outcome: std::result::Result<Value, String>) {
        let Some(pending) = lock(&self.pending).remove(&id) else {
            tracing::warn!(id, "dropping answer for unknown request id");
            return;
        };
        let result = outcome.map_err(|reason| ChannelError::Rejected {
            event: pending.event.clone(),
            reason,
        });
        if pending.tx.send(result).is_err() {
            tracing::debug!(id, event = %pending.event, "requester went away before answer");
        }
    }

    fn teardown(&self, reason: &str) {
        let previous = {
            let mut state = lock(&self.state);
            std::mem::replace(&mut *state, ConnectionState::Disconnected)
        };

        let drained: Vec<Pending> = lock(&self.pending).drain().map(|(_, p)| p).collect();
        for pending in drained {
            let _ = pending
                .tx
                .send(Err(ChannelError::Disconnected(reason.to_string())));
        }

        for task in lock(&self.tasks).drain(..) {
            task.abort();
        }

        if previous != ConnectionState::Disconnected {
            tracing::info!(reason, "channel torn down");
            self.fire(DISCONNECTED, &json!({ "reason": reason }));
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        let tasks = self.tasks.get_mut().unwrap_or_else(PoisonError::into_inner);
        for task in tasks.drain(..) {
            task.abort();
        }
    }
}
