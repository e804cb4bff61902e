//! Correlated request/event channel between a UI extension and its host.
//!
//! This is the lowest layer of dcext. Every message crossing the frame
//! boundary is an [`Envelope`]:
//! - `connect` / `connected` for the hello exchange
//! - `emit` for one-way events
//! - `request` / `resolve` / `reject` for correlated calls
//!
//! The actual postMessage plumbing is supplied by the embedder through the
//! [`Transport`] trait. [`ClientConnection`] turns it into `on`, `respond`,
//! `emit` and `request`.

pub mod connection;
pub mod error;
pub mod events;
pub mod hello;
pub mod memory;
pub mod message;
pub mod transport;

pub use connection::{ClientConnection, ConnectionConfig, ConnectionState};
pub use error::{ChannelError, Result};
pub use events::{CONNECTED, CONNECTION_TIMEOUT, DISCONNECTED};
pub use hello::{Hello, HelloConfig};
pub use message::{Envelope, RequestId};
pub use transport::{Endpoint, Transport};
