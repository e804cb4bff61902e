use std::sync::Arc;

use dcext_channel::{ClientConnection, Endpoint};
use serde::de::DeserializeOwned;

use crate::context::request_context;
use crate::error::InitError;
use crate::frame::Frame;
use crate::handshake::handshake;
use crate::http::HttpClient;
use crate::options::Options;
use crate::users::Users;

/// Parts every extension kind shares once the channel is up.
#[derive(Debug, Clone)]
pub struct Session {
    connection: ClientConnection,
    frame: Frame,
    users: Users,
    options: Options,
}

impl Session {
    /// The underlying channel. Use it to listen to lifecycle events or to
    /// issue requests the SDK does not wrap.
    pub fn connection(&self) -> &ClientConnection {
        &self.connection
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn users(&self) -> &Users {
        &self.users
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}

/// An extension kind: the context it expects and how it builds itself
/// from that context.
pub trait Extension: Sized {
    type Context: DeserializeOwned;

    fn from_context(session: Session, context: Self::Context) -> Self;
}

/// Connect over `endpoint`, fetch the context once, and build `E`.
///
/// Either every field of `E` is populated or an error is returned; no
/// partially initialized extension is ever handed out.
pub async fn init<E: Extension>(endpoint: Endpoint, options: Options) -> Result<E, InitError> {
    let connection = ClientConnection::new(endpoint, options.connection_config());
    let frame = Frame::new(connection.clone(), Arc::clone(&options.viewport));

    handshake(&connection, options.connection_timeout).await?;

    let context = request_context::<E::Context>(&connection)
        .await
        .map_err(|err| {
            tracing::warn!(error = %err, "context fetch failed");
            InitError::ContextFetch(err)
        })?;
    tracing::info!("extension context received");

    let session = Session {
        users: Users::new(HttpClient::new(connection.clone())),
        connection,
        frame,
        options,
    };
    Ok(E::from_context(session, context))
}
