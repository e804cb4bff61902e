use dcext_channel::ClientConnection;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::context::FieldSchema;
use crate::error::AccessorError;
use crate::events::{FIELD_MODEL_GET, FIELD_MODEL_SET};

/// The field under the extension's control.
#[derive(Debug, Clone)]
pub struct Field {
    connection: ClientConnection,
    schema: FieldSchema,
}

impl Field {
    pub fn new(connection: ClientConnection, schema: FieldSchema) -> Self {
        Self { connection, schema }
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub async fn get_value<T: DeserializeOwned>(&self) -> Result<T, AccessorError> {
        let payload = self.connection.request(FIELD_MODEL_GET, None).await?;
        Ok(serde_json::from_value(payload)?)
    }

    /// Store a new field value. Returns the host's answer, typically a list
    /// of validation errors.
    pub async fn set_value<T: Serialize>(&self, value: &T) -> Result<Value, AccessorError> {
        let payload = serde_json::to_value(value)?;
        Ok(self
            .connection
            .request(FIELD_MODEL_SET, Some(payload))
            .await?)
    }
}
