use dcext_channel::ClientConnection;
use serde::de::DeserializeOwned;

use crate::error::AccessorError;
use crate::events::CONTENT_ITEM_GET;

/// The content item being edited.
#[derive(Debug, Clone)]
pub struct ContentItem {
    connection: ClientConnection,
    id: String,
}

impl ContentItem {
    pub fn new(connection: ClientConnection, id: impl Into<String>) -> Self {
        Self {
            connection,
            id: id.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current saved body of the content item.
    pub async fn get_value<T: DeserializeOwned>(&self) -> Result<T, AccessorError> {
        let payload = self.connection.request(CONTENT_ITEM_GET, None).await?;
        Ok(serde_json::from_value(payload)?)
    }
}
