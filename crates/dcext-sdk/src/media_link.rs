use dcext_channel::ClientConnection;
use serde::{Deserialize, Serialize};

use crate::content_link::LinkMeta;
use crate::error::AccessorError;
use crate::events::{MEDIA_IMAGE_GET, MEDIA_VIDEO_GET};

/// An image or video picked in the host's media browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItemLink {
    #[serde(rename = "_meta")]
    pub meta: LinkMeta,
    pub id: String,
    pub name: String,
    pub endpoint: String,
    pub default_host: String,
}

/// Opens the host's media browser. Both pickers wait for the user.
#[derive(Debug, Clone)]
pub struct MediaLink {
    connection: ClientConnection,
}

impl MediaLink {
    pub fn new(connection: ClientConnection) -> Self {
        Self { connection }
    }

    pub async fn get_image(&self) -> Result<MediaItemLink, AccessorError> {
        self.pick(MEDIA_IMAGE_GET).await
    }

    pub async fn get_video(&self) -> Result<MediaItemLink, AccessorError> {
        self.pick(MEDIA_VIDEO_GET).await
    }

    async fn pick(&self, event: &str) -> Result<MediaItemLink, AccessorError> {
        let payload = self.connection.request_untimed(event, None).await?;
        Ok(serde_json::from_value(payload)?)
    }
}
