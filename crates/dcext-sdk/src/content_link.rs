use dcext_channel::ClientConnection;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AccessorError;
use crate::events::CONTENT_LINK_GET;

/// Schema tag the host stamps on content link values.
pub const CONTENT_LINK_SCHEMA: &str =
    "http://bigcontent.io/cms/schema/v1/core#/definitions/content-link";

/// `_meta` block of a link value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMeta {
    pub schema: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A content item picked in the host's content browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItemLink {
    #[serde(rename = "_meta")]
    pub meta: LinkMeta,
    pub content_type: String,
    pub id: String,
}

/// Opens the host's content browser.
#[derive(Debug, Clone)]
pub struct ContentLink {
    connection: ClientConnection,
}

impl ContentLink {
    pub fn new(connection: ClientConnection) -> Self {
        Self { connection }
    }

    /// Let the user pick a content item of one of `content_type_ids`.
    ///
    /// Waits as long as the browser stays open; the request timeout does
    /// not apply.
    pub async fn get_content_item<S: AsRef<str>>(
        &self,
        content_type_ids: &[S],
    ) -> Result<ContentItemLink, AccessorError> {
        if content_type_ids.is_empty() {
            return Err(AccessorError::NoContentTypeIds);
        }
        let ids: Vec<&str> = content_type_ids.iter().map(AsRef::as_ref).collect();
        let payload = self
            .connection
            .request_untimed(CONTENT_LINK_GET, Some(json!({ "contentTypeIds": ids })))
            .await?;
        Ok(serde_json::from_value(payload)?)
    }
}
