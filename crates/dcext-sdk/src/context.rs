use dcext_channel::ClientConnection;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ContextError;
use crate::events::CONTEXT_GET;

/// JSON Schema of the content item being edited. Passed through untouched.
pub type ContentType = Value;

/// JSON Schema of the field under the extension's control.
pub type FieldSchema = Value;

/// Locales available in the hub. Passed through untouched.
pub type LocalesModel = Value;

/// Where staged assets are served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingEnvironment {
    pub domain: String,
    pub src: String,
}

/// Default extension parameters: per-instance and per-installation bags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Params {
    #[serde(default)]
    pub instance: Value,
    #[serde(default)]
    pub installation: Value,
}

/// Execution context of a content-field extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextObject<P = Params> {
    pub content_item_id: String,
    pub content_type: ContentType,
    pub field_schema: FieldSchema,
    pub params: P,
    pub locales: LocalesModel,
    pub staging_environment: StagingEnvironment,
    #[serde(default)]
    pub visualisation: String,
}

/// Issue the single `context:get` request and decode the answer.
pub async fn request_context<C: DeserializeOwned>(
    connection: &ClientConnection,
) -> Result<C, ContextError> {
    let payload = connection.request(CONTEXT_GET, None).await?;
    Ok(serde_json::from_value(payload)?)
}
