use dcext_channel::{ClientConnection, Endpoint};
use serde::de::DeserializeOwned;

use crate::content_item::ContentItem;
use crate::content_link::ContentLink;
use crate::context::{ContentType, ContextObject, LocalesModel, Params, StagingEnvironment};
use crate::error::InitError;
use crate::extension::{init, Extension, Session};
use crate::field::Field;
use crate::frame::Frame;
use crate::media_link::MediaLink;
use crate::options::Options;
use crate::users::Users;

/// A content-field extension: controls one field of a content item.
#[derive(Debug, Clone)]
pub struct Sdk<P = Params> {
    session: Session,
    content_item: ContentItem,
    field: Field,
    content_link: ContentLink,
    media_link: MediaLink,
    content_type: ContentType,
    params: P,
    locales: LocalesModel,
    staging_environment: StagingEnvironment,
    visualisation: String,
}

impl<P: DeserializeOwned> Sdk<P> {
    /// Connect to the host and fetch the editing context.
    pub async fn init(endpoint: Endpoint, options: Options) -> Result<Self, InitError> {
        init(endpoint, options).await
    }
}

impl<P: DeserializeOwned> Extension for Sdk<P> {
    type Context = ContextObject<P>;

    fn from_context(session: Session, context: ContextObject<P>) -> Self {
        let connection = session.connection().clone();
        Self {
            content_item: ContentItem::new(connection.clone(), context.content_item_id),
            field: Field::new(connection.clone(), context.field_schema),
            content_link: ContentLink::new(connection.clone()),
            media_link: MediaLink::new(connection),
            content_type: context.content_type,
            params: context.params,
            locales: context.locales,
            staging_environment: context.staging_environment,
            visualisation: context.visualisation,
            session,
        }
    }
}

impl<P> Sdk<P> {
    pub fn connection(&self) -> &ClientConnection {
        self.session.connection()
    }

    /// Height sizing of the hosting frame.
    pub fn frame(&self) -> &Frame {
        self.session.frame()
    }

    pub fn users(&self) -> &Users {
        self.session.users()
    }

    /// The content item being edited.
    pub fn content_item(&self) -> &ContentItem {
        &self.content_item
    }

    /// The field this extension controls.
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Opens the host's content browser.
    pub fn content_link(&self) -> &ContentLink {
        &self.content_link
    }

    /// Opens the host's media browser.
    pub fn media_link(&self) -> &MediaLink {
        &self.media_link
    }

    /// JSON Schema of the content item being edited.
    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    pub fn params(&self) -> &P {
        &self.params
    }

    pub fn locales(&self) -> &LocalesModel {
        &self.locales
    }

    /// Used for accessing staged assets.
    pub fn staging_environment(&self) -> &StagingEnvironment {
        &self.staging_environment
    }

    /// URL of the visualisation.
    pub fn visualisation(&self) -> &str {
        &self.visualisation
    }
}
