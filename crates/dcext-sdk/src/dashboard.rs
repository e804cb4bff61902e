use std::sync::Arc;

use dcext_channel::Endpoint;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::content_link::ContentLink;
use crate::context::Params;
use crate::error::InitError;
use crate::extension::{init, Extension, Session};
use crate::navigator::ApplicationNavigator;
use crate::options::Options;

/// Execution context of a dashboard extension.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardContext<P = Params> {
    pub hub_id: String,
    pub location_href: String,
    pub params: P,
}

/// An extension rendered as a hub dashboard.
#[derive(Debug, Clone)]
pub struct DashboardExtension<P = Params> {
    session: Session,
    hub_id: String,
    location_href: String,
    params: P,
    content_link: ContentLink,
    application_navigator: ApplicationNavigator,
}

impl<P: DeserializeOwned> DashboardExtension<P> {
    pub async fn init(endpoint: Endpoint, options: Options) -> Result<Self, InitError> {
        init(endpoint, options).await
    }
}

impl<P: DeserializeOwned> Extension for DashboardExtension<P> {
    type Context = DashboardContext<P>;

    fn from_context(session: Session, context: DashboardContext<P>) -> Self {
        let content_link = ContentLink::new(session.connection().clone());
        let application_navigator = ApplicationNavigator::new(
            context.location_href.clone(),
            Arc::clone(&session.options().location),
        );
        Self {
            session,
            hub_id: context.hub_id,
            location_href: context.location_href,
            params: context.params,
            content_link,
            application_navigator,
        }
    }
}

impl<P> DashboardExtension<P> {
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Id of the hub instantiating the dashboard.
    pub fn hub_id(&self) -> &str {
        &self.hub_id
    }

    /// Href of the dashboard's parent container.
    pub fn location_href(&self) -> &str {
        &self.location_href
    }

    pub fn params(&self) -> &P {
        &self.params
    }

    /// Opens the host's content browser.
    pub fn content_link(&self) -> &ContentLink {
        &self.content_link
    }

    /// Sends the user to other pages of the host application.
    pub fn application_navigator(&self) -> &ApplicationNavigator {
        &self.application_navigator
    }
}
