//! Extension-side SDK.
//!
//! This is the "just works" layer. [`Sdk::init`] drives the channel through
//! its handshake, fetches the editing context exactly once and hands back a
//! fully populated extension, or one of the [`InitError`] kinds.

pub mod content_item;
pub mod content_link;
pub mod context;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod extension;
pub mod field;
pub mod frame;
pub mod handshake;
pub mod http;
pub mod media_link;
pub mod navigator;
pub mod options;
pub mod sdk;
pub mod users;

#[cfg(test)]
mod testing;

pub use content_item::ContentItem;
pub use content_link::{ContentItemLink, ContentLink, LinkMeta};
pub use context::{ContextObject, Params, StagingEnvironment};
pub use dashboard::{DashboardContext, DashboardExtension};
pub use error::{
    AccessorError, ApiError, ContextError, FrameError, InitError, NavigationError, UsersError,
};
pub use extension::{init, Extension, Session};
pub use field::Field;
pub use frame::{DetachedViewport, FixedViewport, Frame, Viewport};
pub use handshake::{handshake, HandshakeLatch, HandshakeOutcome};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpRequester, HttpResponse};
pub use media_link::{MediaItemLink, MediaLink};
pub use navigator::{ApplicationNavigator, DetachedLocation, Location, Route};
pub use options::Options;
pub use sdk::Sdk;
pub use users::{Permissions, User, Users};
