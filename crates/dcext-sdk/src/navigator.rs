use std::fmt;
use std::sync::Arc;

use crate::error::NavigationError;

/// Where the host application is navigated to. Stands in for the parent
/// window's location.
pub trait Location: Send + Sync + 'static {
    fn assign(&self, href: &str);
}

/// Location with no window behind it. Navigation is only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedLocation;

impl Location for DetachedLocation {
    fn assign(&self, href: &str) {
        tracing::debug!(href, "no window to navigate");
    }
}

/// Pages of the host application an extension can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    EventsCalendar,
    EventsTimeline,
    EventsList,
    Event { id: &'a str },
    Edition { event_id: &'a str, id: &'a str },
    ContentLibrary,
    ContentItem { id: &'a str },
}

impl Route<'_> {
    fn path(&self) -> String {
        match self {
            Route::EventsCalendar => "/planning/events/calendar".to_string(),
            Route::EventsTimeline => "/planning/events/timeline".to_string(),
            Route::EventsList => "/planning/events/list".to_string(),
            Route::Event { id } => format!("/planning/events/app/event/{id}"),
            Route::Edition { event_id, id } => {
                format!("/planning/events/app/event/{event_id}/edition/{id}")
            }
            Route::ContentLibrary => "/content/authoring/content-library".to_string(),
            Route::ContentItem { id } => format!("/content/authoring/content-item/edit/{id}"),
        }
    }
}

/// Builds hrefs into the host application relative to the dashboard's hub.
///
/// `location_href` looks like `https://app.example/#!/<hub>/dashboard/...`;
/// every route is rooted at `https://app.example/#!/<hub>`.
#[derive(Clone)]
pub struct ApplicationNavigator {
    location_href: String,
    location: Arc<dyn Location>,
}

impl ApplicationNavigator {
    pub fn new(location_href: impl Into<String>, location: Arc<dyn Location>) -> Self {
        Self {
            location_href: location_href.into(),
            location,
        }
    }

    /// Absolute href for `route`, without navigating.
    pub fn href(&self, route: Route<'_>) -> Result<String, NavigationError> {
        Ok(format!("{}{}", self.base_href()?, route.path()))
    }

    /// Navigate the host to `route`. Returns the href that was assigned.
    pub fn open(&self, route: Route<'_>) -> Result<String, NavigationError> {
        let href = self.href(route)?;
        tracing::info!(href = %href, "navigating host application");
        self.location.assign(&href);
        Ok(href)
    }

    fn base_href(&self) -> Result<String, NavigationError> {
        let invalid = || NavigationError(self.location_href.clone());
        let (base, route) = self.location_href.split_once("#!").ok_or_else(invalid)?;
        let hub = route
            .trim_start_matches('/')
            .split('/')
            .next()
            .filter(|hub| !hub.is_empty())
            .ok_or_else(invalid)?;
        Ok(format!("{base}#!/{hub}"))
    }
}

impl fmt::Debug for ApplicationNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplicationNavigator")
            .field("location_href", &self.location_href)
            .finish_non_exhaustive()
    }
}
