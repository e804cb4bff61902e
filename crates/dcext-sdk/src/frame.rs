use std::fmt;
use std::sync::Arc;

use dcext_channel::ClientConnection;
use serde_json::{json, Value};

use crate::error::FrameError;
use crate::events::{
    FRAME_AUTO_RESIZER_START, FRAME_AUTO_RESIZER_STOP, FRAME_HEIGHT_GET, FRAME_HEIGHT_SET,
};

/// Measures the extension's own document.
pub trait Viewport: Send + Sync + 'static {
    /// Height in CSS pixels of the root visible element, `None` when absent.
    fn root_height(&self) -> Option<f64>;
}

/// Viewport with no root element. Always measures 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedViewport;

impl Viewport for DetachedViewport {
    fn root_height(&self) -> Option<f64> {
        None
    }
}

/// Viewport reporting a constant measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedViewport(pub Option<f64>);

impl Viewport for FixedViewport {
    fn root_height(&self) -> Option<f64> {
        self.0
    }
}

/// Clamp to zero and round up to whole pixels.
pub fn normalize_height(height: f64) -> u32 {
    if height <= 0.0 {
        0
    } else {
        height.ceil() as u32
    }
}

fn measure(viewport: &dyn Viewport) -> u32 {
    viewport.root_height().map_or(0, normalize_height)
}

/// Controls the height of the frame hosting the extension.
///
/// Creating a `Frame` registers the answerer for the host's
/// `frame:height:get` request. Auto-resize state lives on the host; this
/// side only asks for it to start or stop.
#[derive(Clone)]
pub struct Frame {
    connection: ClientConnection,
    viewport: Arc<dyn Viewport>,
}

impl Frame {
    pub fn new(connection: ClientConnection, viewport: Arc<dyn Viewport>) -> Self {
        let measured = Arc::clone(&viewport);
        connection.respond(FRAME_HEIGHT_GET, move |_| {
            Ok(Value::from(measure(measured.as_ref())))
        });
        Self {
            connection,
            viewport,
        }
    }

    /// Measured height of the root element, 0 if there is none.
    pub fn get_height(&self) -> u32 {
        measure(self.viewport.as_ref())
    }

    /// Tell the host how tall the frame should be.
    ///
    /// Uses `height` when given, otherwise the measured height. Returns the
    /// value that was sent.
    pub fn set_height(&self, height: Option<f64>) -> Result<u32, FrameError> {
        let height = match height {
            Some(h) if !h.is_finite() => return Err(FrameError::InvalidHeight(h)),
            Some(h) => normalize_height(h),
            None => self.get_height(),
        };
        self.connection.emit(FRAME_HEIGHT_SET, Some(json!(height)))?;
        tracing::debug!(height, "frame height sent");
        Ok(height)
    }

    pub fn start_auto_resizer(&self) -> Result<(), FrameError> {
        self.connection.emit(FRAME_AUTO_RESIZER_START, None)?;
        Ok(())
    }

    pub fn stop_auto_resizer(&self) -> Result<(), FrameError> {
        self.connection.emit(FRAME_AUTO_RESIZER_STOP, None)?;
        Ok(())
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("height", &self.get_height())
            .finish()
    }
}
