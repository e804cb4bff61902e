//! Application event names exchanged with the host.

/// Host asks for the current frame height (correlated, host-initiated).
pub const FRAME_HEIGHT_GET: &str = "frame:height:get";
/// Extension reports the height the frame should take.
pub const FRAME_HEIGHT_SET: &str = "frame:height:set";
/// Ask the host to start observing size changes.
pub const FRAME_AUTO_RESIZER_START: &str = "frame:auto-resizer:start";
/// Ask the host to stop observing size changes.
pub const FRAME_AUTO_RESIZER_STOP: &str = "frame:auto-resizer:stop";

/// Fetch the initial execution context.
pub const CONTEXT_GET: &str = "context:get";

/// Generic HTTP-over-channel call.
pub const HTTP_REQUEST: &str = "http:request";

/// Fetch the saved body of the content item being edited.
pub const CONTENT_ITEM_GET: &str = "content-item:get";
/// Read the current value of the controlled field.
pub const FIELD_MODEL_GET: &str = "field:model:get";
/// Store a new value for the controlled field.
pub const FIELD_MODEL_SET: &str = "field:model:set";

/// Open the host's content browser and wait for a pick.
pub const CONTENT_LINK_GET: &str = "content-link:get";
/// Open the host's image browser and wait for a pick.
pub const MEDIA_IMAGE_GET: &str = "media-image:get";
/// Open the host's video browser and wait for a pick.
pub const MEDIA_VIDEO_GET: &str = "media-video:get";
