//! UI extensions talking to their host over a correlated message channel.
//!
//! # Crate Structure
//!
//! - [`channel`]: Envelopes, transport seam and the correlated client connection
//! - [`sdk`]: Handshake, context, frame sizing and identity lookups (behind `sdk` feature)
//! - [`logging`]: `tracing-subscriber` setup for embedders (behind `logging` feature)

/// Re-export channel types.
pub mod channel {
    pub use dcext_channel::*;
}

/// Re-export SDK types (requires `sdk` feature).
#[cfg(feature = "sdk")]
pub mod sdk {
    pub use dcext_sdk::*;
}

#[cfg(feature = "logging")]
pub mod logging;
