//! # PRISM
//!
//! The enclosing-application layer over the display bridge. Where
//! `prism_bridge` defines *how* the presenter and the producer exchange
//! state, this crate defines *when*: the per-tick loop that drains
//! gestures, pulls producer state, and takes either the world path or the
//! immersive path.
//!
//! ## Modules
//!
//! - `display`: the application-facing facade over the presenter session
//! - `frame_loop`: the per-tick orchestration and its hook seams
//! - `events`: the bounded, typed gesture queue
//! - `registry`: session ids for platform callback entry points
//! - `config`: TOML startup configuration

pub mod config;
pub mod display;
pub mod events;
pub mod frame_loop;
pub mod registry;

// Re-export commonly used types
pub use config::{ConfigError, PrismConfig};
pub use display::{DisplayDescriptor, EyeParameters, ImmersiveDisplay};
pub use events::{EventQueueConfig, GestureEvent, GestureQueue, GestureSender};
pub use frame_loop::{PresenterLoop, TickHooks, TickOutcome};
pub use registry::{SessionId, SessionRegistry};
