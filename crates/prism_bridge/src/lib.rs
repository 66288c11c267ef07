//! # PRISM Bridge
//!
//! Bidirectional state exchange between two independently scheduled
//! loops: a **presenter** (owns the head-mounted display, issues frame
//! requests) and a **producer** (renders content, fulfills them), through
//! one fixed-layout shared region.
//!
//! The region holds two payload slots, each with its own lock and signal.
//! Each slot has exactly one writer, all cross-boundary reads are
//! whole-struct copies under the lock, and the request/acknowledge
//! handshake is keyed on a monotonically increasing `input_frame_id` that
//! only the presenter advances. The two loops run at unrelated, jittery
//! frame rates; nothing here assumes anything about their scheduling.
//!
//! This crate renders nothing and owns no GPU objects. It is purely a
//! synchronization and data-transfer layer.
//!
//! ## Modules
//!
//! - `region`: the versioned shared block and its scoped slot guards
//! - `presenter`: the requesting session and the frame handshake
//! - `producer`: the fulfilling session
//! - `config`: handshake tuning knobs
//! - `error`: the error taxonomy

pub mod config;
pub mod error;
pub mod presenter;
pub mod producer;
pub mod region;

// Re-export commonly used types
pub use config::HandshakeConfig;
pub use error::{BridgeError, BridgeResult};
pub use presenter::{FrameResult, PresenterSession};
pub use producer::{FrameSubmission, ProducerSession};
pub use region::{BrowserSlot, SharedRegion, Slot, SystemSlot};
