//! # Bridge Error Types
//!
//! All errors that can occur in the synchronization core.

use thiserror::Error;

/// Errors that can occur in the synchronization core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The shared region was built against a different layout revision.
    /// Fatal: the region must be rejected, never reinterpreted.
    #[error(
        "shared region layout mismatch: found version {version} ({size} bytes), \
         expected version {expected_version} ({expected_size} bytes)"
    )]
    LayoutMismatch {
        /// Version stamped into the region.
        version: u32,
        /// Byte size stamped into the region.
        size: u32,
        /// Version this build understands.
        expected_version: u32,
        /// Byte size this build expects.
        expected_size: u32,
    },

    /// The producer never acknowledged the outstanding request within the
    /// configured number of wait cycles.
    #[error("producer unresponsive: no matching acknowledgment after {missed_cycles} wait cycles")]
    ProducerUnresponsive {
        /// Consecutive timed-out wait cycles observed.
        missed_cycles: u32,
    },

    /// The producer tried to publish a result for a request that was
    /// already fulfilled, or for one older than the newest fulfilled
    /// request.
    #[error("duplicate submission for input frame {input_frame_id}")]
    DuplicateSubmission {
        /// The offending request identifier.
        input_frame_id: u64,
    },
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;
