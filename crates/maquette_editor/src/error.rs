//! Error types for scene-graph operations.

use crate::scene::ObjectId;

/// Errors raised by scene-graph operations.
///
/// Only caller bugs surface as errors; operations on unknown ids return
/// sentinel values instead, since racing UI dispatch is expected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The configured object capacity has been reached.
    #[error("maximum number of objects ({max}) reached")]
    CapacityExceeded { max: usize },

    /// The referenced object does not exist.
    #[error("object not found: {0}")]
    ObjectNotFound(ObjectId),
}
