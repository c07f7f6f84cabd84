//! Error types.
//!
//! None of these escape a per-frame update: the scene and context recover from them
//! locally. They surface only from configuration parsing, explicit path registration
//! and the host seam.

use thiserror::Error;

use crate::ids::ObjectId;

/// Failures reported by a [`crate::host::SceneHost`] implementation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HostError {
    #[error("unknown object '{0}'")]
    UnknownObject(ObjectId),
    #[error("object '{0}' is detached from its parent")]
    Detached(ObjectId),
    #[error("host rejected the operation: {0}")]
    Rejected(String),
}

/// Structural problems with an [`crate::path::AnimationPath`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PathError {
    #[error("path needs at least 2 anchor points, got {0}")]
    TooFewPoints(usize),
    #[error("expected {expected} segment weights, got {actual}")]
    WeightCountMismatch { expected: usize, actual: usize },
    #[error("expected {expected} segment easings, got {actual}")]
    EasingCountMismatch { expected: usize, actual: usize },
    #[error("expected {expected} bezier handle pairs, got {actual}")]
    HandleCountMismatch { expected: usize, actual: usize },
    #[error("segment weight {index} is negative or not finite ({value})")]
    InvalidWeight { index: usize, value: f32 },
    #[error("segment weights sum to zero")]
    ZeroTotalWeight,
    #[error("path duration must be positive and finite, got {0}")]
    InvalidDuration(f32),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
