//! Error types for the collaborators around the simulation
//!
//! The simulation core itself is total and never returns errors.

use thiserror::Error;

/// Failures from the hand tracking collaborator
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrackingError {
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),
    #[error("failed to load hand detection model: {0}")]
    ModelLoad(String),
    #[error("hand detection failed: {0}")]
    Detection(String),
    #[error("hand tracking not initialized")]
    NotInitialized,
}

/// Failures from the key-value persistence collaborator
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("failed to read '{key}': {reason}")]
    Read { key: String, reason: String },
    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },
    #[error("stored value for '{key}' is malformed: {reason}")]
    Parse { key: String, reason: String },
}

/// Failures loading a game configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
