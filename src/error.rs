use std::path::PathBuf;

use thiserror::Error;

/// Typed failures surfaced to the caller. Everything else travels as a
/// plain `anyhow` error from the collaborator that produced it.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("missing input file: {0}")]
    MissingInput(PathBuf),

    #[error("invalid threshold specification '{spec}': {reason}")]
    InvalidThresholdSpec { spec: String, reason: String },

    #[error("unsupported region '{0}'")]
    UnsupportedRegion(String),
}
