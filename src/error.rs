use std::path::PathBuf;

use thiserror::Error;

/// Terminal failures of a single `bk` run.
///
/// Lower layers wrap these in `anyhow::Error` with extra context; `main`
/// walks the chain to pick the exit code.
#[derive(Error, Debug)]
pub enum BkError {
    #[error("Cannot enumerate monitors: {0}")]
    PlatformQuery(String),

    #[error("Cannot decode image {}: {reason}", path.display())]
    UnsupportedImageFormat { path: PathBuf, reason: String },

    #[error("Monitor '{monitor}' does not exist (available: {available})")]
    AssignmentMismatch { monitor: String, available: String },

    #[error("Failed to set background via {backend}: {cause}")]
    PlatformApply { backend: String, cause: String },
}

impl BkError {
    pub fn apply(backend: &str, cause: impl Into<String>) -> Self {
        BkError::PlatformApply {
            backend: backend.to_string(),
            cause: cause.into(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            BkError::PlatformQuery(_) => 3,
            BkError::UnsupportedImageFormat { .. } => 4,
            BkError::AssignmentMismatch { .. } => 5,
            BkError::PlatformApply { .. } => 6,
        }
    }
}

/// Exit code for an arbitrary error chain, defaulting to 1.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<BkError>())
        .map(BkError::exit_code)
        .unwrap_or(1)
}
