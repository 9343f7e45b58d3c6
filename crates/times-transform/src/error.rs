//! Error types for pipeline stages.

use thiserror::Error;
use times_model::ModelError;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A stage received tables in a shape it does not handle.
    #[error("stage {stage}: expected {expected}, got {found}")]
    UnexpectedInput {
        stage: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A stage failed.
    #[error("stage {stage} failed: {message}")]
    Stage { stage: String, message: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl TransformError {
    /// Wrap any stage failure message.
    pub fn stage(stage: impl Into<String>, message: impl ToString) -> Self {
        Self::Stage {
            stage: stage.into(),
            message: message.to_string(),
        }
    }

    /// Attach the stage name to errors that do not carry one yet.
    pub(crate) fn in_stage(self, stage: &str) -> Self {
        match self {
            Self::Model(err) => Self::stage(stage, err),
            other => other,
        }
    }
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
