use relgrade_core::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GradeError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("submission of type \"{found}\" does not match exercise of type \"{expected}\"")]
    SubmissionMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid task: {0}")]
    InvalidTask(#[source] serde_json::Error),

    #[error("invalid submission: {0}")]
    InvalidSubmission(#[source] serde_json::Error),
}
