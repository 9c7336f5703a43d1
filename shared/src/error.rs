use thiserror::Error;

use crate::geometry::GeometryError;

/// Everything that can go wrong while collecting a submission.
///
/// None of these are fatal: the widget reports [`SurveyError::user_message`]
/// and stays usable.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SurveyError {
    #[error("click at ({x}, {y}) is outside the triangle")]
    OutOfBounds { x: f64, y: f64 },

    #[error("no point selected")]
    NoSelection,

    #[error("a response has already been recorded for period {0}")]
    AlreadySubmitted(String),

    #[error("a submission is already in flight")]
    SubmissionInProgress,

    #[error("no submission is in flight")]
    NotSubmitting,

    #[error("record store rejected the response: {0}")]
    InsertRejected(String),

    #[error("unexpected error while inserting the response: {0}")]
    InsertFailed(String),

    #[error("guard store error: {0}")]
    GuardStore(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl SurveyError {
    /// Status text shown under the triangle
    pub fn user_message(&self) -> &'static str {
        match self {
            SurveyError::OutOfBounds { .. } => {
                "Click inside the triangle. Your click was outside the valid region."
            }
            SurveyError::NoSelection => {
                "Please click inside the triangle to select a point before submitting."
            }
            SurveyError::AlreadySubmitted(_) => {
                "You have already submitted for this year (one submission allowed)."
            }
            SurveyError::SubmissionInProgress => "Saving...",
            SurveyError::InsertRejected(_) => "Error saving to database. See console for details.",
            SurveyError::InsertFailed(_)
            | SurveyError::NotSubmitting
            | SurveyError::GuardStore(_)
            | SurveyError::Geometry(_) => "Unexpected error while saving.",
        }
    }
}
