//! Session-level errors.
//!
//! Each of these aborts the whole operation and leaves session state as it was.
//! Per-test-case failures are not errors; they are recorded as
//! [`Fault`](coach_common::Fault)s inside the evaluation result.

use thiserror::Error;

pub type CoachResult<T> = Result<T, CoachError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoachError {
    /// No exercise with this id exists in the catalog
    #[error("Exercise not found: {0}")]
    NotFound(String),

    /// Submission had no code to run
    #[error("Submission is empty")]
    EmptySubmission,

    /// The operation needs a selected exercise
    #[error("No exercise selected")]
    NoExerciseSelected,

    /// Another submission for this session has not finished yet
    #[error("An evaluation is already in progress for this session")]
    EvaluationInProgress,
}
