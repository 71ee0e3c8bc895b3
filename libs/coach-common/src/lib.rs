//! Shared data model, content store and configuration for the coach workspace.

pub mod config;
pub mod content;
pub mod types;

pub use content::ContentError;
pub use types::{
    ActualOutput, Difficulty, EvaluationResult, Exercise, Fault, Submission, TestCase, TestInput,
    TestOutcome,
};
