//! Exercise catalog, hint sequencing, submission evaluation and per-user sessions.
//!
//! The execution backend is injected as an [`ExecutionBackend`] so real sandboxes
//! and deterministic fakes plug in the same way.

pub mod cancel;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod hints;
pub mod session;

#[cfg(test)]
mod test_support;

pub use cancel::{CancellationSource, CancellationToken};
pub use catalog::{ExerciseCatalog, ExerciseFilter};
pub use engine::ExecutionBackend;
pub use error::{CoachError, CoachResult};
pub use evaluator::Evaluator;
pub use hints::HintSequencer;
pub use session::{Session, SessionSnapshot};
