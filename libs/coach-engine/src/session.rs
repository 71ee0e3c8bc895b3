//! Session Orchestrator
//!
//! **Responsibility:**
//! Own one user's state (selected exercise, code, hint cursor, last result) and
//! route each operation to the catalog, hint sequencer or evaluator.
//!
//! **Concurrency:**
//! Methods take `&self` so a session can be shared behind an `Arc`. At most one
//! evaluation runs per session; a second `submit` while one is in flight fails
//! with `EvaluationInProgress` instead of queueing. Failed operations leave the
//! state untouched.

use coach_common::{EvaluationResult, Exercise};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::cancel::CancellationToken;
use crate::catalog::ExerciseCatalog;
use crate::error::{CoachError, CoachResult};
use crate::evaluator::Evaluator;
use crate::hints::HintSequencer;

#[derive(Debug)]
struct Selection {
    exercise: Arc<Exercise>,
    hints: HintSequencer,
}

#[derive(Debug, Default)]
struct SessionState {
    selected: Option<Selection>,
    current_code: String,
    last_result: Option<EvaluationResult>,
    completed: BTreeSet<String>,
    /// Bumped on every selection so a result for a replaced exercise is not stored
    generation: u64,
}

/// Read-only view of a session for a presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub selected_exercise_id: Option<String>,
    pub current_code: String,
    pub hint_cursor: Option<usize>,
    pub hints_revealed: bool,
    pub current_hint: Option<String>,
    pub last_result: Option<EvaluationResult>,
    pub completed_exercises: Vec<String>,
    pub evaluating: bool,
}

/// Releases the in-flight flag even if the submit future is dropped mid-way.
struct EvaluationGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> EvaluationGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for EvaluationGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct Session {
    id: Uuid,
    catalog: Arc<ExerciseCatalog>,
    evaluator: Arc<Evaluator>,
    state: Mutex<SessionState>,
    evaluating: AtomicBool,
}

impl Session {
    pub fn new(catalog: Arc<ExerciseCatalog>, evaluator: Arc<Evaluator>) -> Self {
        Self {
            id: Uuid::new_v4(),
            catalog,
            evaluator,
            state: Mutex::new(SessionState::default()),
            evaluating: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Bind an exercise: starter code loaded, hints reset, last result cleared.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub fn select_exercise(&self, id: &str) -> CoachResult<Arc<Exercise>> {
        let exercise = self.catalog.get(id)?;

        let mut state = self.state.lock();
        let hints = match state.selected.take() {
            Some(mut previous) => {
                previous.hints.reset(exercise.clone());
                previous.hints
            }
            None => HintSequencer::new(exercise.clone()),
        };
        state.selected = Some(Selection {
            exercise: exercise.clone(),
            hints,
        });
        state.current_code = exercise.starter_code.clone();
        state.last_result = None;
        state.generation += 1;

        info!(exercise_id = %exercise.id, "Exercise selected");
        Ok(exercise)
    }

    /// Replace the current code. Editing is always allowed.
    pub fn update_code(&self, code: impl Into<String>) {
        self.state.lock().current_code = code.into();
    }

    /// First call reveals the current hint; later calls move to the next one.
    pub fn request_hint(&self) -> CoachResult<Option<String>> {
        let mut state = self.state.lock();
        let selection = state
            .selected
            .as_mut()
            .ok_or(CoachError::NoExerciseSelected)?;

        let hint = if selection.hints.is_revealed() {
            selection.hints.advance()
        } else {
            selection.hints.reveal()
        }
        .map(str::to_string);

        debug!(
            session_id = %self.id,
            exercise_id = %selection.exercise.id,
            cursor = selection.hints.cursor(),
            "Hint requested"
        );
        Ok(hint)
    }

    pub async fn submit(&self) -> CoachResult<EvaluationResult> {
        self.submit_with_cancel(&CancellationToken::never()).await
    }

    #[instrument(skip(self, cancel), fields(session_id = %self.id))]
    pub async fn submit_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> CoachResult<EvaluationResult> {
        let (exercise, code, generation) = {
            let state = self.state.lock();
            let selection = state
                .selected
                .as_ref()
                .ok_or(CoachError::NoExerciseSelected)?;
            (
                selection.exercise.clone(),
                state.current_code.clone(),
                state.generation,
            )
        };

        let _guard = match EvaluationGuard::acquire(&self.evaluating) {
            Some(guard) => guard,
            None => {
                warn!(exercise_id = %exercise.id, "Submission rejected, evaluation in progress");
                return Err(CoachError::EvaluationInProgress);
            }
        };

        let result = self
            .evaluator
            .evaluate_with_cancel(&exercise, &code, cancel)
            .await?;

        let mut state = self.state.lock();
        if result.all_passed {
            state.completed.insert(exercise.id.clone());
        }
        if state.generation == generation {
            state.last_result = Some(result.clone());
        } else {
            debug!(
                exercise_id = %exercise.id,
                "Exercise changed during evaluation, result not stored"
            );
        }

        info!(
            exercise_id = %exercise.id,
            summary = %result.summary(),
            all_passed = result.all_passed,
            "Submission evaluated"
        );
        Ok(result)
    }

    pub fn selected_exercise_id(&self) -> Option<String> {
        self.state
            .lock()
            .selected
            .as_ref()
            .map(|s| s.exercise.id.clone())
    }

    pub fn current_code(&self) -> String {
        self.state.lock().current_code.clone()
    }

    pub fn hint_cursor(&self) -> Option<usize> {
        self.state
            .lock()
            .selected
            .as_ref()
            .map(|s| s.hints.cursor())
    }

    pub fn last_result(&self) -> Option<EvaluationResult> {
        self.state.lock().last_result.clone()
    }

    /// Exercises with at least one fully passing submission, sorted by id
    pub fn completed_exercises(&self) -> Vec<String> {
        self.state.lock().completed.iter().cloned().collect()
    }

    pub fn is_evaluating(&self) -> bool {
        self.evaluating.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock();
        let hints = state.selected.as_ref().map(|s| &s.hints);

        SessionSnapshot {
            session_id: self.id,
            selected_exercise_id: state.selected.as_ref().map(|s| s.exercise.id.clone()),
            current_code: state.current_code.clone(),
            hint_cursor: hints.map(|h| h.cursor()),
            hints_revealed: hints.is_some_and(|h| h.is_revealed()),
            current_hint: hints
                .filter(|h| h.is_revealed())
                .and_then(|h| h.current())
                .map(str::to_string),
            last_result: state.last_result.clone(),
            completed_exercises: state.completed.iter().cloned().collect(),
            evaluating: self.is_evaluating(),
        }
    }
}
