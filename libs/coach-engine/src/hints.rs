use coach_common::Exercise;
use std::sync::Arc;

/// Cursor over one exercise's ordered hints.
///
/// The cursor never leaves `[0, hints.len() - 1]`. Running off the end is not an
/// error: `advance` simply keeps returning the last hint.
#[derive(Debug, Clone)]
pub struct HintSequencer {
    exercise: Arc<Exercise>,
    cursor: usize,
    revealed: bool,
}

impl HintSequencer {
    pub fn new(exercise: Arc<Exercise>) -> Self {
        Self {
            exercise,
            cursor: 0,
            revealed: false,
        }
    }

    /// Rebind to an exercise: cursor back to 0, hints hidden
    pub fn reset(&mut self, exercise: Arc<Exercise>) {
        self.exercise = exercise;
        self.cursor = 0;
        self.revealed = false;
    }

    pub fn reveal(&mut self) -> Option<&str> {
        self.revealed = true;
        self.current()
    }

    pub fn advance(&mut self) -> Option<&str> {
        self.revealed = true;
        if self.cursor < self.last_index() {
            self.cursor += 1;
        }
        self.current()
    }

    pub fn current(&self) -> Option<&str> {
        self.exercise.hints.get(self.cursor).map(String::as_str)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// True once the cursor sits on the final hint
    pub fn is_exhausted(&self) -> bool {
        self.cursor == self.last_index()
    }

    pub fn exercise_id(&self) -> &str {
        &self.exercise.id
    }

    fn last_index(&self) -> usize {
        self.exercise.hints.len().saturating_sub(1)
    }
}
