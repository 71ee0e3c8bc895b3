//! Exercise content store.
//!
//! Exercises live in a JSON file shaped as `{"exercises": [...]}`. The file is
//! read once at startup; nothing here writes back except `render_exercises`,
//! which the CLI uses to seed a new project.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::types::Exercise;

/// Sample exercises shipped with the workspace
const BUILTIN_EXERCISES: &str = include_str!("../../../config/exercises.json");

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Exercise file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse exercise content: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed test case {field} '{value}': {reason}")]
    MalformedTestCase {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Exercise at position {0} has an empty id")]
    EmptyId(usize),

    #[error("Duplicate exercise id: {0}")]
    DuplicateId(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct ExercisesJson {
    exercises: Vec<Exercise>,
}

/// Parse exercises from JSON text and validate them
pub fn parse_exercises(content: &str) -> Result<Vec<Exercise>, ContentError> {
    let file: ExercisesJson = serde_json::from_str(content)?;
    validate_exercises(&file.exercises)?;
    Ok(file.exercises)
}

/// Load exercises from a content file
pub fn load_exercises(path: &Path) -> Result<Vec<Exercise>, ContentError> {
    if !path.exists() {
        return Err(ContentError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let exercises = parse_exercises(&content)?;

    info!(
        path = %path.display(),
        exercises = exercises.len(),
        "Loaded exercise content"
    );

    Ok(exercises)
}

/// The sample exercises bundled at compile time
pub fn builtin_exercises() -> Result<Vec<Exercise>, ContentError> {
    parse_exercises(BUILTIN_EXERCISES)
}

/// Serialize exercises into the content-store layout
pub fn render_exercises(exercises: &[Exercise]) -> Result<String, ContentError> {
    #[derive(Serialize)]
    struct Borrowed<'a> {
        exercises: &'a [Exercise],
    }

    Ok(serde_json::to_string_pretty(&Borrowed { exercises })?)
}

/// Ids must be non-empty and unique across the catalog.
pub fn validate_exercises(exercises: &[Exercise]) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for (position, exercise) in exercises.iter().enumerate() {
        if exercise.id.trim().is_empty() {
            return Err(ContentError::EmptyId(position));
        }
        if !seen.insert(exercise.id.as_str()) {
            return Err(ContentError::DuplicateId(exercise.id.clone()));
        }
        debug!(
            exercise_id = %exercise.id,
            test_cases = exercise.test_cases.len(),
            hints = exercise.hints.len(),
            "Validated exercise"
        );
    }
    Ok(())
}
