//! Read-only exercise catalog shared by every session.

use coach_common::content::{self, ContentError};
use coach_common::{Difficulty, Exercise};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::error::{CoachError, CoachResult};

/// Filter for [`ExerciseCatalog::list`]. The default matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseFilter {
    pub difficulty: Option<Difficulty>,
    pub category: Option<String>,
}

impl ExerciseFilter {
    pub fn difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty: Some(difficulty),
            ..Self::default()
        }
    }

    fn matches(&self, exercise: &Exercise) -> bool {
        self.difficulty.map_or(true, |d| exercise.difficulty == d)
            && self
                .category
                .as_deref()
                .map_or(true, |c| exercise.category == c)
    }
}

#[derive(Debug, Clone)]
pub struct ExerciseCatalog {
    exercises: Vec<Arc<Exercise>>,
}

impl ExerciseCatalog {
    /// Build a catalog, keeping insertion order
    pub fn new(exercises: Vec<Exercise>) -> Result<Self, ContentError> {
        content::validate_exercises(&exercises)?;
        Ok(Self {
            exercises: exercises.into_iter().map(Arc::new).collect(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let catalog = Self::new(content::load_exercises(path)?)?;
        info!(path = %path.display(), exercises = catalog.len(), "Exercise catalog ready");
        Ok(catalog)
    }

    pub fn builtin() -> Result<Self, ContentError> {
        Self::new(content::builtin_exercises()?)
    }

    pub fn list(&self, filter: &ExerciseFilter) -> Vec<Arc<Exercise>> {
        self.exercises
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> CoachResult<Arc<Exercise>> {
        self.exercises
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| CoachError::NotFound(id.to_string()))
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for exercise in &self.exercises {
            if !categories.contains(&exercise.category.as_str()) {
                categories.push(&exercise.category);
            }
        }
        categories
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(exercises: &[Arc<Exercise>]) -> Vec<&str> {
        exercises.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_list_all_keeps_insertion_order() {
        let catalog = ExerciseCatalog::builtin().unwrap();
        let all = catalog.list(&ExerciseFilter::default());
        assert_eq!(ids(&all), vec!["two-sum", "reverse-string", "fibonacci"]);
    }

    #[test]
    fn test_filter_by_difficulty() {
        let catalog = ExerciseCatalog::builtin().unwrap();

        let beginner = catalog.list(&ExerciseFilter::difficulty(Difficulty::Beginner));
        assert_eq!(ids(&beginner), vec!["two-sum", "reverse-string"]);

        let intermediate = catalog.list(&ExerciseFilter::difficulty(Difficulty::Intermediate));
        assert_eq!(ids(&intermediate), vec!["fibonacci"]);

        let advanced = catalog.list(&ExerciseFilter::difficulty(Difficulty::Advanced));
        assert!(advanced.is_empty());
    }

    #[test]
    fn test_filter_by_category() {
        let catalog = ExerciseCatalog::builtin().unwrap();
        let filter = ExerciseFilter {
            difficulty: Some(Difficulty::Beginner),
            category: Some("Strings".to_string()),
        };
        assert_eq!(ids(&catalog.list(&filter)), vec!["reverse-string"]);
    }

    #[test]
    fn test_get_and_not_found() {
        let catalog = ExerciseCatalog::builtin().unwrap();
        assert_eq!(catalog.get("fibonacci").unwrap().title, "Fibonacci Sequence");
        assert_eq!(
            catalog.get("nonexistent-id").unwrap_err(),
            CoachError::NotFound("nonexistent-id".to_string())
        );
    }

    #[test]
    fn test_categories() {
        let catalog = ExerciseCatalog::builtin().unwrap();
        assert_eq!(
            catalog.categories(),
            vec!["Arrays", "Strings", "Dynamic Programming"]
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut exercises = coach_common::content::builtin_exercises().unwrap();
        exercises.push(exercises[0].clone());
        assert!(matches!(
            ExerciseCatalog::new(exercises),
            Err(ContentError::DuplicateId(_))
        ));
    }
}
