// CLI commands for browsing and maintaining exercise content
use anyhow::{bail, Context, Result};
use coach_common::config::CatalogConfig;
use coach_common::content;
use coach_common::Difficulty;
use coach_engine::{ExerciseCatalog, ExerciseFilter, HintSequencer};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Resolve the catalog: explicit path, then configured path, then bundled samples
fn load_catalog(path: Option<&Path>) -> Result<ExerciseCatalog> {
    if let Some(path) = path {
        return ExerciseCatalog::load(path)
            .with_context(|| format!("Failed to load exercises from {}", path.display()));
    }

    let config = CatalogConfig::from_env();
    if config.path.exists() {
        return ExerciseCatalog::load(&config.path)
            .with_context(|| format!("Failed to load exercises from {}", config.path.display()));
    }

    info!(
        path = %config.path.display(),
        "No exercise file found, using bundled samples"
    );
    ExerciseCatalog::builtin().context("Failed to load bundled exercises")
}

/// List exercises, optionally filtered
pub fn list_exercises(
    catalog_path: Option<&Path>,
    difficulty: Option<Difficulty>,
    category: Option<String>,
    json: bool,
) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let filter = ExerciseFilter {
        difficulty,
        category,
    };
    let exercises = catalog.list(&filter);

    if json {
        let exercises: Vec<&coach_common::Exercise> = exercises.iter().map(|e| &**e).collect();
        println!("{}", serde_json::to_string_pretty(&exercises)?);
        return Ok(());
    }

    if exercises.is_empty() {
        println!("No exercises match the filter");
        return Ok(());
    }

    println!("{:<20} {:<28} {:<14} {}", "ID", "TITLE", "DIFFICULTY", "CATEGORY");
    for exercise in &exercises {
        println!(
            "{:<20} {:<28} {:<14} {}",
            exercise.id, exercise.title, exercise.difficulty, exercise.category
        );
    }
    println!("\n{} of {} exercises", exercises.len(), catalog.len());

    Ok(())
}

/// Print one exercise in full
pub fn show_exercise(catalog_path: Option<&Path>, id: &str) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let exercise = catalog.get(id)?;

    println!("{} [{}] - {}", exercise.title, exercise.difficulty, exercise.category);
    println!();
    println!("{}", exercise.description);
    println!();
    println!("Starter code:");
    for line in exercise.starter_code.lines() {
        println!("    {}", line);
    }
    println!();
    println!("Test cases:");
    for (idx, tc) in exercise.test_cases.iter().enumerate() {
        println!("  {}. {}", idx + 1, tc.description);
        println!("     Input:    {}", tc.input.raw());
        println!("     Expected: {}", tc.expected_raw());
    }
    println!();
    println!("{} hint(s) available", exercise.hints.len());

    Ok(())
}

/// Reveal hints one request at a time, the way a session would
pub fn walk_hints(catalog_path: Option<&Path>, id: &str, count: usize) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let exercise = catalog.get(id)?;

    if exercise.hints.is_empty() {
        println!("{} has no hints", exercise.id);
        return Ok(());
    }

    let mut hints = HintSequencer::new(exercise);
    for request in 0..count {
        let hint = if request == 0 {
            hints.reveal()
        } else {
            hints.advance()
        }
        .map(str::to_string);
        if let Some(hint) = hint {
            println!("Hint {}: {}", hints.cursor() + 1, hint);
        }
        if hints.is_exhausted() {
            if request + 1 < count {
                println!("(no further hints)");
            }
            break;
        }
    }

    Ok(())
}

/// Load and sanity-check a content file
pub fn validate_catalog(catalog_path: Option<&Path>) -> Result<()> {
    let catalog = load_catalog(catalog_path)?;
    let exercises = catalog.list(&ExerciseFilter::default());

    let mut warnings = 0;
    for exercise in &exercises {
        if exercise.test_cases.is_empty() {
            warn!(exercise_id = %exercise.id, "Exercise has no test cases");
            println!("⚠ {}: no test cases", exercise.id);
            warnings += 1;
        }
        if exercise.hints.is_empty() {
            println!("⚠ {}: no hints", exercise.id);
            warnings += 1;
        }
        if exercise.reference_solution.trim().is_empty() {
            println!("⚠ {}: empty reference solution", exercise.id);
            warnings += 1;
        }
    }

    let test_cases: usize = exercises.iter().map(|e| e.test_cases.len()).sum();
    println!(
        "✅ {} exercises, {} test cases, {} categories",
        catalog.len(),
        test_cases,
        catalog.categories().len()
    );
    if warnings > 0 {
        println!("{} warning(s)", warnings);
    }

    Ok(())
}

/// Create config/exercises.json seeded with the bundled samples
pub async fn init_project(path: &str, force: bool) -> Result<()> {
    println!("🚀 Initializing exercise content at: {}", path);

    let config_dir = Path::new(path).join("config");
    fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create directory: {}", config_dir.display()))?;

    let exercises_path = config_dir.join("exercises.json");
    if exercises_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            exercises_path.display()
        );
    }

    let exercises = content::builtin_exercises().context("Failed to load bundled exercises")?;
    let rendered = content::render_exercises(&exercises)?;
    fs::write(&exercises_path, rendered)
        .with_context(|| format!("Failed to write {}", exercises_path.display()))?;

    println!("  ✅ Created: {}", exercises_path.display());
    println!("\n📋 Next steps:");
    println!("  1. Edit config/exercises.json to add your own exercises");
    println!("  2. Check it: coach-cli --catalog {} validate", exercises_path.display());

    Ok(())
}
