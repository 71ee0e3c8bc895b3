mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use coach_common::Difficulty;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "coach-cli")]
#[command(about = "Coach CLI - Browse and validate coding exercises", long_about = None)]
struct Cli {
    /// Exercise content file (defaults to $COACH_CATALOG_PATH, then config/exercises.json,
    /// then the bundled samples)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List exercises in catalog order
    List {
        /// Only show this difficulty (beginner, intermediate, advanced)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Print JSON instead of a table
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Show one exercise with its starter code and test cases
    Show {
        /// Exercise id (e.g., two-sum)
        id: String,
    },

    /// Walk through the hints of an exercise
    Hints {
        /// Exercise id
        id: String,

        /// How many hint requests to make
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Load and validate an exercise content file
    Validate,

    /// Write the bundled sample exercises into a new project
    Init {
        /// Project path
        #[arg(short, long, default_value = ".")]
        path: String,

        /// Overwrite an existing exercises.json
        #[arg(long, default_value = "false")]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog_path = cli.catalog.as_deref();

    match cli.command {
        Commands::List {
            difficulty,
            category,
            json,
        } => {
            commands::list_exercises(catalog_path, difficulty, category, json)?;
        }
        Commands::Show { id } => {
            commands::show_exercise(catalog_path, &id)?;
        }
        Commands::Hints { id, count } => {
            commands::walk_hints(catalog_path, &id, count)?;
        }
        Commands::Validate => {
            commands::validate_catalog(catalog_path)?;
        }
        Commands::Init { path, force } => {
            commands::init_project(&path, force).await?;
        }
    }

    Ok(())
}
