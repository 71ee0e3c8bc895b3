// Runtime configuration for the evaluator and catalog.
// Defaults are overridable through environment variables.

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_TEST_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_MAX_PARALLEL_TESTS: usize = 4;
pub const DEFAULT_CATALOG_PATH: &str = "config/exercises.json";

pub const ENV_TEST_TIMEOUT_MS: &str = "COACH_TEST_TIMEOUT_MS";
pub const ENV_MAX_PARALLEL_TESTS: &str = "COACH_MAX_PARALLEL_TESTS";
pub const ENV_CATALOG_PATH: &str = "COACH_CATALOG_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatorConfig {
    /// Hard limit for a single test case
    pub test_timeout: Duration,
    /// How many test cases of one submission may execute at once
    pub max_parallel_tests: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            test_timeout: Duration::from_millis(DEFAULT_TEST_TIMEOUT_MS),
            max_parallel_tests: DEFAULT_MAX_PARALLEL_TESTS,
        }
    }
}

impl EvaluatorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let test_timeout = parse_or(&lookup, ENV_TEST_TIMEOUT_MS, DEFAULT_TEST_TIMEOUT_MS)
            .max(1);
        let max_parallel_tests =
            parse_or(&lookup, ENV_MAX_PARALLEL_TESTS, defaults.max_parallel_tests).max(1);

        Self {
            test_timeout: Duration::from_millis(test_timeout),
            max_parallel_tests,
        }
    }

    pub fn with_test_timeout(mut self, timeout: Duration) -> Self {
        self.test_timeout = timeout;
        self
    }

    pub fn with_max_parallel_tests(mut self, max: usize) -> Self {
        self.max_parallel_tests = max.max(1);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CATALOG_PATH),
        }
    }
}

impl CatalogConfig {
    pub fn from_env() -> Self {
        match std::env::var(ENV_CATALOG_PATH) {
            Ok(path) if !path.trim().is_empty() => Self {
                path: PathBuf::from(path),
            },
            _ => Self::default(),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(key, value = %raw, default = %default, "Ignoring invalid config value");
                default
            }
        },
        None => default,
    }
}
