// Deterministic execution backends for tests.

use async_trait::async_trait;
use coach_common::{Fault, TestInput};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::catalog::{ExerciseCatalog, ExerciseFilter};
use crate::engine::ExecutionBackend;

type RunFn = Box<dyn Fn(&str, &TestInput) -> Result<String, Fault> + Send + Sync>;
type DelayFn = Box<dyn Fn(&TestInput) -> Duration + Send + Sync>;

/// Backend driven by a closure, with an optional per-input delay.
pub struct FnBackend {
    run: RunFn,
    delay: Option<DelayFn>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FnBackend {
    pub fn new<F>(run: F) -> Self
    where
        F: Fn(&str, &TestInput) -> Result<String, Fault> + Send + Sync + 'static,
    {
        Self {
            run: Box::new(run),
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn sleeping<F>(delay: Duration, run: F) -> Self
    where
        F: Fn(&str, &TestInput) -> Result<String, Fault> + Send + Sync + 'static,
    {
        Self::new(run).with_delay(move |_| delay)
    }

    pub fn with_delay<D>(mut self, delay: D) -> Self
    where
        D: Fn(&TestInput) -> Duration + Send + Sync + 'static,
    {
        self.delay = Some(Box::new(delay));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ExecutionBackend for FnBackend {
    async fn run(
        &self,
        source_code: &str,
        input: &TestInput,
        _time_limit: Duration,
    ) -> Result<String, Fault> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlight(&self.in_flight);

        if let Some(delay) = &self.delay {
            tokio::time::sleep(delay(input)).await;
        }
        (self.run)(source_code, input)
    }
}

/// Backend that "knows" every reference solution in a catalog: running a
/// reference solution prints the expected value as pretty JSON with a trailing
/// newline, anything else is a runtime error.
pub struct ReferenceBackend {
    answers: HashMap<(String, String), String>,
}

impl ReferenceBackend {
    pub fn from_catalog(catalog: &ExerciseCatalog) -> Self {
        let mut answers = HashMap::new();
        for exercise in catalog.list(&ExerciseFilter::default()) {
            for tc in &exercise.test_cases {
                answers.insert(
                    (exercise.reference_solution.clone(), tc.input.raw().to_string()),
                    format!("{}\n", serde_json::to_string_pretty(&tc.expected_output).unwrap()),
                );
            }
        }
        Self { answers }
    }
}

#[async_trait]
impl ExecutionBackend for ReferenceBackend {
    async fn run(
        &self,
        source_code: &str,
        input: &TestInput,
        _time_limit: Duration,
    ) -> Result<String, Fault> {
        self.answers
            .get(&(source_code.to_string(), input.raw().to_string()))
            .cloned()
            .ok_or_else(|| Fault::RuntimeError {
                message: "NameError: unknown program".to_string(),
            })
    }
}
