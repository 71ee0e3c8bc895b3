//! Submission Evaluator - Judging Logic
//!
//! **Core Responsibility:**
//! Run every test case of an exercise through the execution backend and turn the
//! raw outputs into an ordered [`EvaluationResult`].
//!
//! **Critical Properties:**
//! - Exactly one outcome per test case, in declaration order, whatever the
//!   backend does (faults, timeouts, cancellation)
//! - A fault in one test case never stops the others
//! - Single attempt per call, no retries
//!
//! **Comparison Rules:**
//! - Actual output is trimmed and parsed as JSON
//! - Pass iff the parsed value equals the expected value structurally
//!   (`[0,1]` and `[0, 1]` match, `"1"` and `1` do not)
//! - Numbers keep their full literal (`arbitrary_precision`), so integers beyond
//!   64 bits compare exactly, and `100`, `100.0` and `1e2` are three different values
//! - Output that is not valid JSON fails and is kept verbatim

use coach_common::config::EvaluatorConfig;
use coach_common::{ActualOutput, EvaluationResult, Exercise, Submission, TestCase, TestOutcome};
use futures_util::stream::{self, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::cancel::CancellationToken;
use crate::engine::{execute_test, ExecutionBackend, TestExecution};
use crate::error::{CoachError, CoachResult};

/// Judge one raw execution against its test case.
pub fn judge(test_case: &TestCase, execution: TestExecution) -> TestOutcome {
    let (passed, actual) = match execution.result {
        Ok(output) => {
            let passed = matches_expected(&output, &test_case.expected_output);
            (passed, ActualOutput::Output(output))
        }
        Err(fault) => (false, ActualOutput::Fault(fault)),
    };

    TestOutcome {
        index: execution.index,
        description: test_case.description.clone(),
        passed,
        actual,
        duration_ms: execution.duration_ms,
    }
}

fn matches_expected(output: &str, expected: &Value) -> bool {
    match serde_json::from_str::<Value>(output.trim()) {
        Ok(actual) => &actual == expected,
        Err(_) => false,
    }
}

pub struct Evaluator {
    backend: Arc<dyn ExecutionBackend>,
    config: EvaluatorConfig,
}

impl Evaluator {
    pub fn new(backend: Arc<dyn ExecutionBackend>, config: EvaluatorConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub async fn evaluate(
        &self,
        exercise: &Exercise,
        source_code: &str,
    ) -> CoachResult<EvaluationResult> {
        self.evaluate_with_cancel(exercise, source_code, &CancellationToken::never())
            .await
    }

    pub async fn evaluate_with_cancel(
        &self,
        exercise: &Exercise,
        source_code: &str,
        cancel: &CancellationToken,
    ) -> CoachResult<EvaluationResult> {
        let submission = Submission::new(exercise.id.as_str(), source_code);
        self.evaluate_submission(exercise, &submission, cancel).await
    }

    /// Evaluate a prepared submission.
    ///
    /// Up to `max_parallel_tests` test cases execute at once; `buffered` yields
    /// them back in declaration order regardless of completion order.
    #[instrument(
        skip(self, exercise, submission, cancel),
        fields(exercise_id = %exercise.id, submission_id = %submission.id)
    )]
    pub async fn evaluate_submission(
        &self,
        exercise: &Exercise,
        submission: &Submission,
        cancel: &CancellationToken,
    ) -> CoachResult<EvaluationResult> {
        if submission.is_empty() {
            warn!("Rejecting empty submission");
            return Err(CoachError::EmptySubmission);
        }

        let time_limit = self.config.test_timeout;
        let source_code = submission.source_code.as_str();
        let backend = self.backend.as_ref();

        info!(
            test_cases = exercise.test_cases.len(),
            timeout_ms = time_limit.as_millis() as u64,
            max_parallel_tests = self.config.max_parallel_tests,
            source_size = source_code.len(),
            "Evaluating submission"
        );

        let outcomes: Vec<TestOutcome> = stream::iter(exercise.test_cases.iter().enumerate())
            .map(|(index, test_case)| async move {
                let execution =
                    execute_test(backend, index, source_code, &test_case.input, time_limit, cancel)
                        .await;
                judge(test_case, execution)
            })
            .buffered(self.config.max_parallel_tests.max(1))
            .collect()
            .await;

        let result = EvaluationResult::from_outcomes(submission, outcomes);

        info!(
            passed = result.passed_count(),
            total = result.outcomes.len(),
            all_passed = result.all_passed,
            cancelled = cancel.is_cancelled(),
            "Evaluation complete"
        );

        Ok(result)
    }
}
