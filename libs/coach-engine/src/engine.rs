//! Execution Engine - Abstraction for Code Execution
//!
//! **Core Responsibility:**
//! Run submitted source code against one test input and hand back raw output.
//!
//! **Architectural Boundary:**
//! - A backend knows HOW to execute (sandbox, interpreter, remote service)
//! - A backend does NOT know expected outputs
//! - A backend does NOT decide pass/fail
//!
//! Sandboxing, language runtime selection and resource limiting belong to the
//! backend. This module only enforces the per-test hard timeout and cancellation
//! on top of whatever backend is injected.

use async_trait::async_trait;
use coach_common::{Fault, TestInput};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cancel::CancellationToken;

/// Something that runs code and returns output or a fault.
///
/// Each call gets its own borrowed, immutable inputs. Implementations must not
/// carry mutable state from one call into the next.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Execute `source_code` with `input` as its argument list.
    ///
    /// `time_limit` is advisory for the backend; the engine enforces it
    /// independently.
    async fn run(
        &self,
        source_code: &str,
        input: &TestInput,
        time_limit: Duration,
    ) -> Result<String, Fault>;
}

/// Raw result of running a single test case
#[derive(Debug, Clone, PartialEq)]
pub struct TestExecution {
    pub index: usize,
    pub result: Result<String, Fault>,
    pub duration_ms: u64,
}

/// Run one test case under a hard timeout, racing cancellation.
///
/// A test that has not started when cancellation arrives is never sent to the
/// backend. An in-flight backend call is dropped on cancellation.
pub async fn execute_test(
    backend: &dyn ExecutionBackend,
    index: usize,
    source_code: &str,
    input: &TestInput,
    time_limit: Duration,
    cancel: &CancellationToken,
) -> TestExecution {
    if cancel.is_cancelled() {
        debug!(test_index = index, "Skipping test case, submission cancelled");
        return TestExecution {
            index,
            result: Err(Fault::Cancelled),
            duration_ms: 0,
        };
    }

    let start = Instant::now();
    let run = tokio::time::timeout(time_limit, backend.run(source_code, input, time_limit));

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Fault::Cancelled),
        outcome = run => match outcome {
            Ok(result) => result,
            Err(_elapsed) => {
                warn!(
                    test_index = index,
                    limit_ms = time_limit.as_millis() as u64,
                    "Execution timed out"
                );
                Err(Fault::Timeout {
                    limit_ms: time_limit.as_millis() as u64,
                })
            }
        },
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    debug!(test_index = index, duration_ms, ok = result.is_ok(), "Test case executed");

    TestExecution {
        index,
        result,
        duration_ms,
    }
}
