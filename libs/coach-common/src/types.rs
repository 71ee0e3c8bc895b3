use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::content::ContentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!(
                "unknown difficulty '{}' (expected beginner, intermediate or advanced)",
                other
            )),
        }
    }
}

/// Parsed argument list of a test case.
///
/// The serialized form is a comma-separated list of JSON values, e.g.
/// `[2,7,11,15], 9`. The raw text is kept for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TestInput {
    raw: String,
    args: Vec<Value>,
}

impl TestInput {
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let args: Vec<Value> = serde_json::from_str(&format!("[{}]", raw))?;
        Ok(Self {
            raw: raw.to_string(),
            args,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

/// Content-store shape of a test case: both sides as serialized text.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawTestCase {
    input: String,
    #[serde(alias = "expected")]
    expected_output: String,
    #[serde(default)]
    description: String,
}

/// One input/expected-output pair.
///
/// Input and expected output are parsed when the test case is built, so a
/// malformed test case never reaches evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTestCase", into = "RawTestCase")]
pub struct TestCase {
    pub input: TestInput,
    pub expected_output: Value,
    expected_raw: String,
    pub description: String,
}

impl TestCase {
    pub fn new(input: &str, expected_output: &str, description: &str) -> Result<Self, ContentError> {
        let parsed_input = TestInput::parse(input).map_err(|e| ContentError::MalformedTestCase {
            field: "input",
            value: input.to_string(),
            reason: e.to_string(),
        })?;
        let expected: Value =
            serde_json::from_str(expected_output).map_err(|e| ContentError::MalformedTestCase {
                field: "expected_output",
                value: expected_output.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            input: parsed_input,
            expected_output: expected,
            expected_raw: expected_output.to_string(),
            description: description.to_string(),
        })
    }

    /// Expected output exactly as written in the content store
    pub fn expected_raw(&self) -> &str {
        &self.expected_raw
    }
}

impl TryFrom<RawTestCase> for TestCase {
    type Error = ContentError;

    fn try_from(raw: RawTestCase) -> Result<Self, Self::Error> {
        TestCase::new(&raw.input, &raw.expected_output, &raw.description)
    }
}

impl From<TestCase> for RawTestCase {
    fn from(tc: TestCase) -> Self {
        RawTestCase {
            input: tc.input.raw,
            expected_output: tc.expected_raw,
            description: tc.description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub title: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub description: String,
    pub starter_code: String,
    pub test_cases: Vec<TestCase>,
    #[serde(default)]
    pub hints: Vec<String>,
    #[serde(alias = "solution")]
    pub reference_solution: String,
}

/// One attempt at solving an exercise. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub exercise_id: String,
    pub source_code: String,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(exercise_id: impl Into<String>, source_code: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            exercise_id: exercise_id.into(),
            source_code: source_code.into(),
            submitted_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.source_code.trim().is_empty()
    }
}

/// Per-test-case execution failure. Recorded in the outcome, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fault {
    SyntaxError { message: String },
    RuntimeError { message: String },
    Timeout { limit_ms: u64 },
    ResourceLimitExceeded { message: String },
    Cancelled,
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum FaultKind {
    SyntaxError,
    RuntimeError,
    Timeout,
    ResourceLimitExceeded,
    Cancelled,
}

/// Flat wire form of a [`Fault`].
///
/// Internally tagged enums buffer their fields, and buffered numbers do not
/// survive `arbitrary_precision`, so `limit_ms` is read through a plain struct.
#[derive(Deserialize)]
struct FaultRepr {
    kind: FaultKind,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    limit_ms: Option<u64>,
}

impl<'de> Deserialize<'de> for Fault {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let repr = FaultRepr::deserialize(deserializer)?;
        let message = || repr.message.clone().ok_or_else(|| D::Error::missing_field("message"));

        Ok(match repr.kind {
            FaultKind::SyntaxError => Fault::SyntaxError { message: message()? },
            FaultKind::RuntimeError => Fault::RuntimeError { message: message()? },
            FaultKind::ResourceLimitExceeded => Fault::ResourceLimitExceeded { message: message()? },
            FaultKind::Timeout => Fault::Timeout {
                limit_ms: repr.limit_ms.ok_or_else(|| D::Error::missing_field("limit_ms"))?,
            },
            FaultKind::Cancelled => Fault::Cancelled,
        })
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::SyntaxError { message } => write!(f, "syntax error: {}", message),
            Fault::RuntimeError { message } => write!(f, "runtime error: {}", message),
            Fault::Timeout { limit_ms } => write!(f, "timed out after {}ms", limit_ms),
            Fault::ResourceLimitExceeded { message } => {
                write!(f, "resource limit exceeded: {}", message)
            }
            Fault::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// What a test case actually produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActualOutput {
    Output(String),
    Fault(Fault),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub index: usize,
    pub description: String,
    pub passed: bool,
    pub actual: ActualOutput,
    pub duration_ms: u64,
}

impl TestOutcome {
    pub fn fault(&self) -> Option<&Fault> {
        match &self.actual {
            ActualOutput::Fault(fault) => Some(fault),
            ActualOutput::Output(_) => None,
        }
    }

    pub fn output(&self) -> Option<&str> {
        match &self.actual {
            ActualOutput::Output(out) => Some(out),
            ActualOutput::Fault(_) => None,
        }
    }
}

/// Outcome of evaluating one submission.
///
/// `outcomes` holds exactly one entry per test case, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub submission_id: Uuid,
    pub exercise_id: String,
    pub submitted_at: DateTime<Utc>,
    pub outcomes: Vec<TestOutcome>,
    pub all_passed: bool,
}

impl EvaluationResult {
    pub fn from_outcomes(submission: &Submission, outcomes: Vec<TestOutcome>) -> Self {
        let all_passed = outcomes.iter().all(|o| o.passed);
        Self {
            submission_id: submission.id,
            exercise_id: submission.exercise_id.clone(),
            submitted_at: submission.submitted_at,
            outcomes,
            all_passed,
        }
    }

    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn summary(&self) -> String {
        format!("{}/{} tests passed", self.passed_count(), self.outcomes.len())
    }
}
