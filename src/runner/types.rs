//! Types for scenario run results.

use serde::Serialize;
use std::path::PathBuf;

use crate::score::AlignmentReport;
use crate::verify::Verification;

/// Step-level failure taxonomy
///
/// Every variant is recovered into a failed `StepResult`; nothing here
/// aborts a run beyond the fail-fast stop.
#[derive(Debug, Clone)]
pub enum StepError {
    /// A required step field is absent
    MissingInput(String),

    /// A step field is malformed (e.g., wrong coordinate count)
    InvalidInput(String),

    /// A step kind the executor does not dispatch
    UnsupportedStepKind(String),

    /// The input/capture collaborator raised
    Collaborator(String),

    /// Artifact I/O failed (e.g., writing a screenshot)
    Io(String),
}

impl std::fmt::Display for StepError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepError::MissingInput(msg) => write!(f, "Missing input: {}", msg),
            StepError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            StepError::UnsupportedStepKind(kind) => {
                write!(f, "Unsupported step kind: {}", kind)
            }
            StepError::Collaborator(msg) => write!(f, "Collaborator failure: {}", msg),
            StepError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for StepError {}

/// Kind-specific payload recorded for an executed step
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StepDetail {
    Empty {},
    Click { coordinates: (i32, i32) },
    Drag { coordinates: Vec<i32> },
    Type { text: String },
    Wait { duration: f64 },
    Verify { verification: Verification },
    Screenshot { screenshot_path: PathBuf },
}

/// Result of a single executed step
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    /// Name of the step that produced this result
    pub step_name: String,

    /// Step kind tag ("click", "wait", ...)
    pub kind: String,

    /// Whether the step succeeded
    pub success: bool,

    /// Failure detail, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Kind-specific payload
    #[serde(flatten)]
    pub detail: StepDetail,
}

impl StepResult {
    /// Successful result with a payload
    pub fn ok(step_name: &str, kind: &str, detail: StepDetail) -> Self {
        Self {
            step_name: step_name.to_string(),
            kind: kind.to_string(),
            success: true,
            error: None,
            detail,
        }
    }

    /// Failed result carrying the step error
    pub fn failed(step_name: &str, kind: &str, error: &StepError) -> Self {
        Self {
            step_name: step_name.to_string(),
            kind: kind.to_string(),
            success: false,
            error: Some(error.to_string()),
            detail: StepDetail::Empty {},
        }
    }

    /// Result of a verify step; success mirrors the verification verdict
    pub fn verified(step_name: &str, verification: Verification) -> Self {
        Self {
            step_name: step_name.to_string(),
            kind: "verify".to_string(),
            success: verification.verified,
            error: verification.error.clone(),
            detail: StepDetail::Verify { verification },
        }
    }
}

/// Result of a complete scenario run
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// Whether every executed step succeeded
    pub success: bool,

    /// Per-step results, truncated at the first failure
    pub step_results: Vec<StepResult>,

    /// Paths of screenshots captured during the run
    pub screenshots: Vec<PathBuf>,
}

/// Timing-derived metrics for a run
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceMetrics {
    /// Wall-clock execution time in seconds
    pub execution_time: f64,

    /// The scenario's expected duration in seconds
    pub expected_duration: f64,

    /// expected / actual; 0.0 when actual is 0
    pub efficiency_ratio: f64,

    /// Number of steps that produced a result
    pub steps_completed: usize,

    /// Number of steps in the scenario
    pub steps_total: usize,
}

impl PerformanceMetrics {
    pub fn new(
        execution_time: f64,
        expected_duration: f64,
        steps_completed: usize,
        steps_total: usize,
    ) -> Self {
        Self {
            execution_time,
            expected_duration,
            efficiency_ratio: efficiency_ratio(expected_duration, execution_time),
            steps_completed,
            steps_total,
        }
    }
}

/// expected / actual, with a zero actual mapping to 0.0
pub fn efficiency_ratio(expected: f64, actual: f64) -> f64 {
    if actual > 0.0 { expected / actual } else { 0.0 }
}

/// Full report for a scenario run
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// Scenario name
    pub scenario: String,

    /// Whether the run passed end to end
    pub passed: bool,

    /// Run-level failure detail (e.g., collaborator unavailable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Per-step outcomes and captured artifacts
    pub run: RunResult,

    /// Timing-derived metrics
    pub performance: PerformanceMetrics,

    /// Post-run validation, when the scenario enables it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<AlignmentReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_efficiency_ratio() {
        assert_eq!(efficiency_ratio(15.0, 0.0), 0.0);
        assert_eq!(efficiency_ratio(15.0, 30.0), 0.5);
        assert_eq!(efficiency_ratio(10.0, 5.0), 2.0);
        assert!(efficiency_ratio(0.0, 0.0) >= 0.0);
    }

    #[test]
    fn test_step_result_serializes_flat() {
        let result = StepResult::ok(
            "open_panel",
            "click",
            StepDetail::Click {
                coordinates: (100, 200),
            },
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["step_name"], "open_panel");
        assert_eq!(json["success"], true);
        assert_eq!(json["coordinates"][0], 100);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failed_step_result_carries_error() {
        let err = StepError::MissingInput("no coordinates provided for click".to_string());
        let result = StepResult::failed("broken", "click", &err);
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Missing input: no coordinates provided for click")
        );
    }
}
