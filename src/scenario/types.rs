use serde::{Deserialize, Serialize};

fn default_tolerance() -> f64 {
    0.1
}

/// Kind-specific payload for a test step
///
/// Payloads stay optional so that steps loaded from external scenario
/// files with missing fields are representable; validation happens at
/// execution time and produces a structured failure, never a panic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepAction {
    /// Click at absolute screen coordinates
    Click {
        #[serde(default)]
        coordinates: Option<(i32, i32)>,
    },

    /// Drag from a start point to an end point (start_x, start_y, end_x, end_y)
    Drag {
        #[serde(default)]
        coordinates: Option<Vec<i32>>,
    },

    /// Type a string as literal keypresses
    Type {
        #[serde(default)]
        text: Option<String>,
    },

    /// Block for a duration in seconds (default 1.0)
    Wait {
        #[serde(default)]
        duration: Option<f64>,
    },

    /// Capture a frame and check it against a verification rule
    Verify {
        #[serde(default)]
        expected_state: Option<String>,
    },

    /// Capture a frame and save it as a timestamped artifact
    Screenshot,
}

impl StepAction {
    /// Stable tag for the step kind, as used in results and reports
    pub fn kind(&self) -> &'static str {
        match self {
            StepAction::Click { .. } => "click",
            StepAction::Drag { .. } => "drag",
            StepAction::Type { .. } => "type",
            StepAction::Wait { .. } => "wait",
            StepAction::Verify { .. } => "verify",
            StepAction::Screenshot => "screenshot",
        }
    }
}

/// One atomic UI action within a scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Name of the step (e.g., "click_establish_base")
    pub name: String,

    /// Kind-specific payload
    #[serde(flatten)]
    pub action: StepAction,

    /// Verification tolerance, reserved for rule-level overrides
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Step {
    pub fn new(name: impl Into<String>, action: StepAction) -> Self {
        Self {
            name: name.into(),
            action,
            tolerance: default_tolerance(),
        }
    }

    pub fn click(name: impl Into<String>, x: i32, y: i32) -> Self {
        Self::new(
            name,
            StepAction::Click {
                coordinates: Some((x, y)),
            },
        )
    }

    pub fn drag(name: impl Into<String>, start: (i32, i32), end: (i32, i32)) -> Self {
        Self::new(
            name,
            StepAction::Drag {
                coordinates: Some(vec![start.0, start.1, end.0, end.1]),
            },
        )
    }

    pub fn typing(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(
            name,
            StepAction::Type {
                text: Some(text.into()),
            },
        )
    }

    pub fn wait(name: impl Into<String>, duration: f64) -> Self {
        Self::new(
            name,
            StepAction::Wait {
                duration: Some(duration),
            },
        )
    }

    pub fn verify(name: impl Into<String>, expected_state: impl Into<String>) -> Self {
        Self::new(
            name,
            StepAction::Verify {
                expected_state: Some(expected_state.into()),
            },
        )
    }

    pub fn screenshot(name: impl Into<String>) -> Self {
        Self::new(name, StepAction::Screenshot)
    }
}

/// A named, ordered list of UI test steps with an expected duration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name, used for registry lookup
    pub name: String,

    /// Description of what this scenario exercises
    pub description: String,

    /// Steps, executed strictly in order
    pub steps: Vec<Step>,

    /// Expected total duration in seconds
    pub expected_duration: f64,

    /// Whether to compute the post-run alignment validation
    #[serde(default)]
    pub post_run_validation: bool,
}
