pub mod registry;
pub mod types;

pub use registry::{builtin_scenarios, find_scenario, scenario_summaries};
pub use types::{Scenario, Step, StepAction};

use std::path::Path;

/// Result type for scenario loading
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Errors raised while loading external scenario files
#[derive(Debug)]
pub enum ScenarioError {
    /// A step carries a kind string the executor does not dispatch
    UnsupportedStepKind(String),

    /// Malformed scenario JSON
    Parse(serde_json::Error),

    /// I/O error
    Io(std::io::Error),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::UnsupportedStepKind(kind) => {
                write!(f, "Unsupported step kind: {}", kind)
            }
            ScenarioError::Parse(err) => write!(f, "Parse error: {}", err),
            ScenarioError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::UnsupportedStepKind(_) => None,
            ScenarioError::Parse(err) => Some(err),
            ScenarioError::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ScenarioError {
    fn from(err: std::io::Error) -> Self {
        ScenarioError::Io(err)
    }
}

impl From<serde_json::Error> for ScenarioError {
    fn from(err: serde_json::Error) -> Self {
        ScenarioError::Parse(err)
    }
}

const KNOWN_KINDS: [&str; 6] = ["click", "drag", "type", "wait", "verify", "screenshot"];

/// Load a scenario definition from a JSON file
///
/// Step kinds are checked up front so an unknown kind surfaces as
/// `UnsupportedStepKind` rather than a generic parse error.
pub fn load_scenario_file(path: impl AsRef<Path>) -> ScenarioResult<Scenario> {
    let data = std::fs::read_to_string(path)?;
    load_scenario_json(&data)
}

/// Load a scenario definition from a JSON string
pub fn load_scenario_json(data: &str) -> ScenarioResult<Scenario> {
    let value: serde_json::Value = serde_json::from_str(data)?;

    if let Some(steps) = value.get("steps").and_then(|s| s.as_array()) {
        for step in steps {
            if let Some(kind) = step.get("kind").and_then(|k| k.as_str()) {
                if !KNOWN_KINDS.contains(&kind) {
                    return Err(ScenarioError::UnsupportedStepKind(kind.to_string()));
                }
            }
        }
    }

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_scenario_json() {
        let json = r#"{
            "name": "smoke",
            "description": "Minimal smoke scenario",
            "steps": [
                {"name": "open", "kind": "click", "coordinates": [10, 10]},
                {"name": "settle", "kind": "wait", "duration": 0.5},
                {"name": "check", "kind": "verify", "expected_state": "gps_mode_active"}
            ],
            "expected_duration": 3.0
        }"#;

        let scenario = load_scenario_json(json).unwrap();
        assert_eq!(scenario.name, "smoke");
        assert_eq!(scenario.steps.len(), 3);
        assert!(!scenario.post_run_validation);
    }

    #[test]
    fn test_load_scenario_unknown_kind() {
        let json = r#"{
            "name": "bad",
            "description": "Carries an unknown step kind",
            "steps": [{"name": "hover", "kind": "hover", "coordinates": [10, 10]}],
            "expected_duration": 1.0
        }"#;

        match load_scenario_json(json) {
            Err(ScenarioError::UnsupportedStepKind(kind)) => assert_eq!(kind, "hover"),
            other => panic!("expected UnsupportedStepKind, got {:?}", other),
        }
    }
}
