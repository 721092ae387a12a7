//! Step dispatch.
//!
//! Each step produces exactly one `StepResult`, synchronously. Input
//! validation happens before any collaborator call: a click with missing
//! coordinates never reaches the backend.

use std::thread;
use std::time::Duration;

use crate::artifacts::RunDir;
use crate::backend::UiBackend;
use crate::scenario::{Step, StepAction};
use crate::verify::verify_state;

use super::types::{StepDetail, StepError, StepResult};
use super::RunnerOptions;

pub(crate) struct StepExecutor<'a> {
    backend: &'a mut dyn UiBackend,
    options: &'a RunnerOptions,
    run_dir: &'a RunDir,
}

impl<'a> StepExecutor<'a> {
    pub(crate) fn new(
        backend: &'a mut dyn UiBackend,
        options: &'a RunnerOptions,
        run_dir: &'a RunDir,
    ) -> Self {
        Self {
            backend,
            options,
            run_dir,
        }
    }

    /// Execute one step and produce its result
    pub(crate) fn execute(&mut self, step: &Step) -> StepResult {
        let kind = step.action.kind();
        match self.dispatch(step) {
            Ok(detail) => {
                if let StepDetail::Verify { verification } = detail {
                    StepResult::verified(&step.name, verification)
                } else {
                    StepResult::ok(&step.name, kind, detail)
                }
            }
            Err(err) => StepResult::failed(&step.name, kind, &err),
        }
    }

    fn dispatch(&mut self, step: &Step) -> Result<StepDetail, StepError> {
        match &step.action {
            StepAction::Click { coordinates } => self.click(*coordinates),
            StepAction::Drag { coordinates } => self.drag(coordinates.as_deref()),
            StepAction::Type { text } => self.type_text(text.as_deref()),
            StepAction::Wait { duration } => Ok(self.wait(*duration)),
            StepAction::Verify { expected_state } => self.verify(expected_state.as_deref()),
            StepAction::Screenshot => self.screenshot(&step.name),
        }
    }

    fn click(&mut self, coordinates: Option<(i32, i32)>) -> Result<StepDetail, StepError> {
        let (x, y) = coordinates.ok_or_else(|| {
            StepError::MissingInput("no coordinates provided for click".to_string())
        })?;

        self.backend
            .click(x, y)
            .map_err(|e| StepError::Collaborator(e.to_string()))?;
        self.pause(self.options.click_settle);

        Ok(StepDetail::Click {
            coordinates: (x, y),
        })
    }

    fn drag(&mut self, coordinates: Option<&[i32]>) -> Result<StepDetail, StepError> {
        let coords = coordinates.ok_or_else(|| {
            StepError::MissingInput("no coordinates provided for drag".to_string())
        })?;
        if coords.len() != 4 {
            return Err(StepError::InvalidInput(
                "drag needs start_x, start_y, end_x, end_y".to_string(),
            ));
        }

        let (dx, dy) = (coords[2] - coords[0], coords[3] - coords[1]);
        self.backend
            .drag(dx, dy, 1.0)
            .map_err(|e| StepError::Collaborator(e.to_string()))?;

        Ok(StepDetail::Drag {
            coordinates: coords.to_vec(),
        })
    }

    fn type_text(&mut self, text: Option<&str>) -> Result<StepDetail, StepError> {
        let text = text
            .filter(|t| !t.is_empty())
            .ok_or_else(|| StepError::MissingInput("no text provided for type".to_string()))?;

        self.backend
            .type_text(text)
            .map_err(|e| StepError::Collaborator(e.to_string()))?;

        Ok(StepDetail::Type {
            text: text.to_string(),
        })
    }

    fn wait(&mut self, duration: Option<f64>) -> StepDetail {
        let duration = duration.unwrap_or(1.0);
        self.pause(duration);
        StepDetail::Wait { duration }
    }

    fn verify(&mut self, expected_state: Option<&str>) -> Result<StepDetail, StepError> {
        let label = expected_state.ok_or_else(|| {
            StepError::MissingInput("no expected state provided for verification".to_string())
        })?;

        let frame = self
            .backend
            .capture_frame()
            .map_err(|e| StepError::Collaborator(e.to_string()))?;

        Ok(StepDetail::Verify {
            verification: verify_state(label, &frame),
        })
    }

    fn screenshot(&mut self, step_name: &str) -> Result<StepDetail, StepError> {
        let frame = self
            .backend
            .capture_frame()
            .map_err(|e| StepError::Collaborator(e.to_string()))?;

        let path = self.run_dir.screenshot_path(step_name);
        let png = frame
            .to_png()
            .map_err(|e| StepError::Io(e.to_string()))?;
        std::fs::write(&path, png).map_err(|e| StepError::Io(e.to_string()))?;

        Ok(StepDetail::Screenshot {
            screenshot_path: path,
        })
    }

    /// Sleep for a duration in seconds, scaled by the runner's wait scale
    fn pause(&self, seconds: f64) {
        let scaled = seconds * self.options.wait_scale;
        if scaled > 0.0 {
            thread::sleep(Duration::from_secs_f64(scaled));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockUiBackend;
    use crate::scenario::Step;

    fn options() -> RunnerOptions {
        RunnerOptions {
            wait_scale: 0.0,
            ..RunnerOptions::default()
        }
    }

    fn run_dir(tmp: &tempfile::TempDir) -> RunDir {
        RunDir::in_dir(tmp.path().join("run")).unwrap()
    }

    #[test]
    fn test_click_without_coordinates_never_reaches_backend() {
        let tmp = tempfile::tempdir().unwrap();
        let run = run_dir(&tmp);
        let opts = options();
        let mut backend = MockUiBackend::with_color(10, 10, [0, 0, 0]);

        let step = Step::new(
            "broken_click",
            StepAction::Click { coordinates: None },
        );
        let result = StepExecutor::new(&mut backend, &opts, &run).execute(&step);

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().starts_with("Missing input"));
        assert!(backend.clicks.is_empty());
    }

    #[test]
    fn test_drag_with_wrong_count_is_invalid_input() {
        let tmp = tempfile::tempdir().unwrap();
        let run = run_dir(&tmp);
        let opts = options();
        let mut backend = MockUiBackend::with_color(10, 10, [0, 0, 0]);

        let step = Step::new(
            "bad_drag",
            StepAction::Drag {
                coordinates: Some(vec![1, 2, 3]),
            },
        );
        let result = StepExecutor::new(&mut backend, &opts, &run).execute(&step);

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().starts_with("Invalid input"));
        assert!(backend.drags.is_empty());
    }

    #[test]
    fn test_drag_computes_relative_offset() {
        let tmp = tempfile::tempdir().unwrap();
        let run = run_dir(&tmp);
        let opts = options();
        let mut backend = MockUiBackend::with_color(10, 10, [0, 0, 0]);

        let step = Step::drag("pan_map", (100, 100), (160, 80));
        let result = StepExecutor::new(&mut backend, &opts, &run).execute(&step);

        assert!(result.success);
        assert_eq!(backend.drags, vec![(60, -20, 1.0)]);
    }

    #[test]
    fn test_type_requires_non_empty_text() {
        let tmp = tempfile::tempdir().unwrap();
        let run = run_dir(&tmp);
        let opts = options();
        let mut backend = MockUiBackend::with_color(10, 10, [0, 0, 0]);

        let step = Step::new(
            "empty_type",
            StepAction::Type {
                text: Some(String::new()),
            },
        );
        let result = StepExecutor::new(&mut backend, &opts, &run).execute(&step);

        assert!(!result.success);
        assert!(backend.typed.is_empty());
    }

    #[test]
    fn test_wait_defaults_to_one_second_nominal() {
        let tmp = tempfile::tempdir().unwrap();
        let run = run_dir(&tmp);
        let opts = options();
        let mut backend = MockUiBackend::with_color(10, 10, [0, 0, 0]);

        let step = Step::new("settle", StepAction::Wait { duration: None });
        let result = StepExecutor::new(&mut backend, &opts, &run).execute(&step);

        assert!(result.success);
        match result.detail {
            StepDetail::Wait { duration } => assert_eq!(duration, 1.0),
            other => panic!("unexpected detail: {:?}", other),
        }
    }

    #[test]
    fn test_verify_without_label_is_missing_input() {
        let tmp = tempfile::tempdir().unwrap();
        let run = run_dir(&tmp);
        let opts = options();
        let mut backend = MockUiBackend::with_color(10, 10, [0, 0, 0]);

        let step = Step::new(
            "blind_verify",
            StepAction::Verify {
                expected_state: None,
            },
        );
        let result = StepExecutor::new(&mut backend, &opts, &run).execute(&step);

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().starts_with("Missing input"));
    }

    #[test]
    fn test_screenshot_writes_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        let run = run_dir(&tmp);
        let opts = options();
        let mut backend = MockUiBackend::with_color(10, 10, [20, 20, 20]);

        let step = Step::screenshot("screenshot_final");
        let result = StepExecutor::new(&mut backend, &opts, &run).execute(&step);

        assert!(result.success);
        match result.detail {
            StepDetail::Screenshot { screenshot_path } => assert!(screenshot_path.exists()),
            other => panic!("unexpected detail: {:?}", other),
        }
    }

    #[test]
    fn test_collaborator_failure_surfaces_in_result() {
        let tmp = tempfile::tempdir().unwrap();
        let run = run_dir(&tmp);
        let opts = options();
        let mut backend = MockUiBackend::with_color(10, 10, [0, 0, 0]).fail_click_at(1);

        let step = Step::click("doomed_click", 5, 5);
        let result = StepExecutor::new(&mut backend, &opts, &run).execute(&step);

        assert!(!result.success);
        assert!(result
            .error
            .as_deref()
            .unwrap()
            .starts_with("Collaborator failure"));
    }
}
