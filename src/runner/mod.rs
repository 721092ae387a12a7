//! Scenario sequencing.
//!
//! The runner resolves a scenario, executes its steps strictly in order
//! through the step executor, stops at the first failure, and derives
//! timing metrics plus the optional post-run validation. No retries, no
//! parallel steps, no partial rollback.

mod exec;
pub mod types;

pub use types::{
    efficiency_ratio, PerformanceMetrics, RunResult, ScenarioReport, StepDetail, StepError,
    StepResult,
};

use std::path::PathBuf;
use std::time::Instant;

use crate::artifacts::RunDir;
use crate::backend::UiBackend;
use crate::config;
use crate::scenario::{find_scenario, Scenario};
use crate::score::post_run_alignment;

use exec::StepExecutor;

/// Result type for runner operations
pub type RunnerResult<T> = Result<T, RunnerError>;

/// Errors raised at the run level (step failures are data, not errors)
#[derive(Debug)]
pub enum RunnerError {
    /// The named scenario is not in the registry
    ScenarioNotFound(String),

    /// I/O error preparing the run (e.g., artifact directory)
    Io(std::io::Error),
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunnerError::ScenarioNotFound(name) => {
                write!(f, "Scenario \"{}\" not found", name)
            }
            RunnerError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunnerError::ScenarioNotFound(_) => None,
            RunnerError::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RunnerError {
    fn from(err: std::io::Error) -> Self {
        RunnerError::Io(err)
    }
}

/// Tunable execution knobs for a runner
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Multiplier applied to wait durations and settle pauses
    /// (0.0 makes runs instantaneous, for tests)
    pub wait_scale: f64,

    /// Pause after each click, in seconds (before scaling)
    pub click_settle: f64,

    /// Base directory for run artifacts; defaults to the configured one
    pub screenshot_dir: Option<PathBuf>,

    /// Threshold for the post-run alignment verdict
    pub alignment_threshold: f64,
}

impl Default for RunnerOptions {
    fn default() -> Self {
        let cfg = config::get();
        Self {
            wait_scale: cfg.runner.wait_scale,
            click_settle: cfg.runner.click_settle,
            screenshot_dir: None,
            alignment_threshold: cfg.gate.min_alignment,
        }
    }
}

/// Executes scenarios against an injected collaborator
///
/// The collaborator is a constructor-time capability: a runner built
/// with `unavailable()` degrades every run to a no-op failure report
/// instead of consulting ambient global state.
pub struct ScenarioRunner {
    backend: Option<Box<dyn UiBackend>>,
    options: RunnerOptions,
}

impl ScenarioRunner {
    /// Create a runner over the given collaborator
    pub fn new(backend: Box<dyn UiBackend>) -> Self {
        Self::with_options(backend, RunnerOptions::default())
    }

    /// Create a runner with explicit options
    pub fn with_options(backend: Box<dyn UiBackend>, options: RunnerOptions) -> Self {
        Self {
            backend: Some(backend),
            options,
        }
    }

    /// Create a runner with no collaborator; every run fails as a no-op
    pub fn unavailable() -> Self {
        Self {
            backend: None,
            options: RunnerOptions::default(),
        }
    }

    /// Run a built-in scenario by name
    pub fn run(&mut self, scenario_name: &str) -> RunnerResult<ScenarioReport> {
        let scenario = find_scenario(scenario_name)
            .ok_or_else(|| RunnerError::ScenarioNotFound(scenario_name.to_string()))?;
        self.run_scenario(scenario)
    }

    /// Run a scenario definition
    pub fn run_scenario(&mut self, scenario: &Scenario) -> RunnerResult<ScenarioReport> {
        let Some(backend) = self.backend.as_deref_mut() else {
            return Ok(unavailable_report(scenario));
        };

        println!("Running scenario: {}", scenario.name);

        let base = self
            .options
            .screenshot_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config::get().runner.screenshot_dir));
        let run_dir = RunDir::create(&base, &scenario.name)?;

        let start = Instant::now();
        let run = execute_steps(backend, &self.options, &run_dir, scenario);
        let execution_time = start.elapsed().as_secs_f64();

        let performance = PerformanceMetrics::new(
            execution_time,
            scenario.expected_duration,
            run.step_results.len(),
            scenario.steps.len(),
        );

        let validation = scenario.post_run_validation.then(|| {
            post_run_alignment(
                run.success,
                performance.efficiency_ratio,
                self.options.alignment_threshold,
            )
        });

        Ok(ScenarioReport {
            scenario: scenario.name.clone(),
            passed: run.success,
            error: None,
            run,
            performance,
            validation,
        })
    }
}

fn execute_steps(
    backend: &mut dyn UiBackend,
    options: &RunnerOptions,
    run_dir: &RunDir,
    scenario: &Scenario,
) -> RunResult {
    let mut executor = StepExecutor::new(backend, options, run_dir);
    let mut step_results = Vec::new();
    let mut screenshots = Vec::new();
    let mut success = true;

    for (i, step) in scenario.steps.iter().enumerate() {
        println!(
            "  Executing step {}/{}: {}",
            i + 1,
            scenario.steps.len(),
            step.name
        );

        let result = executor.execute(step);

        if let StepDetail::Screenshot { screenshot_path } = &result.detail {
            screenshots.push(screenshot_path.clone());
        }

        let failed = !result.success;
        if failed {
            eprintln!(
                "  Step failed: {}",
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
        step_results.push(result);
        if failed {
            success = false;
            break;
        }
    }

    RunResult {
        success,
        step_results,
        screenshots,
    }
}

fn unavailable_report(scenario: &Scenario) -> ScenarioReport {
    ScenarioReport {
        scenario: scenario.name.clone(),
        passed: false,
        error: Some("Automation backend not available".to_string()),
        run: RunResult {
            success: false,
            step_results: Vec::new(),
            screenshots: Vec::new(),
        },
        performance: PerformanceMetrics::new(0.0, scenario.expected_duration, 0, scenario.steps.len()),
        validation: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockUiBackend;

    fn fast_options(tmp: &tempfile::TempDir) -> RunnerOptions {
        RunnerOptions {
            wait_scale: 0.0,
            click_settle: 0.0,
            screenshot_dir: Some(tmp.path().to_path_buf()),
            alignment_threshold: 0.7,
        }
    }

    #[test]
    fn test_unknown_scenario() {
        let mut runner =
            ScenarioRunner::new(Box::new(MockUiBackend::with_color(10, 10, [0, 0, 0])));
        match runner.run("no_such_scenario") {
            Err(RunnerError::ScenarioNotFound(name)) => assert_eq!(name, "no_such_scenario"),
            other => panic!("expected ScenarioNotFound, got {:?}", other.map(|r| r.passed)),
        }
    }

    #[test]
    fn test_unavailable_runner_degrades_to_failure_report() {
        let mut runner = ScenarioRunner::unavailable();
        let report = runner.run("base_establishment_flow").unwrap();
        assert!(!report.passed);
        assert_eq!(report.run.step_results.len(), 0);
        assert!(report.error.is_some());
        assert_eq!(report.performance.efficiency_ratio, 0.0);
    }

    #[test]
    fn test_fail_fast_truncates_results() {
        let tmp = tempfile::tempdir().unwrap();
        // Screen never matches any verification rule
        let backend = MockUiBackend::with_color(100, 100, [255, 0, 0]);
        let mut runner = ScenarioRunner::with_options(Box::new(backend), fast_options(&tmp));

        let report = runner.run("base_establishment_flow").unwrap();
        // Steps: click, wait, verify(fails) -> exactly 3 results
        assert!(!report.passed);
        assert_eq!(report.run.step_results.len(), 3);
        let last = report.run.step_results.last().unwrap();
        assert!(!last.success);
        assert!(report.run.screenshots.is_empty());
    }

    #[test]
    fn test_result_sequence_never_exceeds_step_count() {
        let tmp = tempfile::tempdir().unwrap();
        for scenario in crate::scenario::builtin_scenarios() {
            let backend = MockUiBackend::with_color(50, 50, [255, 0, 0]);
            let mut runner =
                ScenarioRunner::with_options(Box::new(backend), fast_options(&tmp));
            let report = runner.run_scenario(scenario).unwrap();
            assert!(report.run.step_results.len() <= scenario.steps.len());
            if let Some(pos) = report.run.step_results.iter().position(|r| !r.success) {
                assert_eq!(pos, report.run.step_results.len() - 1);
            }
        }
    }
}
