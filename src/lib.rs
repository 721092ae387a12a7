//! QA Pilot - Coordinate-driven UI test automation and quality gating.
//!
//! This crate provides:
//! - Built-in user-testing scenarios executed against an injectable UI backend
//! - Pixel-color verification of expected screen states
//! - Keyword-density scoring of project sources with post-run validation
//! - A commit quality gate combining lint, tests, and keyword analysis
//! - A Markdown front-matter tagger for project documentation
//!
//! # Example
//!
//! ```rust,no_run
//! use qa_pilot::backend::MockUiBackend;
//! use qa_pilot::runner::ScenarioRunner;
//!
//! let backend = MockUiBackend::with_color(800, 600, [50, 230, 50]);
//! let mut runner = ScenarioRunner::new(Box::new(backend));
//! let report = runner.run("base_establishment_flow").unwrap();
//! println!("passed: {}", report.passed);
//! ```

pub mod artifacts;
pub mod backend;
pub mod config;
pub mod gate;
pub mod runner;
pub mod scenario;
pub mod score;
pub mod tagger;
pub mod verify;

// Re-export backend types
pub use backend::{BackendError, BackendResult, Frame, MockUiBackend, UiBackend};

// Re-export scenario types
pub use scenario::{
    builtin_scenarios, find_scenario, load_scenario_file, Scenario, ScenarioError, Step, StepAction,
};

// Re-export runner types
pub use runner::{
    efficiency_ratio, PerformanceMetrics, RunResult, RunnerError, RunnerOptions, ScenarioReport,
    ScenarioRunner, StepResult,
};

// Re-export verification
pub use verify::{rule_for, verify_state, Verification, VerificationRule};

// Re-export scoring and gating
pub use gate::{GateDecision, QualityGate};
pub use score::{post_run_alignment, AlignmentReport, FileScore, ScoringProfile};

// Re-export tagging
pub use tagger::{tag_directory, tag_file, validate_file, FrontMatterStatus, TagOutcome};
