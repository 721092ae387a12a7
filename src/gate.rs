//! Commit quality gate.
//!
//! Shells out synchronously to the configured lint and unit-test
//! commands, parses their JSON output, runs keyword analysis over the
//! project's JavaScript sources, and combines the components into a
//! single approve/reject decision. A non-zero exit or malformed JSON is
//! a failed gate component, never an abort.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config;
use crate::score::{self, ScoringProfile};

/// Result type for gate operations
pub type GateResult<T> = Result<T, GateError>;

/// Errors raised while producing gate artifacts
#[derive(Debug)]
pub enum GateError {
    /// I/O error writing a report
    Io(std::io::Error),

    /// Serialization error
    Serialization(serde_json::Error),
}

impl std::fmt::Display for GateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateError::Io(err) => write!(f, "I/O error: {}", err),
            GateError::Serialization(err) => write!(f, "Serialization error: {}", err),
        }
    }
}

impl std::error::Error for GateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GateError::Io(err) => Some(err),
            GateError::Serialization(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for GateError {
    fn from(err: std::io::Error) -> Self {
        GateError::Io(err)
    }
}

impl From<serde_json::Error> for GateError {
    fn from(err: serde_json::Error) -> Self {
        GateError::Serialization(err)
    }
}

/// Outcome of the lint component
#[derive(Debug, Clone, Serialize)]
pub struct LintSummary {
    pub passed: bool,
    pub issue_count: usize,
}

/// Outcome of the unit-test component
#[derive(Debug, Clone, Serialize)]
pub struct TestSummary {
    pub passed: bool,
    pub tests_run: u64,
    /// Statement coverage as a fraction in [0, 1]; 0.0 when unreported
    pub coverage: f64,
}

/// Outcome of the keyword analysis component
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    /// Average keyword alignment over analyzed files
    pub alignment: f64,
    /// Average impact-keyword density over analyzed files
    pub impact: f64,
    pub files_analyzed: usize,
}

/// Quality gate decision for a commit
#[derive(Debug, Clone, Serialize)]
pub struct GateDecision {
    pub commit_hash: String,
    pub approved: bool,
    pub alignment: f64,
    pub coverage: f64,
    pub lint: LintSummary,
    pub tests: TestSummary,
    pub analysis: AnalysisSummary,
    pub blocking_issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Runs the gate components against a project checkout
pub struct QualityGate {
    project_root: PathBuf,
    lint_cmd: Vec<String>,
    test_cmd: Vec<String>,
    min_alignment: f64,
    min_coverage: f64,
    max_analyzed_files: usize,
    profile: ScoringProfile,
}

impl QualityGate {
    /// Build a gate for the given project root using configured commands
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let cfg = config::get();
        Self {
            project_root: project_root.into(),
            lint_cmd: split_command(&cfg.gate.lint_cmd),
            test_cmd: split_command(&cfg.gate.test_cmd),
            min_alignment: cfg.gate.min_alignment,
            min_coverage: cfg.gate.min_coverage,
            max_analyzed_files: cfg.gate.max_analyzed_files,
            profile: ScoringProfile::default(),
        }
    }

    /// Override the lint command
    pub fn lint_cmd(mut self, cmd: &str) -> Self {
        self.lint_cmd = split_command(cmd);
        self
    }

    /// Override the test command
    pub fn test_cmd(mut self, cmd: &str) -> Self {
        self.test_cmd = split_command(cmd);
        self
    }

    /// Run every component and combine them into a decision
    pub fn evaluate(&self, commit_hash: &str) -> GateDecision {
        println!("Running quality gates for commit {}", commit_hash);

        let lint = self.run_lint();
        let tests = self.run_tests();
        let analysis = self.run_analysis();

        let approved = lint.passed
            && tests.passed
            && analysis.alignment >= self.min_alignment
            && tests.coverage >= self.min_coverage;

        let mut blocking_issues = Vec::new();
        if !lint.passed {
            blocking_issues.push("Lint checks failed".to_string());
        }
        if !tests.passed {
            blocking_issues.push("Unit tests failed".to_string());
        }

        let mut recommendations = Vec::new();
        if lint.issue_count > 0 {
            recommendations.push("Fix lint issues to improve code quality".to_string());
        }
        if tests.coverage < self.min_coverage {
            recommendations.push(format!(
                "Increase unit test coverage to at least {:.0}%",
                self.min_coverage * 100.0
            ));
        }
        if analysis.alignment < self.min_alignment {
            recommendations.push("Raise keyword alignment across project sources".to_string());
        }

        GateDecision {
            commit_hash: commit_hash.to_string(),
            approved,
            alignment: analysis.alignment,
            coverage: tests.coverage,
            lint,
            tests,
            analysis,
            blocking_issues,
            recommendations,
        }
    }

    /// Evaluate and write the decision as pretty JSON next to the project
    pub fn write_report(&self, commit_hash: &str) -> GateResult<PathBuf> {
        let decision = self.evaluate(commit_hash);
        let path = self
            .project_root
            .join(format!("qa_report_{}.json", commit_hash));
        std::fs::write(&path, serde_json::to_string_pretty(&decision)?)?;
        Ok(path)
    }

    fn run_lint(&self) -> LintSummary {
        println!("Running lint checks...");
        match self.run_command(&self.lint_cmd) {
            Some((status_ok, stdout)) => {
                let issues: Vec<serde_json::Value> =
                    serde_json::from_str(&stdout).unwrap_or_default();
                LintSummary {
                    passed: status_ok,
                    issue_count: issues.len(),
                }
            }
            None => LintSummary {
                passed: false,
                issue_count: 0,
            },
        }
    }

    fn run_tests(&self) -> TestSummary {
        println!("Running unit tests...");
        match self.run_command(&self.test_cmd) {
            Some((status_ok, stdout)) => match serde_json::from_str::<serde_json::Value>(&stdout) {
                Ok(output) => TestSummary {
                    passed: status_ok,
                    tests_run: output
                        .get("numTotalTests")
                        .and_then(|v| v.as_u64())
                        .unwrap_or(0),
                    coverage: statement_coverage(&output),
                },
                Err(_) => TestSummary {
                    passed: false,
                    tests_run: 0,
                    coverage: 0.0,
                },
            },
            None => TestSummary {
                passed: false,
                tests_run: 0,
                coverage: 0.0,
            },
        }
    }

    fn run_analysis(&self) -> AnalysisSummary {
        println!("Running keyword analysis...");
        let js_root = self.project_root.join("js");
        let mut files = score::collect_files(&js_root, "js").unwrap_or_default();
        files.truncate(self.max_analyzed_files);

        let scores = score::score_files(&self.profile, &files);
        for file in scores.iter().filter(|s| s.error.is_some()) {
            eprintln!(
                "Warning: could not analyze {}: {}",
                file.path.display(),
                file.error.as_deref().unwrap_or("")
            );
        }

        let impact = if scores.is_empty() {
            0.0
        } else {
            scores.iter().map(|s| s.impact).sum::<f64>() / scores.len() as f64
        };

        AnalysisSummary {
            alignment: score::average_score(&scores),
            impact,
            files_analyzed: scores.len(),
        }
    }

    /// Spawn a command and wait for it; None means the spawn itself failed
    fn run_command(&self, cmd: &[String]) -> Option<(bool, String)> {
        let (program, args) = cmd.split_first()?;
        match Command::new(program)
            .args(args)
            .current_dir(&self.project_root)
            .output()
        {
            Ok(output) => Some((
                output.status.success(),
                String::from_utf8_lossy(&output.stdout).into_owned(),
            )),
            Err(e) => {
                eprintln!("Warning: failed to run {}: {}", program, e);
                None
            }
        }
    }
}

/// Extract jest statement coverage as a fraction
fn statement_coverage(output: &serde_json::Value) -> f64 {
    output
        .pointer("/coverageMap/statements/pct")
        .and_then(|v| v.as_f64())
        .map(|pct| pct / 100.0)
        .unwrap_or(0.0)
}

fn split_command(cmd: &str) -> Vec<String> {
    cmd.split_whitespace().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate_in(dir: &Path) -> QualityGate {
        QualityGate {
            project_root: dir.to_path_buf(),
            lint_cmd: split_command("true"),
            test_cmd: split_command("true"),
            min_alignment: 0.7,
            min_coverage: 0.8,
            max_analyzed_files: 10,
            profile: ScoringProfile::default(),
        }
    }

    #[test]
    fn test_split_command() {
        assert_eq!(
            split_command("npx eslint js/ --format json"),
            vec!["npx", "eslint", "js/", "--format", "json"]
        );
    }

    #[test]
    fn test_statement_coverage_fraction() {
        let output = serde_json::json!({"coverageMap": {"statements": {"pct": 85.0}}});
        assert_eq!(statement_coverage(&output), 0.85);
        assert_eq!(statement_coverage(&serde_json::json!({})), 0.0);
    }

    #[test]
    fn test_missing_command_is_failed_component() {
        let tmp = tempfile::tempdir().unwrap();
        let gate = gate_in(tmp.path()).lint_cmd("qa-pilot-no-such-binary --json");
        let lint = gate.run_lint();
        assert!(!lint.passed);
    }

    #[test]
    fn test_malformed_test_json_is_failed_component() {
        let tmp = tempfile::tempdir().unwrap();
        // `true` exits 0 with empty stdout, which is not valid JSON
        let gate = gate_in(tmp.path());
        let tests = gate.run_tests();
        assert!(!tests.passed);
        assert_eq!(tests.coverage, 0.0);
    }

    #[test]
    fn test_decision_requires_every_component() {
        let tmp = tempfile::tempdir().unwrap();
        let gate = gate_in(tmp.path());
        let decision = gate.evaluate("abc123");
        // Empty project: no js files, tests component failed on empty JSON
        assert!(!decision.approved);
        assert_eq!(decision.analysis.files_analyzed, 0);
        assert!(!decision.blocking_issues.is_empty());
    }

    #[test]
    fn test_analysis_reads_project_sources() {
        let tmp = tempfile::tempdir().unwrap();
        let js_dir = tmp.path().join("js");
        std::fs::create_dir(&js_dir).unwrap();
        std::fs::write(
            js_dir.join("map-layer.js"),
            "// community map explores spatial territory together",
        )
        .unwrap();

        let gate = gate_in(tmp.path());
        let analysis = gate.run_analysis();
        assert_eq!(analysis.files_analyzed, 1);
        assert!(analysis.alignment > 0.0);
    }
}
