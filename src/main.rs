use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;

use qa_pilot::backend::MockUiBackend;
use qa_pilot::gate::QualityGate;
use qa_pilot::runner::{RunnerOptions, ScenarioRunner};
use qa_pilot::scenario::{load_scenario_file, scenario_summaries};
use qa_pilot::score::{average_score, collect_files, score_files, ScoringProfile};
use qa_pilot::tagger::{markdown_files, tag_directory, validate_file, FrontMatterStatus};

/// QA Pilot - Coordinate-driven UI test automation and quality gating
#[derive(Parser, Debug)]
#[command(
    name = "qa-pilot",
    about = "User-testing scenario runner, commit quality gate, and doc tagger",
    after_help = "ENVIRONMENT VARIABLES:\n\
        QA_PILOT_SCREENSHOT_DIR   Base directory for run artifacts\n\
        QA_PILOT_WAIT_SCALE       Multiplier for wait and settle pauses\n\
        QA_PILOT_CLICK_SETTLE     Pause after each click (seconds)\n\
        QA_PILOT_LINT_CMD         Lint command for the quality gate\n\
        QA_PILOT_TEST_CMD         Test command for the quality gate\n\
        QA_PILOT_MIN_ALIGNMENT    Minimum keyword alignment for approval\n\
        QA_PILOT_MIN_COVERAGE     Minimum statement coverage for approval"
)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the built-in user-testing scenarios
    Scenarios,

    /// Run a user-testing scenario against a mock screen
    UserTest {
        /// Name of a built-in scenario, or a path to a scenario JSON file
        scenario: String,

        /// PNG image to seed the mock screen with (default: solid dark frame)
        #[arg(short, long)]
        frame: Option<PathBuf>,

        /// Base directory for run artifacts
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Multiplier for wait and settle pauses (0 disables them)
        #[arg(long, env = "QA_PILOT_WAIT_SCALE")]
        wait_scale: Option<f64>,

        /// Output the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the commit quality gate and print the decision
    CommitCheck {
        /// Commit hash under review
        commit_hash: String,

        /// Project root to evaluate (default: current directory)
        #[arg(short, long, default_value = ".")]
        project: PathBuf,
    },

    /// Run the quality gate and write a JSON report next to the project
    GenerateReport {
        /// Commit hash under review
        commit_hash: String,

        /// Project root to evaluate (default: current directory)
        #[arg(short, long, default_value = ".")]
        project: PathBuf,
    },

    /// Score files or directories by keyword density
    Analyze {
        /// Files or directories to analyze
        paths: Vec<PathBuf>,

        /// Flag files scoring below this threshold
        #[arg(short, long, default_value = "0.1")]
        threshold: f64,

        /// File extension to collect from directories
        #[arg(short, long, default_value = "js")]
        extension: String,
    },

    /// Apply front-matter metadata to Markdown docs in a directory
    Tag {
        /// Directory to walk for Markdown files
        dir: PathBuf,

        /// Validate existing front matter instead of tagging
        #[arg(long)]
        check: bool,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    match args.command {
        Some(Commands::Scenarios) => {
            println!("Available scenarios:");
            for (name, description) in scenario_summaries() {
                println!("  {:<30} {}", name, description);
            }
        }

        Some(Commands::UserTest {
            scenario,
            frame,
            output,
            wait_scale,
            json,
        }) => {
            let backend = match frame {
                Some(path) => MockUiBackend::from_png_path(&path)?,
                None => MockUiBackend::with_color(800, 600, [20, 20, 20]),
            };

            let mut options = RunnerOptions::default();
            if let Some(scale) = wait_scale {
                options.wait_scale = scale;
            }
            options.screenshot_dir = output;

            let mut runner = ScenarioRunner::with_options(Box::new(backend), options);

            // A path argument loads an external definition; otherwise the
            // name resolves against the built-in registry
            let report = if scenario.ends_with(".json") {
                let definition = load_scenario_file(&scenario)?;
                runner.run_scenario(&definition)?
            } else {
                runner.run(&scenario)?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }

            if !report.passed {
                std::process::exit(1);
            }
        }

        Some(Commands::CommitCheck {
            commit_hash,
            project,
        }) => {
            let gate = QualityGate::new(project);
            let decision = gate.evaluate(&commit_hash);
            print_decision(&decision);
            if !decision.approved {
                std::process::exit(1);
            }
        }

        Some(Commands::GenerateReport {
            commit_hash,
            project,
        }) => {
            let gate = QualityGate::new(project);
            let path = gate.write_report(&commit_hash)?;
            println!("Report written: {}", path.display());
        }

        Some(Commands::Analyze {
            paths,
            threshold,
            extension,
        }) => {
            let mut files = Vec::new();
            for path in &paths {
                if path.is_dir() {
                    files.extend(collect_files(path, &extension)?);
                } else {
                    files.push(path.clone());
                }
            }

            let profile = ScoringProfile::default();
            let scores = score_files(&profile, &files);
            for score in &scores {
                let marker = if score.overall < threshold { "!" } else { " " };
                match &score.error {
                    Some(err) => println!(
                        "{} {:<50} unreadable: {}",
                        marker,
                        score.path.display(),
                        err
                    ),
                    None => println!(
                        "{} {:<50} alignment {:.3}  impact {:.3}",
                        marker,
                        score.path.display(),
                        score.overall,
                        score.impact
                    ),
                }
            }
            println!();
            println!(
                "{} files, average alignment {:.3}",
                scores.len(),
                average_score(&scores)
            );
        }

        Some(Commands::Tag { dir, check }) => {
            if check {
                let mut invalid = 0;
                for path in markdown_files(&dir)? {
                    match validate_file(&path)? {
                        FrontMatterStatus::Valid => {}
                        FrontMatterStatus::Absent => {
                            println!("{}: no front matter", path.display());
                            invalid += 1;
                        }
                        FrontMatterStatus::Missing(keys) => {
                            println!("{}: missing {}", path.display(), keys.join(", "));
                            invalid += 1;
                        }
                    }
                }
                if invalid > 0 {
                    println!("{} files need attention", invalid);
                    std::process::exit(1);
                }
                println!("All documents carry valid front matter");
            } else {
                let stats = tag_directory(&dir)?;
                println!(
                    "Tagged {} files ({} already tagged, {} errors)",
                    stats.tagged, stats.already_tagged, stats.errors
                );
            }
        }

        None => {
            println!("QA Pilot - UI test automation and quality gating");
            println!();
            println!("Usage: qa-pilot <COMMAND>");
            println!();
            println!("Commands:");
            println!("  scenarios        List the built-in user-testing scenarios");
            println!("  user-test        Run a user-testing scenario against a mock screen");
            println!("  commit-check     Run the commit quality gate");
            println!("  generate-report  Run the gate and write a JSON report");
            println!("  analyze          Score files by keyword density");
            println!("  tag              Apply front-matter metadata to Markdown docs");
            println!();
            println!("Run with --help for more information.");
        }
    }

    Ok(())
}

fn print_report(report: &qa_pilot::ScenarioReport) {
    let verdict = if report.passed { "PASSED" } else { "FAILED" };
    println!();
    println!("Scenario {}: {}", report.scenario, verdict);
    if let Some(error) = &report.error {
        println!("  Error: {}", error);
    }
    println!(
        "  Steps: {}/{} completed",
        report.performance.steps_completed, report.performance.steps_total
    );
    println!(
        "  Time: {:.2}s (expected {:.1}s, efficiency {:.2})",
        report.performance.execution_time,
        report.performance.expected_duration,
        report.performance.efficiency_ratio
    );
    for result in &report.run.step_results {
        let mark = if result.success { "ok" } else { "FAIL" };
        match &result.error {
            Some(err) => println!("    [{}] {} ({}): {}", mark, result.step_name, result.kind, err),
            None => println!("    [{}] {} ({})", mark, result.step_name, result.kind),
        }
    }
    if !report.run.screenshots.is_empty() {
        println!("  Screenshots:");
        for path in &report.run.screenshots {
            println!("    {}", path.display());
        }
    }
    if let Some(validation) = &report.validation {
        let aligned = if validation.aligned { "aligned" } else { "not aligned" };
        println!(
            "  Validation: {:.2} ({})",
            validation.overall_score, aligned
        );
        for rec in &validation.recommendations {
            println!("    - {}", rec);
        }
    }
}

fn print_decision(decision: &qa_pilot::GateDecision) {
    let verdict = if decision.approved {
        "APPROVED"
    } else {
        "REJECTED"
    };
    println!();
    println!("Commit {}: {}", decision.commit_hash, verdict);
    println!(
        "  Lint: {} ({} issues)",
        pass_str(decision.lint.passed),
        decision.lint.issue_count
    );
    println!(
        "  Tests: {} ({} run, coverage {:.0}%)",
        pass_str(decision.tests.passed),
        decision.tests.tests_run,
        decision.coverage * 100.0
    );
    println!(
        "  Analysis: alignment {:.3} over {} files",
        decision.alignment, decision.analysis.files_analyzed
    );
    for issue in &decision.blocking_issues {
        println!("  Blocking: {}", issue);
    }
    for rec in &decision.recommendations {
        println!("  Recommend: {}", rec);
    }
}

fn pass_str(passed: bool) -> &'static str {
    if passed { "passed" } else { "failed" }
}
