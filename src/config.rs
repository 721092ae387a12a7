//! Configuration management with environment variable support.
//!
//! Centralized configuration for QA Pilot:
//! - Environment variables for all configurable values
//! - Sensible defaults matching the policy constants in use
//! - Threshold values are policy, not derived behavior; tune them freely
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `QA_PILOT_SCREENSHOT_DIR` | Base directory for run artifacts | `./qa_screenshots` |
//! | `QA_PILOT_WAIT_SCALE` | Multiplier applied to wait durations | `1.0` |
//! | `QA_PILOT_CLICK_SETTLE` | Pause after each click (seconds) | `0.5` |
//! | `QA_PILOT_LINT_CMD` | Lint command for the quality gate | `npx eslint js/ --format json` |
//! | `QA_PILOT_TEST_CMD` | Unit-test command for the quality gate | `npx jest --coverage --json` |
//! | `QA_PILOT_MIN_ALIGNMENT` | Gate threshold for keyword alignment | `0.7` |
//! | `QA_PILOT_MIN_COVERAGE` | Gate threshold for test coverage | `0.8` |

use std::env;
use std::sync::OnceLock;

// ============================================================================
// Default Values
// ============================================================================

/// Default base directory for screenshots and run artifacts
pub const DEFAULT_SCREENSHOT_DIR: &str = "./qa_screenshots";

/// Default multiplier for wait-step durations
pub const DEFAULT_WAIT_SCALE: f64 = 1.0;

/// Default settle pause after a click (seconds)
pub const DEFAULT_CLICK_SETTLE: f64 = 0.5;

/// Default lint command for the quality gate
pub const DEFAULT_LINT_CMD: &str = "npx eslint js/ --format json";

/// Default unit-test command for the quality gate
pub const DEFAULT_TEST_CMD: &str = "npx jest --coverage --json";

/// Default minimum keyword-alignment score for gate approval
pub const DEFAULT_MIN_ALIGNMENT: f64 = 0.7;

/// Default minimum test coverage for gate approval
pub const DEFAULT_MIN_COVERAGE: f64 = 0.8;

/// Maximum number of source files scanned per analysis pass
pub const DEFAULT_MAX_ANALYZED_FILES: usize = 10;

// ============================================================================
// Environment Variable Names
// ============================================================================

/// Environment variable for the screenshot directory
pub const ENV_SCREENSHOT_DIR: &str = "QA_PILOT_SCREENSHOT_DIR";

/// Environment variable for the wait-duration multiplier
pub const ENV_WAIT_SCALE: &str = "QA_PILOT_WAIT_SCALE";

/// Environment variable for the click settle pause
pub const ENV_CLICK_SETTLE: &str = "QA_PILOT_CLICK_SETTLE";

/// Environment variable for the lint command
pub const ENV_LINT_CMD: &str = "QA_PILOT_LINT_CMD";

/// Environment variable for the test command
pub const ENV_TEST_CMD: &str = "QA_PILOT_TEST_CMD";

/// Environment variable for the minimum alignment threshold
pub const ENV_MIN_ALIGNMENT: &str = "QA_PILOT_MIN_ALIGNMENT";

/// Environment variable for the minimum coverage threshold
pub const ENV_MIN_COVERAGE: &str = "QA_PILOT_MIN_COVERAGE";

// ============================================================================
// Configuration Getters (with caching)
// ============================================================================

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized configuration for QA Pilot
#[derive(Debug, Clone)]
pub struct Config {
    /// Scenario runner settings
    pub runner: RunnerSettings,
    /// Quality gate settings
    pub gate: GateSettings,
}

/// Scenario runner settings
#[derive(Debug, Clone)]
pub struct RunnerSettings {
    /// Base directory for screenshots and run artifacts
    pub screenshot_dir: String,
    /// Multiplier applied to wait durations and settle pauses
    pub wait_scale: f64,
    /// Pause after each click (seconds, before scaling)
    pub click_settle: f64,
}

/// Quality gate settings
#[derive(Debug, Clone)]
pub struct GateSettings {
    /// Lint command line
    pub lint_cmd: String,
    /// Unit-test command line
    pub test_cmd: String,
    /// Minimum keyword-alignment score for approval
    pub min_alignment: f64,
    /// Minimum test coverage for approval
    pub min_coverage: f64,
    /// Maximum number of source files scanned per analysis pass
    pub max_analyzed_files: usize,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            runner: RunnerSettings::from_env(),
            gate: GateSettings::from_env(),
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            runner: RunnerSettings::defaults(),
            gate: GateSettings::defaults(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl RunnerSettings {
    /// Create runner settings from environment variables
    pub fn from_env() -> Self {
        Self {
            screenshot_dir: env::var(ENV_SCREENSHOT_DIR)
                .unwrap_or_else(|_| DEFAULT_SCREENSHOT_DIR.to_string()),
            wait_scale: env_f64(ENV_WAIT_SCALE, DEFAULT_WAIT_SCALE),
            click_settle: env_f64(ENV_CLICK_SETTLE, DEFAULT_CLICK_SETTLE),
        }
    }

    /// Create runner settings with defaults
    pub fn defaults() -> Self {
        Self {
            screenshot_dir: DEFAULT_SCREENSHOT_DIR.to_string(),
            wait_scale: DEFAULT_WAIT_SCALE,
            click_settle: DEFAULT_CLICK_SETTLE,
        }
    }
}

impl GateSettings {
    /// Create gate settings from environment variables
    pub fn from_env() -> Self {
        Self {
            lint_cmd: env::var(ENV_LINT_CMD).unwrap_or_else(|_| DEFAULT_LINT_CMD.to_string()),
            test_cmd: env::var(ENV_TEST_CMD).unwrap_or_else(|_| DEFAULT_TEST_CMD.to_string()),
            min_alignment: env_f64(ENV_MIN_ALIGNMENT, DEFAULT_MIN_ALIGNMENT),
            min_coverage: env_f64(ENV_MIN_COVERAGE, DEFAULT_MIN_COVERAGE),
            max_analyzed_files: DEFAULT_MAX_ANALYZED_FILES,
        }
    }

    /// Create gate settings with defaults
    pub fn defaults() -> Self {
        Self {
            lint_cmd: DEFAULT_LINT_CMD.to_string(),
            test_cmd: DEFAULT_TEST_CMD.to_string(),
            min_alignment: DEFAULT_MIN_ALIGNMENT,
            min_coverage: DEFAULT_MIN_COVERAGE,
            max_analyzed_files: DEFAULT_MAX_ANALYZED_FILES,
        }
    }
}

fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::defaults();
        assert_eq!(config.runner.screenshot_dir, DEFAULT_SCREENSHOT_DIR);
        assert_eq!(config.runner.wait_scale, DEFAULT_WAIT_SCALE);
        assert_eq!(config.gate.lint_cmd, DEFAULT_LINT_CMD);
        assert_eq!(config.gate.min_alignment, DEFAULT_MIN_ALIGNMENT);
    }

    #[test]
    fn test_env_f64_fallback() {
        assert_eq!(env_f64("QA_PILOT_NO_SUCH_VAR", 0.25), 0.25);
    }
}
