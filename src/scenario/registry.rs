//! Built-in scenario registry.
//!
//! Scenarios are constructed once and looked up by name; the table is
//! read-only after construction.

use std::sync::OnceLock;

use super::types::{Scenario, Step};

static SCENARIOS: OnceLock<Vec<Scenario>> = OnceLock::new();

/// All built-in scenarios, in registration order
pub fn builtin_scenarios() -> &'static [Scenario] {
    SCENARIOS.get_or_init(build_scenarios)
}

/// Look up a built-in scenario by name
pub fn find_scenario(name: &str) -> Option<&'static Scenario> {
    builtin_scenarios().iter().find(|s| s.name == name)
}

/// Names and descriptions of all built-in scenarios
pub fn scenario_summaries() -> Vec<(&'static str, &'static str)> {
    builtin_scenarios()
        .iter()
        .map(|s| (s.name.as_str(), s.description.as_str()))
        .collect()
}

fn build_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "base_establishment_flow".to_string(),
            description: "Test complete base establishment flow".to_string(),
            steps: vec![
                Step::click("open_step_counter", 100, 100),
                Step::wait("wait_for_ui", 2.0),
                Step::verify("verify_step_counter", "step_counter_visible"),
                Step::click("click_establish_base", 200, 200),
                Step::wait("wait_for_dialog", 1.0),
                Step::verify("verify_base_dialog", "base_dialog_open"),
                Step::click("confirm_base_creation", 300, 300),
                Step::wait("wait_for_base", 3.0),
                Step::verify("verify_base_marker", "base_marker_visible"),
                Step::screenshot("screenshot_final"),
            ],
            expected_duration: 15.0,
            post_run_validation: true,
        },
        Scenario {
            name: "step_tracking_validation".to_string(),
            description: "Test step tracking accuracy and UI responsiveness".to_string(),
            steps: vec![
                Step::click("open_step_counter", 100, 100),
                Step::wait("wait_for_ui", 2.0),
                Step::verify("verify_step_counter", "step_counter_visible"),
                Step::click("test_gps_mode", 150, 150),
                Step::wait("wait_for_mode_change", 1.0),
                Step::verify("verify_gps_mode", "gps_mode_active"),
                Step::click("test_device_mode", 200, 150),
                Step::wait("wait_for_mode_change", 1.0),
                Step::verify("verify_device_mode", "device_mode_active"),
                Step::screenshot("screenshot_modes"),
            ],
            expected_duration: 10.0,
            post_run_validation: true,
        },
        Scenario {
            name: "multiplayer_synchronization".to_string(),
            description: "Test multiplayer base visibility and notifications".to_string(),
            steps: vec![
                Step::click("open_multiplayer_panel", 50, 400),
                Step::wait("wait_for_panel", 2.0),
                Step::verify("verify_connection", "multiplayer_connected"),
                Step::verify("check_other_bases", "other_bases_visible"),
                Step::click("simulate_base_notification", 100, 100),
                Step::wait("wait_for_notification", 2.0),
                Step::verify("verify_notification", "base_notification_visible"),
                Step::screenshot("screenshot_multiplayer"),
            ],
            expected_duration: 12.0,
            post_run_validation: true,
        },
        Scenario {
            name: "mobile_experience".to_string(),
            description: "Test mobile-specific functionality".to_string(),
            steps: vec![
                Step::click("simulate_mobile_view", 400, 50),
                Step::wait("wait_for_resize", 2.0),
                Step::verify("verify_mobile_layout", "mobile_layout_active"),
                Step::click("test_mobile_step_tracking", 200, 200),
                Step::wait("wait_for_mobile_ui", 2.0),
                Step::verify("verify_mobile_step_ui", "mobile_step_ui_visible"),
                Step::screenshot("screenshot_mobile"),
            ],
            expected_duration: 8.0,
            post_run_validation: true,
        },
        Scenario {
            name: "performance_stress_test".to_string(),
            description: "Test application performance under stress".to_string(),
            steps: vec![
                Step::click("open_stress_test", 400, 10),
                Step::wait("wait_for_stress_panel", 2.0),
                Step::click("start_stress_test", 450, 100),
                Step::wait("wait_for_test_completion", 30.0),
                Step::verify("verify_performance", "performance_acceptable"),
                Step::screenshot("screenshot_performance"),
            ],
            expected_duration: 35.0,
            post_run_validation: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let scenario = find_scenario("base_establishment_flow").unwrap();
        assert_eq!(scenario.steps.len(), 10);
        assert_eq!(scenario.expected_duration, 15.0);
        assert!(scenario.post_run_validation);
    }

    #[test]
    fn test_registry_unknown_name() {
        assert!(find_scenario("no_such_scenario").is_none());
    }

    #[test]
    fn test_registry_contains_all_builtins() {
        let names: Vec<_> = scenario_summaries().iter().map(|(n, _)| *n).collect();
        assert_eq!(
            names,
            vec![
                "base_establishment_flow",
                "step_tracking_validation",
                "multiplayer_synchronization",
                "mobile_experience",
                "performance_stress_test",
            ]
        );
    }

    #[test]
    fn test_stress_test_skips_post_run_validation() {
        let scenario = find_scenario("performance_stress_test").unwrap();
        assert!(!scenario.post_run_validation);
    }
}
