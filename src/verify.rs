//! Pixel-state verification against a static rule table.
//!
//! Each expected-state label maps to per-channel color acceptance ranges
//! and a minimum matching-pixel count. A frame verifies when at least
//! `min_pixels` of its pixels fall inside all three ranges. This is a
//! coarse heuristic, not a visual diff; it is deterministic for a given
//! frame and label.

use serde::Serialize;

use crate::backend::Frame;

/// Per-channel acceptance ranges plus a minimum matching-pixel count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationRule {
    /// Inclusive (min, max) acceptance range per RGB channel
    pub channel_ranges: [(u8, u8); 3],

    /// Minimum number of matching pixels required to verify
    pub min_pixels: u32,
}

/// Look up the verification rule for an expected-state label
pub fn rule_for(label: &str) -> Option<VerificationRule> {
    let (ranges, min_pixels) = match label {
        "step_counter_visible" => ([(0, 100), (0, 255), (0, 100)], 1000),
        "base_dialog_open" => ([(200, 255), (200, 255), (200, 255)], 5000),
        "base_marker_visible" => ([(100, 200), (0, 100), (100, 200)], 500),
        "gps_mode_active" => ([(0, 100), (200, 255), (0, 100)], 200),
        "device_mode_active" => ([(200, 255), (0, 100), (200, 255)], 200),
        "multiplayer_connected" => ([(0, 100), (200, 255), (0, 100)], 300),
        "other_bases_visible" => ([(100, 200), (100, 200), (100, 200)], 200),
        "base_notification_visible" => ([(200, 255), (200, 255), (0, 100)], 1000),
        "mobile_layout_active" => ([(0, 100), (0, 100), (0, 100)], 10000),
        "mobile_step_ui_visible" => ([(0, 100), (200, 255), (0, 100)], 500),
        "performance_acceptable" => ([(0, 100), (200, 255), (0, 100)], 100),
        _ => return None,
    };
    Some(VerificationRule {
        channel_ranges: ranges,
        min_pixels,
    })
}

/// Outcome of checking a frame against a verification rule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verification {
    /// Whether the frame satisfied the rule
    pub verified: bool,

    /// Number of pixels inside all three channel ranges
    pub matching_pixels: u32,

    /// The rule's minimum matching-pixel count (0 for unknown labels)
    pub required_pixels: u32,

    /// min(matching / required, 1.0); 0.0 for unknown labels
    pub confidence: f64,

    /// The expected-state label that was checked
    pub expected_state: String,

    /// Failure detail for unknown labels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check a captured frame against the rule for the given label
pub fn verify_state(label: &str, frame: &Frame) -> Verification {
    let Some(rule) = rule_for(label) else {
        return Verification {
            verified: false,
            matching_pixels: 0,
            required_pixels: 0,
            confidence: 0.0,
            expected_state: label.to_string(),
            error: Some(format!("Unknown verification state: {}", label)),
        };
    };

    let matching = count_matching_pixels(frame, &rule);
    let verified = matching >= rule.min_pixels;
    let confidence = (f64::from(matching) / f64::from(rule.min_pixels)).min(1.0);

    Verification {
        verified,
        matching_pixels: matching,
        required_pixels: rule.min_pixels,
        confidence,
        expected_state: label.to_string(),
        error: None,
    }
}

fn count_matching_pixels(frame: &Frame, rule: &VerificationRule) -> u32 {
    let [(r_min, r_max), (g_min, g_max), (b_min, b_max)] = rule.channel_ranges;
    let mut matching = 0u32;
    for px in frame.as_bytes().chunks_exact(3) {
        if px[0] >= r_min
            && px[0] <= r_max
            && px[1] >= g_min
            && px[1] <= g_max
            && px[2] >= b_min
            && px[2] <= b_max
        {
            matching += 1;
        }
    }
    matching
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unknown_label() {
        let frame = Frame::with_color(10, 10, [0, 255, 0]);
        let result = verify_state("nonexistent_state", &frame);
        assert!(!result.verified);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.required_pixels, 0);
        assert!(result.error.is_some());
    }

    #[test]
    fn test_verify_gps_mode_clamps_confidence() {
        // 250 matching pixels against a minimum of 200: verified, clamped
        let mut frame = Frame::with_color(100, 100, [255, 0, 0]);
        frame.draw_rect(0, 0, 25, 10, [50, 230, 50]);
        let result = verify_state("gps_mode_active", &frame);

        assert_eq!(result.matching_pixels, 250);
        assert_eq!(result.required_pixels, 200);
        assert!(result.verified);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_verify_below_minimum() {
        // 100 matching pixels against a minimum of 200
        let mut frame = Frame::with_color(100, 100, [255, 0, 0]);
        frame.draw_rect(0, 0, 10, 10, [50, 230, 50]);
        let result = verify_state("gps_mode_active", &frame);

        assert!(!result.verified);
        assert_eq!(result.matching_pixels, 100);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_verify_is_deterministic() {
        let mut frame = Frame::with_color(64, 64, [10, 10, 10]);
        frame.draw_rect(4, 4, 30, 30, [50, 230, 50]);

        let first = verify_state("gps_mode_active", &frame);
        let second = verify_state("gps_mode_active", &frame);
        assert_eq!(first, second);
    }

    #[test]
    fn test_channel_ranges_are_inclusive() {
        // Boundary values on every channel must count as matching
        let frame = Frame::with_color(20, 20, [100, 200, 100]);
        let result = verify_state("gps_mode_active", &frame);
        assert_eq!(result.matching_pixels, 400);
        assert!(result.verified);
    }

    #[test]
    fn test_all_labels_have_rules() {
        for label in [
            "step_counter_visible",
            "base_dialog_open",
            "base_marker_visible",
            "gps_mode_active",
            "device_mode_active",
            "multiplayer_connected",
            "other_bases_visible",
            "base_notification_visible",
            "mobile_layout_active",
            "mobile_step_ui_visible",
            "performance_acceptable",
        ] {
            assert!(rule_for(label).is_some(), "missing rule for {}", label);
        }
    }
}
