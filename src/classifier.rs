//! Soil moisture classification.

use serde::Serialize;

use crate::models::Severity;

// ---

/// Below this percentage the soil is too dry.
pub const DRY_BELOW: f64 = 30.0;

/// At or above this percentage the soil is too wet.
pub const WET_FROM: f64 = 60.0;

/// Human label plus severity for a moisture percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoistureStatus {
    pub label: &'static str,
    pub severity: Severity,
}

/// Classify a soil moisture percentage.
///
/// Total over every `f64`: values outside 0..=100 are not clamped, and NaN
/// falls through to `Too Wet`.
pub fn classify(moisture: f64) -> MoistureStatus {
    // ---
    if moisture < DRY_BELOW {
        MoistureStatus {
            label: "Too Dry",
            severity: Severity::Critical,
        }
    } else if moisture < WET_FROM {
        MoistureStatus {
            label: "Optimal",
            severity: Severity::Healthy,
        }
    } else {
        MoistureStatus {
            label: "Too Wet",
            severity: Severity::Warning,
        }
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_boundaries() {
        // ---
        assert_eq!(classify(29.9).severity, Severity::Critical);
        assert_eq!(classify(30.0).severity, Severity::Healthy);
        assert_eq!(classify(59.9).severity, Severity::Healthy);
        assert_eq!(classify(60.0).severity, Severity::Warning);
    }

    #[test]
    fn test_labels() {
        // ---
        assert_eq!(classify(10.0).label, "Too Dry");
        assert_eq!(classify(45.0).label, "Optimal");
        assert_eq!(classify(80.0).label, "Too Wet");
    }

    #[test]
    fn test_out_of_range_values_are_not_clamped() {
        // ---
        assert_eq!(classify(-5.0).severity, Severity::Critical);
        assert_eq!(classify(150.0).severity, Severity::Warning);
        assert_eq!(classify(f64::NEG_INFINITY).severity, Severity::Critical);
        assert_eq!(classify(f64::INFINITY).severity, Severity::Warning);
    }

    #[test]
    fn test_nan_is_too_wet() {
        // ---
        let status = classify(f64::NAN);
        assert_eq!(status.label, "Too Wet");
        assert_eq!(status.severity, Severity::Warning);
    }

    #[test]
    fn test_sweep_matches_thresholds() {
        // ---
        for tenth in -100..=1200 {
            let m = tenth as f64 / 10.0;
            let expected = if m < 30.0 {
                Severity::Critical
            } else if m < 60.0 {
                Severity::Healthy
            } else {
                Severity::Warning
            };
            assert_eq!(classify(m).severity, expected, "moisture {}", m);
        }
    }
}
