//! # Norm Checks
//!
//! Advisory comfort and code heuristics evaluated against a computed
//! [`StairGeometry`]. Checks never block a design; they produce an ordered
//! list of warnings, empty when every heuristic passes.
//!
//! Warnings are structured values. Their `Display` impl renders the
//! message shown to users, and `code()` gives a stable identifier.
//!
//! ## Example
//!
//! ```rust
//! use stair_core::calculations::norms::{check_norms, warning_messages};
//! use stair_core::calculations::stair::StairGeometry;
//!
//! let geometry = StairGeometry {
//!     steps: 12,
//!     riser_mm: 100.0,
//!     tread_mm: 200.0,
//!     total_run_mm: 2400.0,
//!     stringer_length_mm: 2600.0,
//!     angle_deg: 50.0,
//! };
//!
//! let warnings = check_norms(&geometry);
//! assert_eq!(warnings.len(), 5);
//! assert_eq!(warning_messages(&warnings)[0], "riser below 120 mm — unusually low.");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::stair::StairGeometry;

/// Riser below which a stair is unusually low (mm)
pub const RISER_VERY_LOW_MM: f64 = 120.0;

/// Lower bound of the ergonomic riser range (mm)
pub const RISER_ERGONOMIC_MIN_MM: f64 = 150.0;

/// Riser above which a stair is potentially unsafe (mm)
pub const RISER_MAX_MM: f64 = 200.0;

/// Minimum comfortable tread (mm)
pub const TREAD_MIN_MM: f64 = 240.0;

/// Lower bound of the step rule `2R + T` (mm)
pub const STEP_RULE_MIN_MM: f64 = 550.0;

/// Upper bound of the step rule `2R + T` (mm)
pub const STEP_RULE_MAX_MM: f64 = 700.0;

/// Incline above which a stair is steep (degrees)
pub const MAX_COMFORT_ANGLE_DEG: f64 = 45.0;

/// A violated heuristic, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NormWarning {
    /// Riser below 120 mm
    RiserVeryLow,
    /// Riser below 150 mm
    RiserBelowErgonomic,
    /// Riser above 200 mm
    RiserTooHigh,
    /// Tread below 240 mm
    TreadShallow,
    /// 2R + T outside 550-700 mm
    StepRuleOutOfRange { sum_mm: f64 },
    /// Incline above 45°
    Steep { angle_deg: f64 },
}

impl NormWarning {
    /// Get a short code for programmatic handling
    pub fn code(&self) -> &'static str {
        match self {
            NormWarning::RiserVeryLow => "RISER_VERY_LOW",
            NormWarning::RiserBelowErgonomic => "RISER_BELOW_ERGONOMIC",
            NormWarning::RiserTooHigh => "RISER_TOO_HIGH",
            NormWarning::TreadShallow => "TREAD_SHALLOW",
            NormWarning::StepRuleOutOfRange { .. } => "STEP_RULE_OUT_OF_RANGE",
            NormWarning::Steep { .. } => "STEEP",
        }
    }
}

impl fmt::Display for NormWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormWarning::RiserVeryLow => write!(f, "riser below 120 mm — unusually low."),
            NormWarning::RiserBelowErgonomic => {
                write!(f, "riser < 150 mm — below recommended ergonomic range.")
            }
            NormWarning::RiserTooHigh => {
                write!(f, "riser > 200 mm — exceeds typical limits, potentially unsafe.")
            }
            NormWarning::TreadShallow => {
                write!(f, "tread < 240 mm — may be too shallow for comfortable gait.")
            }
            NormWarning::StepRuleOutOfRange { sum_mm } => write!(
                f,
                "2R+T = {} mm — outside 550–700 mm (optimum ≈600 mm).",
                sum_mm.round() as i64
            ),
            NormWarning::Steep { angle_deg } => {
                write!(f, "incline {:.1}° > 45° — steep.", angle_deg)
            }
        }
    }
}

/// Evaluate every heuristic against a geometry.
///
/// Checks are independent and appended in a fixed order, so several may
/// fire for one geometry (a riser below 120 mm also reports the ergonomic
/// range).
pub fn check_norms(geometry: &StairGeometry) -> Vec<NormWarning> {
    let mut warnings = Vec::new();
    let riser = geometry.riser_mm;
    let tread = geometry.tread_mm;

    if riser < RISER_VERY_LOW_MM {
        warnings.push(NormWarning::RiserVeryLow);
    }
    if riser < RISER_ERGONOMIC_MIN_MM {
        warnings.push(NormWarning::RiserBelowErgonomic);
    }
    if riser > RISER_MAX_MM {
        warnings.push(NormWarning::RiserTooHigh);
    }
    if tread < TREAD_MIN_MM {
        warnings.push(NormWarning::TreadShallow);
    }

    let sum_mm = geometry.step_rule_sum_mm();
    if !(STEP_RULE_MIN_MM..=STEP_RULE_MAX_MM).contains(&sum_mm) {
        warnings.push(NormWarning::StepRuleOutOfRange { sum_mm });
    }

    if geometry.angle_deg > MAX_COMFORT_ANGLE_DEG {
        warnings.push(NormWarning::Steep {
            angle_deg: geometry.angle_deg,
        });
    }

    if !warnings.is_empty() {
        log::debug!("{} norm warning(s): {:?}", warnings.len(), warnings);
    }
    warnings
}

/// Render warnings as display strings, preserving order.
pub fn warning_messages(warnings: &[NormWarning]) -> Vec<String> {
    warnings.iter().map(ToString::to_string).collect()
}
