//! # Stair Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Geometry` / `*Warning` - Results (JSON-serializable)
//! - `calculate(input)` - Pure calculation function
//!
//! Unlike file or report operations, these never fail: degenerate input is
//! clamped or replaced by defaults.
//!
//! ## Available Calculations
//!
//! - [`stair`] - Step division, tread, run, stringer and incline
//! - [`norms`] - Advisory comfort/code checks on a computed geometry

pub mod norms;
pub mod stair;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use norms::{check_norms, warning_messages, NormWarning};
pub use stair::{calculate, compute_stair_geometry, StairGeometry, StairInput, StairType};

/// Enum wrapper for all calculation types stored in a design file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    /// Stair dimensioning
    Stair(StairInput),
}

impl CalculationItem {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Stair(s) => &s.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Stair(_) => "Stair",
        }
    }
}

/// A stair run through both the dimensioning engine and the norm checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StairResult {
    /// Computed geometry
    pub geometry: StairGeometry,
    /// Norm warnings in check order
    pub warnings: Vec<NormWarning>,
}

impl StairResult {
    /// Dimension a stair and check it.
    pub fn evaluate(input: &StairInput) -> Self {
        let geometry = calculate(input);
        let warnings = check_norms(&geometry);
        StairResult { geometry, warnings }
    }

    /// True when no heuristic fired
    pub fn is_compliant(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Warning messages for display
    pub fn messages(&self) -> Vec<String> {
        warning_messages(&self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_tagging() {
        let item = CalculationItem::Stair(StairInput::new("ST-1", 2700.0));
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"type\":\"Stair\""));
        assert_eq!(item.label(), "ST-1");
        assert_eq!(item.calc_type(), "Stair");
    }

    #[test]
    fn test_evaluate_steep_stair() {
        let mut input = StairInput::new("Loft", 2700.0);
        input.desired_riser_mm = Some(210.0);
        input.desired_tread_mm = Some(180.0);
        let result = StairResult::evaluate(&input);

        assert!(!result.is_compliant());
        assert_eq!(result.geometry.steps, 13);
        let codes: Vec<_> = result.warnings.iter().map(|w| w.code()).collect();
        assert_eq!(codes, vec!["RISER_TOO_HIGH", "TREAD_SHALLOW", "STEEP"]);
        assert_eq!(result.messages().len(), 3);
    }
}
