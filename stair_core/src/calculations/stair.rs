//! # Stair Dimensioning
//!
//! Derives step geometry for a flight from the total rise and the user's
//! riser/tread preferences.
//!
//! ## Behavior
//!
//! - Never fails: missing or degenerate input is replaced by defaults or clamped
//! - Riser is driven into 120-210 mm by adding steps (up to 200) or removing them
//! - Tread defaults to the Blondel optimum `600 - 2R`, clamped to 160-400 mm
//! - Spiral treads are capped at 240 mm
//! - L- and U-shaped stairs add a landing (900 mm unless given) to the run
//!
//! ## Example
//!
//! ```rust
//! use stair_core::calculations::stair::{calculate, StairInput, StairType};
//!
//! let input = StairInput {
//!     label: "ST-1".to_string(),
//!     total_rise_mm: 2700.0,
//!     desired_riser_mm: Some(170.0),
//!     desired_tread_mm: Some(280.0),
//!     stair_type: StairType::Straight,
//!     landing_depth_mm: None,
//! };
//!
//! let geometry = calculate(&input);
//! assert_eq!(geometry.steps, 16);
//! assert_eq!(geometry.riser_mm, 168.8);
//! assert_eq!(geometry.total_run_mm, 4480.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::stair::{
    blondel_tread, effective_rise, flight_run, incline_angle, initial_step_count, riser_height,
    round_tenth, stringer_length,
};
use crate::errors::{CalcError, CalcResult};
use crate::units::Millimeters;

/// Riser used when the user states no preference (mm)
pub const DEFAULT_RISER_MM: f64 = 170.0;

/// Lowest riser the engine converges to (mm)
pub const MIN_RISER_MM: f64 = 120.0;

/// Highest riser the engine converges to (mm)
pub const MAX_RISER_MM: f64 = 210.0;

/// Upper bound on the number of risers in one flight
pub const MAX_STEPS: u32 = 200;

/// Shallowest tread the engine will output (mm)
pub const MIN_TREAD_MM: f64 = 160.0;

/// Deepest tread the engine will output (mm)
pub const MAX_TREAD_MM: f64 = 400.0;

/// Tread cap for spiral stairs (mm)
pub const SPIRAL_MAX_TREAD_MM: f64 = 240.0;

/// Landing added to L- and U-shaped runs when none is given (mm)
pub const DEFAULT_LANDING_DEPTH_MM: f64 = 900.0;

/// Stair layout.
///
/// Serializes as `"straight"`, `"l-shaped"`, `"u-shaped"`, `"spiral"`;
/// the short forms `"l"` and `"u"` are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StairType {
    /// Single straight flight
    #[default]
    Straight,
    /// Two flights at a right angle with a quarter landing
    #[serde(alias = "l")]
    LShaped,
    /// Two flights doubling back with a half landing
    #[serde(alias = "u")]
    UShaped,
    /// Winding treads around a newel
    Spiral,
}

impl StairType {
    /// All stair types for UI selection
    pub const ALL: [StairType; 4] = [
        StairType::Straight,
        StairType::LShaped,
        StairType::UShaped,
        StairType::Spiral,
    ];

    /// Code string used in JSON and on the command line
    pub fn code(&self) -> &'static str {
        match self {
            StairType::Straight => "straight",
            StairType::LShaped => "l-shaped",
            StairType::UShaped => "u-shaped",
            StairType::Spiral => "spiral",
        }
    }

    /// Parse from common string representations
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "straight" | "s" | "i" => Ok(StairType::Straight),
            "l-shaped" | "l" | "l-shape" | "quarter-turn" => Ok(StairType::LShaped),
            "u-shaped" | "u" | "u-shape" | "half-turn" => Ok(StairType::UShaped),
            "spiral" | "helical" => Ok(StairType::Spiral),
            _ => Err(CalcError::invalid_input(
                "stair_type",
                s,
                "Expected one of: straight, l-shaped, u-shaped, spiral",
            )),
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            StairType::Straight => "Straight",
            StairType::LShaped => "L-Shaped",
            StairType::UShaped => "U-Shaped",
            StairType::Spiral => "Spiral",
        }
    }

    /// Whether the run includes a landing
    pub fn has_landing(&self) -> bool {
        matches!(self, StairType::LShaped | StairType::UShaped)
    }
}

impl std::fmt::Display for StairType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Input parameters for a stair.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "ST-1",
///   "total_rise_mm": 2700.0,
///   "desired_riser_mm": 170.0,
///   "desired_tread_mm": null,
///   "stair_type": "l-shaped",
///   "landing_depth_mm": 1000.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StairInput {
    /// User label for this stair (e.g., "ST-1", "Basement Stair")
    pub label: String,

    /// Floor-to-floor height in mm
    pub total_rise_mm: f64,

    /// Preferred riser height in mm (170 when absent)
    #[serde(default)]
    pub desired_riser_mm: Option<f64>,

    /// Preferred tread depth in mm (Blondel optimum when absent)
    #[serde(default)]
    pub desired_tread_mm: Option<f64>,

    /// Layout of the stair
    #[serde(default)]
    pub stair_type: StairType,

    /// Landing depth in mm for L/U-shaped stairs (900 when absent)
    #[serde(default)]
    pub landing_depth_mm: Option<f64>,
}

impl StairInput {
    /// Create a straight stair with no riser/tread preference.
    pub fn new(label: impl Into<String>, total_rise_mm: f64) -> Self {
        StairInput {
            label: label.into(),
            total_rise_mm,
            desired_riser_mm: None,
            desired_tread_mm: None,
            stair_type: StairType::Straight,
            landing_depth_mm: None,
        }
    }
}

/// Computed stair geometry.
///
/// All lengths are rounded to 0.1 mm and the angle to 0.1°.
///
/// ## JSON Example
///
/// ```json
/// {
///   "steps": 16,
///   "riser_mm": 168.8,
///   "tread_mm": 280.0,
///   "total_run_mm": 4480.0,
///   "stringer_length_mm": 5230.7,
///   "angle_deg": 31.1
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StairGeometry {
    /// Number of risers
    pub steps: u32,

    /// Riser height (mm)
    pub riser_mm: f64,

    /// Tread depth (mm)
    pub tread_mm: f64,

    /// Horizontal projection of the flight, landing included (mm)
    pub total_run_mm: f64,

    /// Diagonal length of the flight (mm)
    pub stringer_length_mm: f64,

    /// Incline above horizontal (degrees)
    pub angle_deg: f64,
}

impl StairGeometry {
    /// Step length `2R + T` of the rounded geometry (mm)
    pub fn step_rule_sum_mm(&self) -> f64 {
        crate::equations::stair::step_rule_sum(self.riser_mm, self.tread_mm)
    }

    /// Total run as a typed length
    pub fn total_run(&self) -> Millimeters {
        Millimeters(self.total_run_mm)
    }

    /// Stringer length as a typed length
    pub fn stringer_length(&self) -> Millimeters {
        Millimeters(self.stringer_length_mm)
    }
}

/// Treat a stated preference of zero, NaN, or infinity as "no preference".
fn preference(field: &str, value: Option<f64>) -> Option<f64> {
    match value {
        Some(v) if v == 0.0 => {
            log::warn!("{} of 0 treated as no preference", field);
            None
        }
        Some(v) if !v.is_finite() => {
            log::warn!("{} of {} ignored", field, v);
            None
        }
        other => other,
    }
}

/// Landing depth actually added to L/U-shaped runs.
fn landing_depth(value: Option<f64>) -> f64 {
    match value {
        Some(depth) if depth > 0.0 && depth.is_finite() => depth,
        Some(depth) => {
            log::warn!(
                "landing depth of {} mm replaced by default {} mm",
                depth,
                DEFAULT_LANDING_DEPTH_MM
            );
            DEFAULT_LANDING_DEPTH_MM
        }
        None => DEFAULT_LANDING_DEPTH_MM,
    }
}

/// Compute stair geometry from loose parameters.
///
/// # Arguments
///
/// * `total_rise_mm` - Floor-to-floor height (floored at 10 mm)
/// * `desired_riser_mm` - Preferred riser; `None` or `Some(0.0)` means 170
/// * `desired_tread_mm` - Preferred tread; `None` or `Some(0.0)` means `600 - 2R`
/// * `stair_type` - Layout
/// * `landing_depth_mm` - Landing for L/U-shaped stairs; `None` or ≤ 0 means 900
pub fn compute_stair_geometry(
    total_rise_mm: f64,
    desired_riser_mm: Option<f64>,
    desired_tread_mm: Option<f64>,
    stair_type: StairType,
    landing_depth_mm: Option<f64>,
) -> StairGeometry {
    let rise = effective_rise(total_rise_mm);

    let target_riser = preference("desired riser", desired_riser_mm)
        .unwrap_or(DEFAULT_RISER_MM)
        .clamp(MIN_RISER_MM, MAX_RISER_MM);

    let mut steps = initial_step_count(rise, target_riser);
    let mut riser = riser_height(rise, steps);

    // Add steps while too high
    while riser > MAX_RISER_MM && steps < MAX_STEPS {
        steps += 1;
        riser = riser_height(rise, steps);
    }

    // Remove steps while too low
    while riser < MIN_RISER_MM && steps > 1 {
        steps -= 1;
        riser = riser_height(rise, steps);
    }

    log::debug!(
        "rise {:.1} mm, target riser {:.1} mm -> {} steps of {:.2} mm",
        rise,
        target_riser,
        steps,
        riser
    );

    let mut tread = preference("desired tread", desired_tread_mm)
        .unwrap_or_else(|| blondel_tread(riser))
        .clamp(MIN_TREAD_MM, MAX_TREAD_MM);

    if stair_type == StairType::Spiral {
        tread = tread.min(SPIRAL_MAX_TREAD_MM);
    }

    let mut total_run = flight_run(tread, steps);
    if stair_type.has_landing() {
        total_run += landing_depth(landing_depth_mm);
    }

    let stringer = stringer_length(total_run, rise);
    let angle = incline_angle(rise, total_run);

    StairGeometry {
        steps,
        riser_mm: round_tenth(riser),
        tread_mm: round_tenth(tread),
        total_run_mm: round_tenth(total_run),
        stringer_length_mm: round_tenth(stringer),
        angle_deg: round_tenth(angle.value()),
    }
}

/// Compute stair geometry for a stair input.
pub fn calculate(input: &StairInput) -> StairGeometry {
    let geometry = compute_stair_geometry(
        input.total_rise_mm,
        input.desired_riser_mm,
        input.desired_tread_mm,
        input.stair_type,
        input.landing_depth_mm,
    );
    log::debug!("{}: {:?}", input.label, geometry);
    geometry
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn straight_2700() -> StairInput {
        StairInput {
            label: "Test Stair".to_string(),
            total_rise_mm: 2700.0,
            desired_riser_mm: Some(170.0),
            desired_tread_mm: Some(280.0),
            stair_type: StairType::Straight,
            landing_depth_mm: None,
        }
    }

    #[test]
    fn test_straight_scenario() {
        let g = calculate(&straight_2700());
        assert_eq!(g.steps, 16);
        assert_eq!(g.riser_mm, 168.8);
        assert_eq!(g.tread_mm, 280.0);
        assert_eq!(g.total_run_mm, 4480.0);
        assert_eq!(g.stringer_length_mm, 5230.7);
        assert_eq!(g.angle_deg, 31.1);
    }

    #[test]
    fn test_typed_lengths() {
        let g = calculate(&straight_2700());
        assert_eq!(g.total_run(), Millimeters(4480.0));
        let stringer: crate::units::Meters = g.stringer_length().into();
        assert!((stringer.0 - 5.2307).abs() < 1e-9);
    }

    #[test]
    fn test_l_shaped_adds_landing() {
        let straight = calculate(&straight_2700());
        let mut input = straight_2700();
        input.stair_type = StairType::LShaped;
        input.landing_depth_mm = Some(900.0);
        let g = calculate(&input);

        assert_eq!(g.steps, straight.steps);
        assert_eq!(g.riser_mm, straight.riser_mm);
        assert_eq!(g.tread_mm, straight.tread_mm);
        assert_eq!(g.total_run_mm, 5380.0);
        assert_eq!(g.stringer_length_mm, 6019.5);
        assert_eq!(g.angle_deg, 26.7);
        assert!(g.angle_deg < straight.angle_deg);
    }

    #[test]
    fn test_u_shaped_default_landing() {
        let mut input = straight_2700();
        input.stair_type = StairType::UShaped;
        for landing in [None, Some(0.0), Some(-250.0)] {
            input.landing_depth_mm = landing;
            assert_eq!(calculate(&input).total_run_mm, 5380.0);
        }
        input.landing_depth_mm = Some(1200.0);
        assert_eq!(calculate(&input).total_run_mm, 5680.0);
    }

    #[test]
    fn test_landing_ignored_for_straight() {
        let mut input = straight_2700();
        input.landing_depth_mm = Some(1200.0);
        assert_eq!(calculate(&input).total_run_mm, 4480.0);
    }

    #[test]
    fn test_defaults_without_preferences() {
        let g = calculate(&StairInput::new("ST", 2700.0));
        // 16 risers of 168.75, tread 600 - 337.5 = 262.5
        assert_eq!(g.steps, 16);
        assert_eq!(g.riser_mm, 168.8);
        assert_eq!(g.tread_mm, 262.5);
        assert_eq!(g.total_run_mm, 4200.0);
    }

    #[test]
    fn test_zero_riser_means_default() {
        let zero = compute_stair_geometry(2700.0, Some(0.0), None, StairType::Straight, None);
        let default = compute_stair_geometry(2700.0, Some(170.0), None, StairType::Straight, None);
        assert_eq!(zero, default);
    }

    #[test]
    fn test_zero_and_nan_tread_mean_default() {
        let absent = compute_stair_geometry(2700.0, None, None, StairType::Straight, None);
        let zero = compute_stair_geometry(2700.0, None, Some(0.0), StairType::Straight, None);
        let nan = compute_stair_geometry(2700.0, None, Some(f64::NAN), StairType::Straight, None);
        assert_eq!(zero, absent);
        assert_eq!(nan, absent);
    }

    #[test]
    fn test_target_riser_clamped() {
        // 500 is clamped to 210: round(2700 / 210) = 13 -> 207.7
        let g = compute_stair_geometry(2700.0, Some(500.0), None, StairType::Straight, None);
        assert_eq!(g.steps, 13);
        assert_eq!(g.riser_mm, 207.7);

        // Negative preference is clamped up to 120: round(2700 / 120) = 23 -> 117.4 -> 22 steps
        let g = compute_stair_geometry(2700.0, Some(-5.0), None, StairType::Straight, None);
        assert_eq!(g.steps, 22);
        assert_eq!(g.riser_mm, 122.7);
    }

    #[test]
    fn test_tread_clamped() {
        let deep = compute_stair_geometry(2700.0, None, Some(900.0), StairType::Straight, None);
        assert_eq!(deep.tread_mm, MAX_TREAD_MM);
        let shallow = compute_stair_geometry(2700.0, None, Some(50.0), StairType::Straight, None);
        assert_eq!(shallow.tread_mm, MIN_TREAD_MM);
    }

    #[test]
    fn test_spiral_cap() {
        let g = compute_stair_geometry(3000.0, None, Some(320.0), StairType::Spiral, None);
        assert_eq!(g.tread_mm, SPIRAL_MAX_TREAD_MM);
        // No landing on spiral stairs
        assert_eq!(g.total_run_mm, 240.0 * f64::from(g.steps));
    }

    #[test]
    fn test_degenerate_rise() {
        for rise in [0.0, -100.0, f64::NAN] {
            let g = compute_stair_geometry(rise, None, None, StairType::Straight, None);
            assert_eq!(g.steps, 1);
            assert_eq!(g.riser_mm, 10.0);
        }
    }

    #[test]
    fn test_high_rise_adds_steps() {
        // 430 / 210 rounds to 2 -> 215 mm, loop adds a step
        let g = compute_stair_geometry(430.0, Some(210.0), None, StairType::Straight, None);
        assert_eq!(g.steps, 3);
        assert_eq!(g.riser_mm, 143.3);
    }

    #[test]
    fn test_step_limit_only_bounds_adjustment() {
        // The initial count is already in band, the 200-step limit does not cap it
        let g = compute_stair_geometry(100_000.0, None, None, StairType::Straight, None);
        assert_eq!(g.steps, 588);
        assert_eq!(g.riser_mm, 170.1);
    }

    #[test]
    fn test_low_rise_rebalanced() {
        // 181 / 120 rounds to 2 -> 90.5 mm, loop removes a step
        let g = compute_stair_geometry(181.0, Some(120.0), None, StairType::Straight, None);
        assert_eq!(g.steps, 1);
        assert_eq!(g.riser_mm, 181.0);
    }

    #[test]
    fn test_stair_type_parsing() {
        assert_eq!(StairType::from_str_flexible("L").unwrap(), StairType::LShaped);
        assert_eq!(StairType::from_str_flexible("u_shaped").unwrap(), StairType::UShaped);
        assert_eq!(StairType::from_str_flexible(" Spiral ").unwrap(), StairType::Spiral);
        assert!(StairType::from_str_flexible("ramp").is_err());
    }

    #[test]
    fn test_stair_type_serialization() {
        assert_eq!(serde_json::to_string(&StairType::LShaped).unwrap(), "\"l-shaped\"");
        let short: StairType = serde_json::from_str("\"u\"").unwrap();
        assert_eq!(short, StairType::UShaped);
        for t in StairType::ALL {
            let json = serde_json::to_string(&t).unwrap();
            assert_eq!(json, format!("\"{}\"", t.code()));
        }
    }

    #[test]
    fn test_input_serialization_defaults() {
        let input: StairInput =
            serde_json::from_str(r#"{ "label": "ST-2", "total_rise_mm": 3000.0 }"#).unwrap();
        assert_eq!(input.stair_type, StairType::Straight);
        assert_eq!(input.desired_riser_mm, None);

        let json = serde_json::to_string_pretty(&straight_2700()).unwrap();
        let roundtrip: StairInput = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, straight_2700());
    }

    fn stair_type() -> impl Strategy<Value = StairType> {
        prop::sample::select(StairType::ALL.to_vec())
    }

    fn preference_mm() -> impl Strategy<Value = Option<f64>> {
        prop::option::of(100.0f64..450.0)
    }

    proptest! {
        #[test]
        fn riser_band_reached_when_possible(rise in 240.0f64..42_000.0, riser in preference_mm()) {
            let g = compute_stair_geometry(rise, riser, None, StairType::Straight, None);
            let exact = rise / f64::from(g.steps);
            prop_assert!(g.steps >= 1);
            prop_assert!((MIN_RISER_MM..=MAX_RISER_MM).contains(&exact), "riser {} for {} steps", exact, g.steps);
        }

        #[test]
        fn stringer_is_hypotenuse(
            rise in 10.0f64..20_000.0,
            riser in preference_mm(),
            tread in preference_mm(),
            kind in stair_type(),
            landing in prop::option::of(0.0f64..3000.0),
        ) {
            let g = compute_stair_geometry(rise, riser, tread, kind, landing);
            let expected = (g.total_run_mm.powi(2) + rise.powi(2)).sqrt();
            prop_assert!((g.stringer_length_mm - expected).abs() <= 0.11);
            let angle = rise.atan2(g.total_run_mm).to_degrees();
            prop_assert!((g.angle_deg - angle).abs() <= 0.11);
            prop_assert!(g.angle_deg > 0.0 && g.angle_deg < 90.0);
        }

        #[test]
        fn tread_within_limits(rise in 10.0f64..20_000.0, tread in preference_mm(), kind in stair_type()) {
            let g = compute_stair_geometry(rise, None, tread, kind, None);
            prop_assert!(g.tread_mm >= MIN_TREAD_MM && g.tread_mm <= MAX_TREAD_MM);
            if kind == StairType::Spiral {
                prop_assert!(g.tread_mm <= SPIRAL_MAX_TREAD_MM);
            }
        }

        #[test]
        fn identical_inputs_identical_output(rise in -500.0f64..20_000.0, riser in preference_mm(), kind in stair_type()) {
            let a = compute_stair_geometry(rise, riser, None, kind, Some(1000.0));
            let b = compute_stair_geometry(rise, riser, None, kind, Some(1000.0));
            prop_assert_eq!(a, b);
        }

        #[test]
        fn steps_never_decrease_with_rise(
            rise in 10.0f64..20_000.0,
            extra in 0.0f64..2_000.0,
            riser in prop::option::of(120.0f64..210.0),
        ) {
            let lower = compute_stair_geometry(rise, riser, None, StairType::Straight, None);
            let higher = compute_stair_geometry(rise + extra, riser, None, StairType::Straight, None);
            prop_assert!(higher.steps >= lower.steps);
        }
    }
}
