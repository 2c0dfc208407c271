//! # Stair Geometry Formulas
//!
//! Elementary relations between rise, going and incline of a straight flight.
//!
//! ## Notation
//!
//! - `H` = Total rise (floor to floor)
//! - `n` = Number of risers
//! - `R` = Riser height
//! - `T` = Tread depth (going)
//! - `L` = Total horizontal run
//! - `S` = Stringer (diagonal) length
//! - `α` = Incline angle
//!
//! ```text
//!                         ┌──
//!                    ┌────┘  ↑
//!               ┌────┘       │ H
//!          ┌────┘  R         │
//!     ─────┘ ←T→             ↓
//!     ←────────── L ──────────→
//! ```
//!
//! ## References
//!
//! - F. Blondel, Cours d'architecture (1675): step rule 2R + T ≈ 600-650 mm
//! - DIN 18065 (German stair standard), comfort ranges for R and T

use crate::units::{Degrees, Radians};

/// Smallest rise the engine will dimension, in mm
pub const MIN_EFFECTIVE_RISE_MM: f64 = 10.0;

/// Target step length of the Blondel step rule, in mm
pub const STEP_RULE_TARGET_MM: f64 = 600.0;

/// Rise actually dimensioned: `max(10, H)`.
///
/// A NaN rise collapses to the floor value.
#[inline]
pub fn effective_rise(total_rise_mm: f64) -> f64 {
    total_rise_mm.max(MIN_EFFECTIVE_RISE_MM)
}

/// Initial number of risers: `n = round(H / R)`, at least 1.
#[inline]
pub fn initial_step_count(rise_mm: f64, target_riser_mm: f64) -> u32 {
    let n = (rise_mm / target_riser_mm).round();
    if n < 1.0 || n.is_nan() {
        1
    } else {
        n as u32
    }
}

/// Riser height for `n` equal steps: `R = H / n`
#[inline]
pub fn riser_height(rise_mm: f64, steps: u32) -> f64 {
    rise_mm / f64::from(steps)
}

/// Tread depth that satisfies the step rule exactly: `T = 600 - 2R`
///
/// # Example
///
/// ```rust
/// use stair_core::equations::stair::blondel_tread;
///
/// assert_eq!(blondel_tread(170.0), 260.0);
/// ```
#[inline]
pub fn blondel_tread(riser_mm: f64) -> f64 {
    STEP_RULE_TARGET_MM - 2.0 * riser_mm
}

/// Step length of the Blondel rule: `2R + T`
#[inline]
pub fn step_rule_sum(riser_mm: f64, tread_mm: f64) -> f64 {
    2.0 * riser_mm + tread_mm
}

/// Horizontal run of the flight: `L = T × n`
#[inline]
pub fn flight_run(tread_mm: f64, steps: u32) -> f64 {
    tread_mm * f64::from(steps)
}

/// Stringer length as the hypotenuse of run and rise: `S = √(L² + H²)`
#[inline]
pub fn stringer_length(run_mm: f64, rise_mm: f64) -> f64 {
    (run_mm * run_mm + rise_mm * rise_mm).sqrt()
}

/// Incline angle of the flight: `α = atan2(H, L)`
#[inline]
pub fn incline_angle(rise_mm: f64, run_mm: f64) -> Degrees {
    Radians(rise_mm.atan2(run_mm)).into()
}

/// Round to one decimal place, half away from zero.
#[inline]
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_effective_rise_floor() {
        assert_eq!(effective_rise(2700.0), 2700.0);
        assert_eq!(effective_rise(0.0), 10.0);
        assert_eq!(effective_rise(-300.0), 10.0);
        assert_eq!(effective_rise(f64::NAN), 10.0);
    }

    #[test]
    fn test_initial_step_count() {
        // 2700 / 170 = 15.88 -> 16
        assert_eq!(initial_step_count(2700.0, 170.0), 16);
        // 10 / 170 rounds to 0 -> floored at 1
        assert_eq!(initial_step_count(10.0, 170.0), 1);
        // Exactly half rounds up
        assert_eq!(initial_step_count(255.0, 170.0), 2);
    }

    #[test]
    fn test_riser_height() {
        assert!((riser_height(2700.0, 16) - 168.75).abs() < TOLERANCE);
    }

    #[test]
    fn test_step_rule() {
        assert_eq!(blondel_tread(150.0), 300.0);
        assert!((step_rule_sum(168.8, 280.0) - 617.6).abs() < TOLERANCE);
    }

    #[test]
    fn test_stringer_is_hypotenuse() {
        assert!((stringer_length(3000.0, 4000.0) - 5000.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_incline_angle() {
        assert!((incline_angle(1000.0, 1000.0).0 - 45.0).abs() < TOLERANCE);
        // Scenario from a 16-step, 280 mm going flight
        assert!((incline_angle(2700.0, 4480.0).0 - 31.076).abs() < 0.001);
    }

    #[test]
    fn test_round_tenth() {
        assert_eq!(round_tenth(168.75), 168.8);
        assert_eq!(round_tenth(5230.716), 5230.7);
        assert_eq!(round_tenth(280.0), 280.0);
    }
}
