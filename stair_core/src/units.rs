//! # Unit Types
//!
//! Type-safe wrappers for the handful of units a stair design needs.
//! They stay plain f64 newtypes so JSON serialization is just numbers.
//!
//! ## Metric Units (Primary)
//!
//! Stairwise works in millimeters internally, the way stair drawings and
//! European stair norms are dimensioned:
//! - Length: millimeters (mm), meters (m) for report summaries
//! - Angle: degrees (°), radians for trigonometry
//!
//! ## Example
//!
//! ```rust
//! use stair_core::units::{Degrees, Meters, Millimeters, Radians};
//!
//! let rise = Millimeters(2700.0);
//! let rise_m: Meters = rise.into();
//! assert_eq!(rise_m.0, 2.7);
//!
//! let angle: Degrees = Radians(std::f64::consts::FRAC_PI_4).into();
//! assert!((angle.0 - 45.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

// ============================================================================
// Angle Units
// ============================================================================

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Radians(pub f64);

impl From<Radians> for Degrees {
    fn from(rad: Radians) -> Self {
        Degrees(rad.0 * 180.0 / std::f64::consts::PI)
    }
}

impl From<Degrees> for Radians {
    fn from(deg: Degrees) -> Self {
        Radians(deg.0 * std::f64::consts::PI / 180.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Millimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(Degrees);
impl_arithmetic!(Radians);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millimeters_to_meters() {
        let mm = Millimeters(5380.0);
        let m: Meters = mm.into();
        assert_eq!(m.0, 5.38);
    }

    #[test]
    fn test_radians_to_degrees() {
        let deg: Degrees = Radians(std::f64::consts::PI).into();
        assert!((deg.0 - 180.0).abs() < 1e-12);

        let rad: Radians = Degrees(90.0).into();
        assert!((rad.0 - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = Millimeters(4480.0);
        let b = Millimeters(900.0);
        assert_eq!((a + b).0, 5380.0);
        assert_eq!((a - b).0, 3580.0);
        assert_eq!((b * 2.0).0, 1800.0);
        assert_eq!((b / 2.0).0, 450.0);
    }

    #[test]
    fn test_serialization() {
        let mm = Millimeters(168.8);
        let json = serde_json::to_string(&mm).unwrap();
        assert_eq!(json, "168.8");

        let roundtrip: Millimeters = serde_json::from_str(&json).unwrap();
        assert_eq!(mm, roundtrip);
    }
}
