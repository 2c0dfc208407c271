//! # stair_core - Stair Dimensioning Engine
//!
//! `stair_core` is the computational heart of Stairwise. From a floor-to-floor
//! rise and a few optional preferences it derives a complete stair geometry
//! (step count, riser, tread, run, stringer length, incline), then checks it
//! against comfort heuristics such as the Blondel step rule.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Geometry and warnings are pure functions of the inputs
//! - **Total**: Dimensioning never fails; degenerate input is clamped
//! - **JSON-First**: Inputs, results and design files implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types for file and report operations
//!
//! ## Quick Start
//!
//! ```rust
//! use stair_core::{check_norms, compute_stair_geometry, StairType};
//!
//! let geometry = compute_stair_geometry(2700.0, Some(170.0), Some(280.0), StairType::Straight, None);
//! assert_eq!(geometry.steps, 16);
//! assert!(check_norms(&geometry).is_empty());
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Dimensioning engine and norm checks
//! - [`equations`] - Formulas and the equation registry
//! - [`project`] - Design file container, metadata, and settings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - File operations with atomic saves and locking
//! - [`pdf`] - Typst-based PDF reports

pub mod calculations;
pub mod equations;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod pdf;
pub mod project;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{
    check_norms, compute_stair_geometry, CalculationItem, NormWarning, StairGeometry, StairInput,
    StairResult, StairType,
};
pub use errors::{CalcError, CalcResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_project, save_project, FileLock};
pub use project::{GlobalSettings, Project, ProjectMetadata};
