//! # Stair Equations
//!
//! Every formula used to dimension and check a stair lives here. Having them
//! in one place enables:
//! - Easy verification against the step rule and stair norms
//! - Documentation of assumptions and conventions
//! - A generated equations appendix for PDF reports
//!
//! ## Modules
//!
//! - [`stair`] - Rise division, going, stringer, and incline formulas
//! - [`registry`] - Equation metadata and tracking for PDF appendix generation
//!
//! ## Conventions
//!
//! - **Lengths**: millimeters
//! - **Angles**: degrees above horizontal
//! - **Rise**: floor-to-floor, always dimensioned with a 10 mm floor

pub mod registry;
pub mod stair;

// Re-export commonly used items
pub use stair::{
    blondel_tread,
    effective_rise,
    flight_run,
    incline_angle,
    initial_step_count,
    riser_height,
    round_tenth,
    step_rule_sum,
    stringer_length,
};

pub use registry::{
    CodeReference,
    Equation,
    EquationCategory,
    EquationMetadata,
    EquationTracker,
    EquationUsage,
    Variable,
    ALL_EQUATIONS,
    generate_equations_markdown,
    generate_static_equations_appendix_typst,
    stair_calculation_equations,
};
