//! # Equation Registry
//!
//! Central registry of the formulas used to dimension and check a stair.
//! Each equation has metadata including references, formulas, and variable definitions.
//!
//! ## Architecture
//!
//! The registry provides:
//! - Type-safe equation identification via the `Equation` enum
//! - Full metadata for PDF generation and audit trails
//! - Serialization support for JSON export
//!
//! ## Usage
//!
//! ```rust
//! use stair_core::equations::registry::{Equation, EquationUsage};
//!
//! // Track equation usage during report generation
//! let usage = EquationUsage::new(Equation::BlondelTread, "ST-1");
//!
//! // Get metadata for the PDF appendix
//! let meta = Equation::BlondelTread.metadata();
//! println!("Formula: {}", meta.formula_typst);
//! ```

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

// ============================================================================
// References
// ============================================================================

/// Source of an equation or limit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum CodeReference {
    /// Blondel's step rule (Cours d'architecture)
    Blondel { year: u16 },
    /// DIN 18065 - Stairs in buildings
    Din18065 { year: u16, section: &'static str },
    /// Plane geometry / trigonometry (no specific reference needed)
    Geometry,
}

impl CodeReference {
    /// Format the reference for display in PDF reports
    pub fn citation(&self) -> String {
        match self {
            CodeReference::Blondel { year } => format!("Blondel, Cours d'architecture ({})", year),
            CodeReference::Din18065 { year, section } => {
                format!("DIN 18065:{} Section {}", year, section)
            }
            CodeReference::Geometry => "Plane Geometry".to_string(),
        }
    }

    /// Short form for inline references
    pub fn short_form(&self) -> &'static str {
        match self {
            CodeReference::Blondel { .. } => "Blondel",
            CodeReference::Din18065 { .. } => "DIN 18065",
            CodeReference::Geometry => "Geometry",
        }
    }
}

// ============================================================================
// Equation Categories
// ============================================================================

/// Categories for organizing equations in the PDF appendix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquationCategory {
    /// Splitting the rise into equal risers
    StepDivision,
    /// Tread depth and horizontal run
    Going,
    /// Stringer and incline of the flight
    FlightGeometry,
    /// Comfort and code heuristics
    ComfortChecks,
}

impl EquationCategory {
    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            EquationCategory::StepDivision => "Step Division",
            EquationCategory::Going => "Going",
            EquationCategory::FlightGeometry => "Flight Geometry",
            EquationCategory::ComfortChecks => "Comfort Checks",
        }
    }

    /// Sort order for PDF appendix (lower = earlier)
    pub fn sort_order(&self) -> u8 {
        match self {
            EquationCategory::StepDivision => 1,
            EquationCategory::Going => 2,
            EquationCategory::FlightGeometry => 3,
            EquationCategory::ComfortChecks => 4,
        }
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a variable used in an equation.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Symbol (e.g., "R", "T", "H")
    pub symbol: &'static str,
    /// Description
    pub description: &'static str,
    /// Units (e.g., "mm", "deg")
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

// ============================================================================
// Equation Metadata
// ============================================================================

/// Complete metadata for an equation.
#[derive(Debug, Clone)]
pub struct EquationMetadata {
    /// Human-readable name (e.g., "Blondel Tread Depth")
    pub name: &'static str,
    /// Brief description of what this equation calculates
    pub description: &'static str,
    /// The formula in Typst math notation for PDF rendering
    pub formula_typst: &'static str,
    /// The formula in plain text for markdown
    pub formula_plain: &'static str,
    /// Source reference
    pub reference: CodeReference,
    /// Variable definitions
    pub variables: Vec<Variable>,
    /// Assumptions or limitations
    pub assumptions: Vec<&'static str>,
    /// Category for grouping in appendix
    pub category: EquationCategory,
    /// Source module where the equation implementation lives
    pub source_module: &'static str,
    /// Function name implementing the equation
    pub source_function: &'static str,
}

// ============================================================================
// Equation Enum
// ============================================================================

/// All equations used in Stairwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Equation {
    /// H_eff = max(10, H)
    EffectiveRise,
    /// n = round(H / R_target), adjusted into the riser band
    StepCount,
    /// R = H / n
    RiserHeight,
    /// T = 600 - 2R
    BlondelTread,
    /// L = T n (+ landing)
    TotalRun,
    /// S = sqrt(L^2 + H^2)
    StringerLength,
    /// alpha = atan2(H, L)
    InclineAngle,
    /// 550 <= 2R + T <= 700
    StepRule,
    /// alpha <= 45 deg
    InclineLimit,
}

impl Equation {
    /// Get the full metadata for this equation
    pub fn metadata(&self) -> EquationMetadata {
        match self {
            Equation::EffectiveRise => EquationMetadata {
                name: "Effective Rise",
                description: "Floor-to-floor height actually dimensioned, with a 10 mm floor against degenerate input",
                formula_typst: r#"$H_"eff" = max(10, H)$"#,
                formula_plain: "H_eff = max(10, H)",
                reference: CodeReference::Geometry,
                variables: vec![
                    Variable::new("H", "Requested total rise", "mm"),
                    Variable::new("H_\"eff\"", "Effective total rise", "mm"),
                ],
                assumptions: vec!["Rise measured finished floor to finished floor"],
                category: EquationCategory::StepDivision,
                source_module: "equations/stair.rs",
                source_function: "effective_rise",
            },

            Equation::StepCount => EquationMetadata {
                name: "Number of Risers",
                description: "Step count nearest to the preferred riser, then stepped until the riser lies in 120-210 mm",
                formula_typst: r#"$n = "round"(H / R_"target")$, $120 <= H / n <= 210$, $1 <= n <= 200$"#,
                formula_plain: "n = round(H / R_target), adjusted so 120 <= H/n <= 210, 1 <= n <= 200",
                reference: CodeReference::Din18065 { year: 2020, section: "6.3" },
                variables: vec![
                    Variable::new("n", "Number of risers", "-"),
                    Variable::new("R_\"target\"", "Preferred riser, clamped to 120-210", "mm"),
                ],
                assumptions: vec!["All risers in a flight are equal"],
                category: EquationCategory::StepDivision,
                source_module: "equations/stair.rs",
                source_function: "initial_step_count",
            },

            Equation::RiserHeight => EquationMetadata {
                name: "Riser Height",
                description: "Height of each step for an equal division of the rise",
                formula_typst: r#"$R = H / n$"#,
                formula_plain: "R = H / n",
                reference: CodeReference::Geometry,
                variables: vec![
                    Variable::new("R", "Riser height", "mm"),
                    Variable::new("n", "Number of risers", "-"),
                ],
                assumptions: vec![],
                category: EquationCategory::StepDivision,
                source_module: "equations/stair.rs",
                source_function: "riser_height",
            },

            Equation::BlondelTread => EquationMetadata {
                name: "Blondel Tread Depth",
                description: "Tread depth satisfying the step rule at its 600 mm optimum",
                formula_typst: r#"$T = 600 - 2 R$"#,
                formula_plain: "T = 600 - 2R",
                reference: CodeReference::Blondel { year: 1675 },
                variables: vec![
                    Variable::new("T", "Tread depth (going)", "mm"),
                    Variable::new("R", "Riser height", "mm"),
                ],
                assumptions: vec!["Used only when no tread preference is given", "Result clamped to 160-400 mm"],
                category: EquationCategory::Going,
                source_module: "equations/stair.rs",
                source_function: "blondel_tread",
            },

            Equation::TotalRun => EquationMetadata {
                name: "Total Run",
                description: "Horizontal projection of the flight, including the landing for L- and U-shaped stairs",
                formula_typst: r#"$L = T n + L_"landing"$"#,
                formula_plain: "L = T * n (+ L_landing for L/U-shaped)",
                reference: CodeReference::Geometry,
                variables: vec![
                    Variable::new("L", "Total run", "mm"),
                    Variable::new("L_\"landing\"", "Landing depth (default 900)", "mm"),
                ],
                assumptions: vec!["Tread counted once per riser"],
                category: EquationCategory::Going,
                source_module: "equations/stair.rs",
                source_function: "flight_run",
            },

            Equation::StringerLength => EquationMetadata {
                name: "Stringer Length",
                description: "Diagonal length of the flight",
                formula_typst: r#"$S = sqrt(L^2 + H^2)$"#,
                formula_plain: "S = sqrt(L^2 + H^2)",
                reference: CodeReference::Geometry,
                variables: vec![
                    Variable::new("S", "Stringer length", "mm"),
                    Variable::new("L", "Total run", "mm"),
                    Variable::new("H", "Total rise", "mm"),
                ],
                assumptions: vec!["Straight projection; landings counted as run"],
                category: EquationCategory::FlightGeometry,
                source_module: "equations/stair.rs",
                source_function: "stringer_length",
            },

            Equation::InclineAngle => EquationMetadata {
                name: "Incline Angle",
                description: "Angle of the flight above horizontal",
                formula_typst: r#"$alpha = "atan2"(H, L)$"#,
                formula_plain: "alpha = atan2(H, L)",
                reference: CodeReference::Geometry,
                variables: vec![
                    Variable::new("alpha", "Incline angle", "deg"),
                ],
                assumptions: vec![],
                category: EquationCategory::FlightGeometry,
                source_module: "equations/stair.rs",
                source_function: "incline_angle",
            },

            Equation::StepRule => EquationMetadata {
                name: "Step Rule",
                description: "Comfortable stride: twice the riser plus the tread",
                formula_typst: r#"$550 <= 2 R + T <= 700$"#,
                formula_plain: "550 <= 2R + T <= 700",
                reference: CodeReference::Blondel { year: 1675 },
                variables: vec![
                    Variable::new("R", "Riser height", "mm"),
                    Variable::new("T", "Tread depth", "mm"),
                ],
                assumptions: vec!["Optimum about 600 mm"],
                category: EquationCategory::ComfortChecks,
                source_module: "equations/stair.rs",
                source_function: "step_rule_sum",
            },

            Equation::InclineLimit => EquationMetadata {
                name: "Incline Limit",
                description: "Flights steeper than 45 degrees are flagged",
                formula_typst: r#"$alpha <= 45 degree$"#,
                formula_plain: "alpha <= 45 deg",
                reference: CodeReference::Din18065 { year: 2020, section: "6.4" },
                variables: vec![
                    Variable::new("alpha", "Incline angle", "deg"),
                ],
                assumptions: vec!["Advisory only"],
                category: EquationCategory::ComfortChecks,
                source_module: "equations/stair.rs",
                source_function: "incline_angle",
            },
        }
    }

    /// Get all equations in a specific category
    pub fn in_category(category: EquationCategory) -> Vec<Equation> {
        ALL_EQUATIONS
            .iter()
            .filter(|eq| eq.metadata().category == category)
            .copied()
            .collect()
    }

    /// Get all categories in appendix order
    pub fn all_categories() -> Vec<EquationCategory> {
        use EquationCategory::*;
        let mut cats = vec![StepDivision, Going, FlightGeometry, ComfortChecks];
        cats.sort_by_key(|c| c.sort_order());
        cats
    }
}

/// All equations in the registry (for iteration)
pub static ALL_EQUATIONS: &[Equation] = &[
    Equation::EffectiveRise,
    Equation::StepCount,
    Equation::RiserHeight,
    Equation::BlondelTread,
    Equation::TotalRun,
    Equation::StringerLength,
    Equation::InclineAngle,
    Equation::StepRule,
    Equation::InclineLimit,
];

// ============================================================================
// Equation Usage Tracking
// ============================================================================

/// Record of an equation being applied to a stair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquationUsage {
    /// The equation that was used
    pub equation: Equation,
    /// Context describing where/why it was used
    pub context: String,
    /// Optional: the stair label this equation was applied to
    pub member_label: Option<String>,
}

impl EquationUsage {
    /// Create a new equation usage record
    pub fn new(equation: Equation, context: impl Into<String>) -> Self {
        Self {
            equation,
            context: context.into(),
            member_label: None,
        }
    }

    /// Create usage record with stair label
    pub fn for_member(equation: Equation, context: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            equation,
            context: context.into(),
            member_label: Some(label.into()),
        }
    }
}

/// Collector for equation usage across a report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquationTracker {
    usages: Vec<EquationUsage>,
}

impl EquationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an equation was used
    pub fn record(&mut self, equation: Equation, context: impl Into<String>) {
        self.usages.push(EquationUsage::new(equation, context));
    }

    /// Record equation usage for a specific stair
    pub fn record_for_member(&mut self, equation: Equation, context: impl Into<String>, label: impl Into<String>) {
        self.usages.push(EquationUsage::for_member(equation, context, label));
    }

    /// Record every equation a stair goes through
    pub fn record_stair(&mut self, label: &str) {
        for equation in stair_calculation_equations() {
            self.record_for_member(equation, "Stair dimensioning", label);
        }
    }

    /// Get all recorded usages
    pub fn usages(&self) -> &[EquationUsage] {
        &self.usages
    }

    /// Get unique equations used (deduplicated, first-use order)
    pub fn unique_equations(&self) -> Vec<Equation> {
        let mut seen = HashSet::new();
        self.usages
            .iter()
            .filter(|u| seen.insert(u.equation))
            .map(|u| u.equation)
            .collect()
    }

    /// Group usages by equation for appendix generation
    pub fn by_equation(&self) -> HashMap<Equation, Vec<&EquationUsage>> {
        let mut map: HashMap<Equation, Vec<&EquationUsage>> = HashMap::new();
        for usage in &self.usages {
            map.entry(usage.equation).or_default().push(usage);
        }
        map
    }

    /// Group unique equations by category for appendix
    pub fn by_category(&self) -> Vec<(EquationCategory, Vec<Equation>)> {
        let mut by_cat: HashMap<EquationCategory, Vec<Equation>> = HashMap::new();
        for eq in self.unique_equations() {
            by_cat.entry(eq.metadata().category).or_default().push(eq);
        }

        let mut result: Vec<_> = by_cat.into_iter().collect();
        result.sort_by_key(|(cat, _)| cat.sort_order());
        result
    }

    /// Merge another tracker into this one
    pub fn merge(&mut self, other: EquationTracker) {
        self.usages.extend(other.usages);
    }
}

// ============================================================================
// Typst Appendix Generation
// ============================================================================

impl EquationTracker {
    /// Generate Typst markup for the "List of Equations" appendix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use stair_core::equations::registry::{Equation, EquationTracker};
    ///
    /// let mut tracker = EquationTracker::new();
    /// tracker.record_for_member(Equation::BlondelTread, "Tread", "ST-1");
    ///
    /// let typst = tracker.generate_appendix_typst();
    /// assert!(typst.contains("Blondel Tread Depth"));
    /// ```
    pub fn generate_appendix_typst(&self) -> String {
        let mut output = String::new();

        output.push_str(r##"
#pagebreak()

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Appendix: List of Equations]
  ]
]

#v(12pt)

#text(size: 10pt)[
  This appendix lists the equations used to dimension and check the stairs in this report.
]

#v(16pt)
"##);

        let by_category = self.by_category();

        if by_category.is_empty() {
            output.push_str("#text(style: \"italic\")[No equations recorded for this report.]\n");
            return output;
        }

        let usage_by_eq = self.by_equation();

        for (category, equations) in by_category {
            output.push_str(&format!("\n== {}\n\n", category.display_name()));

            for equation in equations {
                let meta = equation.metadata();

                output.push_str(&format!("=== {}\n\n", meta.name));
                output.push_str(&format!("#text(size: 10pt)[{}]\n\n", meta.description));
                output.push_str(&format!("*Formula:* {}\n\n", meta.formula_typst));
                output.push_str(&format!("*Reference:* {}\n\n", meta.reference.citation()));

                if !meta.variables.is_empty() {
                    output.push_str("*Variables:*\n");
                    output.push_str("#table(\n");
                    output.push_str("  columns: (auto, 1fr, auto),\n");
                    output.push_str("  inset: 6pt,\n");
                    output.push_str("  stroke: 0.5pt,\n");
                    output.push_str("  align: (left, left, left),\n");
                    output.push_str("  table.header([*Symbol*], [*Description*], [*Units*]),\n");
                    for var in &meta.variables {
                        output.push_str(&format!(
                            "  [${}$], [{}], [{}],\n",
                            escape_typst_math(var.symbol),
                            var.description,
                            var.units
                        ));
                    }
                    output.push_str(")\n\n");
                }

                if let Some(usages) = usage_by_eq.get(&equation) {
                    let mut labels: Vec<&str> = usages
                        .iter()
                        .filter_map(|u| u.member_label.as_deref())
                        .collect();
                    labels.sort();
                    labels.dedup();
                    if !labels.is_empty() {
                        output.push_str(&format!("*Applied to:* {}\n\n", labels.join(", ")));
                    }
                }

                if !meta.assumptions.is_empty() {
                    output.push_str("*Assumptions:*\n");
                    for assumption in &meta.assumptions {
                        output.push_str(&format!("- {}\n", assumption));
                    }
                    output.push('\n');
                }

                output.push_str("#v(8pt)\n");
                output.push_str("#line(length: 100%, stroke: 0.25pt + gray)\n");
                output.push_str("#v(8pt)\n\n");
            }
        }

        output
    }
}

/// Generate a "List of Equations" appendix for a fixed set of equations.
pub fn generate_static_equations_appendix_typst(equations: &[Equation]) -> String {
    let mut tracker = EquationTracker::new();
    for &eq in equations {
        tracker.record(eq, "Reference");
    }
    tracker.generate_appendix_typst()
}

/// Equations every stair goes through, in evaluation order.
pub fn stair_calculation_equations() -> Vec<Equation> {
    ALL_EQUATIONS.to_vec()
}

/// Escape special characters for Typst math mode
fn escape_typst_math(s: &str) -> String {
    s.replace('\\', "\\\\")
}

// ============================================================================
// Markdown Generation for EQUATIONS.md
// ============================================================================

/// Generate a complete EQUATIONS.md file for documentation.
///
/// ```rust
/// use stair_core::equations::registry::generate_equations_markdown;
///
/// let markdown = generate_equations_markdown();
/// assert!(markdown.contains("Stairwise Equations Reference"));
/// assert!(markdown.contains("Step Division"));
/// ```
pub fn generate_equations_markdown() -> String {
    let mut output = String::with_capacity(8_000);

    output.push_str(r#"# Stairwise Equations Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-equations`

This document lists all formulas used to dimension and check stairs in Stairwise.
Each equation includes its formula, reference, source location, and assumptions.

## Conventions

| Quantity | Convention |
|----------|------------|
| Lengths | Millimeters |
| Angles | Degrees above horizontal |
| Rounding | Outputs rounded to 0.1, half away from zero |

---

"#);

    let categories = Equation::all_categories();

    for category in &categories {
        let equations = Equation::in_category(*category);
        if equations.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for equation in equations {
            let meta = equation.metadata();

            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            if !meta.variables.is_empty() {
                output.push_str("**Variables:**\n\n");
                output.push_str("| Symbol | Description | Units |\n");
                output.push_str("|--------|-------------|-------|\n");
                for var in &meta.variables {
                    output.push_str(&format!(
                        "| {} | {} | {} |\n",
                        var.symbol.replace('"', ""),
                        var.description,
                        var.units
                    ));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Reference:** {}\n\n", meta.reference.citation()));
            output.push_str(&format!(
                "**Source:** [`{}`]({})\n\n",
                meta.source_function, meta.source_module
            ));

            if !meta.assumptions.is_empty() {
                output.push_str("**Assumptions:**\n");
                for assumption in &meta.assumptions {
                    output.push_str(&format!("- {}\n", assumption));
                }
                output.push('\n');
            }

            output.push_str("---\n\n");
        }
    }

    output.push_str(&format!(
        "## Statistics\n\n- **Total Equations:** {}\n- **Categories:** {}\n",
        ALL_EQUATIONS.len(),
        categories.len()
    ));

    output
}
