//! # PDF Generation Module
//!
//! Renders stair reports to PDF using Typst, compiled in-process.
//!
//! ## Architecture
//!
//! - Typst markup is embedded as string constants with `{{PLACEHOLDER}}` slots
//! - Data is injected via string replacement before compilation
//! - The side elevation is drawn with positioned Typst `line` elements
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use stair_core::calculations::{StairInput, StairResult};
//! use stair_core::pdf::render_stair_pdf;
//! use stair_core::project::GlobalSettings;
//!
//! let input = StairInput::new("ST-1", 2700.0);
//! let result = StairResult::evaluate(&input);
//! let pdf = render_stair_pdf(
//!     &input,
//!     &result.geometry,
//!     &result.warnings,
//!     &GlobalSettings::default(),
//!     "Jane Designer",
//!     "26-001",
//! )
//! .unwrap();
//! std::fs::write("stair_report.pdf", pdf).unwrap();
//! ```

use chrono::Utc;
use once_cell::sync::Lazy;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::norms::NormWarning;
use crate::calculations::stair::{StairGeometry, StairInput};
use crate::calculations::StairResult;
use crate::equations::registry::EquationTracker;
use crate::errors::{CalcError, CalcResult};
use crate::project::{GlobalSettings, Project};

/// Bundled fonts, parsed once per process
static FONTS: Lazy<Vec<Font>> = Lazy::new(|| {
    typst_assets::fonts()
        .flat_map(|data| Font::iter(Bytes::new(data)))
        .collect()
});

/// Drawing area of the side elevation (pt)
const ELEVATION_WIDTH_PT: f64 = 440.0;
const ELEVATION_HEIGHT_PT: f64 = 220.0;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world: one detached source, bundled fonts, no file access.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(FontBook::from_fonts(FONTS.iter())),
            library: LazyHash::new(Library::default()),
        }
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

/// Compile Typst markup to PDF bytes
fn compile_pdf(source: String) -> CalcResult<Vec<u8>> {
    let world = PdfWorld::new(source);

    let document = typst::compile(&world).output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        CalcError::Internal {
            message: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })
}

// ============================================================================
// PDF Templates
// ============================================================================

/// Page setup shared by all reports
const PAGE_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2.5cm, bottom: 2.5cm, left: 2cm, right: 2cm),
  fill: rgb("{{BG}}"),
  header: align(right)[
    #text(size: 9pt, fill: gray)[Stairwise Stair Design]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Job: {{JOB_ID}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "DejaVu Sans Mono", size: 10pt, fill: rgb("{{FG}}"))
"##;

/// Title block and project information
const TITLE_TEMPLATE: &str = r##"
#align(center)[
  #block(width: 100%, fill: rgb("{{ACCENT}}"), inset: 14pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[{{TITLE}}]
    #v(4pt)
    #text(size: 13pt)[{{SUBTITLE}}]
  ]
]

#v(12pt)

#grid(
  columns: (1fr, 1fr),
  gutter: 20pt,
  [
    *Project Information*
    #v(4pt)
    #table(
      columns: (auto, 1fr),
      stroke: none,
      inset: 4pt,
      [Job:], [{{JOB_ID}}],
      [Client:], [{{CLIENT}}],
      [Designer:], [{{DESIGNER}}],
    )
  ],
  [
    *Check Basis*
    #v(4pt)
    {{NORM_PROFILE}}
  ],
)
"##;

/// One stair: inputs, geometry, checks, elevation, finishes
const STAIR_TEMPLATE: &str = r##"
#v(12pt)
== Stair {{LABEL}}

#grid(
  columns: (1fr, 1fr),
  gutter: 20pt,
  [
    *Inputs*
    #table(
      columns: (1fr, auto),
      inset: 5pt,
      stroke: 0.5pt,
      [Total rise], [{{RISE}} mm],
      [Desired riser], [{{DESIRED_RISER}}],
      [Desired tread], [{{DESIRED_TREAD}}],
      [Stair type], [{{STAIR_TYPE}}],
      [Landing depth], [{{LANDING}}],
    )
  ],
  [
    *Geometry*
    #table(
      columns: (1fr, auto),
      inset: 5pt,
      stroke: 0.5pt,
      [Steps], [{{STEPS}}],
      [Riser], [{{RISER}} mm],
      [Tread], [{{TREAD}} mm],
      [2R + T], [{{STEP_RULE}} mm],
      [Total run], [{{RUN}} mm],
      [Stringer length], [{{STRINGER}} mm],
      [Incline], [{{ANGLE}}°],
    )
  ],
)

#v(8pt)
*Norm Checks*

{{WARNINGS}}

#v(8pt)
*Side Elevation*

#block(width: 100%, inset: 8pt, stroke: 0.5pt + gray, radius: 2pt)[
  #box(width: {{DRAW_W}}pt, height: {{DRAW_H}}pt)[
{{DRAWING}}
  ]
]

#v(8pt)
*Finish*

#table(
  columns: (1fr, auto),
  inset: 5pt,
  stroke: 0.5pt,
  [Material], [{{MATERIAL}}],
  [Balustrade], [{{BALUSTRADE}}],
  [Baluster spacing], [{{BALUSTER_SPACING}} mm],
  [Handrail height], [{{HANDRAIL}} mm],
)
"##;

fn page_setup(settings: &GlobalSettings, job_id: &str) -> String {
    let (bg, fg) = settings.theme.colors();
    PAGE_TEMPLATE
        .replace("{{BG}}", bg)
        .replace("{{FG}}", fg)
        .replace("{{JOB_ID}}", &escape_typst(job_id))
        .replace("{{DATE}}", &Utc::now().format("%Y-%m-%d").to_string())
}

fn title_block(
    settings: &GlobalSettings,
    title: &str,
    subtitle: &str,
    designer: &str,
    job_id: &str,
    client: &str,
) -> String {
    TITLE_TEMPLATE
        .replace("{{ACCENT}}", settings.theme.accent())
        .replace("{{TITLE}}", title)
        .replace("{{SUBTITLE}}", &escape_typst(subtitle))
        .replace("{{JOB_ID}}", &escape_typst(job_id))
        .replace("{{CLIENT}}", &escape_typst(client))
        .replace("{{DESIGNER}}", &escape_typst(designer))
        .replace("{{NORM_PROFILE}}", &escape_typst(&settings.norm_profile))
}

fn optional_mm(value: Option<f64>, fallback: &str) -> String {
    match value {
        Some(v) if v.is_finite() && v != 0.0 => format!("{:.1} mm", v),
        _ => fallback.to_string(),
    }
}

fn stair_section(
    input: &StairInput,
    geometry: &StairGeometry,
    warnings: &[NormWarning],
    settings: &GlobalSettings,
) -> String {
    let finish = &settings.presentation;
    let landing = if input.stair_type.has_landing() {
        optional_mm(input.landing_depth_mm, "900.0 mm (default)")
    } else {
        "n/a".to_string()
    };

    STAIR_TEMPLATE
        .replace("{{LABEL}}", &escape_typst(&input.label))
        .replace("{{RISE}}", &format!("{:.1}", input.total_rise_mm))
        .replace("{{DESIRED_RISER}}", &optional_mm(input.desired_riser_mm, "auto"))
        .replace("{{DESIRED_TREAD}}", &optional_mm(input.desired_tread_mm, "auto (Blondel)"))
        .replace("{{STAIR_TYPE}}", input.stair_type.display_name())
        .replace("{{LANDING}}", &landing)
        .replace("{{STEPS}}", &geometry.steps.to_string())
        .replace("{{RISER}}", &format!("{:.1}", geometry.riser_mm))
        .replace("{{TREAD}}", &format!("{:.1}", geometry.tread_mm))
        .replace("{{STEP_RULE}}", &format!("{:.1}", geometry.step_rule_sum_mm()))
        .replace("{{RUN}}", &format!("{:.1}", geometry.total_run_mm))
        .replace("{{STRINGER}}", &format!("{:.1}", geometry.stringer_length_mm))
        .replace("{{ANGLE}}", &format!("{:.1}", geometry.angle_deg))
        .replace("{{WARNINGS}}", &warning_list(warnings))
        .replace("{{DRAW_W}}", &format!("{:.0}", ELEVATION_WIDTH_PT))
        .replace("{{DRAW_H}}", &format!("{:.0}", ELEVATION_HEIGHT_PT))
        .replace("{{DRAWING}}", &elevation_drawing(input, geometry, settings))
        .replace("{{MATERIAL}}", finish.material.display_name())
        .replace("{{BALUSTRADE}}", finish.balustrade.display_name())
        .replace("{{BALUSTER_SPACING}}", &format!("{:.0}", finish.baluster_spacing_mm))
        .replace("{{HANDRAIL}}", &format!("{:.0}", finish.handrail_height_mm))
}

fn warning_list(warnings: &[NormWarning]) -> String {
    if warnings.is_empty() {
        return "#text(fill: rgb(\"#2e7d32\"))[All comfort heuristics satisfied.]".to_string();
    }
    warnings
        .iter()
        .map(|w| format!("- #text(fill: rgb(\"#c62828\"))[{}]", escape_typst(&w.to_string())))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Step profile of the flight, unfolded into one plane.
///
/// Points run from the bottom nosing to the top, in millimetres. For
/// stairs with a landing, the landing sits after the lower half of the risers.
fn step_profile(input: &StairInput, geometry: &StairGeometry) -> Vec<(f64, f64)> {
    let landing = if input.stair_type.has_landing() {
        (geometry.total_run_mm - geometry.tread_mm * geometry.steps as f64).max(0.0)
    } else {
        0.0
    };
    let landing_after = geometry.steps / 2;

    let mut points = vec![(0.0, 0.0)];
    let (mut x, mut y) = (0.0, 0.0);
    for i in 0..geometry.steps {
        y += geometry.riser_mm;
        points.push((x, y));
        x += geometry.tread_mm;
        if landing > 0.0 && i + 1 == landing_after {
            x += landing;
        }
        points.push((x, y));
    }
    points
}

fn elevation_drawing(input: &StairInput, geometry: &StairGeometry, settings: &GlobalSettings) -> String {
    let (_, fg) = settings.theme.colors();
    let points = step_profile(input, geometry);

    let (max_x, max_y) = points
        .iter()
        .fold((0.0_f64, 0.0_f64), |(mx, my), &(x, y)| (mx.max(x), my.max(y)));
    if max_x <= 0.0 || max_y <= 0.0 {
        return String::new();
    }
    let scale = (ELEVATION_WIDTH_PT / max_x).min(ELEVATION_HEIGHT_PT / max_y);
    let to_pt = |(x, y): (f64, f64)| (x * scale, ELEVATION_HEIGHT_PT - y * scale);

    let mut out = String::new();
    for pair in points.windows(2) {
        let (x1, y1) = to_pt(pair[0]);
        let (x2, y2) = to_pt(pair[1]);
        out.push_str(&format!(
            "    #place(line(start: ({:.2}pt, {:.2}pt), end: ({:.2}pt, {:.2}pt), stroke: 1pt + rgb(\"{}\")))\n",
            x1, y1, x2, y2, fg
        ));
    }

    // stringer
    let (sx, sy) = to_pt((0.0, 0.0));
    let (ex, ey) = to_pt((max_x, max_y));
    out.push_str(&format!(
        "    #place(line(start: ({:.2}pt, {:.2}pt), end: ({:.2}pt, {:.2}pt), stroke: (paint: gray, thickness: 0.75pt, dash: \"dashed\")))\n",
        sx, sy, ex, ey
    ));
    out
}

/// Equations appendix recolored for the active theme
fn appendix(tracker: &EquationTracker, settings: &GlobalSettings) -> String {
    tracker
        .generate_appendix_typst()
        .replace("#f0f0f0", settings.theme.accent())
}

/// Render a single stair to PDF bytes.
///
/// # Arguments
///
/// * `input` - Stair inputs as entered
/// * `geometry` - Geometry computed from `input`
/// * `warnings` - Norm warnings for `geometry`
/// * `settings` - Theme and finish options
/// * `designer` - Designer name for the title block
/// * `job_id` - Job number for the footer
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(CalcError::Internal)` - If Typst compilation fails
pub fn render_stair_pdf(
    input: &StairInput,
    geometry: &StairGeometry,
    warnings: &[NormWarning],
    settings: &GlobalSettings,
    designer: &str,
    job_id: &str,
) -> CalcResult<Vec<u8>> {
    let mut source = page_setup(settings, job_id);
    source.push_str(&title_block(
        settings,
        "Stair Dimensioning Report",
        &input.label,
        designer,
        job_id,
        "",
    ));
    source.push_str(&stair_section(input, geometry, warnings, settings));

    let mut tracker = EquationTracker::new();
    tracker.record_stair(&input.label);
    source.push_str(&appendix(&tracker, settings));

    let pdf = compile_pdf(source)?;
    log::info!("rendered stair report for {} ({} bytes)", input.label, pdf.len());
    Ok(pdf)
}

/// Render every stair of a project to a single PDF.
///
/// Stairs are recomputed from their inputs and listed by label.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(CalcError::NothingToExport)` - The project has no stairs
///
/// ```rust,no_run
/// use stair_core::pdf::render_project_pdf;
/// use stair_core::project::Project;
///
/// let project = Project::new("Jane Designer", "26-001", "ACME Homes");
/// assert!(render_project_pdf(&project).is_err());
/// ```
pub fn render_project_pdf(project: &Project) -> CalcResult<Vec<u8>> {
    let stairs: Vec<(&StairInput, StairResult)> = project
        .stairs()
        .into_iter()
        .map(|input| (input, StairResult::evaluate(input)))
        .collect();

    if stairs.is_empty() {
        return Err(CalcError::nothing_to_export("Project has no stairs to export"));
    }

    let settings = &project.settings;
    let meta = &project.meta;

    let mut source = page_setup(settings, &meta.job_id);
    source.push_str(&title_block(
        settings,
        "Stair Design Package",
        &meta.client,
        &meta.designer,
        &meta.job_id,
        &meta.client,
    ));
    source.push_str(&summary_table(&stairs));

    let mut tracker = EquationTracker::new();
    for (input, result) in &stairs {
        source.push_str("\n#pagebreak()\n");
        source.push_str(&stair_section(input, &result.geometry, &result.warnings, settings));
        tracker.record_stair(&input.label);
    }
    source.push_str(&appendix(&tracker, settings));

    let pdf = compile_pdf(source)?;
    log::info!(
        "rendered project report for job {} with {} stair(s)",
        meta.job_id,
        stairs.len()
    );
    Ok(pdf)
}

/// Summary table for the cover page
fn summary_table(stairs: &[(&StairInput, StairResult)]) -> String {
    let rows = stairs
        .iter()
        .enumerate()
        .map(|(i, (input, result))| {
            let status = if result.is_compliant() {
                "OK".to_string()
            } else {
                format!("{} warning(s)", result.warnings.len())
            };
            format!(
                "  [{}], [{}], [{}], [{}], [{:.1}], [{:.1}], [{}],",
                i + 1,
                escape_typst(&input.label),
                input.stair_type.display_name(),
                result.geometry.steps,
                result.geometry.riser_mm,
                result.geometry.tread_mm,
                status
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r##"
#v(16pt)
*Summary*

#table(
  columns: (auto, 1fr, auto, auto, auto, auto, auto),
  inset: 5pt,
  stroke: 0.5pt,
  table.header([*\#*], [*Stair*], [*Type*], [*Steps*], [*Riser*], [*Tread*], [*Checks*]),
{}
)
"##,
        rows
    )
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(
            c,
            '*' | '_' | '#' | '$' | '@' | '<' | '>' | '\\' | '`' | '[' | ']' | '=' | '-' | '+' | '/' | '~'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::stair::StairType;
    use crate::calculations::CalculationItem;
    use crate::project::Theme;

    fn assert_pdf(bytes: &[u8]) {
        assert!(bytes.starts_with(b"%PDF"), "Output is not a valid PDF");
        assert!(bytes.len() > 1000, "PDF seems too small");
    }

    #[test]
    fn test_escape_typst() {
        assert_eq!(escape_typst("ST-1"), "ST\\-1");
        assert_eq!(escape_typst("riser < 150 mm"), "riser \\< 150 mm");
        assert_eq!(escape_typst("#1 [main]"), "\\#1 \\[main\\]");
        assert_eq!(escape_typst("plain"), "plain");
    }

    #[test]
    fn test_step_profile_straight() {
        let input = StairInput::new("ST-1", 2700.0);
        let result = StairResult::evaluate(&input);
        let points = step_profile(&input, &result.geometry);

        assert_eq!(points.len(), 2 * result.geometry.steps as usize + 1);
        let &(x, y) = points.last().unwrap();
        assert!((x - result.geometry.total_run_mm).abs() < 1.0);
        assert!((y - 2700.0).abs() < 1.0);
    }

    #[test]
    fn test_step_profile_includes_landing() {
        let mut input = StairInput::new("ST-2", 2700.0);
        input.desired_riser_mm = Some(170.0);
        input.desired_tread_mm = Some(280.0);
        input.stair_type = StairType::LShaped;
        let result = StairResult::evaluate(&input);
        let points = step_profile(&input, &result.geometry);

        // 16 treads of 280 plus a 900 landing
        let &(x, _) = points.last().unwrap();
        assert!((x - 5380.0).abs() < 1e-6);
        let widest = points
            .windows(2)
            .map(|w| w[1].0 - w[0].0)
            .fold(0.0_f64, f64::max);
        assert!((widest - 1180.0).abs() < 1e-6);
    }

    #[test]
    fn test_stair_section_contents() {
        let mut input = StairInput::new("ST-1", 2700.0);
        input.desired_riser_mm = Some(170.0);
        input.desired_tread_mm = Some(280.0);
        let result = StairResult::evaluate(&input);
        let section = stair_section(&input, &result.geometry, &result.warnings, &GlobalSettings::default());

        assert!(section.contains("ST\\-1"));
        assert!(section.contains("[Steps], [16]"));
        assert!(section.contains("5230.7"));
        assert!(section.contains("All comfort heuristics satisfied."));
        assert!(!section.contains("{{"));
    }

    #[test]
    fn test_stair_pdf_generation() {
        let mut input = StairInput::new("ST-1 Main <stair>", 3000.0);
        input.desired_tread_mm = Some(200.0);
        let result = StairResult::evaluate(&input);
        assert!(!result.warnings.is_empty());

        let pdf = render_stair_pdf(
            &input,
            &result.geometry,
            &result.warnings,
            &GlobalSettings::default(),
            "Test Designer",
            "TEST-001",
        );
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());
        assert_pdf(&pdf.unwrap());
    }

    #[test]
    fn test_project_pdf_generation() {
        let mut project = Project::new("Test Designer", "TEST-002", "Test Client");
        project.settings.theme = Theme::Dark;
        let mut l_stair = StairInput::new("ST-2", 2700.0);
        l_stair.stair_type = StairType::LShaped;
        project.add_item(CalculationItem::Stair(StairInput::new("ST-1", 2700.0)));
        project.add_item(CalculationItem::Stair(l_stair));

        let pdf = render_project_pdf(&project);
        assert!(pdf.is_ok(), "PDF generation failed: {:?}", pdf.err());
        assert_pdf(&pdf.unwrap());
    }

    #[test]
    fn test_empty_project_has_nothing_to_export() {
        let project = Project::new("Test Designer", "TEST-003", "Test Client");
        let err = render_project_pdf(&project).unwrap_err();
        assert_eq!(err.error_code(), "NOTHING_TO_EXPORT");
    }
}
