//! # Stairwise CLI Application
//!
//! Terminal front end for stair dimensioning.
//!
//! - `stair_cli` prompts for one stair, prints its geometry and norm
//!   warnings, and optionally saves the design and exports a PDF report.
//! - `stair_cli <design.stw>` loads a design file and prints every stair.
//!
//! Set `RUST_LOG=debug` to trace the dimensioning steps.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;

use stair_core::calculations::{CalculationItem, StairInput, StairResult, StairType};
use stair_core::errors::CalcError;
use stair_core::file_io::{load_project_with_lock_check, save_project, FileLock};
use stair_core::pdf::render_stair_pdf;
use stair_core::project::{GlobalSettings, Project};
use stair_core::units::Meters;

const RULE: &str = "═══════════════════════════════════════";

/// Read one trimmed line; `None` on EOF, I/O error, or blank input
fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    match io::stdin().lock().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => {
            let trimmed = input.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
    }
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_line(prompt)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Blank or unparsable input means "no preference"
fn prompt_optional_f64(prompt: &str) -> Option<f64> {
    prompt_line(prompt).and_then(|s| s.parse().ok())
}

fn prompt_stair_type() -> StairType {
    let Some(answer) = prompt_line("Stair type (straight / l / u / spiral) [straight]: ") else {
        return StairType::default();
    };
    match StairType::from_str_flexible(&answer) {
        Ok(stair_type) => stair_type,
        Err(e) => {
            println!("  {}; using {}", e, StairType::default().display_name());
            StairType::default()
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match std::env::args().nth(1) {
        Some(path) => show_design(Path::new(&path)),
        None => interactive(),
    }
}

fn interactive() -> ExitCode {
    println!("Stairwise CLI - Stair Dimensioning");
    println!("==================================");
    println!();

    let mut input = StairInput::new("ST-1", prompt_f64("Total rise (mm) [2700]: ", 2700.0));
    input.desired_riser_mm = prompt_optional_f64("Desired riser (mm) [auto]: ");
    input.desired_tread_mm = prompt_optional_f64("Desired tread (mm) [auto]: ");
    input.stair_type = prompt_stair_type();
    if input.stair_type.has_landing() {
        input.landing_depth_mm = prompt_optional_f64("Landing depth (mm) [900]: ");
    }

    log::debug!("input: {:?}", input);
    let result = StairResult::evaluate(&input);

    println!();
    print_stair(&input, &result);

    println!();
    println!("JSON Output (for LLM/API use):");
    if let Ok(json) = serde_json::to_string_pretty(&result) {
        println!("{}", json);
    }
    println!();

    let save_path = prompt_line("Save design as (.stw path, blank to skip): ");
    let pdf_path = prompt_line("Export PDF to (path, blank to skip): ");
    if save_path.is_none() && pdf_path.is_none() {
        return ExitCode::SUCCESS;
    }

    let designer = prompt_line("Designer [unknown]: ").unwrap_or_else(|| "unknown".to_string());
    let job_id = prompt_line("Job number [-]: ").unwrap_or_else(|| "-".to_string());

    let mut outcome: Result<(), CalcError> = Ok(());
    if let Some(path) = save_path {
        let mut project = Project::new(designer.as_str(), job_id.as_str(), "");
        project.add_item(CalculationItem::Stair(input.clone()));
        outcome = save_design(&project, Path::new(&path), &designer);
    }
    if let Some(path) = pdf_path {
        let settings = GlobalSettings::default();
        let exported = render_stair_pdf(
            &input,
            &result.geometry,
            &result.warnings,
            &settings,
            &designer,
            &job_id,
        )
        .and_then(|bytes| {
            fs::write(&path, bytes).map_err(|e| CalcError::file_error("write", path.as_str(), e.to_string()))
        });
        if exported.is_ok() {
            println!("Exported report to {}", path);
        }
        outcome = outcome.and(exported);
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

fn save_design(project: &Project, path: &Path, user: &str) -> Result<(), CalcError> {
    let _lock = FileLock::acquire(path, user)?;
    save_project(project, path)?;
    println!("Saved design to {}", path.display());
    Ok(())
}

fn show_design(path: &Path) -> ExitCode {
    let (project, lock) = match load_project_with_lock_check(path) {
        Ok(loaded) => loaded,
        Err(e) => return report_error(&e),
    };

    println!("{}", RULE);
    println!("  {}", path.display());
    println!("  Job {} | {} | designer: {}", project.meta.job_id, project.meta.client, project.meta.designer);
    println!("{}", RULE);
    if let Some(info) = lock {
        println!(
            "Read-only: locked by {} on {} since {}",
            info.user_id,
            info.machine,
            info.locked_at.format("%Y-%m-%d %H:%M")
        );
    }

    let stairs = project.stairs();
    log::debug!("{} stair(s) in {}", stairs.len(), path.display());
    if stairs.is_empty() {
        println!("No stairs in this design.");
        return ExitCode::SUCCESS;
    }

    println!();
    println!(
        "{:<12} {:<10} {:>5} {:>8} {:>8} {:>8} {:>10} {:>6}  {}",
        "Stair", "Type", "Steps", "Riser", "Tread", "Run m", "Stringer m", "Angle", "Checks"
    );
    let results: Vec<(&StairInput, StairResult)> = stairs
        .into_iter()
        .map(|input| (input, StairResult::evaluate(input)))
        .collect();
    for (input, result) in &results {
        let g = &result.geometry;
        let run: Meters = g.total_run().into();
        let stringer: Meters = g.stringer_length().into();
        println!(
            "{:<12} {:<10} {:>5} {:>8.1} {:>8.1} {:>8.2} {:>10.2} {:>6.1}  {}",
            input.label,
            input.stair_type.code(),
            g.steps,
            g.riser_mm,
            g.tread_mm,
            run.0,
            stringer.0,
            g.angle_deg,
            status_icon(result.is_compliant())
        );
    }

    for (input, result) in &results {
        if result.is_compliant() {
            continue;
        }
        println!();
        println!("{}:", input.label);
        for message in result.messages() {
            println!("  ! {}", message);
        }
    }

    ExitCode::SUCCESS
}

fn print_stair(input: &StairInput, result: &StairResult) {
    let g = &result.geometry;
    let run: Meters = g.total_run().into();
    let stringer: Meters = g.stringer_length().into();

    println!("{}", RULE);
    println!("  STAIR GEOMETRY ({})", input.stair_type.display_name());
    println!("{}", RULE);
    println!();
    println!("  Steps:     {}", g.steps);
    println!("  Riser:     {:.1} mm", g.riser_mm);
    println!("  Tread:     {:.1} mm", g.tread_mm);
    println!("  2R + T:    {:.1} mm", g.step_rule_sum_mm());
    println!("  Run:       {:.1} mm ({:.2} m)", g.total_run_mm, run.0);
    println!("  Stringer:  {:.1} mm ({:.2} m)", g.stringer_length_mm, stringer.0);
    println!("  Incline:   {:.1}°", g.angle_deg);
    println!();
    println!("Norm Checks: {}", status_icon(result.is_compliant()));
    for message in result.messages() {
        println!("  ! {}", message);
    }
    println!("{}", RULE);
}

fn report_error(e: &CalcError) -> ExitCode {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
    ExitCode::FAILURE
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[WARN]" }
}
