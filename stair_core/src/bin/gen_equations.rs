//! Regenerate EQUATIONS.md from the equation registry.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin gen-equations
//! ```
//!
//! Run from the workspace root; the file is written to
//! `stair_core/src/equations/EQUATIONS.md`.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use stair_core::equations::{generate_equations_markdown, ALL_EQUATIONS};

const OUTPUT_PATH: &str = "stair_core/src/equations/EQUATIONS.md";

fn main() -> ExitCode {
    env_logger::init();

    let markdown = generate_equations_markdown();
    let output_path = Path::new(OUTPUT_PATH);
    log::debug!("{} equations in registry", ALL_EQUATIONS.len());

    match fs::write(output_path, &markdown) {
        Ok(()) => {
            log::info!("wrote {} bytes to {}", markdown.len(), output_path.display());
            println!("Updated {}", output_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("could not write {}: {}", output_path.display(), e);
            eprintln!("Error writing {}: {}", output_path.display(), e);
            ExitCode::FAILURE
        }
    }
}
