//! `ezsimd-conformance`: Validates a registry and the artifacts generated from it.
//!
//! Runs the conformance suite across:
//! - the registry (identifiers, references, widths, table coverage)
//! - in-memory generation (consistency, determinism, placeholders)
//! - artifacts written by `ezsimd-make` (presence, pairing, balance, exclusions)
//!
//! **Usage:**
//! ```
//! ezsimd-conformance [--out <path>] [--registry <file>]
//! ```
//!
//! Exits non-zero if any conformance check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use ezsimd_codegen::GeneratorConfig;
use ezsimd_conformance::{run_all, ConformancePaths};
use ezsimd_registry::serializer::json::from_json;
use ezsimd_registry::Registry;

/// Run the ezsimd conformance suite.
#[derive(Parser)]
#[command(
    name = "ezsimd-conformance",
    about = "Validate the ezsimd registry and generated artifacts"
)]
struct Args {
    /// Directory the artifacts were generated into.
    #[arg(long, default_value = "generated")]
    out: PathBuf,

    /// Registry JSON file to validate instead of the built-in x86 registry.
    #[arg(long)]
    registry: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let registry = match &args.registry {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            from_json(&json)
                .with_context(|| format!("Failed to load registry from {}", path.display()))?
        }
        None => Registry::x86().clone(),
    };

    let paths = ConformancePaths {
        artifacts: args.out,
        config: GeneratorConfig::default(),
    };
    let report = run_all(&registry, &paths)?;

    println!("ezsimd Conformance Report");
    println!("=========================");
    println!();

    for result in &report.results {
        println!(
            "[{}] {}: {}",
            result.severity.tag(),
            result.validator,
            result.message
        );
        for detail in &result.details {
            println!("       {}", detail);
        }
    }

    let failed = report.failure_count();
    let warned = report.warning_count();
    println!();
    println!(
        "Summary: {} passed, {} warnings, {} failed",
        report.results.len() - failed - warned,
        warned,
        failed
    );

    if failed > 0 {
        eprintln!("Conformance FAILED: {} check(s) did not pass.", failed);
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}
