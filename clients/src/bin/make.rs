//! `ezsimd-make`: Generates the multiversioned C++ kernel artifacts.
//!
//! Reads the built-in x86 registry (or a registry JSON file), generates the
//! public interface, internal declarations and definitions, checks that they
//! agree with each other, and writes them together with the forwarding file.
//!
//! **Usage:**
//! ```
//! ezsimd-make [--out <path>] [--registry <file>] [--namespace <name>] [--show-func-macro <name>]
//! ```
//!
//! Exits non-zero if the artifacts are inconsistent or any write failed.

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
use ezsimd_codegen::writer::write_artifacts;
use ezsimd_codegen::{consistency, generate_all, GeneratorConfig};
use ezsimd_registry::serializer::json::from_json;
use ezsimd_registry::Registry;

/// Generate the ezsimd C++ kernel artifacts.
#[derive(Parser)]
#[command(
    name = "ezsimd-make",
    about = "Generate multiversioned C++ SIMD array kernels"
)]
struct Args {
    /// Output directory for the generated artifacts.
    #[arg(long, default_value = "generated")]
    out: PathBuf,

    /// Registry JSON file to use instead of the built-in x86 registry.
    #[arg(long)]
    registry: Option<PathBuf>,

    /// C++ namespace of the generated symbols.
    #[arg(long, default_value = "ezsimd")]
    namespace: String,

    /// Macro that traces which kernel was dispatched.
    #[arg(long, default_value = "EZSIMD_SHOW_FUNC")]
    show_func_macro: String,
}

fn load_registry(path: Option<&PathBuf>) -> Result<Registry> {
    let Some(path) = path else {
        return Ok(Registry::x86().clone());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    from_json(&json).with_context(|| format!("Failed to load registry from {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let registry = load_registry(args.registry.as_ref())?;
    let config = GeneratorConfig {
        namespace: args.namespace,
        show_func_macro: args.show_func_macro,
        ..GeneratorConfig::default()
    };

    println!(
        "Generating ezsimd from registry v{}: {} tiers, {} numeric types, {} operations",
        registry.version,
        registry.tiers.len(),
        registry.numeric_types.len(),
        registry.operations.len()
    );

    let artifacts = generate_all(&registry, &config);
    let summary = consistency::check(&artifacts, &registry)
        .context("Generated artifacts are inconsistent")?;
    log::debug!("{summary:?}");

    let report = &artifacts.report;
    println!(
        "Generated {} (operation, type) pairs: {} scalar kernels, {} tier kernels, {} wrappers, {} macros",
        report.pair_count,
        report.scalar_kernels,
        report.tier_kernel_total(),
        report.wrapper_count,
        report.macro_count
    );
    for (tier, count) in &report.tier_kernels {
        println!("  {tier:<6} {count}");
    }
    if !report.missing.is_empty() {
        println!(
            "  {} placeholders emitted for missing table entries",
            report.missing.len()
        );
    }

    let written = write_artifacts(artifacts.render(), &args.out, &config.names);
    println!("Files written ({}):", written.written.len());
    for path in &written.written {
        println!("  {}", path.display());
    }

    if !written.is_complete() {
        for (path, err) in &written.failed {
            eprintln!("  failed: {}: {err:#}", path.display());
        }
        eprintln!("Generation FAILED: {} file(s) not written.", written.failed.len());
        process::exit(1);
    }

    println!("Generation complete.");
    Ok(())
}
