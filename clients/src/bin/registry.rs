//! `ezsimd-registry`: Dumps the built-in x86 registry.
//!
//! **Outputs:**
//! - `json`: The full registry, loadable with `ezsimd-make --registry`
//! - `matrix`: One support table per arithmetic operation
//!
//! **Usage:**
//! ```
//! ezsimd-registry [--format json|matrix] [--out <file>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ezsimd_registry::serializer::{json, matrix};
use ezsimd_registry::Registry;

/// Output format.
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Pretty-printed JSON.
    Json,
    /// Plain-text support tables.
    Matrix,
}

/// Dump the built-in ezsimd registry.
#[derive(Parser)]
#[command(name = "ezsimd-registry", about = "Dump the built-in ezsimd registry")]
struct Args {
    /// Output format.
    #[arg(long, value_enum, default_value = "json")]
    format: Format,

    /// File to write; prints to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let registry = Registry::x86();

    let text = match args.format {
        Format::Json => serde_json::to_string_pretty(&json::to_json(registry))
            .context("Failed to serialize registry to JSON")?,
        Format::Matrix => matrix::to_matrix(registry),
    };

    match &args.out {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {}", path.display());
            println!("  Written: {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
