//! ezsimd conformance suite.
//!
//! Validates the inputs and outputs of the kernel generator.
//!
//! # Conformance Scope
//!
//! | Subject | Checks |
//! |---------|--------|
//! | Registry | unique identifiers, resolvable keys, lane widths, table coverage |
//! | Generation | cross-artifact consistency, determinism, no placeholders |
//! | Written artifacts | presence, forwarding include, declaration/definition pairing, balance, exclusions |
//!
//! # Entry Point
//!
//! ```no_run
//! use ezsimd_conformance::{run_all, ConformancePaths};
//! use std::path::PathBuf;
//!
//! let paths = ConformancePaths {
//!     artifacts: PathBuf::from("generated"),
//!     config: Default::default(),
//! };
//! let report = run_all(ezsimd_registry::Registry::x86(), &paths).expect("Failed to run conformance");
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

use ezsimd_codegen::GeneratorConfig;
use ezsimd_registry::Registry;

pub use report::{ConformanceReport, Severity, TestResult};

/// Paths and settings required by the conformance runner.
pub struct ConformancePaths {
    /// Directory the artifacts were written to.
    pub artifacts: std::path::PathBuf,
    /// Configuration the artifacts were generated with.
    pub config: GeneratorConfig,
}

/// Runs all conformance validators and returns the aggregated report.
///
/// Validators are run in this order:
/// 1. Registry
/// 2. In-memory generation
/// 3. Written artifacts
///
/// # Errors
///
/// Returns an error only if a file system operation fails.
pub fn run_all(registry: &Registry, paths: &ConformancePaths) -> anyhow::Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    // 1. Registry
    report.extend(validators::registry::validate(registry));

    // 2. Generation
    report.extend(validators::generation::validate(registry, &paths.config));

    // 3. Written artifacts
    report.extend(validators::artifacts::validate(
        &paths.artifacts,
        &paths.config.names,
        registry,
    )?);

    Ok(report)
}
