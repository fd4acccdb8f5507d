//! Generation validator.
//!
//! Runs the generator against a registry in memory and reports the
//! cross-artifact consistency check, determinism, and any table entries that
//! fell back to placeholders.

use ezsimd_codegen::{consistency, generate_all, GeneratorConfig};
use ezsimd_registry::Registry;

use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "generation";

/// Generates with `config` and validates the result. Performs no I/O.
#[must_use]
pub fn validate(registry: &Registry, config: &GeneratorConfig) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let artifacts = generate_all(registry, config);

    match consistency::check(&artifacts, registry) {
        Ok(summary) => report.push(TestResult::pass(
            VALIDATOR,
            format!(
                "Artifacts consistent: {} backends, {} wrappers, {} macros",
                summary.backends, summary.wrappers, summary.macros
            ),
        )),
        Err(e) => report.push(TestResult::fail(VALIDATOR, e.to_string())),
    }

    let missing: Vec<String> = artifacts
        .report
        .missing
        .iter()
        .map(|m| format!("{} {} {}", m.tier, m.key, m.numeric))
        .collect();
    report.push(TestResult::from_problems(
        VALIDATOR,
        "No placeholders emitted",
        format!("{} placeholders emitted for missing table entries", missing.len()),
        missing,
    ));

    let first = artifacts.render();
    let second = generate_all(registry, config).render();
    if first == second {
        report.push(TestResult::pass(VALIDATOR, "Two runs produce identical artifacts"));
    } else {
        report.push(TestResult::fail(VALIDATOR, "Two runs produced different artifacts"));
    }
    report
}
