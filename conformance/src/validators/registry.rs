//! Registry validator.
//!
//! The generator trusts its registry. This validator checks what it trusts:
//! - identifiers are unique
//! - every table key names a declared tier or numeric type
//! - register widths are whole bytes and split evenly into lanes
//! - every supported combination has a register type and all five intrinsics
//!   (two loads, the action, two stores)
//! - only arithmetic actions and generated types are marked supported

use std::collections::BTreeSet;

use ezsimd_registry::{Action, Registry};

use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "registry";

/// Validates a registry. Performs no I/O.
#[must_use]
pub fn validate(registry: &Registry) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    check_unique_identifiers(registry, &mut report);
    check_references(registry, &mut report);
    check_widths(registry, &mut report);
    check_table_coverage(registry, &mut report);
    check_support_keys(registry, &mut report);
    report
}

fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    ids.filter(|id| !seen.insert(*id))
        .map(str::to_owned)
        .collect()
}

fn check_unique_identifiers(registry: &Registry, report: &mut ConformanceReport) {
    let mut problems = Vec::new();
    for id in duplicates(registry.tiers.iter().map(|t| t.id.as_str())) {
        problems.push(format!("tier {id} declared more than once"));
    }
    for id in duplicates(registry.numeric_types.iter().map(|n| n.id.as_str())) {
        problems.push(format!("numeric type {id} declared more than once"));
    }
    for id in duplicates(registry.operations.iter().map(|o| o.action.as_str())) {
        problems.push(format!("operation {id} declared more than once"));
    }
    for name in duplicates(registry.operations.iter().map(|o| o.name.as_str())) {
        problems.push(format!("operation name `{name}` used more than once"));
    }
    report.push(TestResult::from_problems(
        VALIDATOR,
        format!(
            "{} tiers, {} numeric types, {} operations with unique identifiers",
            registry.tiers.len(),
            registry.numeric_types.len(),
            registry.operations.len()
        ),
        "Duplicate identifiers in registry",
        problems,
    ));
}

fn check_references(registry: &Registry, report: &mut ConformanceReport) {
    match registry.check_references() {
        Ok(()) => report.push(TestResult::pass(
            VALIDATOR,
            "All table keys reference declared tiers and numeric types",
        )),
        Err(e) => report.push(TestResult::fail(VALIDATOR, e.to_string())),
    }
}

fn check_widths(registry: &Registry, report: &mut ConformanceReport) {
    let mut problems = Vec::new();
    for tier in &registry.tiers {
        if tier.bit_width == 0 || tier.bit_width % 8 != 0 {
            problems.push(format!(
                "{}: register width {} is not a whole number of bytes",
                tier.id, tier.bit_width
            ));
        }
    }
    for (tier_id, action, numeric_id) in registry.support.supported() {
        let (Some(tier), Some(numeric)) = (
            registry.find_tier(tier_id),
            registry.find_numeric_type(numeric_id),
        ) else {
            continue;
        };
        if numeric.bit_width == 0 || tier.bit_width % numeric.bit_width != 0 {
            problems.push(format!(
                "{tier_id} {} {numeric_id}: {} bits do not split into {}-bit lanes",
                action.as_str(),
                tier.bit_width,
                numeric.bit_width
            ));
        }
    }
    report.push(TestResult::from_problems(
        VALIDATOR,
        "Register widths are whole bytes and divide evenly into lanes",
        "Register width problems",
        problems,
    ));
}

fn check_table_coverage(registry: &Registry, report: &mut ConformanceReport) {
    let mut problems = Vec::new();
    let mut cells = 0usize;
    for (tier, action, numeric) in registry.support.supported() {
        if !action.is_arithmetic() {
            continue;
        }
        cells += 1;
        if registry.register_types.get(tier, numeric).is_none() {
            problems.push(format!("{tier} {numeric}: no register type"));
        }
        let needed = [
            Action::PackAligned,
            Action::PackUnaligned,
            action,
            Action::UnpackAligned,
            Action::UnpackUnaligned,
        ];
        for key in needed {
            if registry.intrinsics.get(tier, key, numeric).is_none() {
                problems.push(format!(
                    "{tier} {} {numeric}: no {} intrinsic",
                    action.as_str(),
                    key.as_str()
                ));
            }
        }
    }
    report.push(TestResult::from_problems(
        VALIDATOR,
        format!("All {cells} supported combinations have register types and intrinsics"),
        "Supported combinations missing table entries",
        problems,
    ));
}

fn check_support_keys(registry: &Registry, report: &mut ConformanceReport) {
    let mut notes = Vec::new();
    for (tier, action, numeric) in registry.support.supported() {
        if !action.is_arithmetic() {
            notes.push(format!(
                "{tier} {} {numeric}: helper action marked supported",
                action.as_str()
            ));
        } else if registry
            .find_numeric_type(numeric)
            .is_some_and(|n| n.excluded)
        {
            notes.push(format!(
                "{tier} {} {numeric}: excluded type marked supported",
                action.as_str()
            ));
        }
    }
    if notes.is_empty() {
        report.push(TestResult::pass(
            VALIDATOR,
            "Support matrix marks only arithmetic actions on generated types",
        ));
    } else {
        report.push(TestResult::warn_with_details(
            VALIDATOR,
            "Support matrix entries that never produce a kernel",
            notes,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failures(report: &ConformanceReport) -> Vec<String> {
        report
            .results
            .iter()
            .filter(|r| r.is_failure())
            .flat_map(|r| r.details.clone())
            .collect()
    }

    #[test]
    fn builtin_registry_passes() {
        let report = validate(Registry::x86());
        assert!(report.all_passed(), "{:#?}", report.results);
        assert_eq!(report.warning_count(), 0);
    }

    #[test]
    fn missing_store_is_reported() {
        let mut registry = Registry::x86().clone();
        if let Some(by_action) = registry.intrinsics.0.get_mut("AVX") {
            by_action.remove(&Action::UnpackUnaligned);
        }
        let details = failures(&validate(&registry));
        assert!(details.contains(&"AVX ADD FLOAT32: no UNPACK_UNALIGNED intrinsic".to_owned()));
    }

    #[test]
    fn uneven_lanes_are_reported() {
        let mut registry = Registry::x86().clone();
        if let Some(t) = registry.tiers.iter_mut().find(|t| t.id == "SSE") {
            t.bit_width = 100;
        }
        let report = validate(&registry);
        assert!(!report.all_passed());
    }

    #[test]
    fn excluded_support_is_a_warning() {
        let mut registry = Registry::x86().clone();
        registry.support.insert("AVX", Action::Add, "FLOAT16", true);
        let report = validate(&registry);
        assert_eq!(report.warning_count(), 1);
    }
}
