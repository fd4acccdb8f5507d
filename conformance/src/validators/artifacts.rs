//! Written artifact validator.
//!
//! Re-reads the generated files from disk and checks them as text, without
//! access to the fragments they were rendered from:
//! - all four files exist and the forwarding file includes the public
//!   interface
//! - every public wrapper declaration has exactly one definition
//! - every backend declared in the internal artifact is defined exactly once,
//!   with the same target attribute
//! - `#ifdef` / `#endif` and `#pragma region` / `endregion` balance
//! - excluded numeric types and helper actions never show up

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use ezsimd_codegen::ArtifactNames;
use ezsimd_registry::Registry;
use regex::Regex;
use walkdir::WalkDir;

use crate::report::{ConformanceReport, TestResult};

const VALIDATOR: &str = "artifacts";

/// The four artifacts read back from disk.
struct Files {
    public: String,
    internal: String,
    definitions: String,
    forwarding: String,
}

/// Validates the artifacts written to `dir` under `names`.
///
/// # Errors
///
/// Returns an error if a file exists but cannot be read.
pub fn validate(
    dir: &Path,
    names: &ArtifactNames,
    registry: &Registry,
) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    let present: Vec<String> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    let expected = [
        &names.public,
        &names.internal,
        &names.definitions,
        &names.forwarding,
    ];
    let missing: Vec<String> = expected
        .iter()
        .filter(|name| !present.contains(**name))
        .map(|name| format!("{} not found in {}", name, dir.display()))
        .collect();
    if !missing.is_empty() {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            "Generated artifacts missing",
            missing,
        ));
        return Ok(report);
    }
    report.push(TestResult::pass(VALIDATOR, "All four artifacts present"));

    let read = |name: &str| -> Result<String> {
        let path = dir.join(name);
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    };
    let files = Files {
        public: read(&names.public)?,
        internal: read(&names.internal)?,
        definitions: read(&names.definitions)?,
        forwarding: read(&names.forwarding)?,
    };

    check_forwarding(&files, names, &mut report);
    check_wrappers(&files, &mut report)?;
    check_backends(&files, &mut report)?;
    check_balance(&files, names, &mut report);
    check_exclusions(&files, registry, &mut report)?;
    Ok(report)
}

fn check_forwarding(files: &Files, names: &ArtifactNames, report: &mut ConformanceReport) {
    let include = format!("#include \"{}\"", names.public);
    if files.forwarding.trim() == include {
        report.push(TestResult::pass(
            VALIDATOR,
            format!("{} forwards to {}", names.forwarding, names.public),
        ));
    } else {
        report.push(TestResult::fail(
            VALIDATOR,
            format!("{} does not consist of `{include}`", names.forwarding),
        ));
    }
}

/// Counts occurrences of each captured function head.
fn heads(text: &str, re: &Regex) -> BTreeMap<String, usize> {
    let mut out = BTreeMap::new();
    for caps in re.captures_iter(text) {
        *out.entry(caps[1].to_owned()).or_insert(0) += 1;
    }
    out
}

fn check_wrappers(files: &Files, report: &mut ConformanceReport) -> Result<()> {
    // templates keep `inline`; the call wrappers have external linkage
    let declaration = Regex::new(r"(?m)^\s*((?:inline )?void \w+\(.*\));$")?;
    let definition = Regex::new(r"(?m)^\s*((?:inline )?void \w+\(.*\)) \{$")?;

    let declared = heads(&files.public, &declaration);
    let mut defined = heads(&files.definitions, &definition);
    for (head, n) in heads(&files.internal, &definition) {
        *defined.entry(head).or_insert(0) += n;
    }

    let mut problems = Vec::new();
    for (head, decls) in &declared {
        if *decls > 1 {
            problems.push(format!("`{head}` declared {decls} times"));
        }
        match defined.get(head).copied().unwrap_or(0) {
            1 => {}
            0 => problems.push(format!("`{head}` declared but never defined")),
            n => problems.push(format!("`{head}` defined {n} times")),
        }
    }
    report.push(TestResult::from_problems(
        VALIDATOR,
        format!("All {} public wrapper declarations are defined", declared.len()),
        "Public wrapper declarations without a single definition",
        problems,
    ));
    Ok(())
}

/// (target attribute, head) pairs of backends, counted.
fn backends(text: &str, terminator: &str) -> Result<BTreeMap<(String, String), usize>> {
    let re = Regex::new(&format!(
        r#"(?m)^\s*__attribute__\(\(target\("([\w.,-]+)"\)\)\)\s*\n\s*(inline void \w+Backend\(.*\)){}$"#,
        regex::escape(terminator)
    ))?;
    let mut out = BTreeMap::new();
    for caps in re.captures_iter(text) {
        *out.entry((caps[1].to_owned(), caps[2].to_owned())).or_insert(0) += 1;
    }
    Ok(out)
}

fn check_backends(files: &Files, report: &mut ConformanceReport) -> Result<()> {
    let declared = backends(&files.internal, ";")?;
    let defined = backends(&files.definitions, " {")?;

    let mut problems = Vec::new();
    for key in declared.keys() {
        let (target, head) = key;
        match defined.get(key).copied().unwrap_or(0) {
            1 => {}
            0 => problems.push(format!("target(\"{target}\") `{head}` never defined")),
            n => problems.push(format!("target(\"{target}\") `{head}` defined {n} times")),
        }
    }
    for key @ (target, head) in defined.keys() {
        if !declared.contains_key(key) {
            problems.push(format!("target(\"{target}\") `{head}` defined but not declared"));
        }
    }
    report.push(TestResult::from_problems(
        VALIDATOR,
        format!("All {} backend declarations have one definition", declared.len()),
        "Backend declarations and definitions disagree",
        problems,
    ));
    Ok(())
}

fn check_balance(files: &Files, names: &ArtifactNames, report: &mut ConformanceReport) {
    let mut problems = Vec::new();
    for (name, text) in [
        (&names.public, &files.public),
        (&names.internal, &files.internal),
        (&names.definitions, &files.definitions),
    ] {
        let count = |prefix: &str| {
            text.lines()
                .filter(|l| l.trim_start().starts_with(prefix))
                .count()
        };
        let opens = count("#if");
        let closes = count("#endif");
        if opens != closes {
            problems.push(format!("{name}: {opens} #if/#ifdef vs {closes} #endif"));
        }
        let regions = count("#pragma region");
        let endregions = count("#pragma endregion");
        if regions != endregions {
            problems.push(format!(
                "{name}: {regions} #pragma region vs {endregions} #pragma endregion"
            ));
        }
    }
    report.push(TestResult::from_problems(
        VALIDATOR,
        "Preprocessor conditionals and regions balance",
        "Unbalanced preprocessor blocks",
        problems,
    ));
}

fn check_exclusions(
    files: &Files,
    registry: &Registry,
    report: &mut ConformanceReport,
) -> Result<()> {
    let mut problems = Vec::new();
    let texts = [&files.public, &files.internal, &files.definitions];

    for numeric in registry.numeric_types.iter().filter(|n| n.excluded) {
        let re = Regex::new(&format!(
            r"(^|[^\w]){}([^\w]|$)",
            regex::escape(&numeric.type_name)
        ))?;
        if texts.iter().any(|t| re.is_match(t)) {
            problems.push(format!(
                "excluded type {} (`{}`) appears in generated code",
                numeric.id, numeric.type_name
            ));
        }
    }
    for op in registry.operations.iter().filter(|o| !o.action.is_arithmetic()) {
        let re = Regex::new(&format!(
            r"\bvoid {}(Backend)?\(|#define {}\(",
            regex::escape(&op.name),
            regex::escape(&op.macro_name)
        ))?;
        if texts.iter().any(|t| re.is_match(t)) {
            problems.push(format!(
                "helper action {} emitted as an operation",
                op.action.as_str()
            ));
        }
    }
    report.push(TestResult::from_problems(
        VALIDATOR,
        "No excluded numeric types or helper actions in generated code",
        "Excluded entries in generated code",
        problems,
    ));
    Ok(())
}
