//! Plain text rendering of the support matrix.
//!
//! One block per arithmetic operation, one row per numeric type, one column per
//! tier. Supported cells show the intrinsic used, unsupported cells a dash.

use std::fmt::Write as FmtWrite;

use crate::model::Registry;

/// Renders the support matrix of `registry`.
#[must_use]
pub fn to_matrix(registry: &Registry) -> String {
    let mut out = String::with_capacity(8 * 1024);
    let _ = writeln!(out, "ezsimd registry v{}", registry.version);

    let type_width = registry
        .numeric_types
        .iter()
        .map(|n| n.id.len())
        .max()
        .unwrap_or(0)
        .max(4);

    for op in registry.arithmetic_operations() {
        let columns: Vec<usize> = registry
            .tiers
            .iter()
            .map(|tier| {
                registry
                    .numeric_types
                    .iter()
                    .filter_map(|n| registry.intrinsics.get(&tier.id, op.action, &n.id))
                    .map(cell_text_len)
                    .max()
                    .unwrap_or(0)
                    .max(tier.id.len())
            })
            .collect();

        out.push('\n');
        let _ = write!(out, "{:type_width$}", op.macro_name);
        for (tier, width) in registry.tiers.iter().zip(columns.iter().copied()) {
            let _ = write!(out, " | {:width$}", tier.id);
        }
        out.push('\n');

        for numeric in &registry.numeric_types {
            let _ = write!(out, "{:type_width$}", numeric.id);
            for (tier, width) in registry.tiers.iter().zip(columns.iter().copied()) {
                let cell = if numeric.excluded {
                    "excluded"
                } else if registry.support.is_supported(&tier.id, op.action, &numeric.id) {
                    registry
                        .intrinsics
                        .get(&tier.id, op.action, &numeric.id)
                        .unwrap_or("?")
                } else {
                    "-"
                };
                let _ = write!(out, " | {:width$}", cell);
            }
            out.truncate(out.trim_end().len());
            out.push('\n');
        }
    }

    out
}

fn cell_text_len(s: &str) -> usize {
    s.chars().count()
}
