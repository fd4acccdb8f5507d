//! The generation traversal as a lazy iterator.
//!
//! Order is part of the output contract: operations in list order (arithmetic
//! only), numeric types in list order (excluded types skipped), and for each
//! pair the tiers in list order that the support matrix marks supported.

use ezsimd_registry::{NumericTypeDescriptor, OperationDescriptor, Registry, TierDescriptor};

/// One (operation, numeric type) pair with its supported tiers.
#[derive(Debug, Clone)]
pub struct Combination<'r> {
    /// The operation.
    pub op: &'r OperationDescriptor,
    /// Scalar operator for the fallback and remainder loops.
    pub operator: char,
    /// The numeric type.
    pub numeric: &'r NumericTypeDescriptor,
    /// Supported tiers, in tier-list order.
    pub tiers: Vec<&'r TierDescriptor>,
}

/// Walks operations × numeric types, yielding one [`Combination`] per pair.
///
/// Helper actions (pack/unpack) have no operator and are skipped, as are
/// excluded numeric types.
pub fn combinations<'r>(
    operations: &'r [OperationDescriptor],
    numeric_types: &'r [NumericTypeDescriptor],
    tiers: &'r [TierDescriptor],
    registry: &'r Registry,
) -> impl Iterator<Item = Combination<'r>> + 'r {
    operations
        .iter()
        .filter_map(|op| op.action.operator().map(|operator| (op, operator)))
        .flat_map(move |(op, operator)| {
            numeric_types
                .iter()
                .filter(|numeric| !numeric.excluded)
                .map(move |numeric| Combination {
                    op,
                    operator,
                    numeric,
                    tiers: tiers
                        .iter()
                        .filter(|tier| {
                            registry
                                .support
                                .is_supported(&tier.id, op.action, &numeric.id)
                        })
                        .collect(),
                })
        })
}

/// Groups a combination stream by operation, preserving order.
///
/// Returns one entry per operation that yielded at least one combination.
pub fn by_operation<'r>(
    combos: impl Iterator<Item = Combination<'r>>,
) -> Vec<(&'r OperationDescriptor, Vec<Combination<'r>>)> {
    let mut groups: Vec<(&'r OperationDescriptor, Vec<Combination<'r>>)> = Vec::new();
    for combo in combos {
        match groups.last_mut() {
            Some((op, group)) if std::ptr::eq(*op, combo.op) => group.push(combo),
            _ => groups.push((combo.op, vec![combo])),
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x86_combinations() -> Vec<Combination<'static>> {
        let r = Registry::x86();
        combinations(&r.operations, &r.numeric_types, &r.tiers, r).collect()
    }

    #[test]
    fn four_operations_by_thirteen_types() {
        let combos = x86_combinations();
        assert_eq!(combos.len(), 4 * 13);
        assert!(combos.iter().all(|c| c.numeric.id != "FLOAT16"));
        assert!(combos.iter().all(|c| c.op.action.is_arithmetic()));
    }

    #[test]
    fn order_follows_lists() {
        let combos = x86_combinations();
        assert_eq!(combos[0].op.name, "add");
        assert_eq!(combos[0].numeric.id, "INT8");
        assert_eq!(combos[13].op.name, "sub");
        assert_eq!(combos[51].op.name, "div");
        assert_eq!(combos[51].numeric.id, "FLOAT128");
    }

    #[test]
    fn tiers_are_filtered_by_support() {
        let combos = x86_combinations();
        let add_f32 = combos
            .iter()
            .find(|c| c.op.name == "add" && c.numeric.id == "FLOAT32");
        let ids: Vec<&str> = add_f32
            .map(|c| c.tiers.iter().map(|t| t.id.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(ids, ["SSE", "AVX"]);
        let tier_kernels: usize = combos.iter().map(|c| c.tiers.len()).sum();
        assert_eq!(tier_kernels, Registry::x86().supported_count());
    }

    #[test]
    fn grouping_keeps_operation_order() {
        let groups = by_operation(x86_combinations().into_iter());
        let names: Vec<&str> = groups.iter().map(|(op, _)| op.name.as_str()).collect();
        assert_eq!(names, ["add", "sub", "mul", "div"]);
        assert!(groups.iter().all(|(_, g)| g.len() == 13));
    }
}
