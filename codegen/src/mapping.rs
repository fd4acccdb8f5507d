//! Registry → C++ mapping tables.
//!
//! Deterministic mappings from operations and numeric types to the function
//! names and signatures every artifact shares. Declarations and definitions
//! are built from the same [`Signature`] value, so they cannot drift apart.

use ezsimd_registry::{NumericTypeDescriptor, OperationDescriptor, TierDescriptor};

use crate::fragment::{Param, Signature, SymbolRole};

/// Target attribute of the scalar fallback.
pub const DEFAULT_TARGET: &str = "default";

/// Template parameter list of the fixed-length wrapper.
pub const ARRAY_TEMPLATE: &str = "std::size_t S";

/// Name of the multiversioned kernel for an operation (`add` → `addBackend`).
#[must_use]
pub fn backend_name(op: &OperationDescriptor) -> String {
    format!("{}Backend", op.name)
}

/// `const T* a, const T* b, T* c, std::size_t l`.
fn pointer_params(numeric: &NumericTypeDescriptor) -> Vec<Param> {
    let t = &numeric.type_name;
    vec![
        Param::new(format!("const {t}*"), "a"),
        Param::new(format!("const {t}*"), "b"),
        Param::new(format!("{t}*"), "c"),
        Param::new("std::size_t", "l"),
    ]
}

/// The scalar fallback kernel: `target("default")`.
#[must_use]
pub fn fallback_signature(op: &OperationDescriptor, numeric: &NumericTypeDescriptor) -> Signature {
    Signature {
        role: SymbolRole::Backend,
        template: None,
        target: Some(DEFAULT_TARGET.to_owned()),
        name: backend_name(op),
        params: pointer_params(numeric),
    }
}

/// One tier kernel: same name and parameters as the fallback, the tier's
/// target attribute.
#[must_use]
pub fn tier_signature(
    op: &OperationDescriptor,
    numeric: &NumericTypeDescriptor,
    tier: &TierDescriptor,
) -> Signature {
    Signature {
        target: Some(tier.target.clone()),
        ..fallback_signature(op, numeric)
    }
}

/// The `std::vector` wrapper.
#[must_use]
pub fn vector_signature(op: &OperationDescriptor, numeric: &NumericTypeDescriptor) -> Signature {
    let t = &numeric.type_name;
    Signature {
        role: SymbolRole::VectorWrapper,
        template: None,
        target: None,
        name: op.name.clone(),
        params: vec![
            Param::new(format!("const std::vector<{t}>&"), "a"),
            Param::new(format!("const std::vector<{t}>&"), "b"),
            Param::new(format!("std::vector<{t}>&"), "c"),
        ],
    }
}

/// The pointer + length wrapper.
#[must_use]
pub fn pointer_signature(op: &OperationDescriptor, numeric: &NumericTypeDescriptor) -> Signature {
    Signature {
        role: SymbolRole::PointerWrapper,
        template: None,
        target: None,
        name: op.name.clone(),
        params: pointer_params(numeric),
    }
}

/// The `std::array<T, S>` template wrapper.
#[must_use]
pub fn array_signature(op: &OperationDescriptor, numeric: &NumericTypeDescriptor) -> Signature {
    let t = &numeric.type_name;
    Signature {
        role: SymbolRole::ArrayWrapper,
        template: Some(ARRAY_TEMPLATE.to_owned()),
        target: None,
        name: op.name.clone(),
        params: vec![
            Param::new(format!("const std::array<{t}, S>&"), "a"),
            Param::new(format!("const std::array<{t}, S>&"), "b"),
            Param::new(format!("std::array<{t}, S>&"), "c"),
        ],
    }
}

/// Placeholder spelled in place of a missing intrinsic table entry.
///
/// Deliberately undefined so the generated code fails to compile at the
/// offending call.
#[must_use]
pub fn missing_placeholder(tier: &str, action: &str, numeric: &str) -> String {
    format!("EZSIMD_MISSING_{tier}_{action}_{numeric}")
}

#[cfg(test)]
mod tests {
    use ezsimd_registry::{Action, Registry};

    use super::*;

    #[test]
    fn tier_and_fallback_share_parameters() {
        let registry = Registry::x86();
        let add = registry.find_operation(Action::Add);
        let int32 = registry.find_numeric_type("INT32");
        let sse2 = registry.find_tier("SSE2");
        let (Some(add), Some(int32), Some(sse2)) = (add, int32, sse2) else {
            panic!("built-in registry is missing ADD/INT32/SSE2");
        };
        let fallback = fallback_signature(add, int32);
        let tier = tier_signature(add, int32, sse2);
        assert_eq!(fallback.name, "addBackend");
        assert_eq!(fallback.params, tier.params);
        assert_eq!(tier.target.as_deref(), Some("sse2"));
        assert_eq!(
            fallback.head(),
            "inline void addBackend(const int32_t* a, const int32_t* b, int32_t* c, std::size_t l)"
        );
    }

    #[test]
    fn wrappers_use_the_display_name() {
        let registry = Registry::x86();
        let (Some(sub), Some(f64_)) = (
            registry.find_operation(Action::Sub),
            registry.find_numeric_type("FLOAT64"),
        ) else {
            panic!("built-in registry is missing SUB/FLOAT64");
        };
        assert_eq!(vector_signature(sub, f64_).name, "sub");
        assert_eq!(
            array_signature(sub, f64_).param_types(),
            "const std::array<double, S>&, const std::array<double, S>&, std::array<double, S>&"
        );
    }

    #[test]
    fn placeholder_is_an_identifier() {
        let p = missing_placeholder("SSE", "PACK_ALIGNED", "INT8");
        assert_eq!(p, "EZSIMD_MISSING_SSE_PACK_ALIGNED_INT8");
        assert!(p.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
    }
}
