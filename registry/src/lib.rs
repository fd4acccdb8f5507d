//! ezsimd metadata registry encoded as typed Rust data.
//!
//! The `ezsimd-registry` crate provides the facts the kernel generator needs
//! for every instruction-set tier, numeric type and operation: activation
//! guards, register widths, target-dispatch attributes, the support matrix,
//! register type names and intrinsic symbols. A built-in x86 registry (MMX,
//! SSE, SSE2, AVX, AVX2) ships as static data; other registries can be built
//! in code or loaded from JSON.
//!
//! # Entry Point
//!
//! ```
//! let registry = ezsimd_registry::Registry::x86();
//! assert_eq!(registry.tiers.len(), 5);
//! ```
//!
//! # Serialization
//!
//! ```
//! let registry = ezsimd_registry::Registry::x86();
//! let json = ezsimd_registry::serializer::json::to_json(registry);
//! let matrix = ezsimd_registry::serializer::matrix::to_matrix(registry);
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod catalog;
pub mod model;
pub mod serializer;
pub mod tiers;

pub use model::{
    Action, IntrinsicTable, NumericTypeDescriptor, OperationDescriptor, RegisterTypeTable,
    Registry, SupportMatrix, TierDescriptor,
};

use tiers::TierModule;

/// Errors raised while loading or checking a registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The JSON document does not describe a registry.
    #[error("invalid registry JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A table is keyed by a tier the tier list does not declare.
    #[error("table references undeclared tier `{0}`")]
    UnknownTier(String),
    /// A table is keyed by a numeric type the type list does not declare.
    #[error("table references undeclared numeric type `{0}`")]
    UnknownNumericType(String),
    /// A supported cell's register does not split into whole lanes.
    #[error("{tier} ({tier_bits} bits) does not split into {numeric_bits}-bit {numeric} lanes")]
    UnevenLanes {
        /// Tier identifier.
        tier: String,
        /// Tier register width.
        tier_bits: u32,
        /// Numeric type identifier.
        numeric: String,
        /// Numeric type width.
        numeric_bits: u32,
    },
}

impl Registry {
    /// Returns the built-in x86 registry.
    ///
    /// Tier order is `MMX → SSE → SSE2 → AVX → AVX2`; numeric types run
    /// `INT8 … FLOAT128` with `FLOAT16` excluded; the operation list holds
    /// the four arithmetic operations followed by the four pack/unpack
    /// helper actions.
    #[must_use]
    pub fn x86() -> &'static Registry {
        static REGISTRY: std::sync::OnceLock<Registry> = std::sync::OnceLock::new();
        REGISTRY.get_or_init(|| {
            Registry::from_tier_modules(
                "1.0.0",
                catalog::numeric_types(),
                catalog::operations(),
                tiers::all(),
            )
        })
    }

    /// Assembles a registry from per-tier modules.
    #[must_use]
    pub fn from_tier_modules(
        version: &str,
        numeric_types: Vec<NumericTypeDescriptor>,
        operations: Vec<OperationDescriptor>,
        modules: Vec<TierModule>,
    ) -> Registry {
        let mut registry = Registry {
            version: version.to_owned(),
            numeric_types,
            operations,
            ..Registry::default()
        };

        for module in modules {
            let tier = module.descriptor.id.clone();
            for (numeric, register) in module.register_types {
                registry.register_types.insert(&tier, numeric, register);
            }
            for (action, numerics) in module.support {
                for numeric in numerics {
                    registry.support.insert(&tier, action, numeric, true);
                }
            }
            for (action, rows) in module.intrinsics {
                for (numeric, symbol) in rows {
                    registry.intrinsics.insert(&tier, action, numeric, symbol);
                }
            }
            registry.tiers.push(module.descriptor);
        }

        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_order() {
        let ids: Vec<&str> = Registry::x86().tiers.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["MMX", "SSE", "SSE2", "AVX", "AVX2"]);
    }

    #[test]
    fn numeric_type_count() {
        let registry = Registry::x86();
        assert_eq!(registry.numeric_types.len(), 14);
        assert_eq!(registry.generated_numeric_types().count(), 13);
    }

    #[test]
    fn only_half_precision_is_excluded() {
        let excluded: Vec<&str> = Registry::x86()
            .numeric_types
            .iter()
            .filter(|n| n.excluded)
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(excluded, ["FLOAT16"]);
    }

    #[test]
    fn operation_list_keeps_helper_actions_last() {
        let registry = Registry::x86();
        assert_eq!(registry.operations.len(), 8);
        let arithmetic: Vec<&str> = registry
            .arithmetic_operations()
            .map(|o| o.name.as_str())
            .collect();
        assert_eq!(arithmetic, ["add", "sub", "mul", "div"]);
        assert_eq!(
            registry.find_operation(Action::Add).map(|o| o.macro_name.as_str()),
            Some("ADD")
        );
    }

    #[test]
    fn supported_kernel_count() {
        // MMX 14 + SSE 4 + SSE2 22 + AVX 8 + AVX2 20.
        assert_eq!(Registry::x86().supported_count(), 68);
    }

    #[test]
    fn only_mmx_needs_cleanup() {
        let with_cleanup: Vec<&str> = Registry::x86()
            .tiers
            .iter()
            .filter(|t| t.cleanup.is_some())
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(with_cleanup, ["MMX"]);
    }

    #[test]
    fn every_supported_cell_has_its_intrinsics() {
        let registry = Registry::x86();
        for (tier, action, numeric) in registry.support.supported() {
            assert!(
                registry.register_types.get(tier, numeric).is_some(),
                "missing register type for {tier}/{numeric}"
            );
            for needed in [
                action,
                Action::PackAligned,
                Action::PackUnaligned,
                Action::UnpackAligned,
                Action::UnpackUnaligned,
            ] {
                assert!(
                    registry.intrinsics.get(tier, needed, numeric).is_some(),
                    "missing {} for {tier}/{numeric}",
                    needed.as_str()
                );
            }
        }
    }

    #[test]
    fn avx2_stores_take_256_bit_registers() {
        let store = Registry::x86()
            .intrinsics
            .get("AVX2", Action::UnpackUnaligned, "INT32")
            .unwrap_or_default();
        assert!(store.contains("const __m256i vec"), "{store}");
    }

    #[test]
    fn built_in_references_resolve() {
        assert!(Registry::x86().check_references().is_ok());
        assert!(Registry::x86().check_widths().is_ok());
    }

    #[test]
    fn zero_width_type_has_no_lanes() {
        let mut registry = Registry::x86().clone();
        if let Some(n) = registry.numeric_types.iter_mut().find(|n| n.id == "INT32") {
            n.bit_width = 0;
        }
        let (Some(sse2), Some(int32)) = (
            registry.find_tier("SSE2"),
            registry.find_numeric_type("INT32"),
        ) else {
            panic!("built-in registry is missing SSE2/INT32");
        };
        assert_eq!(sse2.lanes(int32), 0);
        assert!(matches!(
            registry.check_widths(),
            Err(RegistryError::UnevenLanes { numeric, numeric_bits: 0, .. }) if numeric == "INT32"
        ));
    }

    #[test]
    fn unknown_tier_reference_is_reported() {
        let mut registry = Registry::x86().clone();
        registry.support.insert("AVX512", Action::Add, "INT8", true);
        assert!(matches!(
            registry.check_references(),
            Err(RegistryError::UnknownTier(t)) if t == "AVX512"
        ));
    }
}
