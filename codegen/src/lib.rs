//! ezsimd kernel generator.
//!
//! Reads a metadata registry (by default `ezsimd_registry::Registry::x86()`)
//! and emits three coordinated C++ artifacts: a public interface of wrapper
//! declarations and invocation macros, an internal artifact of backend
//! declarations and fixed-length templates, and a definitions artifact holding
//! one scalar fallback plus one multiversioned kernel per supported tier for
//! every (operation, numeric type) pair.
//!
//! ```
//! use ezsimd_codegen::{consistency, generate_all, GeneratorConfig};
//!
//! let registry = ezsimd_registry::Registry::x86();
//! let artifacts = generate_all(registry, &GeneratorConfig::default());
//! assert!(consistency::check(&artifacts, registry).is_ok());
//! let rendered = artifacts.render();
//! assert!(rendered.definitions.contains("__attribute__((target(\"sse2\")))"));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod consistency;
pub mod emit;
pub mod error;
pub mod fragment;
pub mod kernels;
pub mod layout;
pub mod mapping;
pub mod preamble;
pub mod traversal;
pub mod wrappers;
pub mod writer;

use ezsimd_registry::{NumericTypeDescriptor, OperationDescriptor, Registry, TierDescriptor};

pub use config::{ArtifactNames, GeneratorConfig};
pub use error::ConsistencyError;
use fragment::{Artifact, ArtifactKind, Fragment};
use kernels::MissingEntry;

/// Report of what was generated.
#[derive(Debug, Default, Clone)]
pub struct GenerationReport {
    /// (operation, numeric type) pairs visited.
    pub pair_count: usize,
    /// Scalar fallback kernels, one per pair.
    pub scalar_kernels: usize,
    /// Tier kernels per tier, in tier order.
    pub tier_kernels: Vec<(String, usize)>,
    /// Wrapper definitions (vector, pointer and array).
    pub wrapper_count: usize,
    /// Invocation macros.
    pub macro_count: usize,
    /// Table lookups that fell back to a placeholder.
    pub missing: Vec<MissingEntry>,
}

impl GenerationReport {
    /// Total tier kernels across all tiers.
    #[must_use]
    pub fn tier_kernel_total(&self) -> usize {
        self.tier_kernels.iter().map(|(_, n)| n).sum()
    }

    fn count_tier(&mut self, id: &str) {
        if let Some((_, n)) = self.tier_kernels.iter_mut().find(|(t, _)| t == id) {
            *n += 1;
        }
    }
}

/// The three artifacts of one run, as fragment sequences.
#[derive(Debug, Clone)]
pub struct Artifacts {
    /// Public interface.
    pub public: Artifact,
    /// Internal declarations and templates.
    pub internal: Artifact,
    /// Kernel and wrapper definitions.
    pub definitions: Artifact,
    /// Content of the auxiliary forwarding file.
    pub forwarding: String,
    /// What was generated.
    pub report: GenerationReport,
}

/// The four artifacts as text, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifacts {
    /// Public interface.
    pub public: String,
    /// Internal declarations and templates.
    pub internal: String,
    /// Kernel and wrapper definitions.
    pub definitions: String,
    /// Auxiliary forwarding file.
    pub forwarding: String,
}

impl Artifacts {
    /// Serializes every artifact to text.
    #[must_use]
    pub fn render(&self) -> RenderedArtifacts {
        RenderedArtifacts {
            public: self.public.render(),
            internal: self.internal.render(),
            definitions: self.definitions.render(),
            forwarding: self.forwarding.clone(),
        }
    }
}

/// Appends a fragment to all three artifacts.
fn push_all(artifacts: [&mut Artifact; 3], fragment: &Fragment) {
    for artifact in artifacts {
        artifact.push(fragment.clone());
    }
}

/// Generates the three artifacts for the given lists.
///
/// Operations are walked in list order (arithmetic only), then numeric types
/// in list order (excluded types skipped), then tiers in list order filtered
/// by the support matrix. The same inputs always produce the same output.
/// Supported combinations missing a table entry are logged, recorded in the
/// report and emitted as an undefined placeholder identifier.
#[must_use]
pub fn generate(
    operations: &[OperationDescriptor],
    numeric_types: &[NumericTypeDescriptor],
    tiers: &[TierDescriptor],
    registry: &Registry,
    config: &GeneratorConfig,
) -> Artifacts {
    let hook = config.show_func_macro.as_str();
    let tier_refs: Vec<&TierDescriptor> = tiers.iter().collect();
    let mut report = GenerationReport {
        tier_kernels: tiers.iter().map(|t| (t.id.clone(), 0)).collect(),
        ..GenerationReport::default()
    };

    let groups = traversal::by_operation(traversal::combinations(
        operations,
        numeric_types,
        tiers,
        registry,
    ));
    let all_combos: Vec<&traversal::Combination<'_>> =
        groups.iter().flat_map(|(_, group)| group).collect();
    let clang_rules = preamble::clang_rules(&tier_refs, &all_combos);

    let mut public = Artifact::new(ArtifactKind::Public);
    let mut internal = Artifact::new(ArtifactKind::Internal);
    let mut definitions = Artifact::new(ArtifactKind::Definitions);
    public.extend(preamble::public_header(config, &clang_rules));
    internal.extend(preamble::internal_header(config));
    definitions.extend(preamble::definitions_header(config, &tier_refs));

    for (op, group) in &groups {
        push_all(
            [&mut public, &mut internal, &mut definitions],
            &Fragment::Blank,
        );
        push_all(
            [&mut public, &mut internal, &mut definitions],
            &Fragment::RegionOpen(op.name.clone()),
        );

        for combo in group {
            log::debug!(
                "{} {}: tiers [{}]",
                combo.op.action.as_str(),
                combo.numeric.id,
                combo
                    .tiers
                    .iter()
                    .map(|t| t.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            let region = &combo.numeric.class_name;
            push_all(
                [&mut public, &mut internal, &mut definitions],
                &Fragment::RegionOpen(region.clone()),
            );

            let fallback = mapping::fallback_signature(combo.op, combo.numeric);
            internal.push(Fragment::Declaration(fallback.clone()));
            definitions.push(Fragment::Definition(
                fallback,
                kernels::fallback_body(combo, hook),
            ));
            report.scalar_kernels += 1;

            for tier in &combo.tiers {
                let signature = mapping::tier_signature(combo.op, combo.numeric, tier);
                let body = kernels::tier_body(registry, combo, tier, hook, &mut report.missing);
                internal.extend([
                    Fragment::GuardOpen(tier.guard.clone()),
                    Fragment::Declaration(signature.clone()),
                    Fragment::GuardClose(tier.guard.clone()),
                ]);
                definitions.extend([
                    Fragment::Blank,
                    Fragment::GuardOpen(tier.guard.clone()),
                    Fragment::Definition(signature, body),
                    Fragment::GuardClose(tier.guard.clone()),
                ]);
                report.count_tier(&tier.id);
            }

            definitions.extend([
                Fragment::Blank,
                wrappers::vector_definition(combo),
                Fragment::Blank,
                wrappers::pointer_definition(combo),
            ]);
            internal.push(wrappers::array_definition(combo));
            public.extend(wrappers::public_declarations(combo));
            report.wrapper_count += 3;

            push_all(
                [&mut public, &mut internal, &mut definitions],
                &Fragment::RegionClose(region.clone()),
            );
            report.pair_count += 1;
        }

        public.push(wrappers::invocation_macro(
            &op.macro_name,
            &op.name,
            &config.namespace,
        ));
        report.macro_count += 1;
        push_all(
            [&mut public, &mut internal, &mut definitions],
            &Fragment::RegionClose(op.name.clone()),
        );
    }

    public.extend(preamble::public_footer(config));
    internal.extend(preamble::namespace_footer(config));
    definitions.extend(preamble::namespace_footer(config));

    if !report.missing.is_empty() {
        log::warn!(
            "{} table entries missing; placeholders emitted",
            report.missing.len()
        );
    }

    Artifacts {
        public,
        internal,
        definitions,
        forwarding: preamble::forwarding(config),
        report,
    }
}

/// Generates every operation, numeric type and tier the registry lists.
#[must_use]
pub fn generate_all(registry: &Registry, config: &GeneratorConfig) -> Artifacts {
    generate(
        &registry.operations,
        &registry.numeric_types,
        &registry.tiers,
        registry,
        config,
    )
}
