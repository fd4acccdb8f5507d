//! Cross-artifact consistency rules, checked on fragments before rendering.
//!
//! - Every backend declared in the internal artifact is defined exactly once
//!   in the definitions artifact, under the same guard with the same
//!   signature, and nothing is defined there that was not declared.
//! - Every vector and pointer wrapper declared in the public artifact is
//!   defined exactly once in the definitions artifact.
//! - Every array wrapper declared in the public artifact is defined exactly
//!   once in the internal artifact.
//! - Excluded numeric types and pack/unpack helper actions never appear.

use std::collections::HashMap;

use ezsimd_registry::Registry;

use crate::error::{guard_suffix, ConsistencyError};
use crate::fragment::{Artifact, Signature, SymbolRole};
use crate::mapping;
use crate::Artifacts;

/// Counts of the pairs the check matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsistencySummary {
    /// Backend declaration/definition pairs (fallback and tier kernels).
    pub backends: usize,
    /// Wrapper declaration/definition pairs.
    pub wrappers: usize,
    /// Invocation macros.
    pub macros: usize,
}

type Key<'a> = (Option<&'a str>, &'a Signature);

/// Matches declarations in `declaring` against definitions in `defining`,
/// restricted to `roles`. Returns the number of matched pairs.
fn pair(
    declaring: &Artifact,
    defining: &Artifact,
    roles: &[SymbolRole],
) -> Result<usize, ConsistencyError> {
    let declared: Vec<Key<'_>> = declaring
        .symbols()
        .into_iter()
        .filter(|s| !s.defined && roles.contains(&s.signature.role))
        .map(|s| (s.guard, s.signature))
        .collect();

    let mut defined: HashMap<Key<'_>, usize> = HashMap::new();
    for s in defining
        .symbols()
        .into_iter()
        .filter(|s| s.defined && roles.contains(&s.signature.role))
    {
        *defined.entry((s.guard, s.signature)).or_insert(0) += 1;
    }

    for (guard, signature) in &declared {
        match defined.get(&(*guard, *signature)).copied().unwrap_or(0) {
            0 => {
                return Err(ConsistencyError::MissingDefinition {
                    declared_in: declaring.kind.as_str(),
                    expected_in: defining.kind.as_str(),
                    symbol: signature.name.clone(),
                    params: signature.param_types(),
                    guard: guard_suffix(*guard),
                })
            }
            1 => {}
            count => {
                return Err(ConsistencyError::DuplicateDefinition {
                    symbol: signature.name.clone(),
                    params: signature.param_types(),
                    guard: guard_suffix(*guard),
                    count,
                })
            }
        }
    }

    if let Some((guard, signature)) = defined.keys().find(|key| !declared.contains(key)) {
        return Err(ConsistencyError::UndeclaredDefinition {
            defined_in: defining.kind.as_str(),
            symbol: signature.name.clone(),
            params: signature.param_types(),
            guard: guard_suffix(*guard),
        });
    }
    Ok(declared.len())
}

/// `true` when `ty` names `type_name` as a whole token.
fn mentions(ty: &str, type_name: &str) -> bool {
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_';
    ty.match_indices(type_name).any(|(at, _)| {
        let before = ty[..at].chars().next_back();
        let after = ty[at + type_name.len()..].chars().next();
        !before.is_some_and(is_ident) && !after.is_some_and(is_ident)
    })
}

fn check_exclusions(artifact: &Artifact, registry: &Registry) -> Result<(), ConsistencyError> {
    let excluded: Vec<_> = registry.numeric_types.iter().filter(|n| n.excluded).collect();
    let helpers: Vec<_> = registry
        .operations
        .iter()
        .filter(|o| !o.action.is_arithmetic())
        .collect();

    for symbol in artifact.symbols() {
        let signature = symbol.signature;
        if let Some(numeric) = excluded.iter().find(|n| {
            signature
                .params
                .iter()
                .any(|p| mentions(&p.ty, &n.type_name))
        }) {
            return Err(ConsistencyError::ExcludedTypeEmitted {
                artifact: artifact.kind.as_str(),
                symbol: signature.name.clone(),
                numeric: numeric.id.clone(),
            });
        }
        if let Some(op) = helpers
            .iter()
            .find(|o| signature.name == o.name || signature.name == mapping::backend_name(o))
        {
            return Err(ConsistencyError::HelperActionEmitted {
                artifact: artifact.kind.as_str(),
                symbol: signature.name.clone(),
                action: op.action.as_str(),
            });
        }
    }
    for name in artifact.macro_names() {
        if let Some(op) = helpers.iter().find(|o| o.macro_name == name) {
            return Err(ConsistencyError::HelperActionEmitted {
                artifact: artifact.kind.as_str(),
                symbol: name.to_owned(),
                action: op.action.as_str(),
            });
        }
    }
    Ok(())
}

/// Checks every cross-artifact rule.
///
/// # Errors
///
/// Returns the first violated rule.
pub fn check(
    artifacts: &Artifacts,
    registry: &Registry,
) -> Result<ConsistencySummary, ConsistencyError> {
    let backends = pair(
        &artifacts.internal,
        &artifacts.definitions,
        &[SymbolRole::Backend],
    )?;
    let call_wrappers = pair(
        &artifacts.public,
        &artifacts.definitions,
        &[SymbolRole::VectorWrapper, SymbolRole::PointerWrapper],
    )?;
    let array_wrappers = pair(
        &artifacts.public,
        &artifacts.internal,
        &[SymbolRole::ArrayWrapper],
    )?;
    for artifact in [
        &artifacts.public,
        &artifacts.internal,
        &artifacts.definitions,
    ] {
        check_exclusions(artifact, registry)?;
    }
    let summary = ConsistencySummary {
        backends,
        wrappers: call_wrappers + array_wrappers,
        macros: artifacts.public.macro_names().len(),
    };
    log::debug!(
        "consistency: {} backends, {} wrappers, {} macros",
        summary.backends,
        summary.wrappers,
        summary.macros
    );
    Ok(summary)
}
