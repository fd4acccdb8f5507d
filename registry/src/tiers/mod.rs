//! Built-in x86 tier modules.
//!
//! Each sub-module encodes one instruction-set tier as Rust data: its
//! descriptor, the numeric types it vectorizes per action, the register type
//! holding each numeric type, and the intrinsic used for every action. Modules
//! are listed lowest tier first; see [`crate::Registry::x86`] for assembly.

pub mod avx;
pub mod avx2;
pub mod mmx;
pub mod sse;
pub mod sse2;

use crate::model::{Action, TierDescriptor};

/// One tier's slice of the registry tables.
#[derive(Debug, Clone)]
pub struct TierModule {
    /// The tier itself.
    pub descriptor: TierDescriptor,
    /// (numeric type, register type name).
    pub register_types: Vec<(&'static str, String)>,
    /// Numeric types with a vector implementation, per arithmetic action.
    /// Pairs not listed are unsupported.
    pub support: Vec<(Action, Vec<&'static str>)>,
    /// (numeric type, intrinsic), per action.
    pub intrinsics: Vec<(Action, Vec<(&'static str, String)>)>,
}

/// Returns the built-in tier modules in generation order.
#[must_use]
pub fn all() -> Vec<TierModule> {
    vec![
        mmx::module(),
        sse::module(),
        sse2::module(),
        avx::module(),
        avx2::module(),
    ]
}

/// Builds `(numeric type, expression)` rows from a type list and a formatter
/// taking the numeric type's C spelling.
pub(crate) fn rows(
    types: &[&'static str],
    f: impl Fn(&str) -> String,
) -> Vec<(&'static str, String)> {
    types
        .iter()
        .map(|&id| (id, f(crate::catalog::c_type(id))))
        .collect()
}

/// Builds rows that share one plain intrinsic name.
pub(crate) fn same(types: &[&'static str], symbol: &str) -> Vec<(&'static str, String)> {
    types.iter().map(|&id| (id, symbol.to_owned())).collect()
}
