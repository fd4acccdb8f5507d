//! Consistency errors between the generated artifacts.

/// A violated cross-artifact rule, found before rendering.
#[derive(Debug, thiserror::Error)]
pub enum ConsistencyError {
    /// A declaration has no matching definition.
    #[error("{declared_in} declares `{symbol}({params})`{guard} but {expected_in} never defines it")]
    MissingDefinition {
        /// Artifact holding the declaration.
        declared_in: &'static str,
        /// Artifact expected to hold the definition.
        expected_in: &'static str,
        /// Function name.
        symbol: String,
        /// Parameter types.
        params: String,
        /// ` under <guard>` or empty.
        guard: String,
    },
    /// A declaration is matched by more than one definition.
    #[error("`{symbol}({params})`{guard} is defined {count} times")]
    DuplicateDefinition {
        /// Function name.
        symbol: String,
        /// Parameter types.
        params: String,
        /// ` under <guard>` or empty.
        guard: String,
        /// Number of definitions found.
        count: usize,
    },
    /// A definition has no declaration in its declaring artifact.
    #[error("{defined_in} defines `{symbol}({params})`{guard} with no declaration")]
    UndeclaredDefinition {
        /// Artifact holding the definition.
        defined_in: &'static str,
        /// Function name.
        symbol: String,
        /// Parameter types.
        params: String,
        /// ` under <guard>` or empty.
        guard: String,
    },
    /// An excluded numeric type shows up in a signature.
    #[error("{artifact} emits `{symbol}` for excluded numeric type {numeric}")]
    ExcludedTypeEmitted {
        /// Artifact holding the symbol.
        artifact: &'static str,
        /// Function name.
        symbol: String,
        /// Numeric type identifier.
        numeric: String,
    },
    /// A pack/unpack helper action shows up as a user-facing operation.
    #[error("{artifact} emits helper action {action} as `{symbol}`")]
    HelperActionEmitted {
        /// Artifact holding the symbol or macro.
        artifact: &'static str,
        /// Function or macro name.
        symbol: String,
        /// Action identifier.
        action: &'static str,
    },
}

/// Formats an optional guard for error messages.
pub(crate) fn guard_suffix(guard: Option<&str>) -> String {
    guard.map(|g| format!(" under {g}")).unwrap_or_default()
}
