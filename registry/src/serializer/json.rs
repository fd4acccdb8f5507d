//! JSON serializer for an ezsimd registry.
//!
//! The document mirrors [`Registry`] field for field. Table keys are tier and
//! numeric type identifiers; actions are spelled `ADD`, `PACK_ALIGNED`, ….

use serde_json::Value;

use crate::model::Registry;
use crate::RegistryError;

/// Serializes a registry to a JSON `Value`.
///
/// The returned value can be pretty-printed with [`serde_json::to_string_pretty`].
#[must_use]
pub fn to_json(registry: &Registry) -> Value {
    serde_json::to_value(registry).unwrap_or(Value::Null)
}

/// Parses a registry from JSON text and checks its table references and
/// lane widths.
///
/// # Errors
///
/// Returns [`RegistryError::Json`] if the text is not a registry document, an
/// unknown-reference error if a table names an undeclared tier or type, or
/// [`RegistryError::UnevenLanes`] if a supported cell has no whole lanes.
pub fn from_json(text: &str) -> Result<Registry, RegistryError> {
    let registry: Registry = serde_json::from_str(text)?;
    registry.check_references()?;
    registry.check_widths()?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_registry_survives_json() {
        let registry = Registry::x86();
        let text = to_json(registry).to_string();
        let loaded = from_json(&text);
        assert!(matches!(loaded, Ok(ref r) if r == registry));
    }

    #[test]
    fn actions_are_spelled_in_caps() {
        let value = to_json(Registry::x86());
        assert_eq!(value["support"]["SSE"]["DIV"]["FLOAT32"], Value::Bool(true));
        assert!(value["intrinsics"]["MMX"]["PACK_ALIGNED"]["INT8"].is_string());
    }

    #[test]
    fn missing_cleanup_and_excluded_default() {
        let text = r#"{
            "version": "0.0.1",
            "tiers": [{"id": "T", "guard": "__T__", "bit_width": 128, "target": "t", "header": "t.h"}],
            "numeric_types": [{"id": "I32", "class_name": "int32", "type_name": "int32_t", "bit_width": 32}],
            "operations": [{"action": "ADD", "name": "add", "macro_name": "ADD"}],
            "support": {"T": {"ADD": {"I32": true}}},
            "register_types": {"T": {"I32": "v128"}},
            "intrinsics": {}
        }"#;
        let registry = from_json(text);
        assert!(matches!(
            registry,
            Ok(ref r) if r.tiers[0].cleanup.is_none() && !r.numeric_types[0].excluded
        ));
    }

    #[test]
    fn undeclared_numeric_type_is_rejected() {
        let text = r#"{
            "version": "0.0.1",
            "tiers": [],
            "numeric_types": [],
            "operations": [],
            "support": {},
            "register_types": {},
            "intrinsics": {}
        }"#;
        assert!(from_json(text).is_ok());
        let bad = text.replace(r#""support": {}"#, r#""support": {"X": {}}"#);
        assert!(matches!(from_json(&bad), Err(RegistryError::UnknownTier(_))));
    }

    #[test]
    fn zero_width_supported_type_is_rejected() {
        let text = r#"{
            "version": "0.0.1",
            "tiers": [{"id": "T", "guard": "__T__", "bit_width": 128, "target": "t", "header": "t.h"}],
            "numeric_types": [{"id": "Z", "class_name": "z", "type_name": "int32_t", "bit_width": 0}],
            "operations": [{"action": "ADD", "name": "add", "macro_name": "ADD"}],
            "support": {"T": {"ADD": {"Z": true}}},
            "register_types": {},
            "intrinsics": {}
        }"#;
        assert!(matches!(
            from_json(text),
            Err(RegistryError::UnevenLanes { ref tier, numeric_bits: 0, .. }) if tier == "T"
        ));
    }
}
