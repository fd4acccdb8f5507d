//! Numeric types and operations of the built-in registry.

use crate::model::{Action, NumericTypeDescriptor, OperationDescriptor};

/// (id, class name, C type, bits, excluded), in generation order.
const NUMERIC_TYPES: [(&str, &str, &str, u32, bool); 14] = [
    ("INT8", "int8", "int8_t", 8, false),
    ("INT16", "int16", "int16_t", 16, false),
    ("INT32", "int32", "int32_t", 32, false),
    ("INT64", "int64", "int64_t", 64, false),
    // gcc/clang extension types
    ("INT128", "int128", "__int128_t", 128, false),
    ("UINT8", "uint8", "uint8_t", 8, false),
    ("UINT16", "uint16", "uint16_t", 16, false),
    ("UINT32", "uint32", "uint32_t", 32, false),
    ("UINT64", "uint64", "uint64_t", 64, false),
    ("UINT128", "uint128", "__uint128_t", 128, false),
    // no portable half-precision C type
    ("FLOAT16", "float16", "_Float16", 16, true),
    ("FLOAT32", "float32", "float", 32, false),
    ("FLOAT64", "float64", "double", 64, false),
    ("FLOAT128", "float128", "long double", 128, false),
];

/// The signed and unsigned integer types up to 64 bits, the set the integer
/// vector tiers share.
pub(crate) const INTEGERS_UP_TO_64: [&str; 8] = [
    "INT8", "INT16", "INT32", "INT64", "UINT8", "UINT16", "UINT32", "UINT64",
];

/// Returns the built-in numeric types in generation order.
#[must_use]
pub fn numeric_types() -> Vec<NumericTypeDescriptor> {
    NUMERIC_TYPES
        .iter()
        .map(
            |&(id, class_name, type_name, bit_width, excluded)| NumericTypeDescriptor {
                id: id.to_owned(),
                class_name: class_name.to_owned(),
                type_name: type_name.to_owned(),
                bit_width,
                excluded,
            },
        )
        .collect()
}

/// Returns the built-in operation list: the four arithmetic operations
/// followed by the four load/store helper actions.
#[must_use]
pub fn operations() -> Vec<OperationDescriptor> {
    Action::ALL
        .iter()
        .map(|&action| OperationDescriptor {
            action,
            name: action.as_str().to_ascii_lowercase(),
            macro_name: action.as_str().to_owned(),
        })
        .collect()
}

/// Returns the C type spelled for a built-in numeric type id.
pub(crate) fn c_type(id: &str) -> &'static str {
    NUMERIC_TYPES
        .iter()
        .find(|(n, ..)| *n == id)
        .map_or("void", |(_, _, c, ..)| c)
}
