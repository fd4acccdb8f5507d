//! Call wrappers around the dispatched kernel, and the invocation macro.

use crate::fragment::{Block, Fragment};
use crate::mapping;
use crate::traversal::Combination;

/// `std::vector` wrapper definition: asserts equal input sizes and enough
/// output capacity, then calls the kernel.
#[must_use]
pub fn vector_definition(combo: &Combination<'_>) -> Fragment {
    let mut body = Block::new();
    body.line("assert(a.size() == b.size());")
        .line("assert(c.size() >= a.size());")
        .line(format!(
            "{}(a.data(), b.data(), c.data(), a.size());",
            mapping::backend_name(combo.op)
        ));
    Fragment::Definition(mapping::vector_signature(combo.op, combo.numeric), body)
}

/// Pointer + length wrapper definition.
#[must_use]
pub fn pointer_definition(combo: &Combination<'_>) -> Fragment {
    let mut body = Block::new();
    body.line(format!("{}(a, b, c, l);", mapping::backend_name(combo.op)));
    Fragment::Definition(mapping::pointer_signature(combo.op, combo.numeric), body)
}

/// `std::array` template definition, emitted in the internal artifact only.
///
/// Instantiated in any unit, so it calls the exported pointer wrapper rather
/// than the kernel.
#[must_use]
pub fn array_definition(combo: &Combination<'_>) -> Fragment {
    let mut body = Block::new();
    body.line(format!("{}(a.data(), b.data(), c.data(), S);", combo.op.name));
    Fragment::Definition(mapping::array_signature(combo.op, combo.numeric), body)
}

/// The three wrapper declarations of the public artifact, in the order
/// vector, array, pointer.
#[must_use]
pub fn public_declarations(combo: &Combination<'_>) -> [Fragment; 3] {
    [
        Fragment::Declaration(mapping::vector_signature(combo.op, combo.numeric)),
        Fragment::Declaration(mapping::array_signature(combo.op, combo.numeric)),
        Fragment::Declaration(mapping::pointer_signature(combo.op, combo.numeric)),
    ]
}

/// `#define ADD(a, b, c) add(a, b, c, <ns>::arrayLength(a))`.
#[must_use]
pub fn invocation_macro(macro_name: &str, op_name: &str, namespace: &str) -> Fragment {
    Fragment::Macro {
        name: macro_name.to_owned(),
        params: vec!["a", "b", "c"],
        body: format!("{op_name}(a, b, c, {namespace}::arrayLength(a))"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macro_forwards_array_length() {
        let Fragment::Macro { name, params, body } = invocation_macro("MUL", "mul", "simd") else {
            panic!("expected a macro fragment");
        };
        assert_eq!(name, "MUL");
        assert_eq!(params, ["a", "b", "c"]);
        assert_eq!(body, "mul(a, b, c, simd::arrayLength(a))");
    }
}
