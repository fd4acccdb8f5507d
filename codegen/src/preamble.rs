//! Fixed headers and footers of the three artifacts, and the forwarding file.
//!
//! Only the intrinsic-header block and the clang guard block depend on the
//! tier list; the rest is boilerplate parameterized by namespace and file
//! names. Every size in the generated code is spelled `std::size_t`, and
//! every artifact includes `<cstddef>` for it.

use ezsimd_registry::TierDescriptor;

use crate::config::GeneratorConfig;
use crate::fragment::Fragment;
use crate::traversal::Combination;

const CLANG_WARNING: &str = "clang currently produces unwanted behavior for large amounts of \
multiversioned functions, keeping only default and best supported SIMD. use g++ for best results.";

const ARRAY_LENGTH_HEAD: &str = "template <typename T, std::size_t N>\n\
constexpr inline std::size_t arrayLength(T (&)[N]) noexcept";

fn raw(text: &str) -> Fragment {
    Fragment::Raw(text.to_owned())
}

/// Groups tier guards by intrinsic header, highest tier first, each header
/// listed once.
#[must_use]
pub fn header_guards(tiers: &[&TierDescriptor]) -> Vec<(String, Vec<String>)> {
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    for tier in tiers.iter().rev() {
        match groups.iter_mut().find(|(header, _)| *header == tier.header) {
            Some((_, guards)) => guards.push(tier.guard.clone()),
            None => groups.push((tier.header.clone(), vec![tier.guard.clone()])),
        }
    }
    groups
}

fn any_defined(guards: &[String]) -> String {
    let tests: Vec<String> = guards.iter().map(|g| format!("defined({g})")).collect();
    tests.join(" || ")
}

/// Start of the definitions artifact, through the opening of the namespace
/// and the `isAligned` helper.
#[must_use]
pub fn definitions_header(config: &GeneratorConfig, tiers: &[&TierDescriptor]) -> Vec<Fragment> {
    let hook = &config.show_func_macro;
    let mut out = vec![
        raw("#pragma once"),
        Fragment::Blank,
        raw(&format!(
            "// Definitions of every kernel and wrapper declared in {public}.\n\
             // Include this file in exactly one translation unit of the program;\n\
             // every other unit includes {public} only.",
            public = config.names.public
        )),
        Fragment::Blank,
        raw("#include <cstddef>\n#include <vector>\n#include <array>\n#include <cstdint>\n\
             #include <cstring>\n#include <cassert>\n#include <type_traits>"),
        Fragment::Blank,
        raw(&format!("#ifdef {hook}\n    #include <iostream>\n#endif")),
        Fragment::Blank,
        raw(&format!("#include \"{}\"", config.names.public)),
        Fragment::Blank,
    ];
    for (header, guards) in header_guards(tiers) {
        out.push(raw(&format!(
            "#if {}\n    #include <{header}>\n#endif",
            any_defined(&guards)
        )));
    }
    out.push(Fragment::Blank);
    out.push(Fragment::NamespaceOpen(config.namespace.clone()));
    out.push(raw(
        "template <typename T>\nbool isAligned(const T* ptr, std::size_t alignment) {\n    \
         return reinterpret_cast<std::uintptr_t>(static_cast<const void*>(ptr)) % alignment == 0;\n}",
    ));
    out
}

/// One `#undef` of the clang block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardRule {
    /// Guard this rule undefines.
    pub guard: String,
    /// For the (operation, type) pairs the tier supports, the guards of the
    /// better tiers supporting them. The rule fires when every alternative
    /// has at least one defined guard.
    pub covered_by: Vec<Vec<String>>,
}

/// Derives the clang rules from the generated combinations.
///
/// A tier's guard is undefined only when better defined tiers cover every
/// pair it supports, so no pair loses its last vector kernel. Tiers with a
/// pair no better tier supports get no rule.
#[must_use]
pub fn clang_rules(tiers: &[&TierDescriptor], combos: &[&Combination<'_>]) -> Vec<GuardRule> {
    let position = |id: &str| tiers.iter().position(|t| t.id == id);
    let mut rules = Vec::new();
    'tiers: for (i, tier) in tiers.iter().enumerate() {
        let mut covered_by: Vec<Vec<String>> = Vec::new();
        for combo in combos {
            if !combo.tiers.iter().any(|t| t.id == tier.id) {
                continue;
            }
            let better: Vec<String> = combo
                .tiers
                .iter()
                .filter(|t| position(&t.id).is_some_and(|p| p > i) && t.guard != tier.guard)
                .map(|t| t.guard.clone())
                .collect();
            if better.is_empty() {
                continue 'tiers;
            }
            if !covered_by.contains(&better) {
                covered_by.push(better);
            }
        }
        if covered_by.is_empty() {
            continue;
        }
        // An alternative implied by a smaller one adds nothing.
        let minimal = covered_by
            .iter()
            .filter(|alt| {
                !covered_by
                    .iter()
                    .any(|other| other != *alt && other.iter().all(|g| alt.contains(g)))
            })
            .cloned()
            .collect();
        rules.push(GuardRule {
            guard: tier.guard.clone(),
            covered_by: minimal,
        });
    }
    rules
}

/// The clang block: clang keeps only the default kernel and one tier per
/// function, so lesser guards are undefined when better tiers cover them.
fn clang_guard_block(rules: &[GuardRule]) -> String {
    let mut text = format!("#if defined(__clang__)\n    #warning \"{CLANG_WARNING}\"\n");
    for rule in rules {
        let mut tests = vec![format!("defined({})", rule.guard)];
        tests.extend(
            rule.covered_by
                .iter()
                .map(|alt| format!("({})", any_defined(alt))),
        );
        text.push_str(&format!(
            "\n    #if {}\n        #undef {}\n    #endif\n",
            tests.join(" && "),
            rule.guard
        ));
    }
    text.push_str(
        "#elif !(defined(__GNUC__) && !defined(__clang__))\n    \
         #warning \"compiler may not be supported. use g++ for best results.\"\n#endif",
    );
    text
}

/// Start of the public artifact, through the `arrayLength` declaration.
#[must_use]
pub fn public_header(config: &GeneratorConfig, rules: &[GuardRule]) -> Vec<Fragment> {
    vec![
        raw("#pragma once"),
        Fragment::Blank,
        raw("#include <cstddef>\n#include <cstdint>\n#include <vector>\n#include <array>"),
        Fragment::Blank,
        Fragment::Raw(clang_guard_block(rules)),
        Fragment::Blank,
        Fragment::NamespaceOpen(config.namespace.clone()),
        raw(&format!("{ARRAY_LENGTH_HEAD};")),
    ]
}

/// End of the public artifact: closes the namespace and pulls in the
/// internal artifact for the template definitions.
#[must_use]
pub fn public_footer(config: &GeneratorConfig) -> Vec<Fragment> {
    vec![
        Fragment::NamespaceClose(config.namespace.clone()),
        Fragment::Blank,
        raw(&format!(
            "#include \"{}\" // full definitions for templates declared in this file",
            config.names.internal
        )),
    ]
}

/// Start of the internal artifact, through the `arrayLength` definition.
#[must_use]
pub fn internal_header(config: &GeneratorConfig) -> Vec<Fragment> {
    vec![
        raw("#pragma once"),
        Fragment::Blank,
        raw("#include <cstddef>\n#include <cstdint>\n#include <array>"),
        Fragment::Blank,
        raw("// kernel declarations, shared with the definitions unit\n\
             // templates declared in the public interface are defined in this file"),
        Fragment::Blank,
        Fragment::NamespaceOpen(config.namespace.clone()),
        raw(&format!("{ARRAY_LENGTH_HEAD} {{\n    return N;\n}}")),
    ]
}

/// Closes the namespace opened by a header.
#[must_use]
pub fn namespace_footer(config: &GeneratorConfig) -> Vec<Fragment> {
    vec![Fragment::NamespaceClose(config.namespace.clone())]
}

/// Entire content of the auxiliary forwarding file.
#[must_use]
pub fn forwarding(config: &GeneratorConfig) -> String {
    format!("#include \"{}\"\n", config.names.public)
}
