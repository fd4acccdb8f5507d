//! Kernel bodies: the scalar fallback and one body per supported tier.

use ezsimd_registry::{Action, NumericTypeDescriptor, Registry, TierDescriptor};

use crate::fragment::Block;
use crate::layout::KernelLayout;
use crate::mapping::{missing_placeholder, DEFAULT_TARGET};
use crate::traversal::Combination;

/// A table lookup that had no entry, recorded for the generation report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingEntry {
    /// Tier identifier.
    pub tier: String,
    /// Which lookup failed (`"register type"`, `"lane count"` or an action
    /// name).
    pub key: String,
    /// Numeric type identifier.
    pub numeric: String,
}

/// Resolves table entries for one (tier, numeric type), recording misses.
struct Lookup<'a> {
    registry: &'a Registry,
    tier: &'a TierDescriptor,
    numeric: &'a NumericTypeDescriptor,
    missing: &'a mut Vec<MissingEntry>,
}

impl Lookup<'_> {
    fn miss(&mut self, key: &str) -> String {
        log::warn!(
            "{} {} is marked supported but has no {} entry",
            self.tier.id,
            self.numeric.id,
            key
        );
        self.missing.push(MissingEntry {
            tier: self.tier.id.clone(),
            key: key.to_owned(),
            numeric: self.numeric.id.clone(),
        });
        let key = key.replace(' ', "_").to_uppercase();
        missing_placeholder(&self.tier.id, &key, &self.numeric.id)
    }

    fn intrinsic(&mut self, action: Action) -> String {
        match self
            .registry
            .intrinsics
            .get(&self.tier.id, action, &self.numeric.id)
        {
            Some(symbol) => symbol.to_owned(),
            None => self.miss(action.as_str()),
        }
    }

    fn register_type(&mut self) -> String {
        match self
            .registry
            .register_types
            .get(&self.tier.id, &self.numeric.id)
        {
            Some(register) => register.to_owned(),
            None => self.miss("register type"),
        }
    }
}

/// Emits the dispatch tracing hook that starts every kernel body.
fn show_func(body: &mut Block, hook: &str, target: &str, name: &str) {
    body.line(format!("#ifdef {hook}"))
        .line(format!("    {hook} << \"target(\\\"{target}\\\") {name}\\n\";"))
        .line("#endif")
        .blank();
}

/// Emits `for (; i < l; i++) { c[i] = a[i] OP b[i]; }`.
fn scalar_loop(body: &mut Block, init: &str, operator: char) {
    body.open(format!("for ({init}; i < l; i++)"))
        .line(format!("c[i] = a[i] {operator} b[i];"))
        .close();
}

/// Body of the `target("default")` kernel: a plain element-wise loop.
#[must_use]
pub fn fallback_body(combo: &Combination<'_>, hook: &str) -> Block {
    let mut body = Block::new();
    show_func(&mut body, hook, DEFAULT_TARGET, &combo.op.name);
    scalar_loop(&mut body, "std::size_t i = 0", combo.operator);
    body
}

/// Body of one tier kernel.
///
/// Probes the three pointers once, runs the vector loop with aligned or
/// unaligned loads and stores per probe, runs the tier cleanup if any, then
/// finishes the trailing elements with the scalar operator.
pub fn tier_body(
    registry: &Registry,
    combo: &Combination<'_>,
    tier: &TierDescriptor,
    hook: &str,
    missing: &mut Vec<MissingEntry>,
) -> Block {
    let layout = KernelLayout::new(tier, combo.numeric);
    let mut lookup = Lookup {
        registry,
        tier,
        numeric: combo.numeric,
        missing,
    };
    let register = lookup.register_type();
    let load_aligned = lookup.intrinsic(Action::PackAligned);
    let load_unaligned = lookup.intrinsic(Action::PackUnaligned);
    let apply = lookup.intrinsic(combo.op.action);
    let store_aligned = lookup.intrinsic(Action::UnpackAligned);
    let store_unaligned = lookup.intrinsic(Action::UnpackUnaligned);
    let (bound, step) = if layout.lanes == 0 {
        let lanes = lookup.miss("lane count");
        (lanes.clone(), lanes)
    } else {
        (layout.loop_bound().to_string(), layout.lanes.to_string())
    };

    let mut body = Block::new();
    show_func(&mut body, hook, &tier.target, &combo.op.name);
    body.line("std::size_t i = 0;");
    for v in ["vec_a", "vec_b", "vec_c"] {
        body.line(format!("{register} {v};"));
    }
    for p in ['A', 'B', 'C'] {
        body.line(format!(
            "const bool isAligned{p} = isAligned({}, {});",
            p.to_ascii_lowercase(),
            layout.align_bytes
        ));
    }
    body.blank();

    body.open(format!("for (; i + {bound} < l; i += {step})"));
    for (p, v) in [('A', "vec_a"), ('B', "vec_b")] {
        let ptr = p.to_ascii_lowercase();
        body.open(format!("if (isAligned{p})"))
            .line(format!("{v} = {load_aligned}({ptr} + i);"))
            .branch("} else {")
            .line(format!("{v} = {load_unaligned}({ptr} + i);"))
            .close()
            .blank();
    }
    body.line(format!("vec_c = {apply}(vec_a, vec_b);")).blank();
    body.open("if (isAlignedC)")
        .line(format!("{store_aligned}(c + i, vec_c);"))
        .branch("} else {")
        .line(format!("{store_unaligned}(c + i, vec_c);"))
        .close();
    body.close();

    if let Some(cleanup) = &layout.cleanup {
        body.blank().line(format!("{cleanup};"));
    }
    body.blank();
    scalar_loop(&mut body, "", combo.operator);
    body
}
