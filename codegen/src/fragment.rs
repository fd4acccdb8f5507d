//! Structured emission: artifacts as ordered fragment sequences.
//!
//! The engine never concatenates output text directly. It appends
//! [`Fragment`]s to an [`Artifact`]; symbols stay typed ([`Signature`]) until
//! [`Artifact::render`] runs, so the cross-artifact consistency rules can be
//! checked on the fragments first.

use crate::emit::CppFile;

/// Which of the three generated artifacts a fragment sequence belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Declarations reachable by downstream code, plus the invocation macros.
    Public,
    /// Backend forward declarations and the fixed-length template bodies.
    Internal,
    /// Kernel bodies and the vector and pointer wrappers.
    Definitions,
}

impl ArtifactKind {
    /// Returns a short label for logs and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Public => "public",
            ArtifactKind::Internal => "internal",
            ArtifactKind::Definitions => "definitions",
        }
    }
}

/// What a generated function is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolRole {
    /// A multiversioned kernel (`addBackend`), one per dispatch target.
    Backend,
    /// The `std::vector` wrapper with bounds assertions.
    VectorWrapper,
    /// The raw pointer + length wrapper.
    PointerWrapper,
    /// The `std::array<T, S>` template wrapper.
    ArrayWrapper,
}

impl SymbolRole {
    /// Whether the symbol is emitted `inline`.
    ///
    /// Kernels are only called from the definitions unit and templates are
    /// instantiated where used. The vector and pointer wrappers have external
    /// linkage so the one unit compiling the definitions exports them.
    #[must_use]
    pub fn is_inline(self) -> bool {
        matches!(self, SymbolRole::Backend | SymbolRole::ArrayWrapper)
    }
}

/// One function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Param {
    /// Fully spelled C++ type (e.g. `const int8_t*`).
    pub ty: String,
    /// Parameter name.
    pub name: &'static str,
}

impl Param {
    /// Creates a parameter.
    pub fn new(ty: impl Into<String>, name: &'static str) -> Self {
        Self {
            ty: ty.into(),
            name,
        }
    }
}

/// A function signature shared by a declaration and its definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// What the function is for.
    pub role: SymbolRole,
    /// Template parameter list, without `template <>` (e.g. `std::size_t S`).
    pub template: Option<String>,
    /// Dispatch target attribute (e.g. `default`, `sse2`).
    pub target: Option<String>,
    /// Function name.
    pub name: String,
    /// Parameters, in order.
    pub params: Vec<Param>,
}

impl Signature {
    /// Renders `[inline ]void name(params)`.
    #[must_use]
    pub fn head(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| format!("{} {}", p.ty, p.name))
            .collect();
        let linkage = if self.role.is_inline() { "inline " } else { "" };
        format!("{linkage}void {}({})", self.name, params.join(", "))
    }

    /// Renders the parameter types only, for diagnostics.
    #[must_use]
    pub fn param_types(&self) -> String {
        let types: Vec<&str> = self.params.iter().map(|p| p.ty.as_str()).collect();
        types.join(", ")
    }

    fn emit_prefix(&self, f: &mut CppFile) {
        if let Some(template) = &self.template {
            f.line(&format!("template <{template}>"));
        }
        if let Some(target) = &self.target {
            f.line(&format!("__attribute__((target(\"{target}\")))"));
        }
    }
}

/// A function body: lines with their depth relative to the function.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    lines: Vec<(usize, String)>,
    depth: usize,
}

impl Block {
    /// Creates an empty body.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a statement at the current depth.
    pub fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push((self.depth, text.into()));
        self
    }

    /// Appends an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.lines.push((0, String::new()));
        self
    }

    /// Appends `head {` and nests subsequent lines.
    pub fn open(&mut self, head: impl Into<String>) -> &mut Self {
        let head = head.into();
        self.lines.push((self.depth, format!("{head} {{")));
        self.depth += 1;
        self
    }

    /// Closes the innermost `{` with `tail` (normally `}`).
    pub fn close_with(&mut self, tail: impl Into<String>) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.lines.push((self.depth, tail.into()));
        self
    }

    /// Emits `text` one level out without leaving the current nesting, as
    /// in `} else {`.
    pub fn branch(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push((self.depth.saturating_sub(1), text.into()));
        self
    }

    /// Closes the innermost `{`.
    pub fn close(&mut self) -> &mut Self {
        self.close_with("}")
    }

    /// Iterates over `(relative depth, text)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines.iter().map(|(d, t)| (*d, t.as_str()))
    }
}

/// One unit of emitted output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Verbatim text, one fragment line per text line.
    Raw(String),
    /// An empty line.
    Blank,
    /// `namespace <name> {`
    NamespaceOpen(String),
    /// `} // namespace <name>`
    NamespaceClose(String),
    /// `#pragma region // <label>`
    RegionOpen(String),
    /// `#pragma endregion // <label>`
    RegionClose(String),
    /// `#ifdef <guard>`
    GuardOpen(String),
    /// `#endif // <guard>`
    GuardClose(String),
    /// A declaration ending in `;`.
    Declaration(Signature),
    /// A definition with its body.
    Definition(Signature, Block),
    /// `#define <name>(<params>) <body>`
    Macro {
        /// Macro name.
        name: String,
        /// Macro parameters.
        params: Vec<&'static str>,
        /// Replacement text.
        body: String,
    },
}

/// A declared or defined symbol, with the innermost guard enclosing it.
#[derive(Debug, Clone, Copy)]
pub struct SymbolRef<'a> {
    /// Innermost `#ifdef` guard, if any.
    pub guard: Option<&'a str>,
    /// The function signature.
    pub signature: &'a Signature,
    /// `true` for a definition, `false` for a declaration.
    pub defined: bool,
}

/// One artifact under construction.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Which artifact this is.
    pub kind: ArtifactKind,
    /// Fragments in emission order.
    pub fragments: Vec<Fragment>,
}

impl Artifact {
    /// Creates an empty artifact.
    #[must_use]
    pub fn new(kind: ArtifactKind) -> Self {
        Self {
            kind,
            fragments: Vec::new(),
        }
    }

    /// Appends one fragment.
    pub fn push(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// Appends several fragments.
    pub fn extend(&mut self, fragments: impl IntoIterator<Item = Fragment>) {
        self.fragments.extend(fragments);
    }

    /// Lists every declared or defined function with its enclosing guard.
    #[must_use]
    pub fn symbols(&self) -> Vec<SymbolRef<'_>> {
        let mut guards: Vec<&str> = Vec::new();
        let mut out = Vec::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::GuardOpen(g) => guards.push(g),
                Fragment::GuardClose(_) => {
                    guards.pop();
                }
                Fragment::Declaration(signature) => out.push(SymbolRef {
                    guard: guards.last().copied(),
                    signature,
                    defined: false,
                }),
                Fragment::Definition(signature, _) => out.push(SymbolRef {
                    guard: guards.last().copied(),
                    signature,
                    defined: true,
                }),
                _ => {}
            }
        }
        out
    }

    /// Lists the names of every emitted macro.
    #[must_use]
    pub fn macro_names(&self) -> Vec<&str> {
        self.fragments
            .iter()
            .filter_map(|f| match f {
                Fragment::Macro { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Serializes the fragments to C++ text.
    #[must_use]
    pub fn render(&self) -> String {
        let mut f = CppFile::with_capacity(self.fragments.len() * 96);
        for fragment in &self.fragments {
            match fragment {
                Fragment::Raw(text) => f.lines(text),
                Fragment::Blank => f.blank(),
                Fragment::NamespaceOpen(name) => {
                    f.line(&format!("namespace {name} {{"));
                    f.indent();
                }
                Fragment::NamespaceClose(name) => {
                    f.dedent();
                    f.line(&format!("}} // namespace {name}"));
                }
                Fragment::RegionOpen(label) => {
                    f.line(&format!("#pragma region // {label}"));
                    f.indent();
                }
                Fragment::RegionClose(label) => {
                    f.dedent();
                    f.line(&format!("#pragma endregion // {label}"));
                }
                Fragment::GuardOpen(guard) => {
                    f.line(&format!("#ifdef {guard}"));
                    f.indent();
                }
                Fragment::GuardClose(guard) => {
                    f.dedent();
                    f.line(&format!("#endif // {guard}"));
                }
                Fragment::Declaration(signature) => {
                    signature.emit_prefix(&mut f);
                    f.line(&format!("{};", signature.head()));
                }
                Fragment::Definition(signature, body) => {
                    signature.emit_prefix(&mut f);
                    f.line(&format!("{} {{", signature.head()));
                    for (depth, text) in body.iter() {
                        f.line_at(depth + 1, text);
                    }
                    f.line("}");
                }
                Fragment::Macro { name, params, body } => {
                    f.line(&format!("#define {name}({}) {body}", params.join(", ")));
                }
            }
        }
        f.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(target: Option<&str>) -> Signature {
        Signature {
            role: SymbolRole::Backend,
            template: None,
            target: target.map(str::to_owned),
            name: "addBackend".to_owned(),
            params: vec![
                Param::new("const float*", "a"),
                Param::new("const float*", "b"),
                Param::new("float*", "c"),
                Param::new("std::size_t", "l"),
            ],
        }
    }

    #[test]
    fn guard_nesting_is_tracked() {
        let mut artifact = Artifact::new(ArtifactKind::Internal);
        artifact.push(Fragment::Declaration(sig(Some("default"))));
        artifact.push(Fragment::GuardOpen("__SSE__".to_owned()));
        artifact.push(Fragment::Declaration(sig(Some("sse"))));
        artifact.push(Fragment::GuardClose("__SSE__".to_owned()));
        let symbols = artifact.symbols();
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[0].guard, None);
        assert_eq!(symbols[1].guard, Some("__SSE__"));
        assert!(!symbols[1].defined);
    }

    #[test]
    fn renders_attribute_then_head() {
        let mut artifact = Artifact::new(ArtifactKind::Internal);
        artifact.push(Fragment::GuardOpen("__SSE__".to_owned()));
        artifact.push(Fragment::Declaration(sig(Some("sse"))));
        artifact.push(Fragment::GuardClose("__SSE__".to_owned()));
        assert_eq!(
            artifact.render(),
            "#ifdef __SSE__\n    __attribute__((target(\"sse\")))\n    inline void \
             addBackend(const float* a, const float* b, float* c, std::size_t l);\n#endif // __SSE__\n"
        );
    }

    #[test]
    fn block_bodies_nest() {
        let mut body = Block::new();
        body.open("for (std::size_t i = 0; i < l; i++)")
            .line("c[i] = a[i] + b[i];")
            .close();
        let mut artifact = Artifact::new(ArtifactKind::Definitions);
        artifact.push(Fragment::Definition(sig(None), body));
        let text = artifact.render();
        assert!(text.contains("{\n    for (std::size_t i = 0; i < l; i++) {\n        c[i] = a[i] + b[i];\n    }\n}"));
    }

    #[test]
    fn branch_sits_one_level_out() {
        let mut body = Block::new();
        body.open("if (aligned)")
            .line("aligned_loop();")
            .branch("} else {")
            .line("unaligned_loop();")
            .close();
        let mut artifact = Artifact::new(ArtifactKind::Definitions);
        artifact.push(Fragment::Definition(sig(None), body));
        let text = artifact.render();
        assert!(text.contains(
            "    if (aligned) {\n        aligned_loop();\n    } else {\n        unaligned_loop();\n    }\n"
        ));
    }

    #[test]
    fn only_kernels_and_templates_are_inline() {
        let kernel = sig(Some("sse"));
        let pointer = Signature {
            role: SymbolRole::PointerWrapper,
            target: None,
            name: "add".to_owned(),
            ..kernel.clone()
        };
        assert!(kernel.head().starts_with("inline void addBackend("));
        assert!(pointer.head().starts_with("void add("));
        assert!(SymbolRole::ArrayWrapper.is_inline());
        assert!(!SymbolRole::VectorWrapper.is_inline());
    }
}
