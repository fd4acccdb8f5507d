//! Generator configuration.

/// Destination file names of the four artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    /// Public interface, included by downstream code.
    pub public: String,
    /// Internal declarations and fixed-length templates.
    pub internal: String,
    /// Kernel and wrapper definitions.
    pub definitions: String,
    /// Auxiliary file forwarding to the public interface.
    pub forwarding: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            public: "libezsimd.hpp".to_owned(),
            internal: "libezsimd.ipp".to_owned(),
            definitions: "ezsimd.hpp".to_owned(),
            forwarding: "ezsimd.cpp".to_owned(),
        }
    }
}

/// Settings of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// C++ namespace every generated symbol lives in.
    pub namespace: String,
    /// Macro that, when defined downstream, traces which kernel was
    /// dispatched (`EZSIMD_SHOW_FUNC << "...";`).
    pub show_func_macro: String,
    /// Artifact file names; also used for the cross-artifact includes.
    pub names: ArtifactNames,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            namespace: "ezsimd".to_owned(),
            show_func_macro: "EZSIMD_SHOW_FUNC".to_owned(),
            names: ArtifactNames::default(),
        }
    }
}
