use serde::{Deserialize, Serialize};

use crate::error::TransformError;

/// Leading directive that opts a whole file out of the pass.
pub const SUPPRESS_DIRECTIVE: &str = "no proptypes";

/// Default guard used when `deadCode` is `true`.
pub const DEFAULT_DEAD_CODE_PREDICATE: &str = "process.env.NODE_ENV === \"production\"";

// ═══════════════════════════════════════════════════════════════════════════════
// PLUGIN OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginOptions {
    /// Emit `import`/`export` syntax even when dead-code wrapping is on.
    #[serde(rename = "useESModules")]
    pub use_es_modules: bool,
    pub dead_code: DeadCode,
    /// Attach class validators with an assignment instead of a static member.
    pub no_static: bool,
    pub omit_runtime_type_export: bool,
    pub ignore_node_modules: bool,
}

/// `deadCode` is either a flag or the source text of a custom guard expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeadCode {
    Enabled(bool),
    Predicate(String),
}

impl Default for DeadCode {
    fn default() -> Self {
        DeadCode::Enabled(false)
    }
}

impl DeadCode {
    /// Guard source text, or `None` when wrapping is off.
    pub fn predicate_source(&self) -> Option<&str> {
        match self {
            DeadCode::Enabled(true) => Some(DEFAULT_DEAD_CODE_PREDICATE),
            DeadCode::Enabled(false) => None,
            DeadCode::Predicate(src) if src.trim().is_empty() => None,
            DeadCode::Predicate(src) => Some(src.as_str()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.predicate_source().is_some()
    }
}

impl PluginOptions {
    pub fn from_json(json: &str) -> Result<Self, TransformError> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    /// Require-style access is only used when dead-code wrapping is on and
    /// ES modules were not forced.
    pub fn uses_es_modules(&self) -> bool {
        self.use_es_modules || !self.dead_code.is_enabled()
    }

    pub fn is_suppressed_path(&self, file_path: &str) -> bool {
        self.ignore_node_modules
            && file_path
                .split(|c| c == '/' || c == '\\')
                .any(|segment| segment == "node_modules")
    }
}
