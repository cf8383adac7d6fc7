use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// FATAL ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors that abort the whole compilation unit.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to parse {file}: {message}")]
    Parse { file: String, message: String },

    #[error("{file}: component declaration at offset {offset} has no name")]
    UnnamedComponent { file: String, offset: u32 },

    #[error("{file}: `{component}` declares props with a non-object annotation")]
    UnsupportedPropsAnnotation { file: String, component: String },

    #[error("invalid deadCode predicate `{predicate}`: {message}")]
    InvalidDeadCodePredicate { predicate: String, message: String },

    #[error("invalid plugin options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}

// ═══════════════════════════════════════════════════════════════════════════════
// WARNINGS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningKind {
    /// A type name had no registry entry and no built-in meaning.
    UnresolvedType,
    /// A type was approximated (tuple, mixed intersection, dynamic keys).
    UnsupportedShape,
    /// A hand-written validator was not an object literal.
    MalformedExplicitValidator,
}

impl WarningKind {
    pub fn code(self) -> &'static str {
        match self {
            WarningKind::UnresolvedType => "PT-UNRESOLVED",
            WarningKind::UnsupportedShape => "PT-APPROX",
            WarningKind::MalformedExplicitValidator => "PT-EXPLICIT",
        }
    }
}

/// A non-fatal degradation recorded while processing one unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    pub kind: WarningKind,
    pub code: String,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Warning {
            kind,
            code: kind.code().to_string(),
            message: message.into(),
        }
    }
}

/// Collects warnings for a unit and mirrors each one to the log.
#[derive(Debug, Default)]
pub struct Warnings {
    items: Vec<Warning>,
}

impl Warnings {
    pub fn push(&mut self, kind: WarningKind, message: impl Into<String>) {
        let warning = Warning::new(kind, message);
        tracing::warn!(code = warning.code.as_str(), "{}", warning.message);
        self.items.push(warning);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Warning> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Warning> {
        self.items
    }
}
