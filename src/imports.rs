use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

use crate::js::{JsExpr, JsProp, JsStmt};

pub const PROP_TYPES_MODULE: &str = "prop-types";
pub const PROP_TYPES_LOCAL: &str = "PropTypes";

lazy_static! {
    static ref NON_IDENTIFIER_RUN: Regex = Regex::new(r"[^a-zA-Z0-9_$]+").unwrap();
    /// Bare package specifiers (`react`, `@scope/pkg`), as opposed to paths.
    static ref PACKAGE_LOCATION: Regex = Regex::new(r"^@?\w").unwrap();
}

/// How generated code reaches other modules. Fixed for a whole unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStyle {
    /// Hoisted `import` statements and `export { }` lists.
    Import,
    /// Inline `require(...)` access and guarded `Object.defineProperty(exports, ...)`.
    Require,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ImportKind {
    Default,
    Named,
}

pub fn sanitize_identifier(name: &str) -> String {
    let sanitized = NON_IDENTIFIER_RUN.replace_all(name, "_").into_owned();
    if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", sanitized)
    } else {
        sanitized
    }
}

pub fn is_package_location(location: &str) -> bool {
    PACKAGE_LOCATION.is_match(location)
}

// ═══════════════════════════════════════════════════════════════════════════════
// IMPORT TABLE
// ═══════════════════════════════════════════════════════════════════════════════

/// Deduplicates generated imports per `(symbol, location)` for one unit.
#[derive(Debug)]
pub struct ImportTable {
    style: ModuleStyle,
    locals: HashMap<(ImportKind, String, String), String>,
    hoisted: Vec<JsStmt>,
}

impl ImportTable {
    pub fn new(style: ModuleStyle) -> Self {
        ImportTable {
            style,
            locals: HashMap::new(),
            hoisted: Vec::new(),
        }
    }

    pub fn style(&self) -> ModuleStyle {
        self.style
    }

    /// Records an import the author already wrote so it is reused.
    pub fn adopt_default(&mut self, name: &str, location: &str, local: &str) {
        self.locals.insert(
            (ImportKind::Default, name.to_string(), location.to_string()),
            local.to_string(),
        );
    }

    /// The `prop-types` module object.
    pub fn prop_types(&mut self) -> JsExpr {
        self.default_import(PROP_TYPES_LOCAL, PROP_TYPES_MODULE)
    }

    pub fn default_import(&mut self, name: &str, location: &str) -> JsExpr {
        let key = (ImportKind::Default, name.to_string(), location.to_string());
        if let Some(local) = self.locals.get(&key) {
            return JsExpr::ident(local.clone());
        }
        match self.style {
            ModuleStyle::Import => {
                let local = sanitize_identifier(name);
                self.hoisted.push(JsStmt::ImportDefault {
                    local: local.clone(),
                    source: location.to_string(),
                });
                self.locals.insert(key, local.clone());
                JsExpr::ident(local)
            }
            ModuleStyle::Require => require(location),
        }
    }

    pub fn named_import(&mut self, name: &str, local: &str, location: &str) -> JsExpr {
        let key = (ImportKind::Named, name.to_string(), location.to_string());
        if let Some(existing) = self.locals.get(&key) {
            return JsExpr::ident(existing.clone());
        }
        match self.style {
            ModuleStyle::Import => {
                let local = sanitize_identifier(local);
                self.hoisted.push(JsStmt::ImportNamed {
                    imported: sanitize_identifier(name),
                    local: local.clone(),
                    source: location.to_string(),
                });
                self.locals.insert(key, local.clone());
                JsExpr::ident(local)
            }
            ModuleStyle::Require => require(location).member(name),
        }
    }

    /// Import statements to place at the top of the unit, in request order.
    pub fn take_hoisted(&mut self) -> Vec<JsStmt> {
        std::mem::take(&mut self.hoisted)
    }
}

fn require(location: &str) -> JsExpr {
    JsExpr::ident("require").call(vec![JsExpr::str(location)])
}

// ═══════════════════════════════════════════════════════════════════════════════
// EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Makes `value` available to other units as `name`.
///
/// With ES modules this is an `export { }` list; otherwise a guarded
/// `Object.defineProperty` on `exports` that is skipped when `dead_code`
/// holds.
pub fn export_binding(
    style: ModuleStyle,
    name: &str,
    value: JsExpr,
    dead_code: Option<&JsExpr>,
) -> JsStmt {
    match style {
        ModuleStyle::Import => {
            let local = match value {
                JsExpr::Ident(local) => local,
                _ => name.to_string(),
            };
            JsStmt::ExportNamed {
                local,
                exported: name.to_string(),
            }
        }
        ModuleStyle::Require => {
            let define = JsExpr::path("Object.defineProperty").call(vec![
                JsExpr::ident("exports"),
                JsExpr::str(name),
                JsExpr::Object(vec![
                    JsProp::KeyValue("value".into(), value),
                    JsProp::KeyValue("configurable".into(), JsExpr::Bool(true)),
                ]),
            ]);
            let exports_defined = JsExpr::binary(
                "!==",
                JsExpr::unary("typeof", JsExpr::ident("exports")),
                JsExpr::str("undefined"),
            );
            let guard = match dead_code {
                Some(predicate) => JsExpr::binary(
                    "&&",
                    JsExpr::unary("!", predicate.clone()),
                    exports_defined,
                ),
                None => exports_defined,
            };
            JsStmt::If(guard, Box::new(JsStmt::Expr(define)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("prop-types"), "prop_types");
        assert_eq!(sanitize_identifier("@scope/pkg.name"), "_scope_pkg_name");
        assert_eq!(sanitize_identifier("3d"), "_3d");
        assert_eq!(sanitize_identifier("__proptype_Props"), "__proptype_Props");
    }

    #[test]
    fn test_package_locations() {
        assert!(is_package_location("react"));
        assert!(is_package_location("@scope/pkg"));
        assert!(!is_package_location("./types"));
        assert!(!is_package_location("../types"));
    }

    #[test]
    fn test_import_dedup() {
        let mut table = ImportTable::new(ModuleStyle::Import);
        let first = table.prop_types();
        let second = table.prop_types();
        assert_eq!(first, JsExpr::ident("PropTypes"));
        assert_eq!(first, second);

        table.named_import("__proptype_A", "__proptype_A", "./a");
        table.named_import("__proptype_A", "__proptype_A", "./a");
        table.named_import("__proptype_A", "__proptype_A", "./b");

        let hoisted = table.take_hoisted();
        assert_eq!(hoisted.len(), 3);
        assert_eq!(hoisted[0].to_string(), "import PropTypes from \"prop-types\";");
        assert!(table.take_hoisted().is_empty());
    }

    #[test]
    fn test_adopted_import_is_reused() {
        let mut table = ImportTable::new(ModuleStyle::Import);
        table.adopt_default(PROP_TYPES_LOCAL, PROP_TYPES_MODULE, "PT");
        assert_eq!(table.prop_types(), JsExpr::ident("PT"));
        assert!(table.take_hoisted().is_empty());
    }

    #[test]
    fn test_require_style_is_inline() {
        let mut table = ImportTable::new(ModuleStyle::Require);
        assert_eq!(table.prop_types().to_string(), "require(\"prop-types\")");
        assert_eq!(
            table
                .named_import("__proptype_A", "__proptype_A", "./a")
                .to_string(),
            "require(\"./a\").__proptype_A"
        );
        assert!(table.take_hoisted().is_empty());
    }

    #[test]
    fn test_export_binding_styles() {
        let es = export_binding(
            ModuleStyle::Import,
            "__proptype_Props",
            JsExpr::ident("__proptype_Props"),
            None,
        );
        assert_eq!(es.to_string(), "export { __proptype_Props };");

        let predicate = JsExpr::raw("__PROD__");
        let cjs = export_binding(
            ModuleStyle::Require,
            "__proptype_Props",
            JsExpr::ident("__proptype_Props"),
            Some(&predicate),
        );
        assert_eq!(
            cjs.to_string(),
            "if (!(__PROD__) && typeof exports !== \"undefined\") Object.defineProperty(exports, \"__proptype_Props\", {\n  value: __proptype_Props,\n  configurable: true\n});"
        );
    }
}
