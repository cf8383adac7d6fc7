use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;
use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::TransformError;
use crate::js::JsExpr;
use crate::options::DeadCode;

lazy_static! {
    /// Custom predicates that already parsed cleanly.
    static ref CHECKED_PREDICATES: Mutex<HashSet<String>> = Mutex::new(HashSet::new());
}

/// Wraps generated values as `predicate ? null : value` so minifiers can drop
/// them in production builds.
#[derive(Debug, Clone, Default)]
pub struct DeadCodeGuard {
    predicate: Option<JsExpr>,
}

impl DeadCodeGuard {
    pub fn from_options(dead_code: &DeadCode) -> Result<Self, TransformError> {
        let predicate = match dead_code {
            DeadCode::Enabled(true) => Some(default_predicate()),
            DeadCode::Enabled(false) => None,
            DeadCode::Predicate(_) => match dead_code.predicate_source() {
                Some(src) => Some(custom_predicate(src)?),
                None => None,
            },
        };
        Ok(DeadCodeGuard { predicate })
    }

    pub fn predicate(&self) -> Option<&JsExpr> {
        self.predicate.as_ref()
    }

    pub fn is_enabled(&self) -> bool {
        self.predicate.is_some()
    }

    pub fn wrap(&self, value: JsExpr) -> JsExpr {
        match &self.predicate {
            Some(predicate) => JsExpr::conditional(predicate.clone(), JsExpr::Null, value),
            None => value,
        }
    }
}

/// `process.env.NODE_ENV === "production"`
fn default_predicate() -> JsExpr {
    JsExpr::binary(
        "===",
        JsExpr::path("process.env.NODE_ENV"),
        JsExpr::str("production"),
    )
}

fn custom_predicate(src: &str) -> Result<JsExpr, TransformError> {
    let src = src.trim();
    let already_checked = CHECKED_PREDICATES
        .lock()
        .map(|checked| checked.contains(src))
        .unwrap_or(false);
    if !already_checked {
        let allocator = Allocator::default();
        let source_type = SourceType::default().with_module(true);
        if let Err(errors) = Parser::new(&allocator, src, source_type).parse_expression() {
            let message = errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(TransformError::InvalidDeadCodePredicate {
                predicate: src.to_string(),
                message,
            });
        }
        if let Ok(mut checked) = CHECKED_PREDICATES.lock() {
            checked.insert(src.to_string());
        }
    }
    Ok(JsExpr::raw(src))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_predicate_wrap() {
        let guard = DeadCodeGuard::from_options(&DeadCode::Enabled(true)).unwrap();
        let wrapped = guard.wrap(JsExpr::path("PropTypes.string"));
        assert_eq!(
            wrapped.to_string(),
            "process.env.NODE_ENV === \"production\" ? null : PropTypes.string"
        );
    }

    #[test]
    fn test_disabled_is_identity() {
        let guard = DeadCodeGuard::from_options(&DeadCode::Enabled(false)).unwrap();
        assert!(!guard.is_enabled());
        assert_eq!(guard.wrap(JsExpr::Null), JsExpr::Null);

        let guard = DeadCodeGuard::from_options(&DeadCode::Predicate("  ".into())).unwrap();
        assert!(!guard.is_enabled());
    }

    #[test]
    fn test_custom_predicate_parenthesized() {
        let guard =
            DeadCodeGuard::from_options(&DeadCode::Predicate("__DEV__ === false".into())).unwrap();
        let wrapped = guard.wrap(JsExpr::path("PropTypes.any"));
        assert_eq!(wrapped.to_string(), "(__DEV__ === false) ? null : PropTypes.any");

        // Second use hits the cache and yields the same guard.
        let again =
            DeadCodeGuard::from_options(&DeadCode::Predicate("__DEV__ === false".into())).unwrap();
        assert_eq!(again.predicate(), guard.predicate());
    }

    #[test]
    fn test_invalid_predicate_rejected() {
        let err = DeadCodeGuard::from_options(&DeadCode::Predicate("a ===".into())).unwrap_err();
        assert!(matches!(err, TransformError::InvalidDeadCodePredicate { .. }));
    }
}
