//! Small JavaScript output tree used for every piece of generated code.
//!
//! Generated validators are built from these constructors and printed with
//! minimal parentheses; user-written fragments travel as `Raw` source text.

use oxc_syntax::identifier::is_identifier_name;
use std::fmt::{self, Write};

#[derive(Debug, Clone, PartialEq)]
pub enum JsExpr {
    Ident(String),
    Str(String),
    /// Numeric literal kept as its source spelling.
    Num(String),
    Bool(bool),
    Null,
    Member(Box<JsExpr>, String),
    Call(Box<JsExpr>, Vec<JsExpr>),
    Array(Vec<JsExpr>),
    Object(Vec<JsProp>),
    Conditional(Box<JsExpr>, Box<JsExpr>, Box<JsExpr>),
    Binary(&'static str, Box<JsExpr>, Box<JsExpr>),
    Unary(&'static str, Box<JsExpr>),
    Function {
        params: Vec<String>,
        body: Vec<JsStmt>,
    },
    /// Verbatim source text, always parenthesized when used as an operand.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsProp {
    KeyValue(String, JsExpr),
    /// A property copied from user source, e.g. `...shared` or `a: custom()`.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum JsStmt {
    Expr(JsExpr),
    Var(String, JsExpr),
    Return(JsExpr),
    If(JsExpr, Box<JsStmt>),
    ImportDefault {
        local: String,
        source: String,
    },
    ImportNamed {
        imported: String,
        local: String,
        source: String,
    },
    ExportNamed {
        local: String,
        exported: String,
    },
    /// `static name = value;` inside a class body.
    StaticProperty {
        name: String,
        value: JsExpr,
    },
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONSTRUCTORS
// ═══════════════════════════════════════════════════════════════════════════════

impl JsExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        JsExpr::Ident(name.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        JsExpr::Str(value.into())
    }

    pub fn member(self, property: impl Into<String>) -> Self {
        JsExpr::Member(Box::new(self), property.into())
    }

    /// Builds `a.b.c` from a dotted path.
    pub fn path(dotted: &str) -> Self {
        let mut parts = dotted.split('.');
        let head = JsExpr::ident(parts.next().unwrap_or_default());
        parts.fold(head, |acc, part| acc.member(part))
    }

    pub fn call(self, args: Vec<JsExpr>) -> Self {
        JsExpr::Call(Box::new(self), args)
    }

    pub fn conditional(test: JsExpr, consequent: JsExpr, alternate: JsExpr) -> Self {
        JsExpr::Conditional(Box::new(test), Box::new(consequent), Box::new(alternate))
    }

    pub fn binary(op: &'static str, left: JsExpr, right: JsExpr) -> Self {
        JsExpr::Binary(op, Box::new(left), Box::new(right))
    }

    pub fn unary(op: &'static str, argument: JsExpr) -> Self {
        JsExpr::Unary(op, Box::new(argument))
    }

    pub fn assign(target: JsExpr, value: JsExpr) -> Self {
        JsExpr::binary("=", target, value)
    }

    pub fn raw(src: impl Into<String>) -> Self {
        JsExpr::Raw(src.into())
    }

    fn precedence(&self) -> u8 {
        match self {
            JsExpr::Raw(_) => 0,
            JsExpr::Conditional(..) => 3,
            JsExpr::Binary(op, ..) => binary_precedence(op),
            JsExpr::Unary(..) => 15,
            JsExpr::Num(n) if n.starts_with('-') => 15,
            JsExpr::Member(..) | JsExpr::Call(..) => 19,
            _ => 20,
        }
    }
}

impl JsStmt {
    pub fn assign(target: JsExpr, value: JsExpr) -> Self {
        JsStmt::Expr(JsExpr::assign(target, value))
    }

    /// Renders the statement with every line after the first indented by `indent`.
    pub fn render(&self, indent: &str) -> String {
        let mut printer = Printer::new(indent);
        printer.stmt(self);
        printer.out
    }
}

fn binary_precedence(op: &str) -> u8 {
    match op {
        "=" => 2,
        "||" | "??" => 4,
        "&&" => 5,
        "===" | "!==" | "==" | "!=" => 10,
        _ => 12,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRINTER
// ═══════════════════════════════════════════════════════════════════════════════

const INDENT_UNIT: &str = "  ";
/// Operand position of a comma-separated list (arguments, elements, values).
const LIST_ITEM: u8 = 2;

struct Printer {
    out: String,
    base: String,
    depth: usize,
}

impl Printer {
    fn new(base: &str) -> Self {
        Printer {
            out: String::new(),
            base: base.to_string(),
            depth: 0,
        }
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.out.push_str(&self.base);
        for _ in 0..self.depth {
            self.out.push_str(INDENT_UNIT);
        }
    }

    fn expr(&mut self, expr: &JsExpr, min_prec: u8) {
        let wrap = expr.precedence() < min_prec;
        if wrap {
            self.out.push('(');
        }
        match expr {
            JsExpr::Ident(name) => self.out.push_str(name),
            JsExpr::Str(value) => {
                let _ = write!(self.out, "\"{}\"", escape_js_string(value));
            }
            JsExpr::Num(raw) => self.out.push_str(raw),
            JsExpr::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            JsExpr::Null => self.out.push_str("null"),
            JsExpr::Raw(src) => self.out.push_str(src),
            JsExpr::Member(object, property) => {
                self.expr(object, 19);
                if is_identifier_name(property) {
                    self.out.push('.');
                    self.out.push_str(property);
                } else {
                    let _ = write!(self.out, "[\"{}\"]", escape_js_string(property));
                }
            }
            JsExpr::Call(callee, args) => {
                let needs_parens = matches!(**callee, JsExpr::Function { .. });
                if needs_parens {
                    self.out.push('(');
                }
                self.expr(callee, 19);
                if needs_parens {
                    self.out.push(')');
                }
                self.out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(arg, LIST_ITEM);
                }
                self.out.push(')');
            }
            JsExpr::Array(items) => {
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.expr(item, LIST_ITEM);
                }
                self.out.push(']');
            }
            JsExpr::Object(props) => self.object(props),
            JsExpr::Conditional(test, consequent, alternate) => {
                self.expr(test, 4);
                self.out.push_str(" ? ");
                self.expr(consequent, LIST_ITEM);
                self.out.push_str(" : ");
                self.expr(alternate, LIST_ITEM);
            }
            JsExpr::Binary(op, left, right) => {
                let prec = binary_precedence(op);
                // `=` is right-associative, everything else we emit is left-associative.
                let (left_min, right_min) = if *op == "=" {
                    (19, prec)
                } else {
                    (prec, prec + 1)
                };
                self.expr(left, left_min);
                let _ = write!(self.out, " {} ", op);
                self.expr(right, right_min);
            }
            JsExpr::Unary(op, argument) => {
                self.out.push_str(op);
                if op.chars().all(|c| c.is_ascii_alphabetic()) {
                    self.out.push(' ');
                }
                self.expr(argument, 15);
            }
            JsExpr::Function { params, body } => {
                let _ = write!(self.out, "function ({}) {{", params.join(", "));
                self.depth += 1;
                for stmt in body {
                    self.newline();
                    self.stmt(stmt);
                }
                self.depth -= 1;
                self.newline();
                self.out.push('}');
            }
        }
        if wrap {
            self.out.push(')');
        }
    }

    fn object(&mut self, props: &[JsProp]) {
        if props.is_empty() {
            self.out.push_str("{}");
            return;
        }
        self.out.push('{');
        self.depth += 1;
        for (i, prop) in props.iter().enumerate() {
            self.newline();
            match prop {
                JsProp::KeyValue(key, value) => {
                    self.property_key(key);
                    self.out.push_str(": ");
                    self.expr(value, LIST_ITEM);
                }
                JsProp::Raw(src) => self.out.push_str(src),
            }
            if i + 1 < props.len() {
                self.out.push(',');
            }
        }
        self.depth -= 1;
        self.newline();
        self.out.push('}');
    }

    fn property_key(&mut self, key: &str) {
        if is_identifier_name(key) {
            self.out.push_str(key);
        } else {
            let _ = write!(self.out, "\"{}\"", escape_js_string(key));
        }
    }

    fn stmt(&mut self, stmt: &JsStmt) {
        match stmt {
            JsStmt::Expr(expr) => {
                self.expr(expr, 0);
                self.out.push(';');
            }
            JsStmt::Var(name, value) => {
                let _ = write!(self.out, "var {} = ", name);
                self.expr(value, LIST_ITEM);
                self.out.push(';');
            }
            JsStmt::Return(value) => {
                self.out.push_str("return ");
                self.expr(value, 0);
                self.out.push(';');
            }
            JsStmt::If(test, body) => {
                self.out.push_str("if (");
                self.expr(test, 0);
                self.out.push_str(") ");
                self.stmt(body);
            }
            JsStmt::ImportDefault { local, source } => {
                let _ = write!(
                    self.out,
                    "import {} from \"{}\";",
                    local,
                    escape_js_string(source)
                );
            }
            JsStmt::ImportNamed {
                imported,
                local,
                source,
            } => {
                let spec = if imported == local {
                    local.clone()
                } else {
                    format!("{} as {}", imported, local)
                };
                let _ = write!(
                    self.out,
                    "import {{ {} }} from \"{}\";",
                    spec,
                    escape_js_string(source)
                );
            }
            JsStmt::ExportNamed { local, exported } => {
                if local == exported {
                    let _ = write!(self.out, "export {{ {} }};", local);
                } else {
                    let _ = write!(self.out, "export {{ {} as {} }};", local, exported);
                }
            }
            JsStmt::StaticProperty { name, value } => {
                let _ = write!(self.out, "static {} = ", name);
                self.expr(value, LIST_ITEM);
                self.out.push(';');
            }
        }
    }
}

impl fmt::Display for JsExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer::new("");
        printer.expr(self, 0);
        f.write_str(&printer.out)
    }
}

impl fmt::Display for JsStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(""))
    }
}

pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_js_string() {
        assert_eq!(escape_js_string("hello\"world"), "hello\\\"world");
        assert_eq!(escape_js_string("line1\nline2"), "line1\\nline2");
    }

    #[test]
    fn test_member_chain_and_call() {
        let expr = JsExpr::path("PropTypes.arrayOf")
            .call(vec![JsExpr::path("PropTypes.string")])
            .member("isRequired");
        assert_eq!(expr.to_string(), "PropTypes.arrayOf(PropTypes.string).isRequired");
    }

    #[test]
    fn test_non_identifier_member_and_key() {
        let expr = JsExpr::ident("x").member("data-id");
        assert_eq!(expr.to_string(), "x[\"data-id\"]");

        let obj = JsExpr::Object(vec![
            JsProp::KeyValue("aria-label".into(), JsExpr::Null),
            JsProp::KeyValue("name".into(), JsExpr::Bool(true)),
        ]);
        assert_eq!(obj.to_string(), "{\n  \"aria-label\": null,\n  name: true\n}");
    }

    #[test]
    fn test_conditional_operand_gets_parens() {
        let cond = JsExpr::conditional(
            JsExpr::ident("a"),
            JsExpr::ident("b"),
            JsExpr::ident("c"),
        );
        let expr = cond.member("apply");
        assert_eq!(expr.to_string(), "(a ? b : c).apply");
    }

    #[test]
    fn test_binary_precedence() {
        let expr = JsExpr::binary(
            "&&",
            JsExpr::unary("!", JsExpr::raw("__PROD__")),
            JsExpr::binary(
                "!==",
                JsExpr::unary("typeof", JsExpr::ident("exports")),
                JsExpr::str("undefined"),
            ),
        );
        assert_eq!(
            expr.to_string(),
            "!(__PROD__) && typeof exports !== \"undefined\""
        );
    }

    #[test]
    fn test_statement_rendering() {
        let stmt = JsStmt::assign(
            JsExpr::path("Foo.propTypes"),
            JsExpr::Object(vec![JsProp::KeyValue(
                "name".into(),
                JsExpr::path("PropTypes.string"),
            )]),
        );
        assert_eq!(
            stmt.to_string(),
            "Foo.propTypes = {\n  name: PropTypes.string\n};"
        );
        assert_eq!(
            stmt.render("  "),
            "Foo.propTypes = {\n    name: PropTypes.string\n  };"
        );

        let import = JsStmt::ImportNamed {
            imported: "__proptype_Props".into(),
            local: "__proptype_Props".into(),
            source: "./types".into(),
        };
        assert_eq!(
            import.to_string(),
            "import { __proptype_Props } from \"./types\";"
        );
    }

    #[test]
    fn test_function_expression() {
        let f = JsExpr::Function {
            params: vec![],
            body: vec![JsStmt::Return(JsExpr::Null)],
        };
        assert_eq!(f.to_string(), "function () {\n  return null;\n}");
    }
}
