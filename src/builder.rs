//! Renders validator descriptors as `PropTypes.*` expressions.

use crate::js::{JsExpr, JsProp, JsStmt};
use crate::types::LiteralValue;
use crate::validator::{ShapeField, ValidatorDescriptor, ValidatorKind};

/// Name of the temporary inside lazy reference wrappers.
const LAZY_BINDING: &str = "validator";

pub struct ValidatorBuilder<'b> {
    /// Expression for the `prop-types` module: an imported binding or a
    /// `require("prop-types")` call.
    prop_types: &'b JsExpr,
}

impl<'b> ValidatorBuilder<'b> {
    pub fn new(prop_types: &'b JsExpr) -> Self {
        ValidatorBuilder { prop_types }
    }

    fn library(&self, member: &str) -> JsExpr {
        self.prop_types.clone().member(member)
    }

    /// Validator in a field position, where `required` adds `.isRequired`.
    pub fn field(&self, desc: &ValidatorDescriptor) -> JsExpr {
        match &desc.kind {
            ValidatorKind::Custom(reference) => self.lazy_reference(reference, desc.required),
            _ if desc.required => self.validator(desc).member("isRequired"),
            _ => self.validator(desc),
        }
    }

    /// Validator without the required marker, as used inside `arrayOf`,
    /// `objectOf` and `oneOfType`.
    pub fn validator(&self, desc: &ValidatorDescriptor) -> JsExpr {
        match &desc.kind {
            ValidatorKind::Primitive(kind) => self.library(kind.validator_name()),
            ValidatorKind::Shape(fields) => self.library("shape").call(vec![self.object(fields)]),
            ValidatorKind::ObjectOf(value) => {
                self.library("objectOf").call(vec![self.validator(value)])
            }
            ValidatorKind::OneOf(values) => self
                .library("oneOf")
                .call(vec![JsExpr::Array(values.iter().map(literal).collect())]),
            ValidatorKind::OneOfType(variants) => self.library("oneOfType").call(vec![
                JsExpr::Array(variants.iter().map(|v| self.validator(v)).collect()),
            ]),
            ValidatorKind::ArrayOf(element) => {
                self.library("arrayOf").call(vec![self.validator(element)])
            }
            ValidatorKind::InstanceOfOrShape { class, shape } => {
                let instance = self
                    .library("instanceOf")
                    .call(vec![JsExpr::ident(class.clone())]);
                match shape {
                    Some(fields) => self.library("oneOfType").call(vec![JsExpr::Array(vec![
                        instance,
                        self.library("shape").call(vec![self.object(fields)]),
                    ])]),
                    None => instance,
                }
            }
            ValidatorKind::Extended { bases, fields } => self
                .library("shape")
                .call(vec![merged_object(bases, self.props(fields))]),
            ValidatorKind::Custom(reference) => self.lazy_reference(reference, false),
            ValidatorKind::Any => self.library("any"),
        }
    }

    /// `{ key: validator, ... }` for a list of shape fields.
    pub fn object(&self, fields: &[ShapeField]) -> JsExpr {
        JsExpr::Object(self.props(fields))
    }

    pub fn props(&self, fields: &[ShapeField]) -> Vec<JsProp> {
        fields
            .iter()
            .map(|f| JsProp::KeyValue(f.key.clone(), self.field(&f.value)))
            .collect()
    }

    /// Value bound to an exported type: the field object for shapes, so
    /// importers can use it directly as `propTypes`, a validator otherwise.
    pub fn export_value(&self, desc: &ValidatorDescriptor) -> JsExpr {
        match &desc.kind {
            ValidatorKind::Shape(fields) => self.object(fields),
            ValidatorKind::Extended { bases, fields } => merged_object(bases, self.props(fields)),
            _ => self.validator(desc),
        }
    }

    /// The referenced binding may hold a field object or a validator and may
    /// not be initialized yet, so it is read on every check.
    fn lazy_reference(&self, reference: &JsExpr, required: bool) -> JsExpr {
        let binding = JsExpr::ident(LAZY_BINDING);
        let shape = self.library("shape").call(vec![binding.clone()]);
        let (as_function, as_shape) = if required {
            (
                JsExpr::binary("||", binding.clone().member("isRequired"), binding.clone()),
                shape.member("isRequired"),
            )
        } else {
            (binding.clone(), shape)
        };
        let selected = JsExpr::conditional(
            JsExpr::binary(
                "===",
                JsExpr::unary("typeof", binding),
                JsExpr::str("function"),
            ),
            as_function,
            as_shape,
        );
        JsExpr::Function {
            params: Vec::new(),
            body: vec![
                JsStmt::Var(LAZY_BINDING.to_string(), reference.clone()),
                JsStmt::Return(selected.member("apply").call(vec![
                    JsExpr::ident("this"),
                    JsExpr::ident("arguments"),
                ])),
            ],
        }
    }
}

/// `Object.assign({}, base, ..., { ... })`
pub fn merged_object(bases: &[JsExpr], props: Vec<JsProp>) -> JsExpr {
    let mut args = Vec::with_capacity(bases.len() + 2);
    args.push(JsExpr::Object(Vec::new()));
    args.extend(bases.iter().cloned());
    args.push(JsExpr::Object(props));
    JsExpr::path("Object.assign").call(args)
}

fn literal(value: &LiteralValue) -> JsExpr {
    match value {
        LiteralValue::String(s) => JsExpr::str(s.clone()),
        LiteralValue::Number(raw) => JsExpr::Num(raw.clone()),
        LiteralValue::Bool(b) => JsExpr::Bool(*b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::PrimitiveKind;

    fn pt() -> JsExpr {
        JsExpr::ident("PropTypes")
    }

    #[test]
    fn test_required_only_in_field_position() {
        let prop_types = pt();
        let builder = ValidatorBuilder::new(&prop_types);
        let desc = ValidatorDescriptor::new(ValidatorKind::ArrayOf(Box::new(
            ValidatorDescriptor::primitive(PrimitiveKind::String),
        )));
        assert_eq!(
            builder.field(&desc).to_string(),
            "PropTypes.arrayOf(PropTypes.string).isRequired"
        );
        assert_eq!(
            builder.field(&desc.clone().optional()).to_string(),
            "PropTypes.arrayOf(PropTypes.string)"
        );
    }

    #[test]
    fn test_one_of_literals() {
        let prop_types = pt();
        let builder = ValidatorBuilder::new(&prop_types);
        let desc = ValidatorDescriptor::new(ValidatorKind::OneOf(vec![
            LiteralValue::String("x".into()),
            LiteralValue::String("y".into()),
        ]))
        .optional();
        assert_eq!(
            builder.field(&desc).to_string(),
            "PropTypes.oneOf([\"x\", \"y\"])"
        );
    }

    #[test]
    fn test_instance_or_shape() {
        let prop_types = pt();
        let builder = ValidatorBuilder::new(&prop_types);
        let desc = ValidatorDescriptor::new(ValidatorKind::InstanceOfOrShape {
            class: "Date".into(),
            shape: None,
        })
        .optional();
        assert_eq!(builder.field(&desc).to_string(), "PropTypes.instanceOf(Date)");
    }

    #[test]
    fn test_lazy_reference_wrapper() {
        let prop_types = pt();
        let builder = ValidatorBuilder::new(&prop_types);
        let desc = ValidatorDescriptor::new(ValidatorKind::Custom(JsExpr::ident("__proptype_Tree")));
        let out = builder.field(&desc).to_string();
        assert!(out.starts_with("function () {\n  var validator = __proptype_Tree;"));
        assert!(out.contains(
            "return (typeof validator === \"function\" ? validator.isRequired || validator : PropTypes.shape(validator).isRequired).apply(this, arguments);"
        ));
    }

    #[test]
    fn test_optional_reference_skips_required() {
        let prop_types = pt();
        let builder = ValidatorBuilder::new(&prop_types);
        let desc = ValidatorDescriptor::new(ValidatorKind::Custom(JsExpr::ident("__proptype_Opt")))
            .optional();
        let out = builder.field(&desc).to_string();
        assert!(out.contains(
            "return (typeof validator === \"function\" ? validator : PropTypes.shape(validator)).apply(this, arguments);"
        ));
        assert!(!out.contains("isRequired"));
    }

    #[test]
    fn test_nested_runtime_merge_is_wrapped_in_shape() {
        let prop_types = pt();
        let builder = ValidatorBuilder::new(&prop_types);
        let desc = ValidatorDescriptor::new(ValidatorKind::Extended {
            bases: vec![JsExpr::ident("__proptype_Base")],
            fields: vec![ShapeField {
                key: "extra".into(),
                value: ValidatorDescriptor::primitive(PrimitiveKind::Bool),
            }],
        });
        assert_eq!(
            builder.validator(&desc).to_string(),
            "PropTypes.shape(Object.assign({}, __proptype_Base, {\n  extra: PropTypes.bool.isRequired\n}))"
        );
    }

    #[test]
    fn test_require_style_library_access() {
        let prop_types = JsExpr::ident("require").call(vec![JsExpr::str("prop-types")]);
        let builder = ValidatorBuilder::new(&prop_types);
        let desc = ValidatorDescriptor::primitive(PrimitiveKind::Bool);
        assert_eq!(
            builder.field(&desc).to_string(),
            "require(\"prop-types\").bool.isRequired"
        );
    }
}
