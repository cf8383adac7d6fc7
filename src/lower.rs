//! Lowers oxc type annotations to [`TypeDescriptor`]s.

use oxc_ast::ast::{
    Expression, TSLiteral, TSMethodSignatureKind, TSSignature, TSTupleElement, TSType,
    TSTypeAliasDeclaration, TSTypeName, TSTypeOperatorOperator, TSTypeParameterDeclaration,
    TSInterfaceDeclaration, UnaryOperator,
};

use crate::types::{LiteralValue, ObjectField, ObjectShape, TypeDescriptor};

/// Lowering state: the type parameters in scope, which erase to `Any`.
#[derive(Debug, Default)]
pub struct Lowering {
    type_params: Vec<String>,
}

impl Lowering {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type_params(params: Option<&TSTypeParameterDeclaration<'_>>) -> Self {
        let type_params = params
            .map(|decl| decl.params.iter().map(|p| p.name.name.to_string()).collect())
            .unwrap_or_default();
        Lowering { type_params }
    }

    pub fn lower(&self, ty: &TSType<'_>) -> TypeDescriptor {
        match ty {
            TSType::TSAnyKeyword(_)
            | TSType::TSUnknownKeyword(_)
            | TSType::TSNeverKeyword(_)
            | TSType::TSIntrinsicKeyword(_)
            | TSType::TSThisType(_) => TypeDescriptor::Any,
            TSType::TSStringKeyword(_) => TypeDescriptor::primitive("string"),
            TSType::TSNumberKeyword(_) => TypeDescriptor::primitive("number"),
            TSType::TSBooleanKeyword(_) => TypeDescriptor::primitive("boolean"),
            TSType::TSBigIntKeyword(_) => TypeDescriptor::primitive("bigint"),
            TSType::TSSymbolKeyword(_) => TypeDescriptor::primitive("symbol"),
            TSType::TSObjectKeyword(_) => TypeDescriptor::primitive("object"),
            TSType::TSNullKeyword(_) => TypeDescriptor::primitive("null"),
            TSType::TSUndefinedKeyword(_) => TypeDescriptor::primitive("undefined"),
            TSType::TSVoidKeyword(_) => TypeDescriptor::primitive("void"),
            TSType::TSFunctionType(_) | TSType::TSConstructorType(_) => {
                TypeDescriptor::primitive("function")
            }
            TSType::TSArrayType(arr) => {
                TypeDescriptor::ArrayOf(Box::new(self.lower(&arr.element_type)))
            }
            TSType::TSTupleType(tuple) => TypeDescriptor::TupleOf(
                tuple
                    .element_types
                    .iter()
                    .map(|el| self.lower_tuple_element(el))
                    .collect(),
            ),
            TSType::TSNamedTupleMember(member) => self.lower_tuple_element(&member.element_type),
            TSType::TSUnionType(union) => {
                TypeDescriptor::Union(union.types.iter().map(|t| self.lower(t)).collect())
            }
            TSType::TSIntersectionType(inter) => {
                TypeDescriptor::Intersection(inter.types.iter().map(|t| self.lower(t)).collect())
            }
            TSType::TSParenthesizedType(paren) => self.lower(&paren.type_annotation),
            TSType::TSTypeOperatorType(op) => match op.operator {
                TSTypeOperatorOperator::Readonly | TSTypeOperatorOperator::Unique => {
                    self.lower(&op.type_annotation)
                }
                TSTypeOperatorOperator::Keyof => TypeDescriptor::Any,
            },
            TSType::TSLiteralType(lit) => lower_literal(&lit.literal),
            TSType::TSTemplateLiteralType(tpl) if tpl.types.is_empty() && tpl.quasis.len() == 1 => {
                match tpl.quasis[0].value.cooked {
                    Some(cooked) => {
                        TypeDescriptor::LiteralValue(LiteralValue::String(cooked.to_string()))
                    }
                    None => TypeDescriptor::primitive("string"),
                }
            }
            TSType::TSTemplateLiteralType(_) => TypeDescriptor::primitive("string"),
            TSType::TSTypeLiteral(lit) => self.lower_members(&lit.members),
            TSType::TSTypeReference(reference) => {
                let name = type_name_text(&reference.type_name);
                if self.type_params.iter().any(|p| *p == name) {
                    return TypeDescriptor::Any;
                }
                let type_arguments = reference
                    .type_arguments
                    .as_ref()
                    .map(|args| args.params.iter().map(|t| self.lower(t)).collect())
                    .unwrap_or_default();
                TypeDescriptor::AliasReference {
                    name,
                    type_arguments,
                }
            }
            TSType::TSConditionalType(_)
            | TSType::TSImportType(_)
            | TSType::TSIndexedAccessType(_)
            | TSType::TSInferType(_)
            | TSType::TSMappedType(_)
            | TSType::TSTypePredicate(_)
            | TSType::TSTypeQuery(_)
            | TSType::JSDocNullableType(_)
            | TSType::JSDocNonNullableType(_)
            | TSType::JSDocUnknownType(_) => TypeDescriptor::Any,
        }
    }

    fn lower_tuple_element(&self, element: &TSTupleElement<'_>) -> TypeDescriptor {
        match element {
            TSTupleElement::TSOptionalType(opt) => self.lower(&opt.type_annotation),
            TSTupleElement::TSRestType(rest) => match self.lower(&rest.type_annotation) {
                TypeDescriptor::ArrayOf(inner) => *inner,
                other => other,
            },
            TSTupleElement::TSNamedTupleMember(member) => {
                self.lower_tuple_element(&member.element_type)
            }
            other => other
                .as_ts_type()
                .map(|t| self.lower(t))
                .unwrap_or(TypeDescriptor::Any),
        }
    }

    /// Members of a type literal or interface body, in declaration order.
    pub fn lower_members(&self, members: &[TSSignature<'_>]) -> TypeDescriptor {
        let mut shape = ObjectShape::default();
        let mut callable = false;
        for member in members {
            match member {
                TSSignature::TSPropertySignature(prop) => {
                    let Some(key) = prop.key.static_name() else {
                        continue;
                    };
                    let value = prop
                        .type_annotation
                        .as_ref()
                        .map(|ann| self.lower(&ann.type_annotation))
                        .unwrap_or(TypeDescriptor::Any);
                    shape.fields.push(ObjectField {
                        key: key.to_string(),
                        value,
                        optional: prop.optional,
                    });
                }
                TSSignature::TSMethodSignature(method) => {
                    let Some(key) = method.key.static_name() else {
                        continue;
                    };
                    let value = match method.kind {
                        TSMethodSignatureKind::Method => TypeDescriptor::primitive("function"),
                        TSMethodSignatureKind::Get => method
                            .return_type
                            .as_ref()
                            .map(|ann| self.lower(&ann.type_annotation))
                            .unwrap_or(TypeDescriptor::Any),
                        TSMethodSignatureKind::Set => continue,
                    };
                    shape.fields.push(ObjectField {
                        key: key.to_string(),
                        value,
                        optional: method.optional,
                    });
                }
                TSSignature::TSIndexSignature(index) => {
                    shape.index = Some(Box::new(
                        self.lower(&index.type_annotation.type_annotation),
                    ));
                }
                TSSignature::TSCallSignatureDeclaration(_)
                | TSSignature::TSConstructSignatureDeclaration(_) => callable = true,
            }
        }
        if callable && shape.fields.is_empty() && shape.index.is_none() {
            return TypeDescriptor::primitive("function");
        }
        TypeDescriptor::ObjectShape(shape)
    }
}

pub fn lower_alias(decl: &TSTypeAliasDeclaration<'_>) -> TypeDescriptor {
    Lowering::with_type_params(decl.type_parameters.as_deref()).lower(&decl.type_annotation)
}

/// An interface lowers to its body, intersected after any `extends` bases.
pub fn lower_interface(decl: &TSInterfaceDeclaration<'_>) -> TypeDescriptor {
    let lowering = Lowering::with_type_params(decl.type_parameters.as_deref());
    let body = lowering.lower_members(&decl.body.body);
    if decl.extends.is_empty() {
        return body;
    }
    let mut members: Vec<TypeDescriptor> = decl
        .extends
        .iter()
        .map(|heritage| match expression_path(&heritage.expression) {
            Some(name) => TypeDescriptor::AliasReference {
                name,
                type_arguments: heritage
                    .type_arguments
                    .as_ref()
                    .map(|args| args.params.iter().map(|t| lowering.lower(t)).collect())
                    .unwrap_or_default(),
            },
            None => TypeDescriptor::Any,
        })
        .collect();
    members.push(body);
    TypeDescriptor::Intersection(members)
}

fn lower_literal(literal: &TSLiteral<'_>) -> TypeDescriptor {
    match literal {
        TSLiteral::BooleanLiteral(b) => TypeDescriptor::LiteralValue(LiteralValue::Bool(b.value)),
        TSLiteral::NumericLiteral(n) => TypeDescriptor::LiteralValue(LiteralValue::Number(
            n.raw
                .map(|raw| raw.to_string())
                .unwrap_or_else(|| n.value.to_string()),
        )),
        TSLiteral::StringLiteral(s) => {
            TypeDescriptor::LiteralValue(LiteralValue::String(s.value.to_string()))
        }
        TSLiteral::TemplateLiteral(tpl) => match tpl.single_quasi() {
            Some(text) => TypeDescriptor::LiteralValue(LiteralValue::String(text.to_string())),
            None => TypeDescriptor::primitive("string"),
        },
        TSLiteral::BigIntLiteral(_) => TypeDescriptor::primitive("bigint"),
        TSLiteral::UnaryExpression(unary) => match (&unary.operator, &unary.argument) {
            (UnaryOperator::UnaryNegation, Expression::NumericLiteral(n)) => {
                let raw = n
                    .raw
                    .map(|raw| raw.to_string())
                    .unwrap_or_else(|| n.value.to_string());
                TypeDescriptor::LiteralValue(LiteralValue::Number(format!("-{}", raw)))
            }
            _ => TypeDescriptor::primitive("number"),
        },
    }
}

/// `A`, `A.B.C`; `this` reads as `this`.
pub fn type_name_text(name: &TSTypeName<'_>) -> String {
    match name {
        TSTypeName::IdentifierReference(id) => id.name.to_string(),
        TSTypeName::QualifiedName(q) => format!("{}.{}", type_name_text(&q.left), q.right.name),
        TSTypeName::ThisExpression(_) => "this".to_string(),
    }
}

/// Dotted path of an identifier or static member chain (`React.Component`).
pub fn expression_path(expr: &Expression<'_>) -> Option<String> {
    match expr {
        Expression::Identifier(id) => Some(id.name.to_string()),
        Expression::StaticMemberExpression(member) => {
            let object = expression_path(&member.object)?;
            Some(format!("{}.{}", object, member.property.name))
        }
        Expression::ParenthesizedExpression(paren) => expression_path(&paren.expression),
        _ => None,
    }
}
