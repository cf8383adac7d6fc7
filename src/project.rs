//! Type projection: [`TypeDescriptor`] in, [`ValidatorDescriptor`] out.
//!
//! Projection only reads the registry. Every descriptor starts out required;
//! optional fields and nullable unions clear the flag here, defaults clear it
//! later during insertion.

use crate::error::{WarningKind, Warnings};
use crate::js::JsExpr;
use crate::registry::{runtime_type_binding, Resolution, TypeRegistry};
use crate::types::{LiteralValue, ObjectShape, TypeDescriptor};
use crate::validator::{PrimitiveKind, ShapeField, ValidatorDescriptor, ValidatorKind};

/// Result of projecting a named declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct DeclarationProjection {
    pub descriptor: ValidatorDescriptor,
    /// The declaration refers to itself and must be hoisted to its binding.
    pub recursive: bool,
}

pub fn project(
    ty: &TypeDescriptor,
    registry: &TypeRegistry,
    warnings: &mut Warnings,
) -> ValidatorDescriptor {
    Projector::new(registry, warnings, None).project(ty)
}

/// Projects the body of alias `name`; references to `name` inside it become
/// references to its generated binding.
pub fn project_declaration(
    name: &str,
    ty: &TypeDescriptor,
    registry: &TypeRegistry,
    warnings: &mut Warnings,
) -> DeclarationProjection {
    let mut projector = Projector::new(registry, warnings, Some(name));
    let descriptor = projector.project(ty);
    DeclarationProjection {
        descriptor,
        recursive: projector.self_referenced,
    }
}

/// Descriptor for a well-known global or React type name, if it is one.
pub fn builtin_type(
    name: &str,
    registry: &TypeRegistry,
    warnings: &mut Warnings,
) -> Option<ValidatorDescriptor> {
    Projector::new(registry, warnings, None).project_builtin(name, &[])
}

struct Projector<'p> {
    registry: &'p TypeRegistry,
    warnings: &'p mut Warnings,
    declaring: Option<&'p str>,
    self_referenced: bool,
}

impl<'p> Projector<'p> {
    fn new(
        registry: &'p TypeRegistry,
        warnings: &'p mut Warnings,
        declaring: Option<&'p str>,
    ) -> Self {
        Projector {
            registry,
            warnings,
            declaring,
            self_referenced: false,
        }
    }

    fn project(&mut self, ty: &TypeDescriptor) -> ValidatorDescriptor {
        match ty {
            TypeDescriptor::Primitive(name) => {
                if ty.is_nullish() {
                    return ValidatorDescriptor::any().optional();
                }
                match PrimitiveKind::from_type_name(name) {
                    Some(kind) => ValidatorDescriptor::primitive(kind),
                    None => ValidatorDescriptor::any(),
                }
            }
            TypeDescriptor::ObjectShape(shape) => self.project_shape(shape),
            TypeDescriptor::ArrayOf(element) => {
                let element = self.project(element);
                ValidatorDescriptor::new(ValidatorKind::ArrayOf(Box::new(element)))
            }
            TypeDescriptor::TupleOf(elements) => {
                self.warnings.push(
                    WarningKind::UnsupportedShape,
                    "tuple type checked as an array of its element types",
                );
                let element = self.project_union(elements);
                ValidatorDescriptor::new(ValidatorKind::ArrayOf(Box::new(element.with_required(true))))
            }
            TypeDescriptor::Union(members) => self.project_union(members),
            TypeDescriptor::Intersection(members) => self.project_intersection(members),
            TypeDescriptor::LiteralValue(value) => {
                ValidatorDescriptor::new(ValidatorKind::OneOf(vec![value.clone()]))
            }
            TypeDescriptor::AliasReference {
                name,
                type_arguments,
            } => self.project_reference(name, type_arguments),
            TypeDescriptor::Any => ValidatorDescriptor::any(),
        }
    }

    fn project_shape(&mut self, shape: &ObjectShape) -> ValidatorDescriptor {
        let fields: Vec<ShapeField> = shape
            .fields
            .iter()
            .map(|field| {
                let value = self.project(&field.value);
                let required = value.required && !field.optional;
                ShapeField {
                    key: field.key.clone(),
                    value: value.with_required(required),
                }
            })
            .collect();

        match &shape.index {
            Some(index) if fields.is_empty() => {
                let value = self.project(index).with_required(true);
                ValidatorDescriptor::new(ValidatorKind::ObjectOf(Box::new(value)))
            }
            Some(_) => {
                self.warnings.push(
                    WarningKind::UnsupportedShape,
                    "index signature next to named keys: dynamic keys are left unchecked",
                );
                ValidatorDescriptor::new(ValidatorKind::Shape(fields))
            }
            None => ValidatorDescriptor::new(ValidatorKind::Shape(fields)),
        }
    }

    fn project_union(&mut self, members: &[TypeDescriptor]) -> ValidatorDescriptor {
        let mut nullable = members.iter().any(TypeDescriptor::is_nullish);
        let members: Vec<&TypeDescriptor> =
            members.iter().filter(|m| !m.is_nullish()).collect();

        let descriptor = match members.as_slice() {
            [] => ValidatorDescriptor::any(),
            [single] => {
                let projected = self.project(single);
                nullable |= !projected.required;
                projected
            }
            _ => {
                if let Some(values) = same_kind_literals(&members) {
                    ValidatorDescriptor::new(ValidatorKind::OneOf(values))
                } else {
                    let mut variants: Vec<ValidatorDescriptor> = Vec::new();
                    for member in &members {
                        let projected = self.project(member);
                        // A member aliasing a nullable type makes the union nullable.
                        nullable |= !projected.required;
                        let projected = projected.with_required(true);
                        if matches!(projected.kind, ValidatorKind::Any) {
                            // One unconstrained branch accepts everything.
                            variants.clear();
                            variants.push(projected);
                            break;
                        }
                        if !variants.iter().any(|v| v.same_check(&projected)) {
                            variants.push(projected);
                        }
                    }
                    match variants.len() {
                        1 => variants.remove(0),
                        _ => ValidatorDescriptor::new(ValidatorKind::OneOfType(variants)),
                    }
                }
            }
        };
        descriptor.with_required(!nullable)
    }

    fn project_intersection(&mut self, members: &[TypeDescriptor]) -> ValidatorDescriptor {
        if let [single] = members {
            return self.project(single);
        }
        let mut merged: Vec<ShapeField> = Vec::new();
        let mut bases: Vec<JsExpr> = Vec::new();
        for member in members {
            let projected = self.project_for_merge(member);
            let fields = match projected.kind {
                ValidatorKind::Any => continue,
                ValidatorKind::Shape(fields) => fields,
                ValidatorKind::InstanceOfOrShape {
                    shape: Some(fields),
                    ..
                } => fields,
                ValidatorKind::Extended {
                    bases: inner,
                    fields,
                } => {
                    bases.extend(inner);
                    fields
                }
                // Owned by another unit: its fields are merged at runtime.
                ValidatorKind::Custom(reference) => {
                    bases.push(reference);
                    continue;
                }
                _ => {
                    return self.unsupported(
                        "intersection of an object type with a non-object type is not checked",
                    )
                }
            };
            for field in fields {
                match merged.iter_mut().find(|f| f.key == field.key) {
                    Some(existing) => existing.value = field.value,
                    None => merged.push(field),
                }
            }
        }
        if bases.is_empty() {
            ValidatorDescriptor::new(ValidatorKind::Shape(merged))
        } else {
            ValidatorDescriptor::new(ValidatorKind::Extended {
                bases,
                fields: merged,
            })
        }
    }

    fn unsupported(&mut self, message: &str) -> ValidatorDescriptor {
        self.warnings.push(WarningKind::UnsupportedShape, message);
        ValidatorDescriptor::any()
    }

    /// Like `project`, but sees through hoisted local types so their fields
    /// can be merged.
    fn project_for_merge(&mut self, ty: &TypeDescriptor) -> ValidatorDescriptor {
        if let TypeDescriptor::AliasReference { name, .. } = ty {
            if self.declaring != Some(name.as_str()) {
                if let Some(desc) = self.registry.local_descriptor(name) {
                    return desc.clone();
                }
            }
        }
        self.project(ty)
    }

    fn project_reference(&mut self, name: &str, args: &[TypeDescriptor]) -> ValidatorDescriptor {
        if self.declaring == Some(name) {
            self.self_referenced = true;
            return ValidatorDescriptor::new(ValidatorKind::Custom(JsExpr::ident(
                runtime_type_binding(name),
            )));
        }
        match self.registry.resolve(name) {
            Resolution::Descriptor(desc) => return desc,
            Resolution::Access(access) => {
                // A local exported type keeps its own nullability behind the binding.
                let required = self
                    .registry
                    .local_descriptor(name)
                    .map_or(true, |desc| desc.required);
                return ValidatorDescriptor::new(ValidatorKind::Custom(access))
                    .with_required(required);
            }
            Resolution::Unresolved if self.registry.contains(name) => {
                self.warnings.push(
                    WarningKind::UnresolvedType,
                    format!("imported type `{}` is used before its import is bound", name),
                );
                return ValidatorDescriptor::any();
            }
            Resolution::Unresolved => {}
        }
        if let Some(desc) = self.project_builtin(name, args) {
            return desc;
        }
        self.warnings.push(
            WarningKind::UnresolvedType,
            format!("cannot resolve type `{}`; it is not checked", name),
        );
        ValidatorDescriptor::any()
    }

    fn project_builtin(&mut self, name: &str, args: &[TypeDescriptor]) -> Option<ValidatorDescriptor> {
        let bare = name.strip_prefix("React.").unwrap_or(name);
        let desc = match bare {
            "Array" | "ReadonlyArray" => match args.first() {
                Some(element) => {
                    let element = self.project(element).with_required(true);
                    ValidatorDescriptor::new(ValidatorKind::ArrayOf(Box::new(element)))
                }
                None => ValidatorDescriptor::primitive(PrimitiveKind::Array),
            },
            "Record" => match args.get(1) {
                Some(value) => {
                    let value = self.project(value).with_required(true);
                    ValidatorDescriptor::new(ValidatorKind::ObjectOf(Box::new(value)))
                }
                None => ValidatorDescriptor::primitive(PrimitiveKind::Object),
            },
            "Partial" | "Required" => {
                let required = bare == "Required";
                let inner = self.project_argument_for_merge(args.first());
                match inner.kind {
                    ValidatorKind::Shape(fields) => ValidatorDescriptor::new(ValidatorKind::Shape(
                        fields
                            .into_iter()
                            .map(|f| ShapeField {
                                key: f.key,
                                value: f.value.with_required(required),
                            })
                            .collect(),
                    )),
                    ValidatorKind::Extended { .. } => {
                        self.unsupported("`Partial`/`Required` over a runtime-merged type is not checked")
                    }
                    _ => inner.with_required(true),
                }
            }
            "Readonly" | "NonNullable" => match args.first() {
                Some(inner) => self.project(inner).with_required(true),
                None => ValidatorDescriptor::any(),
            },
            "Pick" | "Omit" => {
                let keep = bare == "Pick";
                let keys = args.get(1).map(literal_keys).unwrap_or_default();
                let inner = self.project_argument_for_merge(args.first());
                match inner.kind {
                    ValidatorKind::Shape(fields) => ValidatorDescriptor::new(ValidatorKind::Shape(
                        fields
                            .into_iter()
                            .filter(|f| keys.contains(&f.key) == keep)
                            .collect(),
                    )),
                    ValidatorKind::Extended { .. } => {
                        self.unsupported("`Pick`/`Omit` over a runtime-merged type is not checked")
                    }
                    _ => inner.with_required(true),
                }
            }
            "Function" => ValidatorDescriptor::primitive(PrimitiveKind::Func),
            "Object" => ValidatorDescriptor::primitive(PrimitiveKind::Object),
            "ReactNode" | "ReactChild" | "ReactFragment" => {
                ValidatorDescriptor::primitive(PrimitiveKind::Node)
            }
            "ReactElement" | "JSX.Element" => ValidatorDescriptor::primitive(PrimitiveKind::Element),
            "ComponentType" | "FC" | "FunctionComponent" | "ComponentClass" | "ElementType" => {
                ValidatorDescriptor::primitive(PrimitiveKind::ElementType)
            }
            "Date" | "RegExp" | "Map" | "Set" | "WeakMap" | "WeakSet" | "Promise" | "Error" => {
                ValidatorDescriptor::new(ValidatorKind::InstanceOfOrShape {
                    class: bare.to_string(),
                    shape: None,
                })
            }
            _ if bare.ends_with("EventHandler") => ValidatorDescriptor::primitive(PrimitiveKind::Func),
            _ => return None,
        };
        Some(desc)
    }

    fn project_argument_for_merge(&mut self, arg: Option<&TypeDescriptor>) -> ValidatorDescriptor {
        match arg {
            Some(ty) => self.project_for_merge(ty),
            None => ValidatorDescriptor::any(),
        }
    }
}

/// Values of a union made only of literals of one primitive kind, in order.
fn same_kind_literals(members: &[&TypeDescriptor]) -> Option<Vec<LiteralValue>> {
    let mut values: Vec<LiteralValue> = Vec::with_capacity(members.len());
    for member in members {
        let TypeDescriptor::LiteralValue(value) = member else {
            return None;
        };
        if let Some(first) = values.first() {
            if first.kind() != value.kind() {
                return None;
            }
        }
        if !values.contains(value) {
            values.push(value.clone());
        }
    }
    Some(values)
}

/// String literal keys named by `"a" | "b"` in `Pick`/`Omit`.
fn literal_keys(ty: &TypeDescriptor) -> Vec<String> {
    match ty {
        TypeDescriptor::LiteralValue(LiteralValue::String(key)) => vec![key.clone()],
        TypeDescriptor::Union(members) => members.iter().flat_map(literal_keys).collect(),
        _ => Vec::new(),
    }
}
