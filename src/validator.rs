use crate::js::JsExpr;
use crate::types::LiteralValue;

/// Runtime check produced by projection, before code generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorDescriptor {
    pub kind: ValidatorKind,
    /// Late-bound: cleared by optional markers, nullable unions and defaults.
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidatorKind {
    Primitive(PrimitiveKind),
    Shape(Vec<ShapeField>),
    ObjectOf(Box<ValidatorDescriptor>),
    OneOf(Vec<LiteralValue>),
    OneOfType(Vec<ValidatorDescriptor>),
    ArrayOf(Box<ValidatorDescriptor>),
    /// `instanceOf(class)`, or either an instance or an object matching `shape`.
    InstanceOfOrShape {
        class: String,
        shape: Option<Vec<ShapeField>>,
    },
    /// Field objects bound elsewhere merged with local fields at runtime.
    /// Local fields win on key clashes.
    Extended {
        bases: Vec<JsExpr>,
        fields: Vec<ShapeField>,
    },
    /// A validator generated elsewhere, referenced by expression.
    Custom(JsExpr),
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Number,
    Bool,
    Func,
    Object,
    Array,
    Symbol,
    Node,
    Element,
    ElementType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShapeField {
    pub key: String,
    pub value: ValidatorDescriptor,
}

impl PrimitiveKind {
    /// Member name on the runtime validation library.
    pub fn validator_name(self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Func => "func",
            PrimitiveKind::Object => "object",
            PrimitiveKind::Array => "array",
            PrimitiveKind::Symbol => "symbol",
            PrimitiveKind::Node => "node",
            PrimitiveKind::Element => "element",
            PrimitiveKind::ElementType => "elementType",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Some(match name {
            "string" => PrimitiveKind::String,
            "number" => PrimitiveKind::Number,
            "boolean" => PrimitiveKind::Bool,
            "function" => PrimitiveKind::Func,
            "object" => PrimitiveKind::Object,
            "symbol" => PrimitiveKind::Symbol,
            _ => return None,
        })
    }
}

impl ValidatorDescriptor {
    pub fn new(kind: ValidatorKind) -> Self {
        ValidatorDescriptor {
            kind,
            required: true,
        }
    }

    pub fn any() -> Self {
        Self::new(ValidatorKind::Any)
    }

    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::new(ValidatorKind::Primitive(kind))
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn shape_fields(&self) -> Option<&[ShapeField]> {
        match &self.kind {
            ValidatorKind::Shape(fields) => Some(fields),
            _ => None,
        }
    }

    /// Structural equality ignoring the top-level `required` flag.
    pub fn same_check(&self, other: &ValidatorDescriptor) -> bool {
        self.kind == other.kind
    }
}
