//! Structural description of a static type, independent of the parser's AST.

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// Keyword types by name: `string`, `number`, `function`, ...
    Primitive(String),
    ObjectShape(ObjectShape),
    ArrayOf(Box<TypeDescriptor>),
    TupleOf(Vec<TypeDescriptor>),
    Union(Vec<TypeDescriptor>),
    Intersection(Vec<TypeDescriptor>),
    LiteralValue(LiteralValue),
    AliasReference {
        name: String,
        type_arguments: Vec<TypeDescriptor>,
    },
    Any,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectShape {
    pub fields: Vec<ObjectField>,
    /// Value type of an index signature (`[key: string]: V`), if any.
    pub index: Option<Box<TypeDescriptor>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectField {
    pub key: String,
    pub value: TypeDescriptor,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    /// Source spelling, so `1e3` and `-1` print as written.
    Number(String),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    String,
    Number,
    Bool,
}

impl LiteralValue {
    pub fn kind(&self) -> LiteralKind {
        match self {
            LiteralValue::String(_) => LiteralKind::String,
            LiteralValue::Number(_) => LiteralKind::Number,
            LiteralValue::Bool(_) => LiteralKind::Bool,
        }
    }
}

impl TypeDescriptor {
    pub fn primitive(name: &str) -> Self {
        TypeDescriptor::Primitive(name.to_string())
    }

    pub fn reference(name: &str) -> Self {
        TypeDescriptor::AliasReference {
            name: name.to_string(),
            type_arguments: Vec::new(),
        }
    }

    /// `null`, `undefined` and `void` only ever make a slot optional.
    pub fn is_nullish(&self) -> bool {
        matches!(self, TypeDescriptor::Primitive(p) if p == "null" || p == "undefined" || p == "void")
    }
}
