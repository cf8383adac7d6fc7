//! Attaches generated validators to component declarations.
//!
//! Given a discovered component and its projected props/context validators,
//! this decides how the result is attached, merges it with a hand-written
//! `propTypes` object, relaxes defaulted props, applies the dead-code guard
//! and emits the source edits.

use crate::builder::{merged_object, ValidatorBuilder};
use crate::context::UnitContext;
use crate::edits::Edit;
use crate::error::WarningKind;
use crate::js::{JsExpr, JsProp, JsStmt};
use crate::validator::{ShapeField, ValidatorDescriptor, ValidatorKind};

const INDENT_UNIT: &str = "  ";

// ═══════════════════════════════════════════════════════════════════════════════
// TARGETS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Class,
    Function,
}

#[derive(Debug, Clone)]
pub struct ComponentTarget {
    pub name: String,
    pub kind: ComponentKind,
    /// End of the statement that declares the component (including any
    /// `export` around it). Assignments are inserted here.
    pub statement_end: u32,
    /// Offset of the class body's closing brace.
    pub class_body_close: Option<u32>,
    /// Start of the whitespace before the closing brace when the brace shares
    /// a line with the body's members.
    pub class_body_gap: Option<u32>,
    /// Indentation of the declaring statement.
    pub indent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachStyle {
    StaticMember,
    Assignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorSlot {
    PropTypes,
    ContextTypes,
}

impl ValidatorSlot {
    pub fn member_name(self) -> &'static str {
        match self {
            ValidatorSlot::PropTypes => "propTypes",
            ValidatorSlot::ContextTypes => "contextTypes",
        }
    }
}

/// What a slot is filled with.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
    /// Freshly projected from the annotation.
    Generated(ValidatorDescriptor),
    /// The hoisted binding of an exported type, used as-is.
    Reference(JsExpr),
}

impl SlotValue {
    /// A projection that is itself a reference is attached as a reference.
    pub fn from_descriptor(desc: ValidatorDescriptor) -> Self {
        match desc.kind {
            ValidatorKind::Custom(reference) => SlotValue::Reference(reference),
            kind => SlotValue::Generated(ValidatorDescriptor { kind, ..desc }),
        }
    }
}

/// One entry of a hand-written `propTypes` object.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitEntry {
    /// Property name, or the argument text of a spread.
    pub key: String,
    /// Source text of the whole property.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExplicitValidator {
    Missing,
    Object {
        entries: Vec<ExplicitEntry>,
        /// Span of the statement or class member to remove once merged.
        removal: (u32, u32),
    },
    /// Present but not an object literal; left untouched.
    Malformed,
}

#[derive(Debug, Clone)]
pub struct Annotation {
    pub target: ComponentTarget,
    pub props: Option<SlotValue>,
    pub context: Option<SlotValue>,
    pub explicit: ExplicitValidator,
    /// Keys with a declared default value.
    pub defaults: Vec<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// INSERTION
// ═══════════════════════════════════════════════════════════════════════════════

pub fn attach_style(target: &ComponentTarget, no_static: bool) -> AttachStyle {
    match (target.kind, target.class_body_close) {
        (ComponentKind::Class, Some(_)) if !no_static => AttachStyle::StaticMember,
        _ => AttachStyle::Assignment,
    }
}

/// Computes the edits that attach `annotation`'s validators.
pub fn annotate(annotation: Annotation, cx: &mut UnitContext<'_>) -> Vec<Edit> {
    let Annotation {
        target,
        props,
        context,
        explicit,
        defaults,
    } = annotation;

    if explicit == ExplicitValidator::Malformed {
        cx.warnings.push(
            WarningKind::MalformedExplicitValidator,
            format!(
                "`{}.propTypes` is not an object literal; no validators generated for `{}`",
                target.name, target.name
            ),
        );
        return Vec::new();
    }

    let style = attach_style(&target, cx.options.no_static);
    let mut edits = Vec::new();
    let mut slots = Vec::new();

    if let Some(props) = props {
        if let Some(value) = props_value(props, &explicit, &defaults, &target, cx) {
            if let ExplicitValidator::Object { removal, .. } = &explicit {
                edits.push(Edit::remove(removal.0, removal.1));
            }
            slots.push((ValidatorSlot::PropTypes, cx.dead_code.wrap(value)));
        }
    }

    if let Some(context) = context {
        if let Some(value) = slot_value(context, cx) {
            slots.push((ValidatorSlot::ContextTypes, value));
        }
    }

    edits.extend(attach(&target, style, slots));

    tracing::debug!(
        component = target.name.as_str(),
        ?style,
        edits = edits.len(),
        "annotated component"
    );
    edits
}

fn props_value(
    props: SlotValue,
    explicit: &ExplicitValidator,
    defaults: &[String],
    target: &ComponentTarget,
    cx: &mut UnitContext<'_>,
) -> Option<JsExpr> {
    let explicit_entries = match explicit {
        ExplicitValidator::Object { entries, .. } => Some(entries.as_slice()),
        _ => None,
    };
    match props {
        SlotValue::Generated(desc) => {
            let (bases, fields) = top_level_fields(desc, target)?;
            let fields = relax_defaults(fields, defaults);
            let prop_types = cx.imports.prop_types();
            let generated = ValidatorBuilder::new(&prop_types).props(&fields);
            let props = match explicit_entries {
                Some(entries) => merge_explicit(generated, entries),
                None => generated,
            };
            Some(match bases.as_slice() {
                [] => JsExpr::Object(props),
                _ => merged_object(&bases, props),
            })
        }
        SlotValue::Reference(reference) => Some(match explicit_entries {
            Some(entries) => merged_object(
                &[reference],
                entries.iter().map(|e| JsProp::Raw(e.source.clone())).collect(),
            ),
            None => reference,
        }),
    }
}

fn slot_value(value: SlotValue, cx: &mut UnitContext<'_>) -> Option<JsExpr> {
    match value {
        SlotValue::Generated(desc) => {
            let (bases, fields) = match desc.kind {
                ValidatorKind::Shape(fields) => (Vec::new(), fields),
                ValidatorKind::Extended { bases, fields } => (bases, fields),
                ValidatorKind::Custom(reference) => return Some(reference),
                _ => return None,
            };
            let prop_types = cx.imports.prop_types();
            let props = ValidatorBuilder::new(&prop_types).props(&fields);
            Some(match bases.as_slice() {
                [] => JsExpr::Object(props),
                _ => merged_object(&bases, props),
            })
        }
        SlotValue::Reference(reference) => Some(reference),
    }
}

/// Component props must be object-like; anything else gets no validator.
/// Returns the bindings merged in at runtime alongside the local fields.
fn top_level_fields(
    desc: ValidatorDescriptor,
    target: &ComponentTarget,
) -> Option<(Vec<JsExpr>, Vec<ShapeField>)> {
    match desc.kind {
        ValidatorKind::Shape(fields) => Some((Vec::new(), fields)),
        ValidatorKind::InstanceOfOrShape {
            shape: Some(fields),
            ..
        } => Some((Vec::new(), fields)),
        ValidatorKind::Extended { bases, fields } => Some((bases, fields)),
        other => {
            tracing::debug!(
                component = target.name.as_str(),
                kind = ?other,
                "props type is not an object shape; skipping"
            );
            None
        }
    }
}

/// Clears `required` on top-level fields that have a default. Nested shapes
/// are untouched.
pub fn relax_defaults(fields: Vec<ShapeField>, defaults: &[String]) -> Vec<ShapeField> {
    fields
        .into_iter()
        .map(|mut field| {
            if defaults.iter().any(|d| *d == field.key) {
                field.value.required = false;
            }
            field
        })
        .collect()
}

/// Per-key merge: explicit entries replace generated ones in place, new
/// explicit keys are appended.
pub fn merge_explicit(generated: Vec<JsProp>, explicit: &[ExplicitEntry]) -> Vec<JsProp> {
    let mut merged = generated;
    for entry in explicit {
        let existing = merged
            .iter()
            .position(|prop| matches!(prop, JsProp::KeyValue(key, _) if *key == entry.key));
        match existing {
            Some(index) => merged[index] = JsProp::Raw(entry.source.clone()),
            None => merged.push(JsProp::Raw(entry.source.clone())),
        }
    }
    merged
}

fn attach(
    target: &ComponentTarget,
    style: AttachStyle,
    slots: Vec<(ValidatorSlot, JsExpr)>,
) -> Option<Edit> {
    if slots.is_empty() {
        return None;
    }
    match (style, target.class_body_close) {
        (AttachStyle::StaticMember, Some(close)) => {
            let member_indent = format!("{}{}", target.indent, INDENT_UNIT);
            let members: Vec<String> = slots
                .into_iter()
                .map(|(slot, value)| {
                    JsStmt::StaticProperty {
                        name: slot.member_name().to_string(),
                        value,
                    }
                    .render(&member_indent)
                })
                .collect();
            Some(match target.class_body_gap {
                Some(gap) => {
                    // Move the closing brace onto its own line.
                    let text: String = members
                        .iter()
                        .map(|m| format!("\n{}{}", member_indent, m))
                        .collect();
                    Edit::replace(gap, close, format!("{}\n{}", text, target.indent))
                }
                None => Edit::insert(
                    close,
                    members
                        .iter()
                        .map(|m| format!("{}{}\n{}", INDENT_UNIT, m, target.indent))
                        .collect::<String>(),
                ),
            })
        }
        _ => {
            let text: String = slots
                .into_iter()
                .map(|(slot, value)| {
                    let stmt = JsStmt::assign(
                        JsExpr::ident(target.name.clone()).member(slot.member_name()),
                        value,
                    );
                    format!("\n{}{}", target.indent, stmt.render(&target.indent))
                })
                .collect();
            Some(Edit::insert(target.statement_end, text))
        }
    }
}
