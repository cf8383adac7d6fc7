//! Drives one compilation unit: parse, walk, collect edits, print.

#[cfg(feature = "napi")]
use napi_derive::napi;
use oxc_allocator::Allocator;
use oxc_ast::ast::{
    ArrowFunctionExpression, AssignmentTarget, BindingPattern, Class, ClassElement, Declaration,
    ExportDefaultDeclarationKind, ExportNamedDeclaration, Expression, FormalParameters, Function,
    FunctionBody, ImportDeclaration, ImportDeclarationSpecifier, JSXElement, JSXFragment,
    ObjectPropertyKind, Program, Statement, TSInterfaceDeclaration, TSType, TSTypeAliasDeclaration,
    TSTypeAnnotation, VariableDeclaration,
};
use oxc_ast_visit::Visit;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType, Span};
use serde::{Deserialize, Serialize};

use crate::annotate::{
    annotate, Annotation, ComponentKind, ComponentTarget, ExplicitEntry, ExplicitValidator,
    SlotValue,
};
use crate::builder::ValidatorBuilder;
use crate::context::UnitContext;
use crate::edits::{apply_edits, line_indent, removal_end, removal_start, Edit};
use crate::error::{TransformError, Warning};
use crate::imports::{
    export_binding, is_package_location, ModuleStyle, PROP_TYPES_LOCAL, PROP_TYPES_MODULE,
};
use crate::js::{JsExpr, JsStmt};
use crate::lower::{expression_path, lower_alias, lower_interface, type_name_text, Lowering};
use crate::options::{PluginOptions, SUPPRESS_DIRECTIVE};
use crate::project::{builtin_type, project, project_declaration};
use crate::registry::{runtime_type_binding, RegistryEntry};
use crate::types::TypeDescriptor;
use crate::validator::ValidatorKind;

// ═══════════════════════════════════════════════════════════════════════════════
// OUTPUT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOutput {
    pub code: String,
    pub changed: bool,
    pub warnings: Vec<Warning>,
}

impl TransformOutput {
    fn unchanged(source: &str) -> Self {
        TransformOutput {
            code: source.to_string(),
            changed: false,
            warnings: Vec::new(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ENTRY POINT
// ═══════════════════════════════════════════════════════════════════════════════

/// Adds runtime prop-type validators to the components of one source file.
pub fn transform_source(
    source: &str,
    file_path: &str,
    options: &PluginOptions,
) -> Result<TransformOutput, TransformError> {
    if options.is_suppressed_path(file_path) {
        tracing::debug!(file = file_path, "skipping vendored file");
        return Ok(TransformOutput::unchanged(source));
    }

    let mut cx = UnitContext::new(options, file_path)?;

    let allocator = Allocator::default();
    let source_type = SourceType::from_path(file_path)
        .map(|st| st.with_typescript(true))
        .unwrap_or_else(|_| SourceType::tsx());
    let ret = Parser::new(&allocator, source, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(TransformError::Parse {
            file: file_path.to_string(),
            message,
        });
    }
    let program = ret.program;

    if is_suppressed(&program) {
        tracing::debug!(file = file_path, "suppressed by directive");
        return Ok(TransformOutput::unchanged(source));
    }

    adopt_prop_types_import(&program, &mut cx);

    let mut walker = Walker {
        cx: &mut cx,
        source,
        edits: Vec::new(),
        trailing: Vec::new(),
    };
    walker.walk_statements(&program.body, true)?;
    let Walker {
        mut edits,
        trailing,
        ..
    } = walker;

    let hoisted = cx.imports.take_hoisted();
    if !hoisted.is_empty() {
        let at = program
            .body
            .first()
            .map(|stmt| stmt.span().start)
            .unwrap_or(source.len() as u32);
        let text: String = hoisted.iter().map(|stmt| format!("{}\n", stmt)).collect();
        edits.insert(0, Edit::insert(at, text));
    }
    if !trailing.is_empty() {
        let text: String = trailing.iter().map(|stmt| format!("\n{}", stmt)).collect();
        let text = if source.ends_with('\n') {
            format!("{}\n", &text[1..])
        } else {
            text
        };
        edits.push(Edit::insert(source.len() as u32, text));
    }

    let changed = !edits.is_empty();
    tracing::debug!(
        file = file_path,
        style = ?cx.imports.style(),
        dead_code = cx.dead_code.is_enabled(),
        edits = edits.len(),
        warnings = cx.warnings.len(),
        "transformed unit"
    );
    let code = if changed {
        apply_edits(source, &edits)
    } else {
        source.to_string()
    };
    Ok(TransformOutput {
        code,
        changed,
        warnings: cx.warnings.into_vec(),
    })
}

/// Only the first directive of the unit is considered.
fn is_suppressed(program: &Program<'_>) -> bool {
    program
        .directives
        .first()
        .is_some_and(|d| d.expression.value.as_str() == SUPPRESS_DIRECTIVE)
}

fn adopt_prop_types_import(program: &Program<'_>, cx: &mut UnitContext<'_>) {
    for stmt in &program.body {
        let Statement::ImportDeclaration(decl) = stmt else {
            continue;
        };
        if decl.source.value.as_str() != PROP_TYPES_MODULE || decl.import_kind.is_type() {
            continue;
        }
        for spec in decl.specifiers.iter().flatten() {
            let local = match spec {
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => &s.local,
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => &s.local,
                ImportDeclarationSpecifier::ImportSpecifier(_) => continue,
            };
            cx.imports
                .adopt_default(PROP_TYPES_LOCAL, PROP_TYPES_MODULE, local.name.as_str());
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAPI EXPORTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
#[napi]
pub fn transform_native(
    source: String,
    file_path: String,
    options_json: Option<String>,
) -> napi::Result<serde_json::Value> {
    let options = PluginOptions::from_json(options_json.as_deref().unwrap_or(""))
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    let output = transform_source(&source, &file_path, &options)
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    serde_json::to_value(output).map_err(|e| napi::Error::from_reason(e.to_string()))
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSX DETECTION
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct JsxFinder {
    found: bool,
}

impl<'a> Visit<'a> for JsxFinder {
    fn visit_jsx_element(&mut self, _it: &JSXElement<'a>) {
        self.found = true;
    }

    fn visit_jsx_fragment(&mut self, _it: &JSXFragment<'a>) {
        self.found = true;
    }
}

fn contains_jsx(body: &FunctionBody<'_>) -> bool {
    let mut finder = JsxFinder::default();
    finder.visit_function_body(body);
    finder.found
}

const ELEMENT_RETURN_TYPES: &[&str] = &[
    "JSX.Element",
    "React.JSX.Element",
    "ReactElement",
    "React.ReactElement",
    "ReactNode",
    "React.ReactNode",
];

fn returns_element(return_type: Option<&TSTypeAnnotation<'_>>) -> bool {
    fn is_element(ty: &TypeDescriptor) -> bool {
        match ty {
            TypeDescriptor::AliasReference { name, .. } => {
                ELEMENT_RETURN_TYPES.contains(&name.as_str())
            }
            TypeDescriptor::Union(members) => members.iter().any(is_element),
            _ => false,
        }
    }
    return_type
        .map(|ann| is_element(&Lowering::new().lower(&ann.type_annotation)))
        .unwrap_or(false)
}

/// Start of the blanks before `close` unless they begin the line.
fn inline_gap(source: &str, close: u32) -> Option<u32> {
    let before = source.get(..close as usize)?;
    let trimmed = before.trim_end_matches([' ', '\t']);
    if trimmed.is_empty() || trimmed.ends_with('\n') {
        None
    } else {
        Some(trimmed.len() as u32)
    }
}

fn is_component_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase())
}

const COMPONENT_SUPERCLASSES: &[&str] = &[
    "React.Component",
    "React.PureComponent",
    "Component",
    "PureComponent",
];

fn extends_component(class: &Class<'_>) -> bool {
    class
        .super_class
        .as_ref()
        .and_then(expression_path)
        .is_some_and(|path| COMPONENT_SUPERCLASSES.contains(&path.as_str()))
}

// ═══════════════════════════════════════════════════════════════════════════════
// STATEMENT WALKER
// ═══════════════════════════════════════════════════════════════════════════════

struct Walker<'s, 'c, 'o> {
    cx: &'c mut UnitContext<'o>,
    source: &'s str,
    edits: Vec<Edit>,
    /// Statements appended at the end of the unit (ES `export { }` lists).
    trailing: Vec<JsStmt>,
}

/// A function-like component candidate.
struct FunctionComponent<'n, 'a> {
    name: Option<&'n str>,
    params: &'n FormalParameters<'a>,
    return_type: Option<&'n TSTypeAnnotation<'a>>,
    body: Option<&'n FunctionBody<'a>>,
    /// `const Foo: FC<Props> = ...` annotation on the binding.
    binding_type: Option<&'n TSTypeAnnotation<'a>>,
    span: Span,
}

impl<'s, 'c, 'o> Walker<'s, 'c, 'o> {
    fn walk_statements<'a>(
        &mut self,
        stmts: &[Statement<'a>],
        top_level: bool,
    ) -> Result<(), TransformError> {
        for stmt in stmts {
            self.walk_statement(stmt, stmts, top_level)?;
        }
        Ok(())
    }

    fn walk_statement<'a>(
        &mut self,
        stmt: &Statement<'a>,
        siblings: &[Statement<'a>],
        top_level: bool,
    ) -> Result<(), TransformError> {
        let anchor = stmt.span();
        match stmt {
            Statement::TSTypeAliasDeclaration(decl) => self.declare_alias(decl, false, anchor),
            Statement::TSInterfaceDeclaration(decl) => {
                self.declare_interface(decl, false, anchor)
            }
            Statement::ImportDeclaration(decl) => self.register_import(decl),
            Statement::ExportNamedDeclaration(export) => {
                self.walk_export_named(export, siblings, top_level)?
            }
            Statement::ExportDefaultDeclaration(export) => match &export.declaration {
                ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                    self.visit_function(func, anchor, siblings)?
                }
                ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                    self.visit_class(class, None, anchor, siblings)?
                }
                ExportDefaultDeclarationKind::TSInterfaceDeclaration(decl) => {
                    self.declare_interface(decl, false, anchor)
                }
                _ => {}
            },
            Statement::FunctionDeclaration(func) => self.visit_function(func, anchor, siblings)?,
            Statement::ClassDeclaration(class) => {
                self.visit_class(class, None, anchor, siblings)?
            }
            Statement::VariableDeclaration(decl) => {
                self.visit_variables(decl, anchor, siblings)?
            }
            Statement::BlockStatement(block) => self.walk_statements(&block.body, false)?,
            _ => {}
        }
        Ok(())
    }

    fn walk_export_named<'a>(
        &mut self,
        export: &ExportNamedDeclaration<'a>,
        siblings: &[Statement<'a>],
        top_level: bool,
    ) -> Result<(), TransformError> {
        let anchor = export.span;
        match &export.declaration {
            Some(Declaration::TSTypeAliasDeclaration(decl)) => {
                self.declare_alias(decl, top_level, anchor)
            }
            Some(Declaration::TSInterfaceDeclaration(decl)) => {
                self.declare_interface(decl, top_level, anchor)
            }
            Some(Declaration::FunctionDeclaration(func)) => {
                self.visit_function(func, anchor, siblings)?
            }
            Some(Declaration::ClassDeclaration(class)) => {
                self.visit_class(class, None, anchor, siblings)?
            }
            Some(Declaration::VariableDeclaration(decl)) => {
                self.visit_variables(decl, anchor, siblings)?
            }
            Some(_) => {}
            None => self.reexport_types(export, top_level),
        }
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Type declarations
    // ───────────────────────────────────────────────────────────────────────────

    fn declare_alias(&mut self, decl: &TSTypeAliasDeclaration<'_>, exported: bool, anchor: Span) {
        let ty = lower_alias(decl);
        self.declare_type(decl.id.name.as_str(), &ty, exported, anchor);
    }

    fn declare_interface(&mut self, decl: &TSInterfaceDeclaration<'_>, exported: bool, anchor: Span) {
        let ty = lower_interface(decl);
        self.declare_type(decl.id.name.as_str(), &ty, exported, anchor);
    }

    fn declare_type(&mut self, name: &str, ty: &TypeDescriptor, exported: bool, anchor: Span) {
        let projection =
            project_declaration(name, ty, &self.cx.registry, &mut self.cx.warnings);
        if !exported && !projection.recursive {
            self.cx.registry.declare_shape(name, projection.descriptor);
            return;
        }

        // Exported and self-referencing types get a reusable binding.
        let binding = runtime_type_binding(name);
        let indent = line_indent(self.source, anchor.start);
        let prop_types = self.cx.imports.prop_types();
        let value = ValidatorBuilder::new(&prop_types).export_value(&projection.descriptor);
        let stmt = JsStmt::Var(binding.clone(), self.cx.dead_code.wrap(value));
        self.edits.push(Edit::insert(
            anchor.start,
            format!("{}\n{}", stmt.render(&indent), indent),
        ));
        self.cx
            .registry
            .declare_exported(name, &binding, projection.descriptor);

        if exported && !self.cx.options.omit_runtime_type_export {
            self.export_runtime_type(&binding, JsExpr::ident(binding.clone()), anchor);
        }
    }

    fn export_runtime_type(&mut self, name: &str, value: JsExpr, anchor: Span) {
        let style = self.cx.imports.style();
        let stmt = export_binding(style, name, value, self.cx.dead_code.predicate());
        match style {
            ModuleStyle::Import => self.trailing.push(stmt),
            ModuleStyle::Require => {
                let indent = line_indent(self.source, anchor.start);
                self.edits.push(Edit::insert(
                    anchor.end,
                    format!("\n{}{}", indent, stmt.render(&indent)),
                ));
            }
        }
    }

    /// `export type { A } from "./a"` and `export type { A }` of an imported type.
    fn reexport_types(&mut self, export: &ExportNamedDeclaration<'_>, top_level: bool) {
        if !top_level || self.cx.options.omit_runtime_type_export {
            return;
        }
        for spec in &export.specifiers {
            if !export.export_kind.is_type() && !spec.export_kind.is_type() {
                continue;
            }
            let local = spec.local.name();
            let exported = spec.exported.name();
            let exported_binding = runtime_type_binding(exported.as_str());
            let access = match &export.source {
                Some(location) => self.cx.imports.named_import(
                    &runtime_type_binding(local.as_str()),
                    &exported_binding,
                    location.value.as_str(),
                ),
                None => match self.cx.registry.get(local.as_str()) {
                    Some(RegistryEntry::Imported(imported)) => match &imported.access {
                        Some(access) => access.clone(),
                        None => continue,
                    },
                    _ => {
                        tracing::debug!(name = local.as_str(), "not an imported type; skipping re-export");
                        continue;
                    }
                },
            };
            self.export_runtime_type(&exported_binding, access, export.span);
        }
    }

    fn register_import(&mut self, decl: &ImportDeclaration<'_>) {
        let location = decl.source.value.as_str();
        let from_react = location == "react";
        if is_package_location(location) && !from_react {
            return;
        }
        for spec in decl.specifiers.iter().flatten() {
            let (local, source_name, type_only) = match spec {
                ImportDeclarationSpecifier::ImportSpecifier(s) => (
                    s.local.name.as_str(),
                    s.imported.name(),
                    s.import_kind.is_type(),
                ),
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                    (s.local.name.as_str(), s.local.name, false)
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(_) => continue,
            };
            if !decl.import_kind.is_type() && !type_only {
                continue;
            }
            if from_react {
                if let Some(desc) =
                    builtin_type(source_name.as_str(), &self.cx.registry, &mut self.cx.warnings)
                {
                    self.cx.registry.declare_internal(local, desc);
                }
                continue;
            }
            self.cx
                .registry
                .declare_imported(local, source_name.as_str(), location);
            let access = self.cx.imports.named_import(
                &runtime_type_binding(source_name.as_str()),
                &runtime_type_binding(local),
                location,
            );
            self.cx.registry.bind_import_access(local, access);
        }
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Components
    // ───────────────────────────────────────────────────────────────────────────

    fn visit_function<'a>(
        &mut self,
        func: &Function<'a>,
        anchor: Span,
        siblings: &[Statement<'a>],
    ) -> Result<(), TransformError> {
        let name = func.id.as_ref().map(|id| id.name.as_str());
        self.visit_function_like(
            FunctionComponent {
                name,
                params: &func.params,
                return_type: func.return_type.as_deref(),
                body: func.body.as_deref(),
                binding_type: None,
                span: func.span,
            },
            anchor,
            siblings,
            true,
        )
    }

    fn visit_arrow<'a>(
        &mut self,
        arrow: &ArrowFunctionExpression<'a>,
        name: Option<&str>,
        binding_type: Option<&TSTypeAnnotation<'a>>,
        anchor: Span,
        siblings: &[Statement<'a>],
    ) -> Result<(), TransformError> {
        self.visit_function_like(
            FunctionComponent {
                name,
                params: &arrow.params,
                return_type: arrow.return_type.as_deref(),
                body: Some(&*arrow.body),
                binding_type,
                span: arrow.span,
            },
            anchor,
            siblings,
            false,
        )
    }

    /// `name_required`: declarations must be named; expressions without a
    /// binding are callbacks, not components.
    fn visit_function_like<'a>(
        &mut self,
        func: FunctionComponent<'_, 'a>,
        anchor: Span,
        siblings: &[Statement<'a>],
        name_required: bool,
    ) -> Result<(), TransformError> {
        let renders = func.body.is_some_and(contains_jsx) || returns_element(func.return_type);
        let props_annotation = func
            .params
            .items
            .first()
            .and_then(|p| p.type_annotation.as_deref())
            .map(|ann| &ann.type_annotation)
            .or_else(|| func.binding_type.and_then(component_props_argument));

        if renders && props_annotation.is_some() {
            match func.name {
                Some(name) if is_component_name(name) => {
                    self.annotate_function(&func, name, props_annotation, anchor, siblings);
                }
                Some(_) => {}
                None if name_required => {
                    return Err(TransformError::UnnamedComponent {
                        file: self.cx.file_path.clone(),
                        offset: func.span.start,
                    });
                }
                None => {}
            }
        }

        if let Some(body) = func.body {
            self.walk_statements(&body.statements, false)?;
        }
        Ok(())
    }

    fn annotate_function<'a>(
        &mut self,
        func: &FunctionComponent<'_, 'a>,
        name: &str,
        props_annotation: Option<&TSType<'a>>,
        anchor: Span,
        siblings: &[Statement<'a>],
    ) {
        let props = props_annotation.and_then(|ty| self.slot_for(ty));
        let context = func
            .params
            .items
            .get(1)
            .and_then(|p| p.type_annotation.as_deref())
            .and_then(|ann| self.slot_for(&ann.type_annotation));

        let mut defaults = func
            .params
            .items
            .first()
            .map(|p| destructured_defaults(&p.pattern))
            .unwrap_or_default();
        if let Some(value) = find_member_assignment(siblings, name, "defaultProps").map(|(_, v)| v) {
            defaults.extend(object_keys(value));
        }

        let explicit = match find_member_assignment(siblings, name, "propTypes") {
            Some((span, value)) => self.explicit_from(value, span),
            None => ExplicitValidator::Missing,
        };

        let target = ComponentTarget {
            name: name.to_string(),
            kind: ComponentKind::Function,
            statement_end: anchor.end,
            class_body_close: None,
            class_body_gap: None,
            indent: line_indent(self.source, anchor.start),
        };
        self.finish(Annotation {
            target,
            props,
            context,
            explicit,
            defaults,
        });
    }

    fn visit_class<'a>(
        &mut self,
        class: &Class<'a>,
        binding_name: Option<&str>,
        anchor: Span,
        siblings: &[Statement<'a>],
    ) -> Result<(), TransformError> {
        let name = class.id.as_ref().map(|id| id.name.as_str()).or(binding_name);
        if let Some(name) = name {
            if matches!(self.cx.registry.get(name), None | Some(RegistryEntry::Internal(_))) {
                self.cx.registry.declare_class(name);
            }
        }
        if !extends_component(class) {
            return Ok(());
        }
        let Some(name) = name else {
            return Err(TransformError::UnnamedComponent {
                file: self.cx.file_path.clone(),
                offset: class.span.start,
            });
        };

        let mut props = None;
        let mut context = None;
        for element in &class.body.body {
            let ClassElement::PropertyDefinition(prop) = element else {
                continue;
            };
            if prop.r#static {
                continue;
            }
            let Some(ann) = prop.type_annotation.as_deref() else {
                continue;
            };
            match prop.key.static_name().as_deref() {
                Some("props") => {
                    if !is_object_like(&ann.type_annotation) {
                        return Err(TransformError::UnsupportedPropsAnnotation {
                            file: self.cx.file_path.clone(),
                            component: name.to_string(),
                        });
                    }
                    props = self.slot_for(&ann.type_annotation);
                }
                Some("context") => context = self.slot_for(&ann.type_annotation),
                _ => {}
            }
        }

        // `extends Component<Props>` wins when it names something usable.
        if let Some(first) = class
            .super_type_arguments
            .as_ref()
            .and_then(|args| args.params.first())
        {
            match first {
                TSType::TSTypeReference(reference) => {
                    let type_name = type_name_text(&reference.type_name);
                    if self.cx.registry.contains(&type_name) {
                        props = self.slot_for(first);
                    } else {
                        tracing::debug!(component = name, type_name = type_name.as_str(), "props type not found");
                    }
                }
                TSType::TSTypeLiteral(_) | TSType::TSIntersectionType(_) => {
                    props = self.slot_for(first);
                }
                _ => {}
            }
        }

        if props.is_none() && context.is_none() {
            return Ok(());
        }

        let static_explicit = class_static_value(class, "propTypes");
        let explicit = match static_explicit {
            Some((span, Some(value))) => self.explicit_from(value, span),
            Some((_, None)) => ExplicitValidator::Malformed,
            None => match find_member_assignment(siblings, name, "propTypes") {
                Some((span, value)) => self.explicit_from(value, span),
                None => ExplicitValidator::Missing,
            },
        };

        let defaults = match class_static_value(class, "defaultProps") {
            Some((_, Some(value))) => object_keys(value),
            Some((_, None)) => Vec::new(),
            None => find_member_assignment(siblings, name, "defaultProps")
                .map(|(_, value)| object_keys(value))
                .unwrap_or_default(),
        };

        let close = class.body.span.end.saturating_sub(1);
        let target = ComponentTarget {
            name: name.to_string(),
            kind: ComponentKind::Class,
            statement_end: anchor.end,
            class_body_close: Some(close),
            class_body_gap: inline_gap(self.source, close),
            indent: line_indent(self.source, anchor.start),
        };
        self.finish(Annotation {
            target,
            props,
            context,
            explicit,
            defaults,
        });
        Ok(())
    }

    fn visit_variables<'a>(
        &mut self,
        decl: &VariableDeclaration<'a>,
        anchor: Span,
        siblings: &[Statement<'a>],
    ) -> Result<(), TransformError> {
        for declarator in &decl.declarations {
            let name = match &declarator.id {
                BindingPattern::BindingIdentifier(id) => Some(id.name.as_str()),
                _ => None,
            };
            let binding_type = declarator.type_annotation.as_deref();
            match declarator.init.as_ref().map(unparenthesize) {
                Some(Expression::ArrowFunctionExpression(arrow)) => {
                    self.visit_arrow(arrow, name, binding_type, anchor, siblings)?
                }
                Some(Expression::FunctionExpression(func)) => {
                    let name = name.or_else(|| func.id.as_ref().map(|id| id.name.as_str()));
                    self.visit_function_like(
                        FunctionComponent {
                            name,
                            params: &func.params,
                            return_type: func.return_type.as_deref(),
                            body: func.body.as_deref(),
                            binding_type,
                            span: func.span,
                        },
                        anchor,
                        siblings,
                        false,
                    )?
                }
                Some(Expression::ClassExpression(class)) => {
                    self.visit_class(class, name, anchor, siblings)?
                }
                _ => {}
            }
        }
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Helpers
    // ───────────────────────────────────────────────────────────────────────────

    /// Projects a props/context annotation. A bare reference to a hoisted
    /// object type reuses its binding.
    fn slot_for(&mut self, ty: &TSType<'_>) -> Option<SlotValue> {
        if let TSType::TSTypeReference(reference) = ty {
            let name = type_name_text(&reference.type_name);
            if let Some(RegistryEntry::Exported {
                binding,
                descriptor,
            }) = self.cx.registry.get(&name)
            {
                if matches!(
                    descriptor.kind,
                    ValidatorKind::Shape(_) | ValidatorKind::Extended { .. }
                ) {
                    return Some(SlotValue::Reference(JsExpr::ident(binding.clone())));
                }
            }
        }
        let lowered = Lowering::new().lower(ty);
        let desc = project(&lowered, &self.cx.registry, &mut self.cx.warnings);
        match desc.kind {
            ValidatorKind::Any => None,
            _ => Some(SlotValue::from_descriptor(desc)),
        }
    }

    fn explicit_from(&self, value: &Expression<'_>, span: Span) -> ExplicitValidator {
        let Expression::ObjectExpression(object) = unparenthesize(value) else {
            return ExplicitValidator::Malformed;
        };
        let entries = object
            .properties
            .iter()
            .map(|prop| match prop {
                ObjectPropertyKind::ObjectProperty(p) => ExplicitEntry {
                    key: p
                        .key
                        .static_name()
                        .map(|k| k.to_string())
                        .unwrap_or_else(|| p.key.span().source_text(self.source).to_string()),
                    source: p.span.source_text(self.source).to_string(),
                },
                ObjectPropertyKind::SpreadProperty(s) => ExplicitEntry {
                    key: s.argument.span().source_text(self.source).to_string(),
                    source: s.span.source_text(self.source).to_string(),
                },
            })
            .collect();
        ExplicitValidator::Object {
            entries,
            removal: (
                removal_start(self.source, span.start),
                removal_end(self.source, span.end),
            ),
        }
    }

    fn finish(&mut self, annotation: Annotation) {
        let edits = annotate(annotation, self.cx);
        self.edits.extend(edits);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SYNTAX HELPERS
// ═══════════════════════════════════════════════════════════════════════════════

fn unparenthesize<'e, 'a>(expr: &'e Expression<'a>) -> &'e Expression<'a> {
    match expr {
        Expression::ParenthesizedExpression(paren) => unparenthesize(&paren.expression),
        other => other,
    }
}

/// `Props` in `FC<Props>` / `React.FunctionComponent<Props>`.
fn component_props_argument<'n, 'a>(ann: &'n TSTypeAnnotation<'a>) -> Option<&'n TSType<'a>> {
    let TSType::TSTypeReference(reference) = &ann.type_annotation else {
        return None;
    };
    let name = type_name_text(&reference.type_name);
    let bare = name.strip_prefix("React.").unwrap_or(&name);
    if !matches!(bare, "FC" | "FunctionComponent" | "VFC" | "VoidFunctionComponent") {
        return None;
    }
    reference.type_arguments.as_ref()?.params.first()
}

/// Annotations a class `props` member may carry.
fn is_object_like(ty: &TSType<'_>) -> bool {
    match ty {
        TSType::TSTypeLiteral(_)
        | TSType::TSTypeReference(_)
        | TSType::TSIntersectionType(_)
        | TSType::TSAnyKeyword(_) => true,
        TSType::TSParenthesizedType(paren) => is_object_like(&paren.type_annotation),
        _ => false,
    }
}

/// Keys given a default in a destructured parameter: `({ a = 1 }: Props)`.
fn destructured_defaults(pattern: &BindingPattern<'_>) -> Vec<String> {
    match pattern {
        BindingPattern::ObjectPattern(object) => object
            .properties
            .iter()
            .filter(|prop| matches!(prop.value, BindingPattern::AssignmentPattern(_)))
            .filter_map(|prop| prop.key.static_name().map(|k| k.to_string()))
            .collect(),
        BindingPattern::AssignmentPattern(assign) => destructured_defaults(&assign.left),
        _ => Vec::new(),
    }
}

/// Static keys of an object literal.
fn object_keys(value: &Expression<'_>) -> Vec<String> {
    let Expression::ObjectExpression(object) = unparenthesize(value) else {
        return Vec::new();
    };
    object
        .properties
        .iter()
        .filter_map(|prop| match prop {
            ObjectPropertyKind::ObjectProperty(p) => p.key.static_name().map(|k| k.to_string()),
            ObjectPropertyKind::SpreadProperty(_) => None,
        })
        .collect()
}

/// The last `object.property = value;` statement among `siblings`.
fn find_member_assignment<'n, 'a>(
    siblings: &'n [Statement<'a>],
    object: &str,
    property: &str,
) -> Option<(Span, &'n Expression<'a>)> {
    siblings.iter().rev().find_map(|stmt| {
        let Statement::ExpressionStatement(es) = stmt else {
            return None;
        };
        let Expression::AssignmentExpression(assign) = &es.expression else {
            return None;
        };
        let AssignmentTarget::StaticMemberExpression(member) = &assign.left else {
            return None;
        };
        let Expression::Identifier(target) = &member.object else {
            return None;
        };
        (target.name.as_str() == object && member.property.name.as_str() == property)
            .then_some((es.span, &assign.right))
    })
}

/// A `static property = value` member: its span and value, when present.
fn class_static_value<'n, 'a>(
    class: &'n Class<'a>,
    property: &str,
) -> Option<(Span, Option<&'n Expression<'a>>)> {
    class.body.body.iter().rev().find_map(|element| {
        let ClassElement::PropertyDefinition(prop) = element else {
            return None;
        };
        (prop.r#static && prop.key.static_name().as_deref() == Some(property))
            .then(|| (prop.span, prop.value.as_ref()))
    })
}
