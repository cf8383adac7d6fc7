//! Projection behaviour over real type declarations.

#[cfg(test)]
mod tests {
    use oxc_allocator::Allocator;
    use oxc_ast::ast::Statement;
    use oxc_parser::Parser;
    use oxc_span::SourceType;

    use crate::error::{WarningKind, Warnings};
    use crate::js::JsExpr;
    use crate::lower::{lower_alias, lower_interface};
    use crate::project::{project, project_declaration};
    use crate::registry::{runtime_type_binding, TypeRegistry};
    use crate::types::{LiteralValue, TypeDescriptor};
    use crate::validator::{PrimitiveKind, ValidatorDescriptor, ValidatorKind};

    /// Declares every alias/interface in `src` the way the unit walker does
    /// and returns the projection of the last one.
    fn project_last(src: &str) -> (ValidatorDescriptor, TypeRegistry, Warnings) {
        project_last_in(TypeRegistry::new(), src)
    }

    fn project_last_in(
        mut registry: TypeRegistry,
        src: &str,
    ) -> (ValidatorDescriptor, TypeRegistry, Warnings) {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, src, SourceType::ts()).parse();
        assert!(ret.errors.is_empty(), "{:?}", ret.errors);

        let mut warnings = Warnings::default();
        let mut last = None;
        for stmt in &ret.program.body {
            let (name, ty) = match stmt {
                Statement::TSTypeAliasDeclaration(decl) => {
                    (decl.id.name.to_string(), lower_alias(decl))
                }
                Statement::TSInterfaceDeclaration(decl) => {
                    (decl.id.name.to_string(), lower_interface(decl))
                }
                _ => continue,
            };
            let projection = project_declaration(&name, &ty, &registry, &mut warnings);
            registry.declare_shape(&name, projection.descriptor.clone());
            last = Some(projection.descriptor);
        }
        (last.expect("no declarations"), registry, warnings)
    }

    fn field_keys(desc: &ValidatorDescriptor) -> Vec<&str> {
        desc.shape_fields()
            .expect("expected shape")
            .iter()
            .map(|f| f.key.as_str())
            .collect()
    }

    #[test]
    fn test_field_order_preserved() {
        let (desc, _, _) = project_last("type P = { zeta: string; alpha: number; mid?: boolean };");
        assert_eq!(field_keys(&desc), vec!["zeta", "alpha", "mid"]);
        let fields = desc.shape_fields().unwrap();
        assert!(fields[0].value.required);
        assert!(!fields[2].value.required);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let (desc, registry, _) =
            project_last("type Inner = { a: string }; type P = { inner: Inner; list: Inner[] };");
        let ty = TypeDescriptor::reference("P");
        let mut warnings = Warnings::default();
        let first = project(&ty, &registry, &mut warnings);
        let second = project(&ty, &registry, &mut warnings);
        assert_eq!(first, second);
        assert_eq!(first, desc);
    }

    #[test]
    fn test_literal_union_keeps_order() {
        let (desc, _, warnings) = project_last("type Size = 'lg' | 'sm' | 'md' | 'sm';");
        assert_eq!(warnings.len(), 0);
        assert_eq!(
            desc.kind,
            ValidatorKind::OneOf(vec![
                LiteralValue::String("lg".into()),
                LiteralValue::String("sm".into()),
                LiteralValue::String("md".into()),
            ])
        );
    }

    #[test]
    fn test_mixed_union_is_one_of_type() {
        let (desc, _, _) = project_last("type V = string | number | null;");
        assert!(!desc.required);
        let ValidatorKind::OneOfType(variants) = desc.kind else {
            panic!("expected oneOfType, got {:?}", desc.kind);
        };
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].kind, ValidatorKind::Primitive(PrimitiveKind::String));
        assert_eq!(variants[1].kind, ValidatorKind::Primitive(PrimitiveKind::Number));
    }

    #[test]
    fn test_nullable_field_is_optional() {
        let (desc, _, _) = project_last("type P = { a: string | undefined; b: string };");
        let fields = desc.shape_fields().unwrap();
        assert!(!fields[0].value.required);
        assert_eq!(fields[0].value.kind, ValidatorKind::Primitive(PrimitiveKind::String));
        assert!(fields[1].value.required);
    }

    fn registry_with_bound_import(name: &str) -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        registry.declare_imported(name, name, "./base");
        registry.bind_import_access(name, JsExpr::ident(runtime_type_binding(name)));
        registry
    }

    #[test]
    fn test_nullable_alias_reference_stays_optional() {
        let (desc, _, warnings) =
            project_last("type MaybeName = string | undefined; type P = { name: MaybeName; id: string };");
        assert_eq!(warnings.len(), 0);
        let fields = desc.shape_fields().unwrap();
        assert!(!fields[0].value.required);
        assert_eq!(fields[0].value.kind, ValidatorKind::Primitive(PrimitiveKind::String));
        assert!(fields[1].value.required);
    }

    #[test]
    fn test_union_with_nullable_alias_is_optional() {
        let (desc, _, _) =
            project_last("type MaybeName = string | undefined; type P = { v: MaybeName | number };");
        let field = &desc.shape_fields().unwrap()[0];
        assert!(!field.value.required);
        assert!(matches!(field.value.kind, ValidatorKind::OneOfType(_)));
    }

    #[test]
    fn test_exported_nullable_alias_reference_stays_optional() {
        let mut registry = TypeRegistry::new();
        registry.declare_exported(
            "Opt",
            &runtime_type_binding("Opt"),
            ValidatorDescriptor::primitive(PrimitiveKind::String).optional(),
        );
        registry.declare_exported(
            "Name",
            &runtime_type_binding("Name"),
            ValidatorDescriptor::primitive(PrimitiveKind::String),
        );
        let (desc, _, _) = project_last_in(registry, "type P = { o: Opt; n: Name };");
        let fields = desc.shape_fields().unwrap();
        assert_eq!(
            fields[0].value.kind,
            ValidatorKind::Custom(JsExpr::ident("__proptype_Opt"))
        );
        assert!(!fields[0].value.required);
        assert!(fields[1].value.required);
    }

    #[test]
    fn test_intersection_with_imported_type_merges_at_runtime() {
        let (desc, _, warnings) = project_last_in(
            registry_with_bound_import("Base"),
            "type P = Base & { extra: string };",
        );
        assert_eq!(warnings.len(), 0);
        let ValidatorKind::Extended { bases, fields } = desc.kind else {
            panic!("expected runtime merge, got {:?}", desc.kind);
        };
        assert_eq!(bases, vec![JsExpr::ident("__proptype_Base")]);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].key, "extra");
    }

    #[test]
    fn test_pick_over_runtime_merge_is_any() {
        let (desc, _, warnings) = project_last_in(
            registry_with_bound_import("Base"),
            "type P = Base & { extra: string }; type Q = Pick<P, 'extra'>;",
        );
        assert_eq!(desc.kind, ValidatorKind::Any);
        let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::UnsupportedShape]);
    }

    #[test]
    fn test_intersection_merges_shapes() {
        let (desc, _, warnings) = project_last(
            "type A = { a: string; shared: number }; type B = { b: boolean; shared: string }; type C = A & B;",
        );
        assert_eq!(warnings.len(), 0);
        assert_eq!(field_keys(&desc), vec!["a", "shared", "b"]);
        let shared = &desc.shape_fields().unwrap()[1];
        assert_eq!(shared.value.kind, ValidatorKind::Primitive(PrimitiveKind::String));
    }

    #[test]
    fn test_mixed_intersection_is_any_with_warning() {
        let (desc, _, warnings) = project_last("type A = { a: string }; type M = A & string;");
        assert_eq!(desc.kind, ValidatorKind::Any);
        let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();
        assert_eq!(kinds, vec![WarningKind::UnsupportedShape]);
    }

    #[test]
    fn test_recursive_alias_references_own_binding() {
        let allocator = Allocator::default();
        let src = "type Tree = { value: number; children: Tree[] };";
        let ret = Parser::new(&allocator, src, SourceType::ts()).parse();
        let Statement::TSTypeAliasDeclaration(decl) = &ret.program.body[0] else {
            panic!("expected alias");
        };
        let registry = TypeRegistry::new();
        let mut warnings = Warnings::default();
        let projection = project_declaration("Tree", &lower_alias(decl), &registry, &mut warnings);

        assert!(projection.recursive);
        let children = &projection.descriptor.shape_fields().unwrap()[1];
        let ValidatorKind::ArrayOf(element) = &children.value.kind else {
            panic!("expected arrayOf");
        };
        assert_eq!(
            element.kind,
            ValidatorKind::Custom(JsExpr::ident(runtime_type_binding("Tree")))
        );
    }

    #[test]
    fn test_unresolved_reference_warns() {
        let (desc, _, warnings) = project_last("type P = { thing: Mystery };");
        let thing = &desc.shape_fields().unwrap()[0];
        assert_eq!(thing.value.kind, ValidatorKind::Any);
        assert_eq!(
            warnings.iter().next().map(|w| w.code.as_str()),
            Some("PT-UNRESOLVED")
        );
    }

    #[test]
    fn test_builtin_generics() {
        let (desc, _, warnings) = project_last(
            "type Base = { a: string; b: number; c: boolean };
             type P = {
               list: Array<string>;
               map: Record<string, number>;
               picked: Pick<Base, 'a' | 'c'>;
               loose: Partial<Base>;
               when: Date;
               onClick: React.MouseEventHandler;
               children: React.ReactNode;
             };",
        );
        assert_eq!(warnings.len(), 0);
        let fields = desc.shape_fields().unwrap();
        assert!(matches!(fields[0].value.kind, ValidatorKind::ArrayOf(_)));
        assert!(matches!(fields[1].value.kind, ValidatorKind::ObjectOf(_)));
        assert_eq!(field_keys(&fields[2].value), vec!["a", "c"]);
        assert!(fields[3]
            .value
            .shape_fields()
            .unwrap()
            .iter()
            .all(|f| !f.value.required));
        assert!(matches!(
            fields[4].value.kind,
            ValidatorKind::InstanceOfOrShape { shape: None, .. }
        ));
        assert_eq!(fields[5].value.kind, ValidatorKind::Primitive(PrimitiveKind::Func));
        assert_eq!(fields[6].value.kind, ValidatorKind::Primitive(PrimitiveKind::Node));
    }

    #[test]
    fn test_index_signature_is_object_of() {
        let (desc, _, _) = project_last("type Dict = { [key: string]: number };");
        let ValidatorKind::ObjectOf(value) = desc.kind else {
            panic!("expected objectOf");
        };
        assert_eq!(value.kind, ValidatorKind::Primitive(PrimitiveKind::Number));
    }

    #[test]
    fn test_tuple_approximated_with_warning() {
        let (desc, _, warnings) = project_last("type Pair = [string, number];");
        assert!(matches!(desc.kind, ValidatorKind::ArrayOf(_)));
        assert_eq!(warnings.len(), 1);
    }
}
