//! Per-unit table of named types.
//!
//! Keys are the names as written in the current unit. The table is created
//! with the unit's context and dropped with it.

use std::collections::HashMap;

use crate::js::JsExpr;
use crate::validator::{ShapeField, ValidatorDescriptor, ValidatorKind};

/// Prefix of the binding a unit exports for each of its exported types.
pub const RUNTIME_TYPE_PREFIX: &str = "__proptype_";

pub fn runtime_type_binding(type_name: &str) -> String {
    format!("{}{}", RUNTIME_TYPE_PREFIX, type_name)
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEntry {
    /// Declared and projected in this unit.
    Internal(ValidatorDescriptor),
    /// Imported from another unit; usable once `access` is bound.
    Imported(ImportedType),
    /// Projected in this unit and hoisted under `binding`.
    Exported {
        binding: String,
        descriptor: ValidatorDescriptor,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportedType {
    pub local_name: String,
    pub source_name: String,
    pub location: String,
    pub access: Option<JsExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Descriptor(ValidatorDescriptor),
    /// Use as-is; the owning unit already generated the validator.
    Access(JsExpr),
    Unresolved,
}

#[derive(Debug, Default)]
pub struct TypeRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins.
    pub fn declare_internal(&mut self, name: &str, descriptor: ValidatorDescriptor) {
        tracing::trace!(name, "declare internal type");
        self.entries
            .insert(name.to_string(), RegistryEntry::Internal(descriptor));
    }

    pub fn declare_imported(&mut self, local_name: &str, source_name: &str, location: &str) {
        tracing::trace!(local_name, source_name, location, "declare imported type");
        self.entries.insert(
            local_name.to_string(),
            RegistryEntry::Imported(ImportedType {
                local_name: local_name.to_string(),
                source_name: source_name.to_string(),
                location: location.to_string(),
                access: None,
            }),
        );
    }

    /// Fills in the access expression once the import has been materialized.
    pub fn bind_import_access(&mut self, local_name: &str, access: JsExpr) -> bool {
        match self.entries.get_mut(local_name) {
            Some(RegistryEntry::Imported(imported)) => {
                imported.access = Some(access);
                true
            }
            _ => false,
        }
    }

    pub fn declare_exported(&mut self, name: &str, binding: &str, descriptor: ValidatorDescriptor) {
        tracing::trace!(name, binding, "declare exported type");
        self.entries.insert(
            name.to_string(),
            RegistryEntry::Exported {
                binding: binding.to_string(),
                descriptor,
            },
        );
    }

    /// Registers a class so annotations naming it check `instanceof`. A shape
    /// registered earlier under the same name (an interface) is kept alongside.
    pub fn declare_class(&mut self, name: &str) {
        let shape = self
            .entries
            .get(name)
            .and_then(|entry| match entry {
                RegistryEntry::Internal(desc) => desc.shape_fields().map(<[ShapeField]>::to_vec),
                _ => None,
            });
        self.declare_internal(
            name,
            ValidatorDescriptor::new(ValidatorKind::InstanceOfOrShape {
                class: name.to_string(),
                shape,
            }),
        );
    }

    /// Registers an interface or alias shape, merging into a class entry of
    /// the same name if there is one.
    pub fn declare_shape(&mut self, name: &str, descriptor: ValidatorDescriptor) {
        if let Some(RegistryEntry::Internal(existing)) = self.entries.get_mut(name) {
            if let ValidatorKind::InstanceOfOrShape { shape, .. } = &mut existing.kind {
                if let Some(fields) = descriptor.shape_fields() {
                    *shape = Some(fields.to_vec());
                    return;
                }
            }
        }
        self.declare_internal(name, descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn resolve(&self, name: &str) -> Resolution {
        match self.entries.get(name) {
            Some(RegistryEntry::Internal(desc)) => Resolution::Descriptor(desc.clone()),
            Some(RegistryEntry::Exported { binding, .. }) => {
                Resolution::Access(JsExpr::ident(binding.clone()))
            }
            Some(RegistryEntry::Imported(imported)) => match &imported.access {
                Some(access) => Resolution::Access(access.clone()),
                None => {
                    tracing::debug!(name, location = imported.location.as_str(), "import not yet bound");
                    Resolution::Unresolved
                }
            },
            None => Resolution::Unresolved,
        }
    }

    /// The projected descriptor for a locally owned type, ignoring how it is
    /// referenced.
    pub fn local_descriptor(&self, name: &str) -> Option<&ValidatorDescriptor> {
        match self.entries.get(name)? {
            RegistryEntry::Internal(desc) => Some(desc),
            RegistryEntry::Exported { descriptor, .. } => Some(descriptor),
            RegistryEntry::Imported(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::PrimitiveKind;

    fn string_shape(key: &str) -> ValidatorDescriptor {
        ValidatorDescriptor::new(ValidatorKind::Shape(vec![ShapeField {
            key: key.to_string(),
            value: ValidatorDescriptor::primitive(PrimitiveKind::String),
        }]))
    }

    #[test]
    fn test_last_declaration_wins() {
        let mut registry = TypeRegistry::new();
        registry.declare_internal("A", ValidatorDescriptor::any());
        registry.declare_internal("A", string_shape("x"));
        assert_eq!(registry.resolve("A"), Resolution::Descriptor(string_shape("x")));
    }

    #[test]
    fn test_import_unresolved_until_bound() {
        let mut registry = TypeRegistry::new();
        registry.declare_imported("Props", "Props", "./types");
        assert_eq!(registry.resolve("Props"), Resolution::Unresolved);

        let access = JsExpr::ident("__proptype_Props");
        assert!(registry.bind_import_access("Props", access.clone()));
        assert_eq!(registry.resolve("Props"), Resolution::Access(access));
    }

    #[test]
    fn test_exported_resolves_to_binding() {
        let mut registry = TypeRegistry::new();
        registry.declare_exported("Props", "__proptype_Props", string_shape("a"));
        assert_eq!(
            registry.resolve("Props"),
            Resolution::Access(JsExpr::ident("__proptype_Props"))
        );
        assert_eq!(registry.local_descriptor("Props"), Some(&string_shape("a")));
    }

    #[test]
    fn test_class_merges_with_interface() {
        let mut registry = TypeRegistry::new();
        registry.declare_class("Point");
        registry.declare_shape("Point", string_shape("x"));
        match registry.resolve("Point") {
            Resolution::Descriptor(desc) => match desc.kind {
                ValidatorKind::InstanceOfOrShape { class, shape } => {
                    assert_eq!(class, "Point");
                    assert_eq!(shape.unwrap().len(), 1);
                }
                other => panic!("unexpected kind {:?}", other),
            },
            other => panic!("unexpected resolution {:?}", other),
        }
    }

    #[test]
    fn test_unknown_name_is_unresolved() {
        assert_eq!(TypeRegistry::new().resolve("Nope"), Resolution::Unresolved);
    }
}
