use crate::dce::DeadCodeGuard;
use crate::error::{TransformError, Warnings};
use crate::imports::{ImportTable, ModuleStyle};
use crate::options::PluginOptions;
use crate::registry::TypeRegistry;

/// State for one compilation unit. Created when the unit starts and dropped
/// when it ends; nothing here outlives the unit.
#[derive(Debug)]
pub struct UnitContext<'o> {
    pub options: &'o PluginOptions,
    pub file_path: String,
    pub registry: TypeRegistry,
    pub imports: ImportTable,
    pub dead_code: DeadCodeGuard,
    pub warnings: Warnings,
}

impl<'o> UnitContext<'o> {
    pub fn new(options: &'o PluginOptions, file_path: &str) -> Result<Self, TransformError> {
        let style = if options.uses_es_modules() {
            ModuleStyle::Import
        } else {
            ModuleStyle::Require
        };
        Ok(UnitContext {
            options,
            file_path: file_path.to_string(),
            registry: TypeRegistry::new(),
            imports: ImportTable::new(style),
            dead_code: DeadCodeGuard::from_options(&options.dead_code)?,
            warnings: Warnings::default(),
        })
    }
}
