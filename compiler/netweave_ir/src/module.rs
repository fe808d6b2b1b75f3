//! Compiled modules.

use serde::{Deserialize, Serialize};

use crate::{SymbolTable, TypeDef, TypeRef};

/// A compiled module: its name, the names of modules it references, and the
/// types it defines.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDef {
    pub name: String,
    pub references: Vec<String>,
    pub types: Vec<TypeDef>,
}

impl ModuleDef {
    pub fn new(name: impl Into<String>) -> Self {
        ModuleDef {
            name: name.into(),
            references: Vec::new(),
            types: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_reference(mut self, name: impl Into<String>) -> Self {
        self.references.push(name.into());
        self
    }

    #[must_use]
    pub fn with_type(mut self, ty: TypeDef) -> Self {
        self.types.push(ty);
        self
    }

    pub fn find_type(&self, full_name: &str) -> Option<&TypeDef> {
        self.types.iter().find(|t| t.full_name() == full_name)
    }

    pub fn find_type_mut(&mut self, full_name: &str) -> Option<&mut TypeDef> {
        self.types.iter_mut().find(|t| t.full_name() == full_name)
    }

    pub fn type_index(&self, full_name: &str) -> Option<usize> {
        self.types.iter().position(|t| t.full_name() == full_name)
    }

    pub fn contains_type(&self, full_name: &str) -> bool {
        self.find_type(full_name).is_some()
    }

    /// Whether `ty` names a type declared by this module.
    pub fn owns(&self, ty: &TypeRef) -> bool {
        ty.scope() == Some(self.name.as_str())
    }

    /// Attach sequence points from a symbol table to types and members.
    pub fn apply_symbols(&mut self, symbols: &SymbolTable) {
        for ty in &mut self.types {
            let type_name = ty.full_name();
            ty.position = symbols.get(&SymbolTable::type_key(&type_name)).cloned();
            for field in &mut ty.fields {
                field.position = symbols
                    .get(&SymbolTable::member_key(&type_name, &field.name))
                    .cloned();
            }
            for method in &mut ty.methods {
                method.position = symbols
                    .get(&SymbolTable::member_key(&type_name, &method.name))
                    .cloned();
            }
        }
    }

    /// Gather every known sequence point into a symbol table.
    pub fn collect_symbols(&self) -> SymbolTable {
        let mut symbols = SymbolTable::default();
        for ty in &self.types {
            let type_name = ty.full_name();
            if let Some(point) = &ty.position {
                symbols.insert(SymbolTable::type_key(&type_name), point.clone());
            }
            for field in &ty.fields {
                if let Some(point) = &field.position {
                    symbols.insert(
                        SymbolTable::member_key(&type_name, &field.name),
                        point.clone(),
                    );
                }
            }
            for method in &ty.methods {
                if let Some(point) = &method.position {
                    symbols.insert(
                        SymbolTable::member_key(&type_name, &method.name),
                        point.clone(),
                    );
                }
            }
        }
        symbols
    }
}
