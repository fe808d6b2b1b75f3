//! State shared by everything in one weave pass.

use netweave_diagnostic::DiagnosticQueue;
use netweave_ir::{MethodRef, ModuleDef, SequencePoint, TypeDef, TypeRef};
use netweave_resolve::{AssemblyLoadError, AssemblyResolver, Resolved};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{CodecConfig, NetworkModel, TypeDescription};

/// The module under weave plus the collaborators and caches of one pass.
///
/// Must not outlive its pass: memoized descriptions are only valid for the
/// module and references it was built with.
pub struct WeaveContext<'a> {
    pub module: &'a mut ModuleDef,
    pub resolver: &'a AssemblyResolver,
    pub model: &'a dyn NetworkModel,
    pub config: &'a CodecConfig,
    pub diagnostics: DiagnosticQueue,
    pub(crate) descriptions: FxHashMap<TypeRef, TypeDescription>,
}

impl<'a> WeaveContext<'a> {
    pub fn new(
        module: &'a mut ModuleDef,
        resolver: &'a AssemblyResolver,
        model: &'a dyn NetworkModel,
        config: &'a CodecConfig,
    ) -> Self {
        WeaveContext {
            module,
            resolver,
            model,
            config,
            diagnostics: DiagnosticQueue::new(),
            descriptions: FxHashMap::default(),
        }
    }

    /// Run `f` on the definition behind a named type.
    ///
    /// The bool tells whether the definition belongs to the module under
    /// weave. `Ok(None)` means the type could not be located.
    pub fn with_type_def<R>(
        &self,
        ty: &TypeRef,
        f: impl FnOnce(&TypeDef, bool) -> R,
    ) -> Result<Option<R>, AssemblyLoadError> {
        let (Some(scope), Some(name)) = (ty.scope(), ty.definition_name()) else {
            return Ok(None);
        };
        if scope == self.module.name {
            return Ok(self.module.find_type(name).map(|def| f(def, true)));
        }
        match self.resolver.resolve(scope)? {
            Some(Resolved::Current) => Ok(self.module.find_type(name).map(|def| f(def, true))),
            Some(Resolved::External(module)) => Ok(module.find_type(name).map(|def| f(def, false))),
            None => Ok(None),
        }
    }

    /// Base types of `ty`, nearest first, with generic arguments substituted.
    ///
    /// The walk stops after the first base that cannot be located; that base
    /// is still included so classification can match it by name.
    pub fn base_chain(&self, ty: &TypeRef) -> Result<Vec<TypeRef>, AssemblyLoadError> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = ty.clone();
        while seen.insert(current.clone()) {
            let base = self.with_type_def(&current, |def, _| {
                def.base
                    .as_ref()
                    .map(|base| base.substitute(&def.generic_params, current.args()))
            })?;
            let Some(Some(base)) = base else { break };
            chain.push(base.clone());
            current = base;
        }
        Ok(chain)
    }

    /// Serializable members of `ty` as `(name, type)`, base class members
    /// first, declaration order within each level.
    pub fn serializable_members(
        &self,
        ty: &TypeRef,
    ) -> Result<Vec<(String, TypeRef)>, AssemblyLoadError> {
        let mut levels = Vec::new();
        let mut seen = FxHashSet::default();
        let mut next = Some(ty.clone());

        while let Some(level) = next.take() {
            if !seen.insert(level.clone()) {
                break;
            }
            let found = self.with_type_def(&level, |def, _| {
                let args = level.args();
                let fields: Vec<(String, TypeRef)> = def
                    .fields
                    .iter()
                    .filter(|f| f.is_serializable())
                    .map(|f| (f.name.clone(), f.ty.substitute(&def.generic_params, args)))
                    .collect();
                let base = def
                    .base
                    .as_ref()
                    .map(|b| b.substitute(&def.generic_params, args));
                (fields, base)
            })?;
            let Some((fields, base)) = found else { break };
            levels.push(fields);
            next = base;
        }

        Ok(levels.into_iter().rev().flatten().collect())
    }

    /// Declaration position of a named type, when symbols were loaded.
    pub fn type_position(&self, ty: &TypeRef) -> Result<Option<SequencePoint>, AssemblyLoadError> {
        Ok(self
            .with_type_def(ty, |def, _| def.position.clone())?
            .flatten())
    }

    /// Position of a method in the module under weave.
    pub fn method_position(&self, method: &MethodRef) -> Option<SequencePoint> {
        if !self.module.owns(&method.declaring) {
            return None;
        }
        self.module
            .find_type(method.declaring.definition_name()?)?
            .method(&method.name)?
            .position
            .clone()
    }

    /// Reference to the class generated codecs live in.
    pub fn generated_class_ref(&self) -> TypeRef {
        TypeRef::named(self.module.name.as_str(), self.config.generated_class_name())
    }

    pub fn has_generated_class(&self) -> bool {
        self.module
            .contains_type(&self.config.generated_class_name())
    }

    /// The generated class, created on first use.
    pub fn generated_class_mut(&mut self) -> &mut TypeDef {
        let full_name = self.config.generated_class_name();
        let index = match self.module.type_index(&full_name) {
            Some(index) => index,
            None => {
                self.module.types.push(TypeDef::class(
                    self.config.generated_namespace.as_str(),
                    self.config.generated_class.as_str(),
                ));
                self.module.types.len() - 1
            }
        };
        &mut self.module.types[index]
    }
}
