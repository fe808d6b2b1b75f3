//! The codec synthesizer: registry lookups, cross-module reuse, generation.

mod generate;

use netweave_diagnostic::{Diagnostic, ErrorCode};
use netweave_ir::{CodecKind, MethodRef, SequencePoint, TypeRef};
use netweave_resolve::AssemblyLoadError;

use crate::{CodecError, FunctionRegistry, WeaveContext};

/// One registry write, kept so a failed generation can undo it.
struct Installed {
    ty: TypeRef,
    previous: Option<MethodRef>,
    marker: Option<bool>,
}

/// State to return to when a member codec fails.
struct Checkpoint {
    installed: usize,
    methods: usize,
    generated: usize,
}

/// Finds or generates codec functions of one kind.
///
/// Writers and readers are synthesized independently; a pass owns one
/// synthesizer of each kind.
pub struct CodecSynthesizer {
    kind: CodecKind,
    registry: FunctionRegistry,
    generated: usize,
    journal: Vec<Installed>,
}

impl CodecSynthesizer {
    pub fn new(kind: CodecKind) -> Self {
        CodecSynthesizer {
            kind,
            registry: FunctionRegistry::new(),
            generated: 0,
            journal: Vec::new(),
        }
    }

    pub fn kind(&self) -> CodecKind {
        self.kind
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Number of known functions, built-in and user-supplied included.
    pub fn count(&self) -> usize {
        self.registry.len()
    }

    /// Number of methods this synthesizer added to the generated class.
    pub fn generated_count(&self) -> usize {
        self.generated
    }

    /// Make `function` the codec for `ty` and mark `ty` generated.
    ///
    /// Replacing an existing entry wins but is reported as a warning naming
    /// both functions.
    pub fn register(&mut self, cx: &mut WeaveContext<'_>, ty: TypeRef, function: MethodRef) {
        if let Some(old) = self.registry.get(&ty) {
            if *old != function {
                tracing::warn!(kind = %self.kind, ty = %ty, old = %old, new = %function, "codec registered twice");
                cx.diagnostics.push(
                    Diagnostic::warning(ErrorCode::E2003)
                        .with_message(format!(
                            "Registering a {} for {ty} when one already exists",
                            self.kind
                        ))
                        .with_note(format!("old: {old}"))
                        .with_note(format!("new: {function}"))
                        .with_position(cx.method_position(&function)),
                );
            }
        }
        self.install(cx, ty, function);
    }

    /// Registry insert plus marker, without the overwrite check.
    fn install(&mut self, cx: &mut WeaveContext<'_>, ty: TypeRef, function: MethodRef) {
        let marker = self.mark_generated(cx, &ty);
        let previous = self.registry.insert(ty.clone(), function);
        self.journal.push(Installed {
            ty,
            previous,
            marker,
        });
    }

    fn checkpoint(&self, cx: &mut WeaveContext<'_>) -> Checkpoint {
        Checkpoint {
            installed: self.journal.len(),
            methods: cx.generated_class_mut().methods.len(),
            generated: self.generated,
        }
    }

    /// Undo every registration, marker and generated method since `checkpoint`.
    fn rollback(&mut self, cx: &mut WeaveContext<'_>, checkpoint: Checkpoint) {
        while self.journal.len() > checkpoint.installed {
            let Some(entry) = self.journal.pop() else {
                break;
            };
            if let Some(previous) = entry.marker {
                self.restore_marker(cx, &entry.ty, previous);
            }
            match entry.previous {
                Some(function) => {
                    self.registry.insert(entry.ty, function);
                }
                None => {
                    self.registry.remove(&entry.ty);
                }
            }
        }
        cx.generated_class_mut().methods.truncate(checkpoint.methods);
        self.generated = checkpoint.generated;
    }

    /// Set the generated-marker if `ty` is defined in the module under weave.
    fn mark_generated(&self, cx: &mut WeaveContext<'_>, ty: &TypeRef) -> Option<bool> {
        if !cx.module.owns(ty) {
            return None;
        }
        let def = cx.module.find_type_mut(ty.definition_name()?)?;
        let label = self.kind.generated_label();
        let previous = def.marker(label);
        def.set_marker(label, true);
        Some(previous)
    }

    fn restore_marker(&self, cx: &mut WeaveContext<'_>, ty: &TypeRef, previous: bool) {
        let Some(def) = ty
            .definition_name()
            .and_then(|name| cx.module.find_type_mut(name))
        else {
            return;
        };
        let label = self.kind.generated_label();
        if previous {
            def.set_marker(label, true);
        } else {
            def.markers.remove(label);
        }
    }

    /// Whether a module other than the one under weave already generated a
    /// codec for `ty`. Markers are only ever checked there, never set.
    fn generated_in_other_module(
        &self,
        cx: &WeaveContext<'_>,
        ty: &TypeRef,
    ) -> Result<bool, AssemblyLoadError> {
        if cx.module.owns(ty) {
            return Ok(false);
        }
        let label = self.kind.generated_label();
        Ok(cx
            .with_type_def(ty, |def, local| !local && def.marker(label))?
            .unwrap_or(false))
    }

    /// `Write<ty>` / `Read<ty>`; resolved when the call site is instantiated.
    fn generic_function(&self, cx: &WeaveContext<'_>, ty: TypeRef) -> MethodRef {
        cx.config.generic_function(self.kind, ty)
    }

    /// Return the codec for `ty`, generating it if needed.
    pub fn get_or_generate(
        &mut self,
        cx: &mut WeaveContext<'_>,
        ty: &TypeRef,
    ) -> Result<MethodRef, CodecError> {
        if ty.is_generic_parameter() {
            return Ok(self.generic_function(cx, ty.clone()));
        }
        if let Some(found) = self.registry.get(ty) {
            return Ok(found.clone());
        }
        if self.generated_in_other_module(cx, ty)? {
            tracing::trace!(kind = %self.kind, ty = %ty, "reusing codec from declaring module");
            return Ok(self.generic_function(cx, ty.clone()));
        }
        self.generate(cx, ty)
    }

    /// Like [`get_or_generate`](Self::get_or_generate), but a codec failure
    /// becomes an error diagnostic at `position` and `Ok(None)`.
    ///
    /// Only load failures propagate; they abort the pass.
    pub fn try_get_function(
        &mut self,
        cx: &mut WeaveContext<'_>,
        ty: &TypeRef,
        position: Option<&SequencePoint>,
    ) -> Result<Option<MethodRef>, AssemblyLoadError> {
        match self.get_or_generate(cx, ty) {
            Ok(function) => Ok(Some(function)),
            Err(CodecError::Load(err)) => Err(err),
            Err(err) => {
                let diagnostic = err
                    .to_diagnostic()
                    .with_position(position.cloned())
                    .or_position(err.position());
                cx.diagnostics.push(diagnostic);
                Ok(None)
            }
        }
    }
}
