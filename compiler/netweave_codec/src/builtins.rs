//! Codecs known before generation starts: primitives and user-supplied ones.

use netweave_ir::{CodecKind, MethodRef, ModuleDef, Primitive, TypeRef};
use netweave_resolve::{AssemblyLoadError, Resolved};

use crate::{CodecSynthesizer, WeaveContext};

impl CodecSynthesizer {
    /// Register the runtime's `Write<T>` / `Read<T>` for every primitive.
    pub fn register_builtins(&mut self, cx: &mut WeaveContext<'_>) {
        for primitive in Primitive::ALL {
            let ty = primitive.type_ref();
            let function = cx.config.generic_function(self.kind(), ty.clone());
            self.register(cx, ty, function);
        }
    }

    /// Register methods declared as codecs in the module under weave and in
    /// each directly referenced module.
    ///
    /// Generated classes are skipped; other modules' generated codecs are
    /// reached through markers instead. Returns how many were registered.
    #[tracing::instrument(level = "debug", skip_all, fields(kind = %self.kind()))]
    pub fn discover_user_codecs(
        &mut self,
        cx: &mut WeaveContext<'_>,
    ) -> Result<usize, AssemblyLoadError> {
        let generated = cx.config.generated_class_name();
        let mut found = declared_codecs(cx.module, self.kind(), &generated);

        for reference in cx.module.references.clone() {
            match cx.resolver.resolve(&reference)? {
                Some(Resolved::External(module)) => {
                    found.extend(declared_codecs(&module, self.kind(), &generated));
                }
                Some(Resolved::Current) => {}
                None => tracing::debug!(module = %reference, "reference not found, no codecs taken from it"),
            }
        }

        let count = found.len();
        for (target, function) in found {
            self.register(cx, target, function);
        }
        tracing::debug!(count, "registered user codecs");
        Ok(count)
    }
}

fn declared_codecs(module: &ModuleDef, kind: CodecKind, generated: &str) -> Vec<(TypeRef, MethodRef)> {
    let mut found = Vec::new();
    for def in &module.types {
        let full_name = def.full_name();
        if full_name == generated {
            continue;
        }
        let owner = TypeRef::named(module.name.as_str(), full_name);
        for method in &def.methods {
            let Some(signature) = method.codec.as_ref().filter(|s| s.kind == kind) else {
                continue;
            };
            found.push((
                signature.target.clone(),
                MethodRef::new(owner.clone(), method.name.as_str()),
            ));
        }
    }
    found
}
