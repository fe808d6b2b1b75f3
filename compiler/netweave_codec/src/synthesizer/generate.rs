//! Generation rules, one per [`TypeDescription`].

use netweave_ir::{
    CodecBody, CodecKind, CodecSignature, CollectionStrategy, FieldCodec, MethodBody, MethodDef,
    MethodRef, Primitive, TypeRef,
};

use super::CodecSynthesizer;
use crate::{CodecError, TypeDescription, UnsupportedReason, WeaveContext};

impl CodecSynthesizer {
    pub(super) fn generate(
        &mut self,
        cx: &mut WeaveContext<'_>,
        ty: &TypeRef,
    ) -> Result<MethodRef, CodecError> {
        match cx.describe(ty)? {
            TypeDescription::GenericParameter => Ok(self.generic_function(cx, ty.clone())),
            TypeDescription::ByReference => self.unsupported(cx, ty, UnsupportedReason::ByReference),
            TypeDescription::Array { rank, .. } if rank > 1 => {
                self.unsupported(cx, ty, UnsupportedReason::MultidimensionalArray)
            }
            TypeDescription::Array { element, .. } => {
                self.generate_collection(cx, ty, &element, CollectionStrategy::Array)
            }
            TypeDescription::Nullable { inner } => {
                self.generate_collection(cx, ty, &inner, CollectionStrategy::Nullable)
            }
            TypeDescription::Segment { element } => {
                self.generate_collection(cx, ty, &element, CollectionStrategy::Segment)
            }
            TypeDescription::List { element } => {
                self.generate_collection(cx, ty, &element, CollectionStrategy::List)
            }
            TypeDescription::Unresolved => Err(CodecError::Unresolved {
                kind: self.kind,
                ty: ty.clone(),
                position: None,
            }),
            TypeDescription::Enum { underlying } => self.generate_enum(cx, ty, underlying),
            TypeDescription::NetworkedReference => {
                let function = cx.config.network_behaviour_function(self.kind, ty.clone());
                self.register(cx, ty.clone(), function.clone());
                Ok(function)
            }
            TypeDescription::EngineOwned => self.unsupported(cx, ty, UnsupportedReason::EngineOwned),
            TypeDescription::OpenGeneric => self.unsupported(cx, ty, UnsupportedReason::GenericType),
            TypeDescription::Interface => self.unsupported(cx, ty, UnsupportedReason::Interface),
            TypeDescription::Abstract => self.unsupported(cx, ty, UnsupportedReason::AbstractClass),
            TypeDescription::UserDefined { value_type } => self.generate_fields(cx, ty, value_type),
        }
    }

    fn unsupported(
        &self,
        cx: &WeaveContext<'_>,
        ty: &TypeRef,
        reason: UnsupportedReason,
    ) -> Result<MethodRef, CodecError> {
        Err(CodecError::Unsupported {
            kind: self.kind,
            ty: ty.clone(),
            reason,
            position: cx.type_position(ty)?,
        })
    }

    /// Array, list, nullable and segment codecs all defer to the element codec.
    fn generate_collection(
        &mut self,
        cx: &mut WeaveContext<'_>,
        ty: &TypeRef,
        element: &TypeRef,
        strategy: CollectionStrategy,
    ) -> Result<MethodRef, CodecError> {
        let element = self.get_or_generate(cx, element)?;

        // The element's members may have asked for this collection already.
        if let Some(found) = self.registry.get(ty) {
            return Ok(found.clone());
        }

        let function = self.add_method(cx, ty, MethodBody::Codec(CodecBody::Collection { strategy, element }));
        self.register(cx, ty.clone(), function.clone());
        self.generated += 1;
        tracing::debug!(kind = %self.kind, ty = %ty, ?strategy, "generated collection codec");
        Ok(function)
    }

    fn generate_enum(
        &mut self,
        cx: &mut WeaveContext<'_>,
        ty: &TypeRef,
        underlying: Primitive,
    ) -> Result<MethodRef, CodecError> {
        let underlying = self.get_or_generate(cx, &underlying.type_ref())?;
        let function = self.add_method(cx, ty, MethodBody::Codec(CodecBody::Enum { underlying }));
        self.register(cx, ty.clone(), function.clone());
        self.generated += 1;
        Ok(function)
    }

    /// Member-by-member codec for a class or struct.
    ///
    /// The function is registered and the type marked before members are
    /// visited, so self-referential layouts find it instead of recursing.
    /// If any member fails, everything generated since is undone, codecs of
    /// nested collections and member types included.
    fn generate_fields(
        &mut self,
        cx: &mut WeaveContext<'_>,
        ty: &TypeRef,
        value_type: bool,
    ) -> Result<MethodRef, CodecError> {
        let checkpoint = self.checkpoint(cx);
        let function = self.add_method(cx, ty, MethodBody::None);
        self.install(cx, ty.clone(), function.clone());

        match self.member_codecs(cx, ty) {
            Ok(fields) => {
                let body = CodecBody::Fields {
                    reference_type: !value_type,
                    fields,
                };
                if let Some(method) = cx.generated_class_mut().method_mut(&function.name) {
                    method.body = MethodBody::Codec(body);
                }
                self.generated += 1;
                tracing::debug!(kind = %self.kind, ty = %ty, "generated member codec");
                Ok(function)
            }
            Err(err) => {
                self.rollback(cx, checkpoint);
                tracing::debug!(kind = %self.kind, ty = %ty, error = %err, "rolled back member codec");
                Err(err)
            }
        }
    }

    fn member_codecs(
        &mut self,
        cx: &mut WeaveContext<'_>,
        ty: &TypeRef,
    ) -> Result<Vec<FieldCodec>, CodecError> {
        let members = cx.serializable_members(ty)?;
        let mut fields = Vec::with_capacity(members.len());
        for (name, member_ty) in members {
            let codec = self.get_or_generate(cx, &member_ty)?;
            fields.push(FieldCodec::new(name, codec));
        }
        Ok(fields)
    }

    /// Add `_Write_<ty>` / `_Read_<ty>` to the generated class.
    ///
    /// A type sharing its full name with one already generated for another
    /// module is named with its scopes instead, e.g. `_Write_[Lib]Game.Data`.
    fn add_method(&self, cx: &mut WeaveContext<'_>, ty: &TypeRef, body: MethodBody) -> MethodRef {
        let prefix = self.kind.method_prefix();
        let mut name = format!("{prefix}{ty}");
        if cx.generated_class_mut().method(&name).is_some() {
            name = format!("{prefix}{}", ty.qualified());
        }
        let stream = cx.config.stream_type(self.kind);

        let mut method = MethodDef::new(name.as_str()).static_();
        method = match self.kind {
            CodecKind::Writer => method
                .with_param("writer", stream)
                .with_param("value", ty.clone()),
            CodecKind::Reader => method.with_param("reader", stream).returning(ty.clone()),
        };
        method.codec = Some(CodecSignature::new(self.kind, ty.clone()));
        method.body = body;

        let class = cx.generated_class_ref();
        cx.generated_class_mut().methods.push(method);
        MethodRef::new(class, name)
    }
}
