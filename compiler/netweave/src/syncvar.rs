//! Synchronized-field processing.
//!
//! For every networked behaviour in the module, each `SyncVar` field gets a
//! getter, a setter that flags the field's dirty bit, and a place in the
//! type's `SerializeSyncVars`/`DeserializeSyncVars` bodies. The accessors
//! are recorded in [`AccessorMaps`] for the access rewriter.

use netweave_codec::{CodecSynthesizer, TypeDescription, WeaveContext};
use netweave_diagnostic::{Diagnostic, ErrorCode};
use netweave_ir::{
    CodecBody, CodecKind, Constant, FieldCodec, FieldKey, FieldRef, Instruction, MethodBody, MethodDef,
    MethodRef, SequencePoint, TypeRef,
};
use netweave_resolve::AssemblyLoadError;
use netweave_rewrite::AccessorMaps;

/// Dirty bits live in a `u64` mask.
pub const MAX_SYNC_FIELDS: usize = 64;

const DIRTY_BIT_HOST: &str = "Netweave.NetworkBehaviour";
const SET_DIRTY_BIT: &str = "SetSyncVarDirtyBit";
const SERIALIZE: &str = "SerializeSyncVars";
const DESERIALIZE: &str = "DeserializeSyncVars";

/// A synchronized field as read from its declaring type.
struct SyncField {
    name: String,
    ty: TypeRef,
    position: Option<SequencePoint>,
}

/// Builds accessors and sync-var codecs, collecting the accessor maps.
#[derive(Default)]
pub struct SyncVarProcessor {
    maps: AccessorMaps,
    fields: usize,
}

impl SyncVarProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of synchronized fields given accessors so far.
    pub fn field_count(&self) -> usize {
        self.fields
    }

    pub fn into_maps(self) -> AccessorMaps {
        self.maps
    }

    /// Process every networked behaviour declared in the module.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn process_module(
        &mut self,
        cx: &mut WeaveContext<'_>,
        writers: &mut CodecSynthesizer,
        readers: &mut CodecSynthesizer,
    ) -> Result<(), AssemblyLoadError> {
        let scope = cx.module.name.clone();
        let behaviours: Vec<TypeRef> = cx
            .module
            .types
            .iter()
            .filter(|def| def.sync_fields().next().is_some())
            .map(|def| def.self_ref(&scope))
            .collect();

        for ty in behaviours {
            if cx.describe(&ty)? == TypeDescription::NetworkedReference {
                self.process_type(cx, writers, readers, &ty)?;
            } else {
                tracing::debug!(ty = %ty, "sync fields on a type that is not a networked behaviour");
            }
        }
        tracing::debug!(fields = self.fields, "synchronized fields processed");
        Ok(())
    }

    fn process_type(
        &mut self,
        cx: &mut WeaveContext<'_>,
        writers: &mut CodecSynthesizer,
        readers: &mut CodecSynthesizer,
        ty: &TypeRef,
    ) -> Result<(), AssemblyLoadError> {
        let Some(full_name) = ty.definition_name().map(str::to_string) else {
            return Ok(());
        };
        let Some((fields, position)) = cx.module.find_type(&full_name).map(|def| {
            let fields: Vec<SyncField> = def
                .sync_fields()
                .map(|f| SyncField {
                    name: f.name.clone(),
                    ty: f.ty.clone(),
                    position: f.position.clone(),
                })
                .collect();
            (fields, def.position.clone())
        }) else {
            return Ok(());
        };

        let first_bit = inherited_sync_fields(cx, ty)?;
        let total = first_bit + fields.len();
        if total > MAX_SYNC_FIELDS {
            cx.diagnostics.push(
                Diagnostic::error(ErrorCode::E3001)
                    .with_message(format!(
                        "{ty} has {total} synchronized fields, the limit is {MAX_SYNC_FIELDS}"
                    ))
                    .with_note(format!("{first_bit} of them are inherited"))
                    .with_suggestion("move some state into a separate networked behaviour")
                    .with_position(position),
            );
            return Ok(());
        }

        let mut write_fields = Vec::with_capacity(fields.len());
        let mut read_fields = Vec::with_capacity(fields.len());
        for (bit, field) in (first_bit..).zip(&fields) {
            let writer = writers.try_get_function(cx, &field.ty, field.position.as_ref())?;
            let reader = readers.try_get_function(cx, &field.ty, field.position.as_ref())?;
            if let (Some(writer), Some(reader)) = (writer, reader) {
                write_fields.push(FieldCodec::new(field.name.as_str(), writer));
                read_fields.push(FieldCodec::new(field.name.as_str(), reader));
            }
            self.add_accessors(cx, ty, &full_name, field, bit);
        }

        // A failed field already produced an error; the module will not be emitted.
        if write_fields.len() == fields.len() {
            let serialize = sync_method(SERIALIZE, cx.config.stream_type(CodecKind::Writer), write_fields);
            let deserialize =
                sync_method(DESERIALIZE, cx.config.stream_type(CodecKind::Reader), read_fields);
            if let Some(def) = cx.module.find_type_mut(&full_name) {
                def.methods.push(serialize);
                def.methods.push(deserialize);
            }
        }
        tracing::trace!(ty = %ty, fields = fields.len(), first_bit, "processed sync fields");
        Ok(())
    }

    fn add_accessors(
        &mut self,
        cx: &mut WeaveContext<'_>,
        ty: &TypeRef,
        full_name: &str,
        field: &SyncField,
        bit: usize,
    ) {
        let backing = FieldRef::new(ty.clone(), field.name.as_str(), field.ty.clone());
        let getter_name = format!("get_Network{}", field.name);
        let setter_name = format!("set_Network{}", field.name);

        let getter = MethodDef::new(getter_name.as_str())
            .returning(field.ty.clone())
            .with_body(vec![
                Instruction::LoadArg(0),
                Instruction::LoadField(backing.clone()),
                Instruction::Return,
            ]);
        let setter = MethodDef::new(setter_name.as_str())
            .with_param("value", field.ty.clone())
            .with_body(vec![
                Instruction::LoadArg(0),
                Instruction::LoadArg(1),
                Instruction::StoreField(backing),
                Instruction::LoadArg(0),
                Instruction::LoadConst(Constant::U64(1_u64 << bit)),
                Instruction::Call(MethodRef::new(TypeRef::runtime(DIRTY_BIT_HOST), SET_DIRTY_BIT)),
                Instruction::Return,
            ]);

        let Some(def) = cx.module.find_type_mut(full_name) else {
            return;
        };
        for accessor in [getter, setter] {
            if def.method(&accessor.name).is_none() {
                def.methods.push(accessor);
            }
        }

        let key = FieldKey::new(ty.scope().unwrap_or_default(), full_name, field.name.as_str());
        self.maps
            .getters
            .insert(key.clone(), MethodRef::new(ty.clone(), getter_name));
        self.maps
            .setters
            .insert(key, MethodRef::new(ty.clone(), setter_name));
        self.fields += 1;
    }
}

/// Synchronized fields declared by the resolvable base types of `ty`.
fn inherited_sync_fields(cx: &WeaveContext<'_>, ty: &TypeRef) -> Result<usize, AssemblyLoadError> {
    let mut count = 0;
    for base in cx.base_chain(ty)? {
        count += cx
            .with_type_def(&base, |def, _| def.sync_fields().count())?
            .unwrap_or(0);
    }
    Ok(count)
}

fn sync_method(name: &str, stream: TypeRef, fields: Vec<FieldCodec>) -> MethodDef {
    let mut method = MethodDef::new(name).with_param("stream", stream);
    method.body = MethodBody::Codec(CodecBody::SyncVars { fields });
    method
}
