//! Executes codec functions over byte streams.
//!
//! # Wire format
//!
//! All integers little-endian.
//!
//! | type | encoding |
//! |---|---|
//! | bool, u8, i8 | 1 byte |
//! | 16/32/64-bit ints and floats | native width |
//! | string | `i32` byte length (`-1` = null), UTF-8 |
//! | array, list | `i32` count (`-1` = null), elements |
//! | segment | `i32` count, elements |
//! | nullable | presence byte, value if present |
//! | class | presence byte, members (base first) if present |
//! | struct | members |
//! | enum | underlying primitive |
//! | networked object | `u32` net id (`0` = null), `u8` component index if non-null |

mod stream;
mod value;

pub use stream::{NetworkReader, NetworkWriter};
pub use value::Value;

use netweave_ir::{
    CodecBody, CodecKind, CollectionStrategy, FieldCodec, MethodBody, MethodRef, ModuleDef,
    Primitive, TypeRef,
};
use rustc_hash::FxHashMap;

use crate::CodecConfig;

/// Failure while encoding or decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VmError {
    #[error("no codec named `{0}`")]
    UnknownCodec(String),
    #[error("`{0}` has no executable codec body")]
    NotExecutable(String),
    #[error("no codec declared for `{0}`")]
    NoCodecFor(String),
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("missing field `{0}`")]
    MissingField(String),
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },
    #[error("invalid length prefix {0}")]
    InvalidLength(i32),
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
    #[error("{0} elements do not fit an i32 count")]
    TooLong(usize),
    #[error("{0} bytes left over after decoding")]
    TrailingBytes(usize),
}

enum Target<'m> {
    Primitive(Primitive),
    NetworkReference,
    Body(&'m CodecBody),
}

/// Interpreter for codec functions defined across a set of modules.
pub struct CodecVm<'m> {
    config: &'m CodecConfig,
    modules: FxHashMap<&'m str, &'m ModuleDef>,
}

impl<'m> CodecVm<'m> {
    pub fn new(config: &'m CodecConfig, modules: impl IntoIterator<Item = &'m ModuleDef>) -> Self {
        CodecVm {
            config,
            modules: modules
                .into_iter()
                .map(|module| (module.name.as_str(), module))
                .collect(),
        }
    }

    /// Encode `value` with `writer` into a fresh buffer.
    pub fn encode(&self, writer: &MethodRef, value: &Value) -> Result<Vec<u8>, VmError> {
        let mut out = NetworkWriter::new();
        self.write(writer, value, &mut out)?;
        Ok(out.into_bytes())
    }

    /// Decode all of `bytes` with `reader`.
    pub fn decode(&self, reader: &MethodRef, bytes: &[u8]) -> Result<Value, VmError> {
        let mut input = NetworkReader::new(bytes);
        let value = self.read(reader, &mut input)?;
        match input.remaining() {
            0 => Ok(value),
            left => Err(VmError::TrailingBytes(left)),
        }
    }

    pub fn write(
        &self,
        writer: &MethodRef,
        value: &Value,
        out: &mut NetworkWriter,
    ) -> Result<(), VmError> {
        match self.target(writer, CodecKind::Writer)? {
            Target::Primitive(primitive) => out.write_primitive(primitive, value),
            Target::NetworkReference => match value {
                Value::Null => {
                    out.write_u32(0);
                    Ok(())
                }
                Value::NetworkRef { net_id, component } => {
                    out.write_u32(*net_id);
                    out.write_u8(*component);
                    Ok(())
                }
                other => Err(mismatch("network reference", other)),
            },
            Target::Body(body) => self.write_body(body, value, out),
        }
    }

    pub fn read(&self, reader: &MethodRef, input: &mut NetworkReader<'_>) -> Result<Value, VmError> {
        match self.target(reader, CodecKind::Reader)? {
            Target::Primitive(primitive) => input.read_primitive(primitive),
            Target::NetworkReference => match input.read_u32()? {
                0 => Ok(Value::Null),
                net_id => Ok(Value::NetworkRef {
                    net_id,
                    component: input.read_u8()?,
                }),
            },
            Target::Body(body) => self.read_body(body, input),
        }
    }

    fn write_body(
        &self,
        body: &CodecBody,
        value: &Value,
        out: &mut NetworkWriter,
    ) -> Result<(), VmError> {
        match body {
            CodecBody::Collection { strategy, element } => match (strategy, value) {
                (CollectionStrategy::Array | CollectionStrategy::List, Value::Null) => {
                    out.write_i32(-1);
                    Ok(())
                }
                (CollectionStrategy::Nullable, Value::Null) => {
                    out.write_u8(0);
                    Ok(())
                }
                (CollectionStrategy::Nullable, inner) => {
                    out.write_u8(1);
                    self.write(element, inner, out)
                }
                (_, Value::List(items)) => {
                    out.write_count(items.len())?;
                    items.iter().try_for_each(|item| self.write(element, item, out))
                }
                (_, other) => Err(mismatch("list", other)),
            },
            CodecBody::Enum { underlying } => self.write(underlying, value, out),
            CodecBody::Fields {
                reference_type: true,
                ..
            } if *value == Value::Null => {
                out.write_u8(0);
                Ok(())
            }
            CodecBody::Fields {
                reference_type,
                fields,
            } => {
                if *reference_type {
                    out.write_u8(1);
                }
                self.write_fields(fields, value, out)
            }
            CodecBody::SyncVars { fields } => self.write_fields(fields, value, out),
        }
    }

    fn write_fields(
        &self,
        fields: &[FieldCodec],
        value: &Value,
        out: &mut NetworkWriter,
    ) -> Result<(), VmError> {
        let Value::Object(members) = value else {
            return Err(mismatch("object", value));
        };
        for field in fields {
            let member = members
                .get(&field.name)
                .ok_or_else(|| VmError::MissingField(field.name.clone()))?;
            self.write(&field.codec, member, out)?;
        }
        Ok(())
    }

    fn read_body(&self, body: &CodecBody, input: &mut NetworkReader<'_>) -> Result<Value, VmError> {
        match body {
            CodecBody::Collection { strategy, element } => match strategy {
                CollectionStrategy::Nullable => match input.read_u8()? {
                    0 => Ok(Value::Null),
                    _ => self.read(element, input),
                },
                CollectionStrategy::Array | CollectionStrategy::List => match input.read_count()? {
                    None => Ok(Value::Null),
                    Some(count) => self.read_elements(element, count, input),
                },
                CollectionStrategy::Segment => match input.read_count()? {
                    None => Err(VmError::InvalidLength(-1)),
                    Some(count) => self.read_elements(element, count, input),
                },
            },
            CodecBody::Enum { underlying } => self.read(underlying, input),
            CodecBody::Fields {
                reference_type,
                fields,
            } => {
                if *reference_type && input.read_u8()? == 0 {
                    return Ok(Value::Null);
                }
                self.read_fields(fields, input)
            }
            CodecBody::SyncVars { fields } => self.read_fields(fields, input),
        }
    }

    fn read_elements(
        &self,
        element: &MethodRef,
        count: usize,
        input: &mut NetworkReader<'_>,
    ) -> Result<Value, VmError> {
        // The prefix is untrusted; cap preallocation by the bytes left.
        let mut items = Vec::with_capacity(count.min(input.remaining()));
        for _ in 0..count {
            items.push(self.read(element, input)?);
        }
        Ok(Value::List(items))
    }

    fn read_fields(
        &self,
        fields: &[FieldCodec],
        input: &mut NetworkReader<'_>,
    ) -> Result<Value, VmError> {
        let mut members = std::collections::BTreeMap::new();
        for field in fields {
            members.insert(field.name.clone(), self.read(&field.codec, input)?);
        }
        Ok(Value::Object(members))
    }

    fn target(&self, codec: &MethodRef, kind: CodecKind) -> Result<Target<'m>, VmError> {
        if codec.declaring == self.config.extensions(kind) {
            let [arg] = codec.generic_args.as_slice() else {
                return Err(VmError::UnknownCodec(codec.to_string()));
            };
            if codec.name == kind.generic_entry() {
                return match Primitive::from_type(arg) {
                    Some(primitive) => Ok(Target::Primitive(primitive)),
                    None => self.declared_codec(kind, arg).map(Target::Body),
                };
            }
            if codec.name == kind.network_behaviour_entry() {
                return Ok(Target::NetworkReference);
            }
            return Err(VmError::UnknownCodec(codec.to_string()));
        }

        let method = codec
            .declaring
            .scope()
            .and_then(|scope| self.modules.get(scope).copied())
            .and_then(|module| module.find_type(codec.declaring.definition_name()?))
            .and_then(|ty| ty.method(&codec.name))
            .ok_or_else(|| VmError::UnknownCodec(codec.to_string()))?;
        match &method.body {
            MethodBody::Codec(body) => Ok(Target::Body(body)),
            _ => Err(VmError::NotExecutable(codec.to_string())),
        }
    }

    /// The codec some module declares for `target`; how the runtime's
    /// generic entry points dispatch.
    fn declared_codec(&self, kind: CodecKind, target: &TypeRef) -> Result<&'m CodecBody, VmError> {
        self.modules
            .values()
            .copied()
            .flat_map(|module| module.types.iter())
            .flat_map(|ty| ty.methods.iter())
            .find_map(|method| match (&method.codec, &method.body) {
                (Some(signature), MethodBody::Codec(body))
                    if signature.kind == kind && signature.target == *target =>
                {
                    Some(body)
                }
                _ => None,
            })
            .ok_or_else(|| VmError::NoCodecFor(target.to_string()))
    }
}

fn mismatch(expected: &'static str, found: &Value) -> VmError {
    VmError::TypeMismatch {
        expected,
        found: found.kind_name(),
    }
}
