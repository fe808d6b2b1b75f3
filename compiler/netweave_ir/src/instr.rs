//! Member references and the instruction set.
//!
//! The instruction set is a small stack machine: just enough to express
//! field access, calls, locals and structured branching. Generated codecs
//! do not use it; they carry a [`CodecBody`](crate::CodecBody) instead.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::TypeRef;

/// Reference to a field through its declaring type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    /// Declaring type; a generic instance when accessed through `Foo<T>`.
    pub declaring: TypeRef,
    pub name: String,
    pub ty: TypeRef,
}

impl FieldRef {
    pub fn new(declaring: TypeRef, name: impl Into<String>, ty: TypeRef) -> Self {
        FieldRef {
            declaring,
            name: name.into(),
            ty,
        }
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}::{}", self.ty, self.declaring, self.name)
    }
}

/// Lookup key identifying a field independent of generic instantiation.
///
/// Two references compare equal when they name the same field of the same
/// declaring definition, so `Foo<int>::x` and `Foo<T>::x` share a key.
/// Definitions with the same full name in different modules do not.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    pub scope: String,
    pub declaring: String,
    pub name: String,
}

impl FieldKey {
    pub fn new(
        scope: impl Into<String>,
        declaring: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        FieldKey {
            scope: scope.into(),
            declaring: declaring.into(),
            name: name.into(),
        }
    }

    /// Key for a field reference, or `None` if the declaring type is not named.
    pub fn of(field: &FieldRef) -> Option<FieldKey> {
        let scope = field.declaring.scope()?;
        let declaring = field.declaring.definition_name()?;
        Some(FieldKey::new(scope, declaring, field.name.as_str()))
    }
}

/// Reference to a method; doubles as the Function Reference for codecs.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodRef {
    pub declaring: TypeRef,
    pub name: String,
    /// Method-level generic arguments (`Write<T>` instantiated with `T`).
    pub generic_args: Vec<TypeRef>,
}

impl MethodRef {
    pub fn new(declaring: TypeRef, name: impl Into<String>) -> Self {
        MethodRef {
            declaring,
            name: name.into(),
            generic_args: Vec::new(),
        }
    }

    /// Instantiate a generic method with the given arguments.
    #[must_use]
    pub fn instantiate(mut self, args: Vec<TypeRef>) -> Self {
        self.generic_args = args;
        self
    }

    /// Re-home the reference onto a generic instance of its declaring type.
    #[must_use]
    pub fn on_host(mut self, host: TypeRef) -> Self {
        self.declaring = host;
        self
    }

    pub fn is_generic_instance(&self) -> bool {
        !self.generic_args.is_empty()
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring, self.name)?;
        if !self.generic_args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.generic_args.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// Branch target marker within a method body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct LabelId(u32);

impl LabelId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Constant operand. Floats are stored as bits so the type stays `Eq + Hash`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    U64(u64),
    F32(u32),
    F64(u64),
    Str(String),
}

/// A single stack-machine instruction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instruction {
    Nop,
    LoadArg(u16),
    StoreArg(u16),
    LoadLocal(u16),
    StoreLocal(u16),
    /// Push a writable reference to a local.
    LoadLocalAddress(u16),
    LoadConst(Constant),
    /// Pop an object, push the value of one of its fields.
    LoadField(FieldRef),
    /// Pop a value and an object, store the value into the field.
    StoreField(FieldRef),
    /// Pop an object, push a writable reference to one of its fields.
    LoadFieldAddress(FieldRef),
    /// Pop a reference, default-initialize the value it points to.
    InitObj(TypeRef),
    Call(MethodRef),
    CallVirt(MethodRef),
    Label(LabelId),
    Jump(LabelId),
    JumpIf(LabelId),
    Pop,
    Dup,
    Return,
}

impl Instruction {
    /// The field operand of a field access instruction.
    pub fn field_operand(&self) -> Option<&FieldRef> {
        match self {
            Instruction::LoadField(f)
            | Instruction::StoreField(f)
            | Instruction::LoadFieldAddress(f) => Some(f),
            _ => None,
        }
    }

    /// The method operand of a call instruction.
    pub fn call_target(&self) -> Option<&MethodRef> {
        match self {
            Instruction::Call(m) | Instruction::CallVirt(m) => Some(m),
            _ => None,
        }
    }
}
