//! Structured bodies of generated reader/writer functions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{MethodRef, TypeRef};

/// Which half of a codec pair a function implements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CodecKind {
    Writer,
    Reader,
}

impl CodecKind {
    /// Marker label telling other modules this type already has a codec.
    pub const fn generated_label(self) -> &'static str {
        match self {
            CodecKind::Writer => "__netweave_writer_generated",
            CodecKind::Reader => "__netweave_reader_generated",
        }
    }

    /// Prefix of generated method names.
    pub const fn method_prefix(self) -> &'static str {
        match self {
            CodecKind::Writer => "_Write_",
            CodecKind::Reader => "_Read_",
        }
    }

    /// Name of the runtime's generic entry point (`Write<T>` / `Read<T>`).
    pub const fn generic_entry(self) -> &'static str {
        match self {
            CodecKind::Writer => "Write",
            CodecKind::Reader => "Read",
        }
    }

    /// Runtime entry point coding a networked object as a handle.
    pub const fn network_behaviour_entry(self) -> &'static str {
        match self {
            CodecKind::Writer => "WriteNetworkBehaviour",
            CodecKind::Reader => "ReadNetworkBehaviour",
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecKind::Writer => write!(f, "writer"),
            CodecKind::Reader => write!(f, "reader"),
        }
    }
}

/// Declares a method to be the writer or reader for `target`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodecSignature {
    pub kind: CodecKind,
    pub target: TypeRef,
}

impl CodecSignature {
    pub fn new(kind: CodecKind, target: TypeRef) -> Self {
        CodecSignature { kind, target }
    }
}

/// How a collection codec frames its elements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionStrategy {
    /// `i32` count (`-1` for null), then elements.
    Array,
    /// Same framing as `Array`.
    List,
    /// Presence byte, then the value when present.
    Nullable,
    /// `i32` count, then elements; never null.
    Segment,
}

/// One serialized member and the codec that handles it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldCodec {
    pub name: String,
    pub codec: MethodRef,
}

impl FieldCodec {
    pub fn new(name: impl Into<String>, codec: MethodRef) -> Self {
        FieldCodec {
            name: name.into(),
            codec,
        }
    }
}

/// Body of a generated codec function.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodecBody {
    /// Frame a container and defer each element to `element`.
    Collection {
        strategy: CollectionStrategy,
        element: MethodRef,
    },
    /// Encode an enum as its underlying integer via `underlying`.
    Enum { underlying: MethodRef },
    /// Member-by-member, in declaration order. Reference types are prefixed
    /// with a presence byte.
    Fields {
        reference_type: bool,
        fields: Vec<FieldCodec>,
    },
    /// Synchronized fields of a networked behaviour, in declaration order.
    SyncVars { fields: Vec<FieldCodec> },
}
