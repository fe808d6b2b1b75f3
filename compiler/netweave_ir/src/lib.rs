//! Netweave IR - the module model the weaver reads, analyses and rewrites.
//!
//! This crate contains:
//! - Structural type references ([`TypeRef`]) and primitives
//! - Type, field and method definitions
//! - A small stack-machine instruction set ([`Instruction`])
//! - Structured codec bodies emitted by the synthesizer ([`CodecBody`])
//! - Sequence points and the companion symbol table
//! - The on-disk module/symbol file format ([`io`])
//!
//! # Design Philosophy
//!
//! - **Structural identity**: two references to the same type compare equal
//!   regardless of where they were created, so they can key hash maps.
//! - **Labels, not offsets**: branches target [`Instruction::Label`] markers,
//!   so passes can insert and remove instructions without patching targets.
//! - **Everything serializes**: generated markers live inside the module and
//!   survive into later, independent weave passes over dependent modules.

mod codec;
mod defs;
mod instr;
pub mod io;
mod module;
mod position;
mod types;

pub use codec::{CodecBody, CodecKind, CodecSignature, CollectionStrategy, FieldCodec};
pub use defs::{attrs, FieldDef, MethodBody, MethodDef, Param, TypeDef, TypeKind};
pub use instr::{Constant, FieldKey, FieldRef, Instruction, LabelId, MethodRef};
pub use module::ModuleDef;
pub use position::{SequencePoint, SymbolTable};
pub use types::{well_known, Primitive, Qualified, TypeRef, CORE_SCOPE, RUNTIME_SCOPE};
