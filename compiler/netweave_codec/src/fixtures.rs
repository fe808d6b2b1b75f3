//! Shared test fixtures: a small game module and a pass harness.

use std::path::PathBuf;

use netweave_ir::{FieldDef, ModuleDef, Primitive, TypeDef, TypeRef};
use netweave_resolve::{AssemblyResolver, ResolverConfig};

use crate::{BaseTypeModel, CodecConfig, WeaveContext};

pub const GAME: &str = "Game";

pub fn game(name: &str) -> TypeRef {
    TypeRef::named(GAME, format!("Game.{name}"))
}

pub fn prim(primitive: Primitive) -> TypeRef {
    primitive.type_ref()
}

pub fn vector2() -> TypeDef {
    TypeDef::struct_(GAME, "Vector2")
        .with_field(FieldDef::new("x", prim(Primitive::F32)))
        .with_field(FieldDef::new("y", prim(Primitive::F32)))
}

pub fn network_behaviour() -> TypeRef {
    TypeRef::runtime("Netweave.NetworkBehaviour")
}

/// Owns everything a [`WeaveContext`] borrows.
pub struct Pass {
    pub module: ModuleDef,
    pub resolver: AssemblyResolver,
    pub model: BaseTypeModel,
    pub config: CodecConfig,
}

impl Pass {
    pub fn new(module: ModuleDef) -> Self {
        Self::with_references(module, Vec::new())
    }

    pub fn with_references(module: ModuleDef, references: Vec<PathBuf>) -> Self {
        let resolver = AssemblyResolver::new(
            module.name.clone(),
            references,
            ResolverConfig {
                retry_count: 0,
                retry_wait_ms: 0,
            },
        );
        Pass {
            module,
            resolver,
            model: BaseTypeModel::default(),
            config: CodecConfig::default(),
        }
    }

    pub fn cx(&mut self) -> WeaveContext<'_> {
        WeaveContext::new(&mut self.module, &self.resolver, &self.model, &self.config)
    }
}
