//! The rewrite pass over method bodies.

use std::ops::AddAssign;

use netweave_ir::{FieldKey, FieldRef, Instruction, MethodBody, MethodDef, MethodRef, ModuleDef};
use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};

use crate::RewriteConfig;

/// Accessors generated for synchronized fields, keyed by field.
#[derive(Clone, Debug, Default)]
pub struct AccessorMaps {
    pub setters: FxHashMap<FieldKey, MethodRef>,
    pub getters: FxHashMap<FieldKey, MethodRef>,
}

impl AccessorMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.setters.is_empty() && self.getters.is_empty()
    }

    fn setter(&self, field: &FieldRef) -> Option<&MethodRef> {
        self.setters.get(&FieldKey::of(field)?)
    }

    fn getter(&self, field: &FieldRef) -> Option<&MethodRef> {
        self.getters.get(&FieldKey::of(field)?)
    }
}

/// Counts of what one rewrite changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RewriteStats {
    pub methods_scanned: usize,
    pub stores: usize,
    pub loads: usize,
    pub address_inits: usize,
    /// Covered address-load/`InitObj` pairs left as is because the method
    /// has no local index to spare.
    pub locals_exhausted: usize,
}

impl RewriteStats {
    /// Number of rewritten access sites.
    pub fn rewritten(&self) -> usize {
        self.stores + self.loads + self.address_inits
    }
}

impl AddAssign for RewriteStats {
    fn add_assign(&mut self, other: Self) {
        self.methods_scanned += other.methods_scanned;
        self.stores += other.stores;
        self.loads += other.loads;
        self.address_inits += other.address_inits;
        self.locals_exhausted += other.locals_exhausted;
    }
}

/// Replaces covered field accesses with accessor calls.
pub struct AccessRewriter<'a> {
    maps: &'a AccessorMaps,
    config: &'a RewriteConfig,
}

impl<'a> AccessRewriter<'a> {
    pub fn new(maps: &'a AccessorMaps, config: &'a RewriteConfig) -> Self {
        AccessRewriter { maps, config }
    }

    /// Rewrite every eligible method of every type in `module`.
    #[tracing::instrument(level = "debug", skip_all, fields(module = %module.name))]
    pub fn rewrite_module(&self, module: &mut ModuleDef) -> RewriteStats {
        let mut stats = RewriteStats::default();
        if self.maps.is_empty() {
            return stats;
        }
        for ty in &mut module.types {
            for method in &mut ty.methods {
                stats += self.rewrite_method(method);
            }
        }
        tracing::debug!(
            methods = stats.methods_scanned,
            stores = stats.stores,
            loads = stats.loads,
            address_inits = stats.address_inits,
            "access rewrite complete"
        );
        stats
    }

    /// Rewrite one method body in place.
    ///
    /// Methods without an instruction body and methods matched by the skip
    /// list are not scanned.
    pub fn rewrite_method(&self, method: &mut MethodDef) -> RewriteStats {
        let mut stats = RewriteStats::default();
        if self.config.skips(method) {
            return stats;
        }
        let original = match &mut method.body {
            MethodBody::Il(body) => std::mem::take(body),
            MethodBody::None | MethodBody::Codec(_) => return stats,
        };
        stats.methods_scanned = 1;

        let mut rewritten = Vec::with_capacity(original.len());
        let mut instructions = original.into_iter().peekable();

        while let Some(instruction) = instructions.next() {
            match instruction {
                Instruction::StoreField(field) => match self.maps.setter(&field) {
                    Some(setter) => {
                        rewritten.push(call_accessor(setter, &field));
                        stats.stores += 1;
                    }
                    None => rewritten.push(Instruction::StoreField(field)),
                },
                Instruction::LoadField(field) => match self.maps.getter(&field) {
                    Some(getter) => {
                        rewritten.push(call_accessor(getter, &field));
                        stats.loads += 1;
                    }
                    None => rewritten.push(Instruction::LoadField(field)),
                },
                Instruction::LoadFieldAddress(field) => {
                    let setter = self.maps.setter(&field);
                    let followed_by_init = matches!(instructions.peek(), Some(Instruction::InitObj(_)));
                    match setter {
                        Some(setter) if followed_by_init => match method.add_local(field.ty.clone()) {
                            Some(temporary) => {
                                instructions.next();
                                rewritten.extend(default_through_setter(temporary, setter, &field));
                                stats.address_inits += 1;
                            }
                            None => {
                                tracing::warn!(method = %method.name, field = %field, "no local left for field initialization");
                                stats.locals_exhausted += 1;
                                rewritten.push(Instruction::LoadFieldAddress(field));
                            }
                        },
                        // The address escapes somewhere we cannot follow.
                        _ => rewritten.push(Instruction::LoadFieldAddress(field)),
                    }
                }
                other => rewritten.push(other),
            }
        }

        method.body = MethodBody::Il(rewritten);
        if stats.rewritten() > 0 {
            tracing::trace!(method = %method.name, sites = stats.rewritten(), "rewrote field access");
        }
        stats
    }
}

/// Call `accessor` for an access through `field`.
///
/// Accesses through a generic instance call the accessor on that instance.
fn call_accessor(accessor: &MethodRef, field: &FieldRef) -> Instruction {
    if field.declaring.is_generic_instance() {
        Instruction::CallVirt(accessor.clone().on_host(field.declaring.clone()))
    } else {
        Instruction::Call(accessor.clone())
    }
}

/// `field = default(T)` as `setter(default(T))` through a fresh local.
fn default_through_setter(
    temporary: u16,
    setter: &MethodRef,
    field: &FieldRef,
) -> SmallVec<[Instruction; 4]> {
    smallvec![
        Instruction::LoadLocalAddress(temporary),
        Instruction::InitObj(field.ty.clone()),
        Instruction::LoadLocal(temporary),
        call_accessor(setter, field),
    ]
}
