//! Per-pass mapping from type to codec function.

use netweave_ir::{MethodRef, TypeRef};
use rustc_hash::FxHashMap;

/// Type reference to function reference, for one codec kind in one pass.
///
/// Keys are structural, so two separately built references to
/// `List<Vector2>` find the same entry.
#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry {
    functions: FxHashMap<TypeRef, MethodRef>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ty: &TypeRef) -> Option<&MethodRef> {
        self.functions.get(ty)
    }

    pub fn contains(&self, ty: &TypeRef) -> bool {
        self.functions.contains_key(ty)
    }

    /// Insert or overwrite, returning the previous function.
    pub fn insert(&mut self, ty: TypeRef, function: MethodRef) -> Option<MethodRef> {
        self.functions.insert(ty, function)
    }

    pub fn remove(&mut self, ty: &TypeRef) -> Option<MethodRef> {
        self.functions.remove(ty)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeRef, &MethodRef)> {
        self.functions.iter()
    }
}
