//! Type classification.
//!
//! Each type reference is described once per pass as a [`TypeDescription`]
//! and the synthesizer matches on the description. The order of checks in
//! [`WeaveContext::describe`] is the precedence of the generation rules.

use netweave_ir::{well_known, Primitive, TypeKind, TypeRef};
use netweave_resolve::AssemblyLoadError;
use serde::Deserialize;

use crate::WeaveContext;

/// What a type is, as far as codec generation cares.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeDescription {
    GenericParameter,
    ByReference,
    Array { element: TypeRef, rank: u32 },
    Nullable { inner: TypeRef },
    Segment { element: TypeRef },
    List { element: TypeRef },
    /// No definition could be located.
    Unresolved,
    Enum { underlying: Primitive },
    /// Serialized as a handle to a live networked object.
    NetworkedReference,
    EngineOwned,
    /// Definition has generic parameters but the reference does not close them.
    OpenGeneric,
    Interface,
    Abstract,
    UserDefined { value_type: bool },
}

/// Tells the synthesizer which types are networked objects and which are
/// owned by the engine. Supplied by the host.
pub trait NetworkModel {
    /// Serialize `ty` by reference to a networked object rather than by content.
    fn is_networked_behaviour(&self, ty: &TypeRef, bases: &[TypeRef]) -> bool;

    /// `ty` is an engine component, object or asset type.
    fn is_engine_owned(&self, ty: &TypeRef, bases: &[TypeRef]) -> bool;
}

/// Classifies by comparing base type names against fixed lists.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BaseTypeModel {
    /// Types deriving from any of these are networked behaviours.
    pub networked_bases: Vec<String>,
    /// Types equal to or deriving from any of these are engine-owned.
    pub engine_bases: Vec<String>,
}

impl Default for BaseTypeModel {
    fn default() -> Self {
        BaseTypeModel {
            networked_bases: vec!["Netweave.NetworkBehaviour".to_string()],
            engine_bases: vec![
                "UnityEngine.Object".to_string(),
                "UnityEngine.Component".to_string(),
                "UnityEngine.ScriptableObject".to_string(),
            ],
        }
    }
}

fn named_in(ty: &TypeRef, names: &[String]) -> bool {
    ty.definition_name()
        .is_some_and(|name| names.iter().any(|n| n == name))
}

impl NetworkModel for BaseTypeModel {
    fn is_networked_behaviour(&self, _ty: &TypeRef, bases: &[TypeRef]) -> bool {
        bases.iter().any(|base| named_in(base, &self.networked_bases))
    }

    fn is_engine_owned(&self, ty: &TypeRef, bases: &[TypeRef]) -> bool {
        named_in(ty, &self.engine_bases) || bases.iter().any(|base| named_in(base, &self.engine_bases))
    }
}

impl WeaveContext<'_> {
    /// Describe `ty`, memoized for the rest of the pass.
    pub fn describe(&mut self, ty: &TypeRef) -> Result<TypeDescription, AssemblyLoadError> {
        if let Some(known) = self.descriptions.get(ty) {
            return Ok(known.clone());
        }
        let description = self.classify(ty)?;
        self.descriptions.insert(ty.clone(), description.clone());
        Ok(description)
    }

    fn classify(&self, ty: &TypeRef) -> Result<TypeDescription, AssemblyLoadError> {
        match ty {
            TypeRef::GenericParam(_) => return Ok(TypeDescription::GenericParameter),
            TypeRef::ByRef(_) => return Ok(TypeDescription::ByReference),
            TypeRef::Array { element, rank } => {
                return Ok(TypeDescription::Array {
                    element: (**element).clone(),
                    rank: *rank,
                })
            }
            TypeRef::Named { .. } => {}
        }

        for collection in [well_known::NULLABLE, well_known::ARRAY_SEGMENT, well_known::LIST] {
            if !ty.is_core(collection) {
                continue;
            }
            let [element] = ty.args() else {
                return Ok(TypeDescription::OpenGeneric);
            };
            let element = element.clone();
            return Ok(match collection {
                well_known::NULLABLE => TypeDescription::Nullable { inner: element },
                well_known::ARRAY_SEGMENT => TypeDescription::Segment { element },
                _ => TypeDescription::List { element },
            });
        }

        let shape = self.with_type_def(ty, |def, _| {
            (def.kind, def.is_abstract, !def.generic_params.is_empty())
        })?;
        let Some((kind, is_abstract, has_generic_params)) = shape else {
            return Ok(TypeDescription::Unresolved);
        };

        if let TypeKind::Enum { underlying } = kind {
            return Ok(TypeDescription::Enum { underlying });
        }

        let bases = self.base_chain(ty)?;
        if self.model.is_networked_behaviour(ty, &bases) {
            return Ok(TypeDescription::NetworkedReference);
        }
        if self.model.is_engine_owned(ty, &bases) {
            return Ok(TypeDescription::EngineOwned);
        }
        if has_generic_params && !ty.is_generic_instance() {
            return Ok(TypeDescription::OpenGeneric);
        }

        Ok(match kind {
            TypeKind::Interface => TypeDescription::Interface,
            _ if is_abstract => TypeDescription::Abstract,
            TypeKind::Struct => TypeDescription::UserDefined { value_type: true },
            _ => TypeDescription::UserDefined { value_type: false },
        })
    }
}
