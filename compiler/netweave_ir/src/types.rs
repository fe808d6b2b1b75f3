//! Structural type references.
//!
//! A [`TypeRef`] names a type without resolving it. Equality is structural:
//! declaring scope, full name and generic arguments. Resolution to a
//! [`TypeDef`](crate::TypeDef) happens later through the reference resolver.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scope of the core library owning primitives and well-known generics.
pub const CORE_SCOPE: &str = "System.Private.CoreLib";

/// Scope of the networking runtime providing the generic codec entry points.
pub const RUNTIME_SCOPE: &str = "Netweave.Runtime";

/// Full names of core types the synthesizer treats specially.
pub mod well_known {
    pub const NULLABLE: &str = "System.Nullable`1";
    pub const ARRAY_SEGMENT: &str = "System.ArraySegment`1";
    pub const LIST: &str = "System.Collections.Generic.List`1";
    pub const OBJECT: &str = "System.Object";
    pub const VALUE_TYPE: &str = "System.ValueType";
}

/// Reference to a type, possibly generic, possibly unresolved.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TypeRef {
    /// A named type. Non-empty `args` make this a closed generic instance.
    Named {
        scope: String,
        name: String,
        args: Vec<TypeRef>,
    },
    /// `element[]` (rank 1) or `element[,]` (rank 2) and so on.
    Array { element: Box<TypeRef>, rank: u32 },
    /// A managed pointer to a value (`ref T`).
    ByRef(Box<TypeRef>),
    /// An unbound generic parameter such as `T`.
    GenericParam(String),
}

impl TypeRef {
    /// Non-generic named type.
    pub fn named(scope: impl Into<String>, name: impl Into<String>) -> Self {
        TypeRef::Named {
            scope: scope.into(),
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Generic instance `name<args...>`.
    pub fn generic(scope: impl Into<String>, name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Named {
            scope: scope.into(),
            name: name.into(),
            args,
        }
    }

    /// A type from the core library.
    pub fn core(name: impl Into<String>) -> Self {
        Self::named(CORE_SCOPE, name)
    }

    /// A type from the networking runtime.
    pub fn runtime(name: impl Into<String>) -> Self {
        Self::named(RUNTIME_SCOPE, name)
    }

    /// Single-dimension array of `element`.
    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array {
            element: Box::new(element),
            rank: 1,
        }
    }

    /// Array of `element` with an explicit rank.
    pub fn array_of_rank(element: TypeRef, rank: u32) -> Self {
        TypeRef::Array {
            element: Box::new(element),
            rank,
        }
    }

    /// `ref inner`.
    pub fn by_ref(inner: TypeRef) -> Self {
        TypeRef::ByRef(Box::new(inner))
    }

    /// Unbound generic parameter.
    pub fn param(name: impl Into<String>) -> Self {
        TypeRef::GenericParam(name.into())
    }

    /// `System.Nullable<inner>`.
    pub fn nullable(inner: TypeRef) -> Self {
        Self::generic(CORE_SCOPE, well_known::NULLABLE, vec![inner])
    }

    /// `System.Collections.Generic.List<element>`.
    pub fn list(element: TypeRef) -> Self {
        Self::generic(CORE_SCOPE, well_known::LIST, vec![element])
    }

    /// `System.ArraySegment<element>`.
    pub fn segment(element: TypeRef) -> Self {
        Self::generic(CORE_SCOPE, well_known::ARRAY_SEGMENT, vec![element])
    }

    /// Scope (module name) declaring a named type.
    pub fn scope(&self) -> Option<&str> {
        match self {
            TypeRef::Named { scope, .. } => Some(scope),
            _ => None,
        }
    }

    /// Full name of the definition behind a named type, ignoring arguments.
    pub fn definition_name(&self) -> Option<&str> {
        match self {
            TypeRef::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Generic arguments of a named type (empty otherwise).
    pub fn args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Named { args, .. } => args,
            _ => &[],
        }
    }

    /// True for a closed or partially-closed generic instance.
    pub fn is_generic_instance(&self) -> bool {
        !self.args().is_empty()
    }

    pub fn is_generic_parameter(&self) -> bool {
        matches!(self, TypeRef::GenericParam(_))
    }

    /// True when this names `name` in the core library.
    pub fn is_core(&self, name: &str) -> bool {
        matches!(self, TypeRef::Named { scope, name: n, .. } if scope == CORE_SCOPE && n == name)
    }

    /// True when any generic parameter appears anywhere inside this reference.
    pub fn contains_generic_parameter(&self) -> bool {
        match self {
            TypeRef::GenericParam(_) => true,
            TypeRef::Named { args, .. } => args.iter().any(TypeRef::contains_generic_parameter),
            TypeRef::Array { element, .. } => element.contains_generic_parameter(),
            TypeRef::ByRef(inner) => inner.contains_generic_parameter(),
        }
    }

    /// Replace generic parameters named in `params` with the matching `args`.
    ///
    /// Parameters without a matching argument are left untouched.
    #[must_use]
    pub fn substitute(&self, params: &[String], args: &[TypeRef]) -> TypeRef {
        match self {
            TypeRef::GenericParam(name) => params
                .iter()
                .position(|p| p == name)
                .and_then(|idx| args.get(idx))
                .cloned()
                .unwrap_or_else(|| self.clone()),
            TypeRef::Named { scope, name, args: inner } => TypeRef::Named {
                scope: scope.clone(),
                name: name.clone(),
                args: inner.iter().map(|a| a.substitute(params, args)).collect(),
            },
            TypeRef::Array { element, rank } => TypeRef::Array {
                element: Box::new(element.substitute(params, args)),
                rank: *rank,
            },
            TypeRef::ByRef(inner) => TypeRef::ByRef(Box::new(inner.substitute(params, args))),
        }
    }

    /// Last segment of the name, without namespace or arity suffix.
    pub fn short_name(&self) -> String {
        match self {
            TypeRef::Named { name, .. } => {
                let last = name.rsplit('.').next().unwrap_or(name);
                last.split('`').next().unwrap_or(last).to_string()
            }
            other => other.to_string(),
        }
    }
}

/// [`TypeRef`] rendered with the declaring scope of every named type,
/// e.g. `[Game]Game.Data` or `[System.Private.CoreLib]System.Nullable`1<[Game]Game.Data>`.
pub struct Qualified<'a>(&'a TypeRef);

impl TypeRef {
    /// Display form that tells apart same-named types of different modules.
    pub fn qualified(&self) -> Qualified<'_> {
        Qualified(self)
    }
}

impl fmt::Display for Qualified<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            TypeRef::Named { scope, name, args } => {
                write!(f, "[{scope}]{name}")?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{}", arg.qualified())?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeRef::Array { element, rank } => {
                let commas = ",".repeat(rank.saturating_sub(1) as usize);
                write!(f, "{}[{commas}]", element.qualified())
            }
            TypeRef::ByRef(inner) => write!(f, "{}&", inner.qualified()),
            TypeRef::GenericParam(name) => write!(f, "{name}"),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named { name, args, .. } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeRef::Array { element, rank } => {
                let commas = ",".repeat(rank.saturating_sub(1) as usize);
                write!(f, "{element}[{commas}]")
            }
            TypeRef::ByRef(inner) => write!(f, "{inner}&"),
            TypeRef::GenericParam(name) => write!(f, "{name}"),
        }
    }
}

/// Primitive types with built-in codecs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Primitive {
    Bool,
    U8,
    I8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    String,
}

impl Primitive {
    pub const ALL: [Primitive; 12] = [
        Primitive::Bool,
        Primitive::U8,
        Primitive::I8,
        Primitive::I16,
        Primitive::U16,
        Primitive::I32,
        Primitive::U32,
        Primitive::I64,
        Primitive::U64,
        Primitive::F32,
        Primitive::F64,
        Primitive::String,
    ];

    /// Full name of the core type.
    pub const fn core_name(self) -> &'static str {
        match self {
            Primitive::Bool => "System.Boolean",
            Primitive::U8 => "System.Byte",
            Primitive::I8 => "System.SByte",
            Primitive::I16 => "System.Int16",
            Primitive::U16 => "System.UInt16",
            Primitive::I32 => "System.Int32",
            Primitive::U32 => "System.UInt32",
            Primitive::I64 => "System.Int64",
            Primitive::U64 => "System.UInt64",
            Primitive::F32 => "System.Single",
            Primitive::F64 => "System.Double",
            Primitive::String => "System.String",
        }
    }

    pub fn type_ref(self) -> TypeRef {
        TypeRef::core(self.core_name())
    }

    /// Recognise a reference to a primitive core type.
    pub fn from_type(ty: &TypeRef) -> Option<Primitive> {
        match ty {
            TypeRef::Named { scope, name, args } if scope == CORE_SCOPE && args.is_empty() => {
                Primitive::ALL.into_iter().find(|p| p.core_name() == name)
            }
            _ => None,
        }
    }

    /// Encoded width in bytes; `None` for variable-length strings.
    pub const fn width(self) -> Option<usize> {
        match self {
            Primitive::Bool | Primitive::U8 | Primitive::I8 => Some(1),
            Primitive::I16 | Primitive::U16 => Some(2),
            Primitive::I32 | Primitive::U32 | Primitive::F32 => Some(4),
            Primitive::I64 | Primitive::U64 | Primitive::F64 => Some(8),
            Primitive::String => None,
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            Primitive::I8 | Primitive::I16 | Primitive::I32 | Primitive::I64
        )
    }

    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            Primitive::U8 | Primitive::U16 | Primitive::U32 | Primitive::U64
        )
    }

    pub const fn is_float(self) -> bool {
        matches!(self, Primitive::F32 | Primitive::F64)
    }
}

#[cfg(test)]
mod tests;
