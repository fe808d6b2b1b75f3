//! Type, field and method definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CodecBody, CodecSignature, Instruction, Primitive, SequencePoint, TypeRef};

/// Attribute names the weaver reacts to.
pub mod attrs {
    /// Field whose direct access is replaced by generated accessors.
    pub const SYNC_VAR: &str = "SyncVar";
    /// Field excluded from member-by-member codecs.
    pub const NON_SERIALIZED: &str = "NonSerialized";
    /// Type that always gets a writer and a reader.
    pub const NETWORK_MESSAGE: &str = "NetworkMessage";
}

/// The kind of a type definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Struct,
    Enum { underlying: Primitive },
    Interface,
}

/// A type defined in a module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    pub namespace: String,
    pub name: String,
    pub kind: TypeKind,
    pub is_abstract: bool,
    /// Names of generic parameters, in order.
    pub generic_params: Vec<String>,
    pub base: Option<TypeRef>,
    pub attributes: Vec<String>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
    /// Persisted boolean constants, e.g. generated-codec markers.
    pub markers: BTreeMap<String, bool>,
    #[serde(skip)]
    pub position: Option<SequencePoint>,
}

impl TypeDef {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        TypeDef {
            namespace: namespace.into(),
            name: name.into(),
            kind,
            is_abstract: false,
            generic_params: Vec::new(),
            base: None,
            attributes: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            markers: BTreeMap::new(),
            position: None,
        }
    }

    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, TypeKind::Class)
    }

    pub fn struct_(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, TypeKind::Struct)
    }

    pub fn enum_(
        namespace: impl Into<String>,
        name: impl Into<String>,
        underlying: Primitive,
    ) -> Self {
        Self::new(namespace, name, TypeKind::Enum { underlying })
    }

    pub fn interface(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, TypeKind::Interface)
    }

    #[must_use]
    pub fn with_base(mut self, base: TypeRef) -> Self {
        self.base = Some(base);
        self
    }

    #[must_use]
    pub fn with_generic_params(mut self, params: &[&str]) -> Self {
        self.generic_params = params.iter().map(|p| (*p).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// `Namespace.Name`, or just `Name` in the global namespace.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Reference to this definition from inside `scope`, with its own
    /// generic parameters as arguments.
    pub fn self_ref(&self, scope: &str) -> TypeRef {
        TypeRef::generic(
            scope,
            self.full_name(),
            self.generic_params.iter().map(TypeRef::param).collect(),
        )
    }

    pub fn is_value_type(&self) -> bool {
        matches!(self.kind, TypeKind::Struct | TypeKind::Enum { .. })
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface)
    }

    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }

    pub fn marker(&self, label: &str) -> bool {
        self.markers.get(label).copied().unwrap_or(false)
    }

    pub fn set_marker(&mut self, label: &str, value: bool) {
        self.markers.insert(label.to_string(), value);
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDef> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn method_mut(&mut self, name: &str) -> Option<&mut MethodDef> {
        self.methods.iter_mut().find(|m| m.name == name)
    }

    /// Synchronized fields in declaration order.
    pub fn sync_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.is_sync_var())
    }
}

/// A field defined on a type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
    pub is_static: bool,
    pub is_public: bool,
    pub attributes: Vec<String>,
    #[serde(skip)]
    pub position: Option<SequencePoint>,
}

impl FieldDef {
    /// Public instance field.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        FieldDef {
            name: name.into(),
            ty,
            is_static: false,
            is_public: true,
            attributes: Vec::new(),
            position: None,
        }
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }

    #[must_use]
    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    #[must_use]
    pub fn sync_var(self) -> Self {
        self.with_attribute(attrs::SYNC_VAR)
    }

    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.attributes.iter().any(|a| a == attribute)
    }

    pub fn is_sync_var(&self) -> bool {
        !self.is_static && self.has_attribute(attrs::SYNC_VAR)
    }

    /// Whether a member-by-member codec includes this field.
    pub fn is_serializable(&self) -> bool {
        self.is_public && !self.is_static && !self.has_attribute(attrs::NON_SERIALIZED)
    }
}

/// A method parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: TypeRef,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Param {
            name: name.into(),
            ty,
        }
    }
}

/// What a method executes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodBody {
    /// Abstract, extern, or not yet generated.
    None,
    Il(Vec<Instruction>),
    Codec(CodecBody),
}

/// A method defined on a type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    pub is_static: bool,
    pub is_constructor: bool,
    pub is_abstract: bool,
    pub params: Vec<Param>,
    pub return_type: Option<TypeRef>,
    pub locals: Vec<TypeRef>,
    pub body: MethodBody,
    /// Set when this method is the writer or reader for a type.
    pub codec: Option<CodecSignature>,
    #[serde(skip)]
    pub position: Option<SequencePoint>,
}

impl MethodDef {
    /// Instance method with an empty body.
    pub fn new(name: impl Into<String>) -> Self {
        MethodDef {
            name: name.into(),
            is_static: false,
            is_constructor: false,
            is_abstract: false,
            params: Vec::new(),
            return_type: None,
            locals: Vec::new(),
            body: MethodBody::None,
            codec: None,
            position: None,
        }
    }

    /// Instance constructor (`.ctor`).
    pub fn constructor() -> Self {
        let mut method = Self::new(".ctor");
        method.is_constructor = true;
        method
    }

    /// Static initializer (`.cctor`).
    pub fn static_initializer() -> Self {
        let mut method = Self::new(".cctor");
        method.is_static = true;
        method.is_constructor = true;
        method
    }

    #[must_use]
    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.params.push(Param::new(name, ty));
        self
    }

    #[must_use]
    pub fn returning(mut self, ty: TypeRef) -> Self {
        self.return_type = Some(ty);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Vec<Instruction>) -> Self {
        self.body = MethodBody::Il(body);
        self
    }

    #[must_use]
    pub fn with_codec(mut self, signature: CodecSignature, body: CodecBody) -> Self {
        self.codec = Some(signature);
        self.body = MethodBody::Codec(body);
        self
    }

    /// Append a local variable and return its index.
    ///
    /// Returns `None`, leaving the method unchanged, once every `u16`
    /// index is taken.
    pub fn add_local(&mut self, ty: TypeRef) -> Option<u16> {
        let index = u16::try_from(self.locals.len()).ok()?;
        self.locals.push(ty);
        Some(index)
    }

    pub fn instructions(&self) -> Option<&[Instruction]> {
        match &self.body {
            MethodBody::Il(body) => Some(body),
            _ => None,
        }
    }

    pub fn instructions_mut(&mut self) -> Option<&mut Vec<Instruction>> {
        match &mut self.body {
            MethodBody::Il(body) => Some(body),
            _ => None,
        }
    }
}
