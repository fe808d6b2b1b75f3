use netweave_ir::{CodecKind, MethodRef, TypeRef};
use serde::Deserialize;

/// Names of the generated class and of the runtime codec surface.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub generated_namespace: String,
    pub generated_class: String,
    /// Static class holding `Write<T>` and `WriteNetworkBehaviour<T>`.
    pub writer_extensions: String,
    /// Static class holding `Read<T>` and `ReadNetworkBehaviour<T>`.
    pub reader_extensions: String,
    pub writer_type: String,
    pub reader_type: String,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            generated_namespace: "Netweave".to_string(),
            generated_class: "GeneratedNetworkCode".to_string(),
            writer_extensions: "Netweave.Serialization.NetworkWriterExtensions".to_string(),
            reader_extensions: "Netweave.Serialization.NetworkReaderExtensions".to_string(),
            writer_type: "Netweave.Serialization.NetworkWriter".to_string(),
            reader_type: "Netweave.Serialization.NetworkReader".to_string(),
        }
    }
}

impl CodecConfig {
    /// Full name of the class generated codecs are added to.
    pub fn generated_class_name(&self) -> String {
        if self.generated_namespace.is_empty() {
            self.generated_class.clone()
        } else {
            format!("{}.{}", self.generated_namespace, self.generated_class)
        }
    }

    pub fn extensions(&self, kind: CodecKind) -> TypeRef {
        match kind {
            CodecKind::Writer => TypeRef::runtime(self.writer_extensions.as_str()),
            CodecKind::Reader => TypeRef::runtime(self.reader_extensions.as_str()),
        }
    }

    /// The stream a codec of `kind` takes as its first parameter.
    pub fn stream_type(&self, kind: CodecKind) -> TypeRef {
        match kind {
            CodecKind::Writer => TypeRef::runtime(self.writer_type.as_str()),
            CodecKind::Reader => TypeRef::runtime(self.reader_type.as_str()),
        }
    }

    /// `Write<arg>` / `Read<arg>`.
    pub fn generic_function(&self, kind: CodecKind, arg: TypeRef) -> MethodRef {
        MethodRef::new(self.extensions(kind), kind.generic_entry()).instantiate(vec![arg])
    }

    /// `WriteNetworkBehaviour<arg>` / `ReadNetworkBehaviour<arg>`.
    pub fn network_behaviour_function(&self, kind: CodecKind, arg: TypeRef) -> MethodRef {
        MethodRef::new(self.extensions(kind), kind.network_behaviour_entry())
            .instantiate(vec![arg])
    }
}
