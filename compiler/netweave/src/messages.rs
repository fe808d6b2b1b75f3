//! Message types: every type carrying `NetworkMessage` gets a writer and a reader.
//!
//! Messages are referenced without generic arguments, so a generic message
//! definition is reported as unsupported rather than generated open.

use netweave_codec::{CodecSynthesizer, WeaveContext};
use netweave_ir::{attrs, SequencePoint, TypeRef};
use netweave_resolve::AssemblyLoadError;

/// Generate codecs for the module's message types. Returns how many were requested.
#[tracing::instrument(level = "debug", skip_all)]
pub(crate) fn generate_message_codecs(
    cx: &mut WeaveContext<'_>,
    writers: &mut CodecSynthesizer,
    readers: &mut CodecSynthesizer,
) -> Result<usize, AssemblyLoadError> {
    let scope = cx.module.name.clone();
    let messages: Vec<(TypeRef, Option<SequencePoint>)> = cx
        .module
        .types
        .iter()
        .filter(|def| def.has_attribute(attrs::NETWORK_MESSAGE))
        .map(|def| (TypeRef::named(scope.as_str(), def.full_name()), def.position.clone()))
        .collect();

    for (ty, position) in &messages {
        writers.try_get_function(cx, ty, position.as_ref())?;
        readers.try_get_function(cx, ty, position.as_ref())?;
    }
    tracing::debug!(count = messages.len(), "message codecs requested");
    Ok(messages.len())
}
