//! The `inspect` command: summarize a module file.

use std::fmt::Write as _;
use std::path::Path;

use netweave_ir::{MethodBody, ModuleDef, TypeKind};

use crate::read_module;

/// Print a summary of the module at `path`. Returns the exit code.
pub fn inspect_module(path: &Path) -> i32 {
    match read_module(path) {
        Ok(module) => {
            print!("{}", describe_module(&module));
            0
        }
        Err(err) => {
            eprintln!("error: {err}");
            1
        }
    }
}

/// Human-readable listing of types, markers and methods.
pub(crate) fn describe_module(module: &ModuleDef) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "module {}", module.name);
    for reference in &module.references {
        let _ = writeln!(out, "  references {reference}");
    }
    for ty in &module.types {
        let kind = match ty.kind {
            TypeKind::Class if ty.is_abstract => "abstract class",
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Enum { .. } => "enum",
            TypeKind::Interface => "interface",
        };
        let _ = write!(out, "  {kind} {}", ty.full_name());
        let markers: Vec<&str> = ty
            .markers
            .iter()
            .filter(|(_, set)| **set)
            .map(|(label, _)| label.as_str())
            .collect();
        if !markers.is_empty() {
            let _ = write!(out, " [{}]", markers.join(", "));
        }
        let _ = writeln!(out);

        for field in &ty.fields {
            let sync = if field.is_sync_var() { " (sync)" } else { "" };
            let _ = writeln!(out, "    field {}: {}{sync}", field.name, field.ty);
        }
        for method in &ty.methods {
            let body = match &method.body {
                MethodBody::None => "no body".to_string(),
                MethodBody::Il(instructions) => format!("{} instructions", instructions.len()),
                MethodBody::Codec(_) => "codec".to_string(),
            };
            let _ = writeln!(out, "    method {} ({body})", method.name);
        }
    }
    out
}
