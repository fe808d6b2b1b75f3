use super::*;
use std::fs::File;
use std::time::Duration;

use netweave_ir::io::encode_module;
use netweave_ir::{SequencePoint, TypeDef};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn fast() -> ResolverConfig {
    ResolverConfig {
        retry_count: 0,
        retry_wait_ms: 0,
    }
}

fn write_module(path: &Path, module: &ModuleDef) {
    fs::write(path, encode_module(module).unwrap()).unwrap();
}

fn external(resolved: Option<Resolved>) -> Arc<ModuleDef> {
    match resolved {
        Some(Resolved::External(module)) => module,
        other => panic!("expected an external module, got {other:?}"),
    }
}

#[test]
fn self_name_resolves_to_current() {
    let resolver = AssemblyResolver::new("Game", Vec::new(), fast());
    assert!(matches!(
        resolver.resolve("Game").unwrap(),
        Some(Resolved::Current)
    ));
    assert_eq!(resolver.cached_count(), 0);
}

#[test]
fn missing_reference_is_absent_not_an_error() {
    let dir = tempdir().unwrap();
    let resolver = AssemblyResolver::new("Game", vec![dir.path().join("Other.dll")], fast());
    assert!(resolver.resolve("Nowhere").unwrap().is_none());
}

#[test]
fn unchanged_file_returns_the_cached_instance() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Shared.dll");
    write_module(
        &path,
        &ModuleDef::new("Shared").with_type(TypeDef::struct_("Shared", "Vector2")),
    );

    let resolver = AssemblyResolver::new("Game", vec![path], fast());
    let first = external(resolver.resolve("Shared").unwrap());
    let second = external(resolver.resolve("Shared").unwrap());

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(resolver.cached_count(), 1);
    assert!(first.contains_type("Shared.Vector2"));
}

#[test]
fn modified_file_is_read_again() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Shared.dll");
    write_module(&path, &ModuleDef::new("Shared"));

    let resolver = AssemblyResolver::new("Game", vec![path.clone()], fast());
    let before = external(resolver.resolve("Shared").unwrap());

    write_module(
        &path,
        &ModuleDef::new("Shared").with_type(TypeDef::class("Shared", "Added")),
    );
    let later = SystemTime::now() + Duration::from_secs(120);
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(later)
        .unwrap();

    let after = external(resolver.resolve("Shared").unwrap());
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(after.contains_type("Shared.Added"));
    assert_eq!(resolver.cached_count(), 2);
}

#[test]
fn exe_references_match_by_file_name() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Tool.exe");
    write_module(&path, &ModuleDef::new("Tool"));

    let resolver = AssemblyResolver::new("Game", vec![path], fast());
    assert_eq!(external(resolver.resolve("Tool").unwrap()).name, "Tool");
}

#[test]
fn transitive_reference_found_next_to_direct_ones() {
    let dir = tempdir().unwrap();
    let direct = dir.path().join("Direct.dll");
    write_module(&direct, &ModuleDef::new("Direct").with_reference("Indirect"));
    write_module(&dir.path().join("Indirect.dll"), &ModuleDef::new("Indirect"));

    let resolver = AssemblyResolver::new("Game", vec![direct], fast());
    let indirect = external(resolver.resolve("Indirect").unwrap());
    assert_eq!(indirect.name, "Indirect");
}

#[test]
fn companion_symbols_are_applied() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Shared.dll");
    let mut ty = TypeDef::struct_("Shared", "Vector2");
    ty.position = Some(SequencePoint::new("Vector2.cs", 3, 5));
    let module = ModuleDef::new("Shared").with_type(ty);
    write_module(&path, &module);
    let symbols = netweave_ir::io::encode_symbols(&module).unwrap().unwrap();
    fs::write(symbol_path(&path), symbols).unwrap();

    let resolver = AssemblyResolver::new("Game", vec![path], fast());
    let loaded = external(resolver.resolve("Shared").unwrap());
    assert_eq!(
        loaded.find_type("Shared.Vector2").unwrap().position,
        Some(SequencePoint::new("Vector2.cs", 3, 5))
    );
}

#[test]
fn malformed_module_is_a_format_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Broken.dll");
    fs::write(&path, b"MZ not a module").unwrap();

    let resolver = AssemblyResolver::new("Game", vec![path], fast());
    let err = resolver.resolve("Broken").unwrap_err();
    assert!(matches!(err, AssemblyLoadError::Format { .. }));
    assert_eq!(
        err.to_diagnostic().code,
        netweave_diagnostic::ErrorCode::E1002
    );
}

#[test]
fn unreadable_module_fails_after_retries() {
    let dir = tempdir().unwrap();
    // A directory named like a module: found by name, never readable.
    let path = dir.path().join("Locked.dll");
    fs::create_dir(&path).unwrap();

    let config = ResolverConfig {
        retry_count: 2,
        retry_wait_ms: 1,
    };
    let resolver = AssemblyResolver::new("Game", vec![path], config);
    let err = resolver.resolve("Locked").unwrap_err();
    assert!(matches!(err, AssemblyLoadError::Io { .. }));
    assert_eq!(resolver.cached_count(), 0);
}

#[test]
fn concurrent_callers_share_one_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Shared.dll");
    write_module(&path, &ModuleDef::new("Shared"));
    let resolver = AssemblyResolver::new("Game", vec![path], fast());

    let loaded: Vec<Arc<ModuleDef>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| external(resolver.resolve("Shared").unwrap())))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(loaded.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(resolver.cached_count(), 1);
}

#[test]
fn config_defaults_match_build_contention_policy() {
    let config = ResolverConfig::default();
    assert_eq!(config.retry_count, 10);
    assert_eq!(config.retry_wait(), Duration::from_secs(1));
}
