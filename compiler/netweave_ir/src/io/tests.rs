use super::*;
use crate::{FieldDef, Primitive, SequencePoint, TypeDef};
use pretty_assertions::assert_eq;

fn sample_module() -> ModuleDef {
    let mut player = TypeDef::class("Game", "Player")
        .with_field(FieldDef::new("health", Primitive::I32.type_ref()).sync_var());
    player.position = Some(SequencePoint::new("Player.cs", 3, 5));
    player.fields[0].position = Some(SequencePoint::new("Player.cs", 5, 9));
    player.set_marker("__netweave_writer_generated", true);
    ModuleDef::new("Game").with_reference("Netweave.Runtime").with_type(player)
}

#[test]
fn header_is_checked() {
    assert!(matches!(
        decode_module(b"NW", None),
        Err(ModuleFormatError::Truncated)
    ));
    assert!(matches!(
        decode_module(b"ABCD\x01\x00", None),
        Err(ModuleFormatError::BadMagic)
    ));
    assert!(matches!(
        decode_module(b"NWMD\x09\x00", None),
        Err(ModuleFormatError::UnsupportedVersion { found: 9, .. })
    ));
}

#[test]
fn markers_persist_but_positions_travel_in_symbols() {
    let module = sample_module();
    let bytes = encode_module(&module).unwrap();

    let without_symbols = decode_module(&bytes, None).unwrap();
    let player = without_symbols.find_type("Game.Player").unwrap();
    assert!(player.marker("__netweave_writer_generated"));
    assert_eq!(player.position, None);

    let symbols = encode_symbols(&module).unwrap().unwrap();
    let with_symbols = decode_module(&bytes, Some(&symbols)).unwrap();
    assert_eq!(with_symbols, module);
}

#[test]
fn module_without_positions_has_no_symbol_file() {
    let module = ModuleDef::new("Empty");
    assert_eq!(encode_symbols(&module).unwrap(), None);
}

#[test]
fn symbol_path_appends_pdb() {
    assert_eq!(
        symbol_path(Path::new("/lib/Game.dll")),
        PathBuf::from("/lib/Game.dll.pdb")
    );
}
