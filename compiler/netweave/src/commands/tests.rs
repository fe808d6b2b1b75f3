use super::inspect::describe_module;
use super::*;

use std::path::PathBuf;

use netweave_ir::{FieldDef, MethodDef, ModuleDef, Primitive, TypeDef};
use pretty_assertions::assert_eq;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn weave_args_accept_references_output_and_flags() {
    let parsed = WeaveArgs::parse(&args(&[
        "Game.dll",
        "-r",
        "lib/Runtime.dll",
        "--reference=lib/Shared.dll",
        "-o",
        "out/Game.dll",
        "--config=weave.json",
        "--json",
    ]))
    .unwrap();

    assert_eq!(
        parsed,
        WeaveArgs {
            input: PathBuf::from("Game.dll"),
            references: vec![PathBuf::from("lib/Runtime.dll"), PathBuf::from("lib/Shared.dll")],
            output: Some(PathBuf::from("out/Game.dll")),
            config: Some(PathBuf::from("weave.json")),
            json: true,
        }
    );
}

#[test]
fn weave_args_reject_bad_input() {
    assert_eq!(WeaveArgs::parse(&[]), Err("missing module path".to_string()));
    assert_eq!(
        WeaveArgs::parse(&args(&["Game.dll", "-r"])),
        Err("missing path after `-r`".to_string())
    );
    assert_eq!(
        WeaveArgs::parse(&args(&["Game.dll", "--fast"])),
        Err("unknown option `--fast`".to_string())
    );
    assert_eq!(
        WeaveArgs::parse(&args(&["Game.dll", "Other.dll"])),
        Err("unexpected argument `Other.dll`".to_string())
    );
}

#[test]
fn describe_lists_types_markers_and_members() {
    let mut player = TypeDef::class("Game", "Player")
        .with_field(FieldDef::new("health", Primitive::I32.type_ref()).sync_var())
        .with_method(MethodDef::new("Tick").with_body(Vec::new()));
    player.set_marker("netweave.writer", true);
    let module = ModuleDef::new("Game")
        .with_reference("Netweave.Runtime")
        .with_type(player);

    assert_eq!(
        describe_module(&module),
        "module Game\n\
         \x20 references Netweave.Runtime\n\
         \x20 class Game.Player [netweave.writer]\n\
         \x20   field health: System.Int32 (sync)\n\
         \x20   method Tick (0 instructions)\n"
    );
}

#[test]
fn weave_command_round_trips_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Game.dll");
    crate::write_module(&input, &ModuleDef::new("Game")).unwrap();

    let code = weave_module(&WeaveArgs {
        input: input.clone(),
        ..WeaveArgs::default()
    });
    assert_eq!(code, 0);
    let woven = crate::read_module(&input).unwrap();
    assert!(woven.contains_type("Netweave.GeneratedNetworkCode"));

    assert_eq!(inspect_module(&dir.path().join("Missing.dll")), 1);
}
