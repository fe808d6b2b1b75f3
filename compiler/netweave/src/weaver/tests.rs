use super::*;

use netweave_codec::vm::{CodecVm, Value};
use netweave_codec::BaseTypeModel;
use netweave_diagnostic::ErrorCode;
use netweave_ir::{
    attrs, FieldDef, FieldRef, Instruction, MethodDef, MethodRef, Primitive, SequencePoint, TypeDef,
    TypeRef,
};
use pretty_assertions::assert_eq;

const GAME: &str = "Game";

fn game(name: &str) -> TypeRef {
    TypeRef::named(GAME, format!("Game.{name}"))
}

fn vector2() -> TypeDef {
    TypeDef::struct_(GAME, "Vector2")
        .with_field(FieldDef::new("x", Primitive::F32.type_ref()))
        .with_field(FieldDef::new("y", Primitive::F32.type_ref()))
}

fn health() -> FieldRef {
    FieldRef::new(game("Player"), "health", Primitive::I32.type_ref())
}

fn position() -> FieldRef {
    FieldRef::new(game("Player"), "position", game("Vector2"))
}

fn game_module() -> ModuleDef {
    let mut player = TypeDef::class(GAME, "Player")
        .with_base(TypeRef::runtime("Netweave.NetworkBehaviour"))
        .with_field(FieldDef::new("health", Primitive::I32.type_ref()).sync_var())
        .with_field(FieldDef::new("position", game("Vector2")).sync_var())
        .with_method(MethodDef::new("TakeDamage").with_body(vec![
            Instruction::LoadArg(0),
            Instruction::LoadArg(0),
            Instruction::LoadField(health()),
            Instruction::LoadArg(1),
            Instruction::StoreField(health()),
            Instruction::Return,
        ]))
        .with_method(MethodDef::new("Respawn").with_body(vec![
            Instruction::LoadArg(0),
            Instruction::LoadFieldAddress(position()),
            Instruction::InitObj(game("Vector2")),
            Instruction::Return,
        ]));
    player.position = Some(SequencePoint::new("Player.cs", 3, 1));

    ModuleDef::new(GAME)
        .with_type(vector2())
        .with_type(player)
        .with_type(
            TypeDef::struct_(GAME, "SpawnMessage")
                .with_attribute(attrs::NETWORK_MESSAGE)
                .with_field(FieldDef::new("id", Primitive::U32.type_ref()))
                .with_field(FieldDef::new("at", game("Vector2"))),
        )
}

fn weave(module: ModuleDef) -> WeaveOutcome {
    let weaver = Weaver::new(WeaveConfig::default());
    weaver.weave(module, Vec::new(), &BaseTypeModel::default())
}

#[test]
fn weave_generates_codecs_and_rewrites_access() {
    let outcome = weave(game_module());
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    assert!(!outcome.skipped);
    assert_eq!(outcome.stats.writers_generated, 2, "Vector2 and SpawnMessage");
    assert_eq!(outcome.stats.readers_generated, 2);
    assert_eq!(outcome.stats.messages, 1);
    assert_eq!(outcome.stats.sync_fields, 2);
    assert_eq!(outcome.stats.rewrite.rewritten(), 3);

    let module = outcome.module.unwrap();
    let generated = module.find_type("Netweave.GeneratedNetworkCode").unwrap();
    assert!(generated.method("_Write_Game.Vector2").is_some());
    assert!(generated.method("_Read_Game.SpawnMessage").is_some());

    let player = module.find_type("Game.Player").unwrap();
    let setter = MethodRef::new(game("Player"), "set_Networkhealth");
    assert_eq!(
        player.method("TakeDamage").unwrap().instructions(),
        Some(
            [
                Instruction::LoadArg(0),
                Instruction::LoadArg(0),
                Instruction::Call(MethodRef::new(game("Player"), "get_Networkhealth")),
                Instruction::LoadArg(1),
                Instruction::Call(setter),
                Instruction::Return,
            ]
            .as_slice()
        )
    );
    let respawn = player.method("Respawn").unwrap();
    assert_eq!(respawn.locals, vec![game("Vector2")]);
    assert_eq!(
        respawn.instructions().unwrap()[4],
        Instruction::Call(MethodRef::new(game("Player"), "set_Networkposition"))
    );

    // Accessors keep touching the backing field.
    assert_eq!(
        player.method("get_Networkhealth").unwrap().instructions().unwrap()[1],
        Instruction::LoadField(health())
    );
}

#[test]
fn woven_sync_vars_encode_in_declaration_order() {
    let config = WeaveConfig::default();
    let module = weave(game_module()).module.unwrap();
    let vm = CodecVm::new(&config.codec, [&module]);

    let state = Value::object([
        ("health", Value::I32(5)),
        ("position", Value::object([("x", Value::F32(1.0)), ("y", Value::F32(2.0))])),
    ]);
    let serialize = MethodRef::new(game("Player"), "SerializeSyncVars");
    let bytes = vm.encode(&serialize, &state).unwrap();
    assert_eq!(bytes, vec![5, 0, 0, 0, 0, 0, 0x80, 0x3f, 0, 0, 0, 0x40]);

    let deserialize = MethodRef::new(game("Player"), "DeserializeSyncVars");
    assert_eq!(vm.decode(&deserialize, &bytes).unwrap(), state);
}

#[test]
fn second_pass_is_a_no_op() {
    let woven = weave(game_module()).module.unwrap();
    let again = weave(woven.clone());
    assert!(again.skipped);
    assert!(again.diagnostics.is_empty());
    assert_eq!(again.module, Some(woven));
}

#[test]
fn errors_suppress_the_module_and_are_all_reported() {
    let module = ModuleDef::new(GAME)
        .with_type(TypeDef::interface(GAME, "IShape"))
        .with_type(TypeDef::class(GAME, "Shape").abstract_())
        .with_type(
            TypeDef::class(GAME, "DrawMessage")
                .with_attribute(attrs::NETWORK_MESSAGE)
                .with_field(FieldDef::new("shape", game("IShape"))),
        )
        .with_type(
            TypeDef::class(GAME, "FillMessage")
                .with_attribute(attrs::NETWORK_MESSAGE)
                .with_field(FieldDef::new("shape", game("Shape"))),
        );

    let outcome = weave(module);
    assert!(!outcome.succeeded());
    assert!(outcome.module.is_none());
    // Writer and reader for each bad member type.
    assert_eq!(outcome.error_count(), 4);
    assert!(outcome.diagnostics.iter().all(|d| d.code == ErrorCode::E2001));
}

#[test]
fn unrewritable_field_initialization_fails_the_pass() {
    let mut module = game_module();
    if let Some(respawn) = module
        .find_type_mut("Game.Player")
        .and_then(|player| player.method_mut("Respawn"))
    {
        respawn.locals = vec![Primitive::Bool.type_ref(); usize::from(u16::MAX) + 1];
    }

    let outcome = weave(module);
    assert!(outcome.module.is_none());
    assert_eq!(outcome.stats.rewrite.locals_exhausted, 1);
    assert_eq!(outcome.error_count(), 1);
    assert_eq!(outcome.diagnostics[0].code, ErrorCode::E3002);
}

#[test]
fn unreadable_reference_aborts_the_pass() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("Broken.dll");
    std::fs::write(&broken, b"not a module").unwrap();

    let weaver = Weaver::new(WeaveConfig::default());
    let outcome = weaver.weave(
        game_module().with_reference("Broken"),
        vec![broken],
        &BaseTypeModel::default(),
    );
    assert!(outcome.module.is_none());
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].code, ErrorCode::E1002);
}

#[test]
fn weave_file_writes_module_and_symbols() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Game.dll");
    let output = dir.path().join("out").join("Game.dll");
    std::fs::create_dir_all(output.parent().unwrap()).unwrap();
    write_module(&input, &game_module()).unwrap();
    assert!(symbol_path(&input).is_file());

    let weaver = Weaver::new(WeaveConfig::default());
    let outcome = weaver.weave_file(&input, Vec::new(), &output).unwrap();
    assert!(outcome.succeeded());

    let woven = read_module(&output).unwrap();
    assert!(woven.contains_type("Netweave.GeneratedNetworkCode"));
    assert_eq!(
        woven.find_type("Game.Player").unwrap().position,
        Some(SequencePoint::new("Player.cs", 3, 1))
    );

    // Weaving the output again changes nothing on disk.
    let before = std::fs::read(&output).unwrap();
    let again = weaver.weave_file(&output, Vec::new(), &output).unwrap();
    assert!(again.skipped);
    assert_eq!(std::fs::read(&output).unwrap(), before);
}

#[test]
fn missing_input_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let weaver = Weaver::new(WeaveConfig::default());
    let err = weaver
        .weave_file(&dir.path().join("Nope.dll"), Vec::new(), &dir.path().join("out.dll"))
        .unwrap_err();
    assert!(matches!(err, WeaveError::Io { .. }));
}
