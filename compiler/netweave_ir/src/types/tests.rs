use super::*;
use pretty_assertions::assert_eq;

fn vector2() -> TypeRef {
    TypeRef::named("Game", "Game.Vector2")
}

#[test]
fn display_generic_instance() {
    let ty = TypeRef::list(vector2());
    assert_eq!(ty.to_string(), "System.Collections.Generic.List`1<Game.Vector2>");
}

#[test]
fn qualified_display_names_every_scope() {
    let ty = TypeRef::array(TypeRef::nullable(vector2()));
    assert_eq!(
        ty.qualified().to_string(),
        "[System.Private.CoreLib]System.Nullable`1<[Game]Game.Vector2>[]"
    );
    assert_ne!(
        TypeRef::named("Lib", "Game.Vector2").qualified().to_string(),
        vector2().qualified().to_string()
    );
}

#[test]
fn display_arrays_and_by_ref() {
    assert_eq!(TypeRef::array(vector2()).to_string(), "Game.Vector2[]");
    assert_eq!(
        TypeRef::array_of_rank(vector2(), 3).to_string(),
        "Game.Vector2[,,]"
    );
    assert_eq!(TypeRef::by_ref(vector2()).to_string(), "Game.Vector2&");
}

#[test]
fn structural_equality_ignores_construction_site() {
    let a = TypeRef::generic("Game", "Game.Box`1", vec![Primitive::I32.type_ref()]);
    let b = TypeRef::generic(
        String::from("Game"),
        String::from("Game.Box`1"),
        vec![TypeRef::core("System.Int32")],
    );
    assert_eq!(a, b);

    let c = TypeRef::generic("Other", "Game.Box`1", vec![Primitive::I32.type_ref()]);
    assert_ne!(a, c, "scope is part of identity");
}

#[test]
fn substitute_replaces_matching_parameters() {
    let params = vec!["T".to_string(), "U".to_string()];
    let args = vec![Primitive::I32.type_ref(), vector2()];

    let field_ty = TypeRef::list(TypeRef::array(TypeRef::param("U")));
    assert_eq!(
        field_ty.substitute(&params, &args),
        TypeRef::list(TypeRef::array(vector2()))
    );

    let unknown = TypeRef::param("V");
    assert_eq!(unknown.substitute(&params, &args), unknown);
}

#[test]
fn short_name_strips_namespace_and_arity() {
    assert_eq!(TypeRef::list(vector2()).short_name(), "List");
    assert_eq!(vector2().short_name(), "Vector2");
}

#[test]
fn primitive_round_trips_through_type_ref() {
    for prim in Primitive::ALL {
        assert_eq!(Primitive::from_type(&prim.type_ref()), Some(prim));
    }
    assert_eq!(Primitive::from_type(&vector2()), None);
    assert_eq!(
        Primitive::from_type(&TypeRef::nullable(Primitive::I32.type_ref())),
        None
    );
}

#[test]
fn contains_generic_parameter_walks_arguments() {
    assert!(TypeRef::list(TypeRef::param("T")).contains_generic_parameter());
    assert!(!TypeRef::list(vector2()).contains_generic_parameter());
}
