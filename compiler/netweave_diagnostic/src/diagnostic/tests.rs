use super::*;
use pretty_assertions::assert_eq;

#[test]
fn builder_collects_context() {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("Cannot generate writer for interface IShape")
        .with_position(Some(SequencePoint::new("Shapes.cs", 12, 5)))
        .with_note("interfaces have no constructible instance")
        .with_suggestion("provide a custom writer");

    assert!(diag.is_error());
    assert_eq!(diag.notes.len(), 1);
    assert_eq!(diag.suggestions.len(), 1);
    assert_eq!(
        diag.to_string(),
        "error[E2001]: Cannot generate writer for interface IShape at Shapes.cs:12:5"
    );
}

#[test]
fn or_position_keeps_existing_position() {
    let first = SequencePoint::new("A.cs", 1, 1);
    let second = SequencePoint::new("B.cs", 2, 2);

    let diag = Diagnostic::warning(ErrorCode::E2003)
        .with_position(Some(first.clone()))
        .or_position(Some(&second));
    assert_eq!(diag.position, Some(first));

    let diag = Diagnostic::warning(ErrorCode::E2003).or_position(Some(&second));
    assert_eq!(diag.position, Some(second));
    assert!(diag.is_warning());
}
