use pretty_assertions::assert_eq;
use restbridge_mapper::{FieldListParser, FieldSet, MapperError, StandardFieldListParser};

fn parse(input: &str) -> FieldSet {
    StandardFieldListParser.parse(input).expect("should parse")
}

fn parse_err(input: &str) -> MapperError {
    StandardFieldListParser.parse(input).expect_err("should fail")
}

// ── Parsing ──────────────────────────────────────────────────────

#[test]
fn flat_list() {
    let set = parse("id,name,age");
    assert_eq!(set.len(), 3);
    assert!(set.contains("id"));
    assert!(set.contains("name"));
    assert!(set.contains("age"));
    assert!(set.get("id").unwrap().is_empty());
}

#[test]
fn single_field() {
    let set = parse("id");
    assert_eq!(set.len(), 1);
}

#[test]
fn nested_fields() {
    let set = parse("id,friends.{id,name}");
    let friends = set.get("friends").unwrap();
    assert_eq!(friends.len(), 2);
    assert!(friends.contains("id"));
    assert!(friends.contains("name"));
}

#[test]
fn deeply_nested_fields() {
    let set = parse("a.{b.{c.{d}}}");
    let d = set
        .get("a")
        .and_then(|a| a.get("b"))
        .and_then(|b| b.get("c"))
        .and_then(|c| c.get("d"))
        .unwrap();
    assert!(d.is_empty());
}

#[test]
fn empty_input_is_empty_set() {
    assert!(parse("").is_empty());
}

#[test]
fn duplicate_fields_union_their_subfields() {
    let set = parse("a.{b},a.{c}");
    let a = set.get("a").unwrap();
    assert!(a.contains("b"));
    assert!(a.contains("c"));
}

#[test]
fn duplicate_leaf_then_nested_keeps_nested() {
    let set = parse("a,a.{b}");
    assert!(set.get("a").unwrap().contains("b"));
}

// ── Errors ───────────────────────────────────────────────────────

#[test]
fn empty_field_name_rejected() {
    let err = parse_err("a,,b");
    assert!(matches!(err, MapperError::FieldSyntax { position: 2, .. }));
}

#[test]
fn dot_without_brace_rejected() {
    assert!(matches!(parse_err("a.b"), MapperError::FieldSyntax { .. }));
}

#[test]
fn unclosed_brace_rejected() {
    assert!(matches!(parse_err("a.{b"), MapperError::FieldSyntax { .. }));
}

#[test]
fn stray_closing_brace_rejected() {
    assert!(matches!(parse_err("a}"), MapperError::FieldSyntax { .. }));
}

#[test]
fn leading_comma_rejected() {
    assert!(matches!(parse_err(",a"), MapperError::FieldSyntax { .. }));
}

// ── Rendering ────────────────────────────────────────────────────

#[test]
fn flatify_sorts_fields() {
    let set = FieldSet::new().with("b").with("a").with("c");
    assert_eq!(StandardFieldListParser.flatify(&set), "a,b,c");
}

#[test]
fn flatify_renders_nesting() {
    let set = FieldSet::new()
        .with("id")
        .with_nested("friends", FieldSet::new().with("id").with("name"));
    assert_eq!(
        StandardFieldListParser.flatify(&set),
        "friends.{id,name},id"
    );
}

#[test]
fn parse_flatify_round_trip() {
    let inputs = ["id", "a,b,c", "a.{b,c},d", "a.{b.{c}},d"];
    for input in inputs {
        let set = parse(input);
        let rendered = StandardFieldListParser.flatify(&set);
        assert_eq!(parse(&rendered), set, "round trip for {input:?}");
    }
}

// ── Merge ────────────────────────────────────────────────────────

#[test]
fn merge_unions_recursively() {
    let mut a = parse("x.{a},y");
    a.merge(parse("x.{b},z"));
    assert_eq!(a, parse("x.{a,b},y,z"));
}
