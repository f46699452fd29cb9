use sorrel_core::ast::Value;
use sorrel_core::reader::parse;

#[test]
fn read_atoms() {
    assert_eq!(parse("42").unwrap(), Value::Int(42));
    assert_eq!(parse("-7").unwrap(), Value::Int(-7));
    assert_eq!(parse("+7").unwrap(), Value::Int(7));
    assert_eq!(parse("2.5").unwrap(), Value::Float(2.5));
    assert_eq!(parse("-0.25").unwrap(), Value::Float(-0.25));
    assert_eq!(parse("nil").unwrap(), Value::Nil);
    assert_eq!(parse("true").unwrap(), Value::Bool(true));
    assert_eq!(parse("false").unwrap(), Value::Bool(false));
    assert_eq!(parse(":port").unwrap(), Value::keyword("port"));
    assert_eq!(parse("hello").unwrap(), Value::symbol("hello"));
    assert_eq!(parse("odd?").unwrap(), Value::symbol("odd?"));
    assert_eq!(parse("\"text\"").unwrap(), Value::string("text"));
}

#[test]
fn read_character_literals() {
    assert_eq!(parse("\\space").unwrap(), Value::Char(' '));
    assert_eq!(parse("\\newline").unwrap(), Value::Char('\n'));
    assert_eq!(parse("\\tab").unwrap(), Value::Char('\t'));
    assert_eq!(parse("\\a").unwrap(), Value::Char('a'));
    assert_eq!(parse("\\n").unwrap(), Value::Char('n'));
    assert_eq!(parse("\\@").unwrap(), Value::Char('@'));
}

#[test]
fn read_string_escapes() {
    assert_eq!(parse("\"a\\nb\"").unwrap(), Value::string("a\nb"));
    assert_eq!(parse("\"a\\\"b\"").unwrap(), Value::string("a\"b"));
    assert_eq!(parse("\"a\\\\b\"").unwrap(), Value::string("a\\b"));
}

#[test]
fn read_collections() {
    assert_eq!(
        parse("(def x 1)").unwrap(),
        Value::list([Value::symbol("def"), Value::symbol("x"), Value::Int(1)])
    );
    assert_eq!(
        parse("[true nil 3.5]").unwrap(),
        Value::vector([Value::Bool(true), Value::Nil, Value::Float(3.5)])
    );
    assert_eq!(
        parse("{:port 80 :host \"localhost\"}").unwrap(),
        Value::map([
            (Value::keyword("port"), Value::Int(80)),
            (Value::keyword("host"), Value::string("localhost")),
        ])
    );
    assert_eq!(
        parse("#{1 2 3}").unwrap(),
        Value::set([Value::Int(1), Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn commas_and_comments_are_whitespace() {
    assert_eq!(
        parse("[1, 2, 3]").unwrap(),
        Value::vector([Value::Int(1), Value::Int(2), Value::Int(3)])
    );
    assert_eq!(parse("; only a comment\n42").unwrap(), Value::Int(42));
    assert_eq!(parse("; nothing else").unwrap(), Value::Nil);
}

#[test]
fn empty_input_reads_as_nil() {
    assert_eq!(parse("").unwrap(), Value::Nil);
    assert_eq!(parse("   \n  ").unwrap(), Value::Nil);
}

#[test]
fn multiple_top_level_forms_wrap_in_do() {
    assert_eq!(
        parse("1 2").unwrap(),
        Value::list([Value::symbol("do"), Value::Int(1), Value::Int(2)])
    );
    // A single form is returned bare.
    assert_eq!(parse("(a)").unwrap(), Value::list([Value::symbol("a")]));
}

#[test]
fn quoted_forms_preserve_the_wrapper() {
    assert_eq!(
        parse("'(a b)").unwrap(),
        Value::quoted(Value::list([Value::symbol("a"), Value::symbol("b")]))
    );
    assert_eq!(parse("'x").unwrap(), Value::quoted(Value::symbol("x")));
}

#[test]
fn hash_reads_sets_and_tagged_forms() {
    assert_eq!(
        parse("#inst \"2024-01-01\"").unwrap(),
        Value::tagged("inst", Value::string("2024-01-01"))
    );
    assert_eq!(
        parse("#{:a :b}").unwrap(),
        Value::set([Value::keyword("a"), Value::keyword("b")])
    );
}

#[test]
fn tagged_forms_read_without_a_separating_space() {
    assert_eq!(
        parse("#inst\"2024-01-01\"").unwrap(),
        Value::tagged("inst", Value::string("2024-01-01"))
    );
}

#[test]
fn tagged_payload_map_stays_a_map() {
    assert_eq!(
        parse("#person {:first-name \"Adam\" :last-name \"Mickiewicz\"}").unwrap(),
        Value::tagged(
            "person",
            Value::map([
                (Value::keyword("first-name"), Value::string("Adam")),
                (Value::keyword("last-name"), Value::string("Mickiewicz")),
            ])
        )
    );
}

#[test]
fn duplicate_map_keys_keep_the_last_binding() {
    assert_eq!(
        parse("{:a 1 :a 2}").unwrap(),
        Value::map([(Value::keyword("a"), Value::Int(2))])
    );
}

#[test]
fn set_literals_deduplicate() {
    assert_eq!(
        parse("#{1 1 2}").unwrap(),
        Value::set([Value::Int(1), Value::Int(2)])
    );
}

#[test]
fn odd_map_reports_the_opening_brace() {
    let err = parse("  {:a 1 :b}").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Parse error: 1:3: map literal expects an even number of forms"
    );
}

#[test]
fn unterminated_collections_report_the_opening_delimiter() {
    let err = parse("(1 2").unwrap_err();
    assert_eq!(err.to_string(), "Parse error: 1:1: unterminated list");

    let err = parse("\n[1").unwrap_err();
    assert_eq!(err.to_string(), "Parse error: 2:1: unterminated vector");

    let err = parse("#{1").unwrap_err();
    assert_eq!(err.to_string(), "Parse error: 1:2: unterminated set");
}

#[test]
fn stray_closing_delimiter_is_an_error() {
    let err = parse("  )").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Parse error: 1:3: unexpected closing delimiter ')'"
    );
}

#[test]
fn hash_must_introduce_a_set_or_a_tag() {
    let err = parse("#1").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Parse error: 1:1: '#' must be followed by '{' or a tag symbol"
    );

    let err = parse("#").unwrap_err();
    assert!(err.to_string().contains("unexpected end of input after '#'"));

    let err = parse("#inst").unwrap_err();
    assert!(err
        .to_string()
        .contains("unexpected end of input after '#inst'"));
}

#[test]
fn dangling_quote_is_an_error() {
    let err = parse("'").unwrap_err();
    assert!(err.to_string().contains("unexpected end of input"));
}

#[test]
fn number_shaped_symbols_are_errors() {
    let err = parse("12x").unwrap_err();
    assert_eq!(err.to_string(), "Parse error: 1:1: bad number literal '12x'");

    let err = parse("1.2.3").unwrap_err();
    assert!(err.to_string().contains("bad number literal '1.2.3'"));
}

#[test]
fn locations_span_lines() {
    let err = parse("[1 2]\n{:a}").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Parse error: 2:1: map literal expects an even number of forms"
    );
}

#[test]
fn nested_structures() {
    assert_eq!(
        parse("{:xs [1 2] :m {:k (f 1)}}").unwrap(),
        Value::map([
            (
                Value::keyword("xs"),
                Value::vector([Value::Int(1), Value::Int(2)])
            ),
            (
                Value::keyword("m"),
                Value::map([(
                    Value::keyword("k"),
                    Value::list([Value::symbol("f"), Value::Int(1)])
                )])
            ),
        ])
    );
}
