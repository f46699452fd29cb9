use sorrel_core::reader::parse;
use sorrel_core::value_format::{format_value, FormatMode};

fn assert_round_trips(source: &str) {
    let value = parse(source).expect("first parse");
    let rendered = format_value(&value, FormatMode::Readable);
    let reparsed = parse(&rendered).expect("second parse");
    assert_eq!(value, reparsed, "{} -> {}", source, rendered);
}

#[test]
fn atoms_round_trip() {
    for source in [
        "nil", "true", "false", "0", "-42", "3.5", "-0.125", "2.0", "sym", "odd?", "+", "-",
        ":keyword", "\\a", "\\space", "\\newline", "\\tab",
    ] {
        assert_round_trips(source);
    }
}

#[test]
fn strings_round_trip_with_escapes() {
    for source in [
        "\"plain\"",
        "\"with \\\"quotes\\\"\"",
        "\"line\\nbreak\"",
        "\"tab\\there\"",
        "\"back\\\\slash\"",
    ] {
        assert_round_trips(source);
    }
}

#[test]
fn collections_round_trip() {
    for source in [
        "()",
        "(a b c)",
        "[1 2 3]",
        "[[1] [2 [3]]]",
        "#{1 2 3}",
        "{:a 1 :b 2}",
        "{:outer {:inner [1 2]}}",
        "#{[1] {:k 2} (f)}",
    ] {
        assert_round_trips(source);
    }
}

#[test]
fn wrappers_round_trip() {
    for source in [
        "'x",
        "'(a b)",
        "''x",
        "#inst \"2024-01-01\"",
        "#person {:first-name \"Adam\"}",
        "#wrap [1 #inner {:k 2}]",
    ] {
        assert_round_trips(source);
    }
}

#[test]
fn multi_form_input_round_trips_as_do() {
    assert_round_trips("(def x 1) (def y 2) (+ x y)");
}

#[test]
fn map_keys_reorder_to_the_total_order_and_stay_fixed() {
    let value = parse("{:b 2 :a 1 :c 3}").unwrap();
    let first = format_value(&value, FormatMode::Readable);
    let second = format_value(&parse(&first).unwrap(), FormatMode::Readable);
    assert_eq!(first, "{:a 1 :b 2 :c 3}");
    assert_eq!(first, second);
}

#[test]
fn floats_keep_their_float_type_through_the_trip() {
    let value = parse("2.0").unwrap();
    let rendered = format_value(&value, FormatMode::Readable);
    assert_eq!(rendered, "2.0");
    let reparsed = parse(&rendered).unwrap();
    assert_eq!(reparsed.if_float(), Some(2.0));
}
