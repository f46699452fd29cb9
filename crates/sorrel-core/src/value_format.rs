use std::collections::{BTreeMap, BTreeSet};

use im::Vector;

use crate::ast::{Value, CHARACTER_NAMES};
use crate::string_escape::escape_string_fragment;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatMode {
    /// Reader-round-trippable text.
    Readable,
    /// Strings unquoted, characters bare; everything else as Readable.
    Display,
}

pub fn format_value(value: &Value, mode: FormatMode) -> String {
    let mut out = String::new();
    write_value(&mut out, value, mode);
    out
}

fn write_value(out: &mut String, value: &Value, mode: FormatMode) {
    match value {
        Value::Nil => out.push_str("nil"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Float(n) => out.push_str(&format_float(*n)),
        Value::Char(c) => write_char(out, *c, mode),
        Value::Str(s) => match mode {
            FormatMode::Readable => {
                out.push('"');
                out.push_str(&escape_string_fragment(s));
                out.push('"');
            }
            FormatMode::Display => out.push_str(s),
        },
        Value::Symbol(s) => out.push_str(s),
        Value::Keyword(s) => {
            out.push(':');
            out.push_str(s);
        }
        Value::Vector(items) => write_seq(out, items, "[", "]", mode),
        Value::List(items) => write_seq(out, items, "(", ")", mode),
        Value::Set(items) => write_set(out, items, mode),
        Value::Map(entries) => write_map(out, entries, mode),
        Value::Tagged { tag, value } => {
            out.push('#');
            out.push_str(tag);
            out.push(' ');
            write_value(out, value, mode);
        }
        Value::Quoted(inner) => {
            out.push('\'');
            write_value(out, inner, mode);
        }
        Value::Func(_) | Value::Lambda { .. } => out.push_str(&format_callable(value)),
    }
}

fn write_seq(out: &mut String, items: &Vector<Value>, open: &str, close: &str, mode: FormatMode) {
    out.push_str(open);
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        write_value(out, item, mode);
    }
    out.push_str(close);
}

fn write_set(out: &mut String, items: &BTreeSet<Value>, mode: FormatMode) {
    out.push_str("#{");
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        write_value(out, item, mode);
    }
    out.push('}');
}

fn write_map(out: &mut String, entries: &BTreeMap<Value, Value>, mode: FormatMode) {
    out.push('{');
    for (idx, (key, value)) in entries.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        write_value(out, key, mode);
        out.push(' ');
        write_value(out, value, mode);
    }
    out.push('}');
}

fn write_char(out: &mut String, c: char, mode: FormatMode) {
    if mode == FormatMode::Display {
        out.push(c);
        return;
    }
    out.push('\\');
    for (ch, name) in CHARACTER_NAMES {
        if ch == c {
            out.push_str(name);
            return;
        }
    }
    out.push(c);
}

/// Floats always render with a fractional part so they re-read as floats.
fn format_float(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

fn format_callable(value: &Value) -> String {
    match value {
        Value::Lambda { name: Some(n), .. } => format!("#<fn {}>", n),
        Value::Lambda { .. } => "#<lambda>".into(),
        Value::Func(func) => match func.debug_name() {
            Some(name) => format!("#<fn {}>", name),
            None => "#<native-fn>".into(),
        },
        _ => "#<fn>".into(),
    }
}
