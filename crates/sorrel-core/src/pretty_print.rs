use crate::ast::Value;
use crate::value_format::{format_value, FormatMode};

#[derive(Clone, Copy, Debug)]
pub struct PrettyPrintOptions {
    pub indent_width: usize,
    pub max_inline_length: usize,
}

impl Default for PrettyPrintOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            max_inline_length: 60,
        }
    }
}

/// Renders a value over multiple lines. Any value whose readable form
/// fits within `max_inline_length` stays on one line, so small leaves
/// read the same as the plain formatter.
pub fn pretty_print(value: &Value, options: &PrettyPrintOptions) -> String {
    let mut printer = PrettyPrinter {
        out: String::new(),
        options,
    };
    printer.print_value(value, 0);
    printer.out
}

struct PrettyPrinter<'a> {
    out: String,
    options: &'a PrettyPrintOptions,
}

impl PrettyPrinter<'_> {
    fn print_value(&mut self, value: &Value, level: usize) {
        let inline = format_value(value, FormatMode::Readable);
        if inline.chars().count() <= self.options.max_inline_length {
            self.out.push_str(&inline);
            return;
        }
        match value {
            Value::Vector(items) => self.print_seq("[", "]", items.iter(), level),
            Value::List(items) => self.print_seq("(", ")", items.iter(), level),
            Value::Set(items) => self.print_seq("#{", "}", items.iter(), level),
            Value::Map(entries) => {
                self.out.push('{');
                for (key, val) in entries {
                    self.newline_indent(level + 1);
                    self.print_value(key, level + 1);
                    self.out.push(' ');
                    self.print_value(val, level + 1);
                }
                self.newline_indent(level);
                self.out.push('}');
            }
            Value::Tagged { tag, value } => {
                self.out.push('#');
                self.out.push_str(tag);
                self.out.push(' ');
                self.print_value(value, level);
            }
            Value::Quoted(inner) => {
                self.out.push('\'');
                self.print_value(inner, level);
            }
            _ => self.out.push_str(&inline),
        }
    }

    fn print_seq<'v>(
        &mut self,
        open: &str,
        close: &str,
        items: impl Iterator<Item = &'v Value>,
        level: usize,
    ) {
        self.out.push_str(open);
        for item in items {
            self.newline_indent(level + 1);
            self.print_value(item, level + 1);
        }
        self.newline_indent(level);
        self.out.push_str(close);
    }

    fn newline_indent(&mut self, level: usize) {
        self.out.push('\n');
        for _ in 0..level * self.options.indent_width {
            self.out.push(' ');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{pretty_print, PrettyPrintOptions};
    use crate::ast::Value;

    #[test]
    fn short_values_stay_inline() {
        let v = Value::vector([Value::Int(1), Value::Int(2)]);
        assert_eq!(pretty_print(&v, &PrettyPrintOptions::default()), "[1 2]");
    }

    #[test]
    fn wide_collections_break_per_item() {
        let options = PrettyPrintOptions {
            indent_width: 2,
            max_inline_length: 8,
        };
        let v = Value::vector([
            Value::string("alpha"),
            Value::string("beta"),
            Value::string("gamma"),
        ]);
        assert_eq!(
            pretty_print(&v, &options),
            "[\n  \"alpha\"\n  \"beta\"\n  \"gamma\"\n]"
        );
    }
}
