/// Escapes exactly the sequences the reader understands, so readable
/// output re-reads to the same string.
pub fn escape_string_fragment(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_string_fragment;

    #[test]
    fn escapes_reader_sequences_only() {
        assert_eq!(escape_string_fragment("a\"b\\c\nd"), "a\\\"b\\\\c\\nd");
        assert_eq!(escape_string_fragment("plain"), "plain");
    }
}
