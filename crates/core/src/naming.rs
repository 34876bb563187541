//! Turning schema-supplied names into identifiers and property keys.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::writer::QuoteStyle;

/// JavaScript/TypeScript reserved words that cannot be used as identifiers.
static RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        "let",
        "static",
        "implements",
        "interface",
        "package",
        "private",
        "protected",
        "public",
        "await",
        "async",
    ]
    .into_iter()
    .collect()
});

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Check whether `name` can be written bare as an identifier or member name.
pub fn is_identifier(name: &str) -> bool {
    name.chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && name.chars().all(is_identifier_char)
}

/// Escape a string for a literal delimited by `quote`.
pub fn escape_string(s: &str, quote: QuoteStyle) -> String {
    let delimiter = quote.as_char();
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            c if c == delimiter => {
                escaped.push('\\');
                escaped.push(c);
            }
            c => escaped.push(c),
        }
    }
    escaped
}

/// Wrap `s` in quotes of the given style, escaping as needed.
pub fn quote(s: &str, style: QuoteStyle) -> String {
    let delimiter = style.as_char();
    format!("{delimiter}{}{delimiter}", escape_string(s, style))
}

/// Convert an arbitrary name into a camelCase identifier.
///
/// Every character that cannot appear in an identifier acts as a word
/// separator. The first word is kept as written, later words are
/// capitalized. Names starting with a digit and reserved words get a `_`
/// prefix; names with no usable characters become `_empty`.
pub fn to_identifier(raw: &str) -> String {
    let mut result = String::with_capacity(raw.len());
    for part in raw.split(|c: char| !is_identifier_char(c)) {
        if part.is_empty() {
            continue;
        }
        if result.is_empty() {
            result.push_str(part);
        } else {
            result.push_str(&capitalize(part));
        }
    }

    if result.is_empty() {
        return "_empty".to_string();
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) || RESERVED_WORDS.contains(result.as_str())
    {
        result.insert(0, '_');
    }

    result
}

/// Capitalize the first letter of a string.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Name used in type position: the capitalized identifier form.
pub fn type_name(raw: &str) -> String {
    let ident = to_identifier(raw);
    match ident.strip_prefix('_') {
        // Reserved words only need the prefix in value position.
        Some(rest) if RESERVED_WORDS.contains(rest) => capitalize(rest),
        _ => capitalize(&ident),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("foo"));
        assert!(is_identifier("_foo"));
        assert!(is_identifier("$foo"));
        assert!(is_identifier("foo123"));

        assert!(!is_identifier(""));
        assert!(!is_identifier("123foo"));
        assert!(!is_identifier("foo-bar"));
        assert!(!is_identifier("foo bar"));
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("hello", QuoteStyle::Single), "hello");
        assert_eq!(escape_string("it's", QuoteStyle::Single), "it\\'s");
        assert_eq!(escape_string("it's", QuoteStyle::Double), "it's");
        assert_eq!(escape_string("say \"hi\"", QuoteStyle::Double), "say \\\"hi\\\"");
        assert_eq!(escape_string("a\\b", QuoteStyle::Single), "a\\\\b");
    }

    #[test]
    fn test_to_identifier() {
        assert_eq!(to_identifier("foo"), "foo");
        assert_eq!(to_identifier("foo-bar"), "fooBar");
        assert_eq!(to_identifier("foo.bar baz"), "fooBarBaz");
        assert_eq!(to_identifier("/movies/{id}"), "moviesId");
        assert_eq!(to_identifier("123foo"), "_123foo");
        assert_eq!(to_identifier("delete"), "_delete");
        assert_eq!(to_identifier("---"), "_empty");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("foo"), "Foo");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("ABC"), "ABC");
    }

    #[test]
    fn test_type_name() {
        assert_eq!(type_name("movie"), "Movie");
        assert_eq!(type_name("movie-list"), "MovieList");
        assert_eq!(type_name("default"), "Default");
        assert_eq!(type_name("2fa"), "_2fa");
    }
}
