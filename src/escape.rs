//! Shell escaping for interpolated values.

use std::borrow::Cow;

/// Escape a value so it reads back as a single shell word.
///
/// The result is safe to embed literally in a POSIX shell command line:
/// embedded quotes, spaces, and metacharacters are neutralized. Escaping an
/// already-escaped string is not meaningful; callers escape raw values
/// exactly once.
///
/// # Examples
///
/// ```
/// use runnel::escape;
///
/// assert_eq!(escape("plain"), "plain");
/// assert_eq!(escape("two words"), "'two words'");
/// assert_eq!(shell_words::split(&escape("a & b")).unwrap(), vec!["a & b"]);
/// ```
pub fn escape(value: &str) -> String {
    match shell_words::quote(value) {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_word_is_unchanged() {
        assert_eq!(escape("hello"), "hello");
    }

    #[test]
    fn spaces_are_quoted() {
        assert_eq!(escape("hello world"), "'hello world'");
    }

    #[test]
    fn empty_string_becomes_empty_quotes() {
        assert_eq!(escape(""), "''");
    }

    #[test]
    fn metacharacters_round_trip_through_splitting() {
        for raw in [
            "world & friends",
            "a;b",
            "$(danger)",
            "`ticks`",
            "semi; colon",
            "it's",
            "tab\there",
            "star*glob",
        ] {
            let escaped = escape(raw);
            let words = shell_words::split(&escaped).unwrap();
            assert_eq!(words, vec![raw.to_string()], "round trip for {:?}", raw);
        }
    }

    #[test]
    fn escaped_value_is_one_word() {
        let words = shell_words::split(&escape("one two three")).unwrap();
        assert_eq!(words.len(), 1);
    }
}
