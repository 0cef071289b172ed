//! Template interpolation for argument strings.
//!
//! An argument template may contain placeholder tokens in two tiers:
//!
//! - `{name}` - substituted with the shell-escaped string form of the value,
//!   safe for untrusted input
//! - `{{name}}` - substituted with the raw, unescaped string form, for
//!   callers injecting pre-built command fragments
//!
//! Token names consist of letters, digits, underscores, and hyphens. A token
//! whose name is not present in the value map, or whose opening and closing
//! brace counts differ (`{name}}`, `{{name}`), is left verbatim in the
//! output. Interpolation never fails.

use crate::escape::escape;
use serde_json::Value;
use std::collections::HashMap;

/// Values available for substitution into a template.
///
/// Keys are stringified on insertion, so non-string keys are usable and
/// colliding string forms resolve last-write-wins. Values are arbitrary
/// [`serde_json::Value`]s, converted to their string form at substitution
/// time: strings substitute their text, `null` substitutes the empty string,
/// and everything else substitutes its JSON text.
///
/// # Examples
///
/// ```
/// use runnel::{interpolate, Interpolations};
///
/// let values = Interpolations::from([("name", "world")]);
/// assert_eq!(interpolate("hello {name}", &values), "hello world");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpolations {
    values: HashMap<String, Value>,
}

impl Interpolations {
    /// Create an empty value map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value under the stringified form of `key`.
    pub fn set(&mut self, key: impl ToString, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: impl ToString, value: impl Into<Value>) -> Self {
        self.set(key, value);
        self
    }

    /// Look up a value by token name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether a token name has a value.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: ToString, V: Into<Value>> FromIterator<(K, V)> for Interpolations {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut interps = Self::new();
        for (key, value) in iter {
            interps.set(key, value);
        }
        interps
    }
}

impl<K: ToString, V: Into<Value>, const N: usize> From<[(K, V); N]> for Interpolations {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// The string form a value takes when substituted.
fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-'
}

/// Substitute placeholder tokens in `template` from `values`.
///
/// A single-pass scan pairs runs of consecutive braces by count: one or two
/// opening braces, a token name, then closing braces taken greedily up to
/// two. Single-brace tokens substitute the escaped value, double-brace
/// tokens substitute the raw value, and anything that does not pair up
/// (missing name, mismatched counts) is copied through byte-identically.
///
/// Returns a new string; the template is never mutated.
///
/// # Examples
///
/// ```
/// use runnel::{interpolate, Interpolations};
///
/// let values = Interpolations::from([("dir", "My Documents"), ("flags", "-l -a")]);
/// assert_eq!(interpolate("ls {{flags}} {dir}", &values), "ls -l -a 'My Documents'");
/// assert_eq!(interpolate("{missing}", &values), "{missing}");
/// ```
pub fn interpolate(template: &str, values: &Interpolations) -> String {
    let bytes = template.as_bytes();
    let mut out = String::with_capacity(template.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'{' {
            // Copy the literal span up to the next candidate token. Brace
            // bytes are ASCII, so these boundaries are valid char boundaries.
            let start = i;
            while i < bytes.len() && bytes[i] != b'{' {
                i += 1;
            }
            out.push_str(&template[start..i]);
            continue;
        }

        let open = if bytes.get(i + 1) == Some(&b'{') { 2 } else { 1 };
        let name_start = i + open;
        let mut name_end = name_start;
        while name_end < bytes.len() && is_name_byte(bytes[name_end]) {
            name_end += 1;
        }

        if name_end == name_start {
            // No name here. A longer brace run retries from the next byte,
            // which is how `{{{name}}}` resolves to a literal brace around a
            // double-brace token.
            out.push('{');
            i += 1;
            continue;
        }

        let mut close = 0;
        let mut end = name_end;
        while end < bytes.len() && bytes[end] == b'}' && close < 2 {
            close += 1;
            end += 1;
        }

        if close == 0 {
            out.push('{');
            i += 1;
            continue;
        }

        let name = &template[name_start..name_end];
        if open == close {
            if let Some(value) = values.get(name) {
                let text = value_to_string(value);
                if open == 1 {
                    out.push_str(&escape(&text));
                } else {
                    out.push_str(&text);
                }
                i = end;
                continue;
            }
        }

        // Unknown name or mismatched brace counts: the whole span stays as-is.
        out.push_str(&template[i..end]);
        i = end;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn substitutes_single_brace_token() {
        let values = Interpolations::from([("name", "world")]);
        assert_eq!(interpolate("hello {name}", &values), "hello world");
    }

    #[test]
    fn single_brace_value_is_escaped() {
        let values = Interpolations::from([("name", "world & friends")]);
        assert_eq!(
            interpolate("hello {name}", &values),
            format!("hello {}", escape("world & friends"))
        );
    }

    #[test]
    fn escaped_substitution_round_trips_as_one_word() {
        let values = Interpolations::from([("v", "two words; rm -rf /")]);
        let rendered = interpolate("{v}", &values);
        let words = shell_words::split(&rendered).unwrap();
        assert_eq!(words, vec!["two words; rm -rf /".to_string()]);
    }

    #[test]
    fn double_brace_token_is_raw() {
        let values = Interpolations::from([("raw", "a b")]);
        assert_eq!(interpolate("{{raw}}", &values), "a b");
    }

    #[test]
    fn missing_name_is_left_verbatim() {
        let values = Interpolations::new();
        assert_eq!(interpolate("{missing}", &values), "{missing}");
        assert_eq!(interpolate("{{missing}}", &values), "{{missing}}");
    }

    #[test]
    fn mismatched_brace_counts_never_substitute() {
        let values = Interpolations::from([("name", "value")]);
        assert_eq!(interpolate("{name}}", &values), "{name}}");
        assert_eq!(interpolate("{{name}", &values), "{{name}");
    }

    #[test]
    fn triple_braces_substitute_the_inner_double_token() {
        let values = Interpolations::from([("name", "v")]);
        assert_eq!(interpolate("{{{name}}}", &values), "{v}");
    }

    #[test]
    fn unmatched_open_braces_pass_through() {
        let values = Interpolations::from([("x", "v")]);
        assert_eq!(interpolate("{{x", &values), "{{x");
        assert_eq!(interpolate("{", &values), "{");
        assert_eq!(interpolate("a { b", &values), "a { b");
    }

    #[test]
    fn lone_closing_braces_pass_through() {
        let values = Interpolations::new();
        assert_eq!(interpolate("a } b }}", &values), "a } b }}");
    }

    #[test]
    fn empty_braces_pass_through() {
        let values = Interpolations::new();
        assert_eq!(interpolate("{}", &values), "{}");
        assert_eq!(interpolate("{{}}", &values), "{{}}");
    }

    #[test]
    fn names_allow_digits_underscores_and_hyphens() {
        let values = Interpolations::from([("log-file_2", "out.log")]);
        assert_eq!(interpolate("tail {log-file_2}", &values), "tail out.log");
    }

    #[test]
    fn adjacent_and_repeated_tokens() {
        let values = Interpolations::from([("a", "1"), ("b", "2")]);
        assert_eq!(interpolate("{a}{b}{a}", &values), "121");
    }

    #[test]
    fn template_without_tokens_is_unchanged() {
        let values = Interpolations::from([("a", "1")]);
        assert_eq!(interpolate("plain text", &values), "plain text");
        assert_eq!(interpolate("", &values), "");
    }

    #[test]
    fn unicode_text_around_tokens_is_preserved() {
        let values = Interpolations::from([("name", "müller")]);
        assert_eq!(interpolate("grüße {name} 🎉", &values), "grüße müller 🎉");
    }

    #[test]
    fn non_string_values_use_their_json_text() {
        let mut values = Interpolations::new();
        values.set("count", 42);
        values.set("verbose", true);
        assert_eq!(interpolate("-n {count} -v {verbose}", &values), "-n 42 -v true");
    }

    #[test]
    fn null_value_renders_empty() {
        let mut values = Interpolations::new();
        values.set("gone", json!(null));
        assert_eq!(interpolate("x{gone}y", &values), "xy");
    }

    #[test]
    fn non_string_keys_are_stringified() {
        let mut values = Interpolations::new();
        values.set(7, "seven");
        assert_eq!(interpolate("{7}", &values), "seven");
    }

    #[test]
    fn colliding_key_forms_resolve_last_write_wins() {
        let values: Interpolations = [("1", "first"), ("1", "second")].into_iter().collect();
        assert_eq!(interpolate("{1}", &values), "second");

        let mut values = Interpolations::new();
        values.set(1, "numeric");
        values.set("1", "textual");
        assert_eq!(interpolate("{1}", &values), "textual");
    }

    #[test]
    fn raw_tier_supports_prebuilt_fragments() {
        let values = Interpolations::from([("tail", "-- 'already quoted'")]);
        assert_eq!(interpolate("cmd {{tail}}", &values), "cmd -- 'already quoted'");
    }
}
