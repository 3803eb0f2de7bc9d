//! The substitution passes behind [`crate::render`]
//!
//! Rendering is four sequential text transformations: `{{FrontSide}}`
//! splicing, per-field substitution, conditional-section evaluation, and a
//! final sweep that strips whatever `{{...}}` tokens remain. Later passes see
//! the output of earlier ones, so text substituted in by a field value gets
//! one further level of processing and no more. None of the passes can fail:
//! templates are trusted input and malformed syntax degrades to stripped or
//! literal text.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use crate::directive;
use crate::fields::{FieldSet, FieldValue};

/// Literal inclusion token for the previously rendered front side.
const FRONT_SIDE: &str = "{{FrontSide}}";

// Constant patterns are compile-time verified to be valid.
static SECTION_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{#([^\s{}]+)\}\}").expect("constant pattern is valid"));

static ANY_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^}]+\}\}").expect("constant pattern is valid"));

/// Splice `front` into every `{{FrontSide}}` token, with its `@html`
/// directive lines removed first.
pub(crate) fn substitute_front(template: &str, front: &str) -> String {
    if !template.contains(FRONT_SIDE) {
        return template.to_string();
    }
    let front = directive::strip_html_lines(front);
    template.replace(FRONT_SIDE, &front)
}

/// Substitute every `{{key}}` and `{{modifier:key}}` placeholder for each
/// text-valued field. Values lose a single leading directive line before
/// insertion, and are inserted verbatim (`$` in a value is not a capture
/// reference). Socket-valued fields substitute nothing.
pub(crate) fn substitute_fields(template: &str, fields: &FieldSet) -> String {
    let mut out = template.to_string();
    for (key, value) in fields.iter() {
        let FieldValue::Text(text) = value else {
            continue;
        };
        let replacement = directive::strip_leading_directive(text);
        let pattern = format!(r"\{{\{{(\S+:)?{}\}}\}}", regex::escape(key));
        // The key is escaped, so the pattern is always well-formed.
        let re = Regex::new(&pattern).expect("escaped key forms a valid pattern");
        out = re.replace_all(&out, NoExpand(replacement)).into_owned();
    }
    out
}

/// Evaluate conditional sections left to right.
///
/// A section opens with `{{#key}}` and closes with either a repeated
/// `{{#key}}` or a `{{/key}}`; the span runs to the widest (last) closer for
/// the same key. Known keys keep the section contents, unknown keys drop
/// them. Kept contents are emitted without re-scanning, so tokens inside them
/// fall through to [`strip_placeholders`]. An opener with no closer is left
/// in place for the same sweep.
pub(crate) fn resolve_sections(template: &str, fields: &FieldSet) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(opener) = SECTION_OPEN.find(rest) {
        let token = opener.as_str();
        let key = &token[3..token.len() - 2];
        out.push_str(&rest[..opener.start()]);
        let after = &rest[opener.end()..];
        match find_last_closer(after, key) {
            Some((close_start, close_end)) => {
                if fields.contains_key(key) {
                    out.push_str(&after[..close_start]);
                }
                rest = &after[close_end..];
            }
            None => {
                out.push_str(token);
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Byte range of the last `{{#key}}` or `{{/key}}` token in `s`, if any.
fn find_last_closer(s: &str, key: &str) -> Option<(usize, usize)> {
    let repeated = format!("{{{{#{key}}}}}");
    let slash = format!("{{{{/{key}}}}}");
    let a = s.rfind(&repeated).map(|at| (at, at + repeated.len()));
    let b = s.rfind(&slash).map(|at| (at, at + slash.len()));
    match (a, b) {
        (Some(a), Some(b)) => Some(if a.0 > b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

/// Strip every remaining `{{...}}` token (no `}` between the braces).
pub(crate) fn strip_placeholders(template: &str) -> String {
    ANY_PLACEHOLDER.replace_all(template, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FieldSet {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_substitute_front_strips_html_marker() {
        let out = substitute_front("Q: {{FrontSide}}", "@html\n<b>cat</b>");
        assert_eq!(out, "Q: <b>cat</b>");
    }

    #[test]
    fn test_substitute_front_all_occurrences() {
        let out = substitute_front("{{FrontSide}}|{{FrontSide}}", "x");
        assert_eq!(out, "x|x");
    }

    #[test]
    fn test_substitute_fields_with_modifier() {
        let f = fields(&[("Word", "cat")]);
        assert_eq!(substitute_fields("{{Word}}", &f), "cat");
        assert_eq!(substitute_fields("{{cloze:Word}}", &f), "cat");
        assert_eq!(substitute_fields("{{type:cloze:Word}}", &f), "cat");
    }

    #[test]
    fn test_substitute_fields_key_is_escaped() {
        let f = fields(&[("a.b", "dot")]);
        assert_eq!(substitute_fields("{{a.b}}", &f), "dot");
        // `.` must not match arbitrary characters.
        assert_eq!(substitute_fields("{{axb}}", &f), "{{axb}}");
    }

    #[test]
    fn test_substitute_fields_value_is_verbatim() {
        let f = fields(&[("Word", "$1 and $0")]);
        assert_eq!(substitute_fields("{{Word}}", &f), "$1 and $0");
    }

    #[test]
    fn test_substitute_fields_strips_value_directive() {
        let f = fields(&[("Word", "@html\n<b>cat</b>")]);
        assert_eq!(substitute_fields("{{Word}}", &f), "<b>cat</b>");
    }

    #[test]
    fn test_substitute_fields_skips_sockets() {
        let mut f = FieldSet::new();
        f.insert("Audio", FieldValue::Socket(serde_json::json!({"url": "a.mp3"})));
        assert_eq!(substitute_fields("{{Audio}}", &f), "{{Audio}}");
    }

    #[test]
    fn test_section_kept_for_known_key() {
        let f = fields(&[("a", "1")]);
        assert_eq!(resolve_sections("{{#a}}yes{{#a}}", &f), "yes");
        assert_eq!(resolve_sections("{{#a}}yes{{/a}}", &f), "yes");
    }

    #[test]
    fn test_section_dropped_for_unknown_key() {
        let f = FieldSet::new();
        assert_eq!(resolve_sections("{{#a}}yes{{#a}}", &f), "");
        assert_eq!(resolve_sections("x{{#a}}yes{{/a}}y", &f), "xy");
    }

    #[test]
    fn test_section_socket_key_counts_as_known() {
        let mut f = FieldSet::new();
        f.insert("Audio", FieldValue::Socket(serde_json::Value::Null));
        assert_eq!(resolve_sections("{{#Audio}}play{{/Audio}}", &f), "play");
    }

    #[test]
    fn test_section_spans_to_last_closer() {
        let f = fields(&[("a", "1")]);
        // Greedy: the span runs to the last `a` closer.
        assert_eq!(
            resolve_sections("{{#a}}one{{/a}}two{{/a}}", &f),
            "one{{/a}}two"
        );
    }

    #[test]
    fn test_section_spans_multiple_lines() {
        let f = FieldSet::new();
        assert_eq!(resolve_sections("{{#a}}line1\nline2\n{{/a}}", &f), "");
    }

    #[test]
    fn test_unclosed_opener_left_in_place() {
        let f = fields(&[("a", "1")]);
        assert_eq!(resolve_sections("{{#a}}yes", &f), "{{#a}}yes");
    }

    #[test]
    fn test_kept_contents_not_rescanned() {
        // The inner section's tokens survive this pass; the strip pass
        // removes the tokens but keeps their contents.
        let f = fields(&[("a", "1")]);
        let out = resolve_sections("{{#a}}x{{#b}}y{{/b}}z{{/a}}", &f);
        assert_eq!(out, "x{{#b}}y{{/b}}z");
        assert_eq!(strip_placeholders(&out), "xyz");
    }

    #[test]
    fn test_strip_placeholders() {
        assert_eq!(strip_placeholders("a{{Unknown}}b"), "ab");
        assert_eq!(strip_placeholders("{{#orphan}}"), "");
        // A lone `{` or `}` is not a token.
        assert_eq!(strip_placeholders("{not} {{a} closed"), "{not} {{a} closed");
    }
}
