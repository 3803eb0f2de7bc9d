//! Directive marker lines
//!
//! Card strings carry metadata in lines that start with `@`: a front side may
//! open with `@html` to request HTML display, a stored back side may open with
//! `@template` to declare that the rest of the string is itself a template,
//! and rendered output is prefixed with `@rendered` so downstream consumers
//! know not to render it again. These markers are plain text conventions, not
//! part of the `{{...}}` placeholder syntax, so they are handled here with
//! their own helpers.

use std::sync::LazyLock;

use regex::Regex;

/// Directive line prefixed to rendered output.
pub const RENDERED_MARK: &str = "@rendered\n";

/// Directive line declaring that the rest of the string is a template body.
pub const TEMPLATE_MARK: &str = "@template\n";

// Constant patterns are compile-time verified to be valid.
static HTML_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^@html[^\n]*\n").expect("constant pattern is valid"));

static LEADING_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A@[^\n]*\n").expect("constant pattern is valid"));

/// Remove every line that begins with the `@html` marker.
///
/// Used on a rendered front side before it is spliced into `{{FrontSide}}`,
/// where the display-mode marker would otherwise leak into the back side.
pub fn strip_html_lines(s: &str) -> String {
    HTML_LINE.replace_all(s, "").into_owned()
}

/// Drop a single leading directive line (`@html`, `@md5`, ...), if present.
///
/// Field values keep their marker for storage purposes but substitute without
/// it. Only the first line is considered; `@` elsewhere in the value is
/// ordinary text.
pub fn strip_leading_directive(s: &str) -> &str {
    match LEADING_DIRECTIVE.find(s) {
        Some(m) => &s[m.end()..],
        None => s,
    }
}

/// Prefix `s` with the `@rendered` directive line.
pub fn mark_rendered(s: &str) -> String {
    format!("{RENDERED_MARK}{s}")
}

/// Whether `s` already carries the `@rendered` mark.
pub fn is_rendered(s: &str) -> bool {
    s.starts_with(RENDERED_MARK)
}

/// The template body of a string stored in `@template` form, if any.
pub fn template_body(s: &str) -> Option<&str> {
    s.strip_prefix(TEMPLATE_MARK)
}
