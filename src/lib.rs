//! Anki-style `{{mustache}}` template rendering for flashcards
//!
//! This library substitutes `{{key}}` placeholders with note field values,
//! splices a previously rendered front side into `{{FrontSide}}`, and keeps
//! or drops `{{#key}}...{{/key}}` conditional sections based on key presence.
//!
//! # Example
//!
//! ```rust
//! use anki_mustache::{render, FieldSet};
//!
//! let fields: FieldSet = [("Word", "cat"), ("Reading", "kat")].into_iter().collect();
//! let out = render("{{Word}} ({{Reading}}){{#Audio}} [play]{{/Audio}}", &fields);
//! assert_eq!(out, "cat (kat)");
//! ```
//!
//! # Best-effort contract
//!
//! Rendering never fails. Templates are trusted, pre-validated input:
//! malformed placeholder syntax is either left as literal text (when it does
//! not look like a `{{...}}` token at all) or stripped to the empty string
//! (when it does). Placeholders whose key is missing from the field set are
//! always stripped, never echoed back. This is a deliberate tradeoff for the
//! flashcard use case, not a general-purpose templating contract.

pub mod card;
pub mod directive;
pub mod fields;
mod renderer;

pub use card::{render_sides, CardSides};
pub use fields::{FieldSet, FieldSetError, FieldValue};

/// Options for a single render call
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    front: String,
    mark_rendered: bool,
}

impl RenderOptions {
    /// Create options with no front side and no output mark
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the previously rendered front side spliced into `{{FrontSide}}`
    pub fn with_front(mut self, front: impl Into<String>) -> Self {
        self.front = front.into();
        self
    }

    /// Prefix the output with an `@rendered` directive line.
    ///
    /// Rendering an already-marked string marks it again, doubling the
    /// prefix; callers that cache rendered sides should check
    /// [`directive::is_rendered`] before re-rendering.
    pub fn with_rendered_mark(mut self, mark: bool) -> Self {
        self.mark_rendered = mark;
        self
    }
}

/// Render a template with default options (empty front side, no mark).
///
/// This is the main entry point for the library. See [`render_with_options`]
/// for the pass order.
pub fn render(template: &str, fields: &FieldSet) -> String {
    render_with_options(template, fields, &RenderOptions::default())
}

/// Render a template with explicit options.
///
/// Passes run in a fixed order, each over the output of the last:
///
/// 1. replace `{{FrontSide}}` with the front side (its `@html` lines removed);
/// 2. substitute `{{key}}` / `{{modifier:key}}` for every text-valued field;
/// 3. keep or drop `{{#key}}...{{/key}}` sections by key presence;
/// 4. strip whatever `{{...}}` tokens remain;
/// 5. optionally prefix the `@rendered` mark.
pub fn render_with_options(template: &str, fields: &FieldSet, options: &RenderOptions) -> String {
    let out = renderer::substitute_front(template, &options.front);
    let out = renderer::substitute_fields(&out, fields);
    let out = renderer::resolve_sections(&out, fields);
    let out = renderer::strip_placeholders(&out);

    if options.mark_rendered {
        directive::mark_rendered(&out)
    } else {
        out
    }
}
