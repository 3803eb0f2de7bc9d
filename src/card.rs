//! Two-sided card rendering
//!
//! A card is two templates over one note: the front renders first, then the
//! back renders with the finished front spliced into its `{{FrontSide}}`
//! token. Back sides are sometimes stored with an `@template` directive line
//! in front of the body; that form is accepted here too. Both outputs carry
//! the `@rendered` mark so consumers can tell them apart from raw templates.

use crate::directive;
use crate::fields::FieldSet;
use crate::{render_with_options, RenderOptions};

/// Rendered output for both sides of a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSides {
    pub front: String,
    pub back: String,
}

/// Render the front and back templates of a card against one field set.
pub fn render_sides(t_front: &str, t_back: &str, fields: &FieldSet) -> CardSides {
    let front = render_with_options(t_front, fields, &RenderOptions::new());

    let t_back = directive::template_body(t_back).unwrap_or(t_back);
    let back = render_with_options(
        t_back,
        fields,
        &RenderOptions::new().with_front(front.clone()),
    );

    CardSides {
        front: directive::mark_rendered(&front),
        back: directive::mark_rendered(&back),
    }
}
