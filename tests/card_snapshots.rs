//! Snapshot tests for rendered card output
//!
//! These pin the exact output text for representative templates so that
//! changes to pass order or stripping behavior show up as diffs.

use anki_mustache::{render, render_with_options, FieldSet, RenderOptions};

fn vocab_note() -> FieldSet {
    [("Word", "chat"), ("Gender", "m"), ("Meaning", "cat")]
        .into_iter()
        .collect()
}

#[test]
fn snapshot_vocab_front() {
    let out = render("{{Word}}{{#Gender}} ({{Gender}}){{/Gender}}", &vocab_note());
    insta::assert_snapshot!(out, @"chat (m)");
}

#[test]
fn snapshot_vocab_back() {
    let options = RenderOptions::new().with_front("chat (m)");
    let out = render_with_options(
        "{{FrontSide}} = {{Meaning}}{{#Plural}} / pl. {{Plural}}{{/Plural}}",
        &vocab_note(),
        &options,
    );
    insta::assert_snapshot!(out, @"chat (m) = cat");
}

#[test]
fn snapshot_cloze_style_modifiers() {
    let out = render("{{cloze:Word}} -> {{hint:Meaning}}", &vocab_note());
    insta::assert_snapshot!(out, @"chat -> cat");
}

#[test]
fn snapshot_unknown_fields_stripped() {
    let out = render("{{Word}} [{{Tags}}|{{Deck}}]", &vocab_note());
    insta::assert_snapshot!(out, @"chat [|]");
}
