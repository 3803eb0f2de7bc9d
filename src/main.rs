//! anki-mustache CLI
//!
//! Usage:
//!   anki-mustache [OPTIONS] [FILE]
//!
//! Options:
//!   -f, --fields <FILE>  Field values (TOML table, JSON object or socket list)
//!   -F, --front <FILE>   Previously rendered front side for {{FrontSide}}
//!   -b, --back <FILE>    Back template; renders both card sides
//!   -m, --mark           Prefix output with an @rendered directive line
//!       --syntax         Show template syntax reference
//!   -h, --help           Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::Parser;

use anki_mustache::{render_sides, render_with_options, FieldSet, RenderOptions};

#[derive(Parser)]
#[command(name = "anki-mustache")]
#[command(about = "Render Anki-style {{mustache}} card templates")]
struct Cli {
    /// Front template file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Field values file (TOML table, JSON object or socket list)
    #[arg(short, long)]
    fields: Option<PathBuf>,

    /// File holding a previously rendered front side for {{FrontSide}}
    #[arg(short = 'F', long)]
    front: Option<PathBuf>,

    /// Back template file; renders both card sides, front then back
    #[arg(short, long)]
    back: Option<PathBuf>,

    /// Prefix the output with an @rendered directive line
    #[arg(short, long)]
    mark: bool,

    /// Show template syntax reference
    #[arg(long)]
    syntax: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.syntax {
        print_syntax();
        return;
    }

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    // Load field data
    let fields = match &cli.fields {
        Some(path) => match FieldSet::from_file(path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error loading fields '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => FieldSet::new(),
    };

    // Read the front template
    let template = match &cli.input {
        Some(path) => read_file(path),
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    // Two-sided mode: render front, then back with {{FrontSide}} wired up
    if let Some(back_path) = &cli.back {
        let t_back = read_file(back_path);
        let sides = render_sides(&template, &t_back, &fields);
        println!("{}", sides.front);
        println!("{}", sides.back);
        return;
    }

    let front = match &cli.front {
        Some(path) => read_file(path),
        None => String::new(),
    };

    let options = RenderOptions::new()
        .with_front(front)
        .with_rendered_mark(cli.mark);
    println!("{}", render_with_options(&template, &fields, &options));
}

fn read_file(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn print_intro() {
    println!(
        "{}",
        r#"anki-mustache - Render Anki-style {{mustache}} card templates

USAGE:
    anki-mustache [OPTIONS] [FILE]
    echo '<template>' | anki-mustache -f fields.toml

OPTIONS:
    -f, --fields    Field values (TOML table, JSON object or socket list)
    -F, --front     Previously rendered front side for {{FrontSide}}
    -b, --back      Back template file; renders both card sides
    -m, --mark      Prefix output with an @rendered directive line
    --syntax        Show template syntax reference
    -h, --help      Print help

QUICK START:
    echo '{{Word}} means {{Meaning}}' | anki-mustache -f note.toml

Run --syntax for the placeholder and directive reference."#
    );
}

fn print_syntax() {
    println!(
        "{}",
        r#"TEMPLATE SYNTAX
===============

PLACEHOLDERS
------------
{{key}}             Replaced by the field's value
{{modifier:key}}    Same; the modifier prefix is ignored for lookup
{{FrontSide}}       Replaced by the rendered front side (back templates)

Placeholders with no matching field are removed from the output.

CONDITIONAL SECTIONS
--------------------
{{#key}}...{{/key}}   Kept when the field exists, dropped otherwise
{{#key}}...{{#key}}   Repeated-key closer; same meaning

The section body is left untouched when kept and may span multiple
lines. Fields with non-text (socket) values still count as present.

DIRECTIVE LINES
---------------
A first line starting with `@` is metadata, not content:

@html       The string is HTML; stripped from values and front sides
@template   The rest of the string is a template body (back sides)
@rendered   The string is already-rendered output (added by --mark)

FIELD FILES
-----------
TOML table:        Word = "cat"
JSON object:       {"Word": "cat"}
JSON socket list:  [{"key": "Word", "value": "cat"}]

Non-string values are opaque sockets: they satisfy {{#key}} sections
but substitute nothing."#
    );
}
