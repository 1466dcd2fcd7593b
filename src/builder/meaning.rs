//! Meaning line to HTML conversion.
//!
//! A meaning line is semi-structured text. Two inline blocks are recognized
//! first:
//!
//! - `[note](content)` → `<p class="note">content</p>`
//! - `[example](sentence)(explanation)` → `<p class="example">` holding an
//!   `example-sentence` and an `example-explain` span, separated by a tab
//!
//! The result is then cut into segments at `<br>`, at the emitted blocks and
//! at a fixed set of punctuation characters. Punctuation, `<br>` and blocks
//! are copied as they are; every other segment is trimmed and emphasized
//! with `<b>`, even when nothing is left after trimming.
//!
//! ```
//! use txt2mdx::builder::meaning::format_meaning;
//!
//! assert_eq!(format_meaning("食べる、飲む"), "<b>食べる</b>、<b>飲む</b>");
//! assert_eq!(format_meaning("[note](注意)"), r#"<p class="note">注意</p>"#);
//! ```

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Separator between the sentence and the explanation of an example.
pub const EXAMPLE_SEPARATOR: &str = "\t";

/// Line break tag kept as its own segment.
pub const BREAK_TAG: &str = "<br>";

/// Characters that end a segment and are kept as their own segment.
pub const BOUNDARY_CHARS: &[char] = &['，', '；', '、', '.', '（', '）', '[', ']', '+', '「', '」'];

const NOTE_OPEN: &str = r#"<p class="note">"#;
const EXAMPLE_OPEN: &str = r#"<p class="example">"#;
const BLOCK_CLOSE: &str = "</p>";

/// Openers of blocks produced by block recognition.
const PRESERVED_BLOCKS: &[&str] = &[NOTE_OPEN, EXAMPLE_OPEN];

const NOTE_MARKUP: &str = "[note](";
const EXAMPLE_MARKUP: &str = "[example](";

static NOTE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[note\]\(([^)]+)\)").unwrap());
static EXAMPLE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[example\]\(([^)]+)\)\(([^)]+)\)").unwrap());

/// One piece of a meaning line after block recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// `<br>` or a single boundary character
    Boundary(&'a str),
    /// A whole `<p class="note">…</p>` or `<p class="example">…</p>`
    Block(&'a str),
    /// Text between boundaries, untrimmed
    Text(&'a str),
}

impl<'a> Segment<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            Segment::Boundary(s) | Segment::Block(s) | Segment::Text(s) => s,
        }
    }
}

/// Which inline block a [`MarkupWarning`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupKind {
    Note,
    Example,
}

/// Block markup that was left as literal text because it is incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkupWarning {
    pub kind: MarkupKind,
    /// Byte offset of the markup in the line after block recognition
    pub offset: usize,
}

impl fmt::Display for MarkupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            MarkupKind::Note => "note",
            MarkupKind::Example => "example",
        };
        write!(f, "unmatched [{}] markup at byte {}", tag, self.offset)
    }
}

/// Formatted meaning and the markup problems found on the way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormattedMeaning {
    pub html: String,
    pub warnings: Vec<MarkupWarning>,
}

/// Replaces `[note](…)` and `[example](…)(…)` with their HTML blocks.
///
/// Block contents never extend past the first `)`. Incomplete markup is left
/// untouched.
pub fn expand_blocks(text: &str) -> String {
    let text = NOTE_BLOCK.replace_all(text, |caps: &Captures| {
        format!("{}{}{}", NOTE_OPEN, &caps[1], BLOCK_CLOSE)
    });
    EXAMPLE_BLOCK
        .replace_all(&text, |caps: &Captures| {
            format!(
                r#"{}<span class="example-sentence">{}</span>{}<span class="example-explain">{}</span>{}"#,
                EXAMPLE_OPEN, &caps[1], EXAMPLE_SEPARATOR, &caps[2], BLOCK_CLOSE
            )
        })
        .into_owned()
}

fn preserved_block_len(rest: &str) -> Option<usize> {
    PRESERVED_BLOCKS.iter().find_map(|open| {
        let body = rest.strip_prefix(open)?;
        body.find(BLOCK_CLOSE).map(|end| open.len() + end + BLOCK_CLOSE.len())
    })
}

/// Splits `text` into boundaries, preserved blocks and text runs.
///
/// Concatenating the segments gives back `text` exactly.
pub fn segment(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut text_start: Option<usize> = None;
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];
        let special = if rest.starts_with(BREAK_TAG) {
            Some((Segment::Boundary(&rest[..BREAK_TAG.len()]), BREAK_TAG.len()))
        } else if let Some(len) = preserved_block_len(rest) {
            Some((Segment::Block(&rest[..len]), len))
        } else {
            match rest.chars().next() {
                Some(c) if BOUNDARY_CHARS.contains(&c) => {
                    Some((Segment::Boundary(&rest[..c.len_utf8()]), c.len_utf8()))
                }
                Some(c) => {
                    text_start.get_or_insert(i);
                    i += c.len_utf8();
                    continue;
                }
                None => None,
            }
        };

        let Some((seg, len)) = special else {
            break;
        };
        if let Some(start) = text_start.take() {
            segments.push(Segment::Text(&text[start..i]));
        }
        segments.push(seg);
        i += len;
    }

    if let Some(start) = text_start {
        segments.push(Segment::Text(&text[start..]));
    }
    segments
}

/// Finds block openers left over after block recognition. Openers inside an
/// emitted block are part of its content.
fn find_unmatched_markup(text: &str, segments: &[Segment<'_>]) -> Vec<MarkupWarning> {
    let mut blocks = Vec::new();
    let mut start = 0;
    for seg in segments {
        let end = start + seg.as_str().len();
        if let Segment::Block(_) = seg {
            blocks.push(start..end);
        }
        start = end;
    }

    let mut warnings: Vec<MarkupWarning> = [(NOTE_MARKUP, MarkupKind::Note), (EXAMPLE_MARKUP, MarkupKind::Example)]
        .iter()
        .flat_map(|&(markup, kind)| text.match_indices(markup).map(move |(offset, _)| MarkupWarning { kind, offset }))
        .filter(|w| !blocks.iter().any(|block| block.contains(&w.offset)))
        .collect();
    warnings.sort_by_key(|w| w.offset);
    warnings
}

/// Converts a meaning line into an HTML fragment, collecting warnings about
/// incomplete block markup.
pub fn format_meaning_with_warnings(text: &str) -> FormattedMeaning {
    let expanded = expand_blocks(text);
    let segments = segment(&expanded);
    let warnings = find_unmatched_markup(&expanded, &segments);

    let mut html = String::with_capacity(expanded.len() * 2);
    for seg in segments {
        match seg {
            Segment::Boundary(s) | Segment::Block(s) => html.push_str(s),
            Segment::Text(s) => {
                html.push_str("<b>");
                html.push_str(s.trim());
                html.push_str("</b>");
            }
        }
    }
    FormattedMeaning { html, warnings }
}

/// Converts a meaning line into an HTML fragment (no wrapping element).
pub fn format_meaning(text: &str) -> String {
    format_meaning_with_warnings(text).html
}
