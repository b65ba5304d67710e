//! Segment list of a parsed template and its rendering.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;

use super::scanner::Piece;
use crate::placeholder::{Index, Placeholder, PlaceholderMap};

/// One segment of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
    /// Literal SQL.
    Text(String),
    /// A placeholder occurrence.
    Slot(Index),
    /// An optional block, without its markers.
    Optional(Vec<Segment>),
}

/// Appends `text`, merging it into a trailing text segment.
fn push_text(segments: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Segment::Text(last)) = segments.last_mut() {
        last.push_str(text);
    } else {
        segments.push(Segment::Text(text.into()));
    }
}

fn extend(segments: &mut Vec<Segment>, body: Vec<Segment>) {
    for segment in body {
        match segment {
            Segment::Text(text) => push_text(segments, &text),
            other => segments.push(other),
        }
    }
}

struct Block<'a> {
    open: &'a str,
    body: Vec<Segment>,
}

/// The segment list new content goes to: the open block, if any.
fn target<'s>(
    block: &'s mut Option<Block<'_>>,
    segments: &'s mut Vec<Segment>,
) -> &'s mut Vec<Segment> {
    match block {
        Some(block) => &mut block.body,
        None => segments,
    }
}

/// Builds the segment list, pairing each marker with its index from `slots`.
///
/// A block runs from an open marker to the first following close marker. A
/// block without any placeholder is plain SQL and keeps its markers, as does an
/// unterminated block.
pub(crate) fn build<'a, I>(pieces: &[Piece<'a>], slots: I) -> Vec<Segment>
where
    I: IntoIterator<Item = Index>,
{
    let mut slots = slots.into_iter();
    let mut segments = Vec::new();
    let mut block: Option<Block<'a>> = None;

    for piece in pieces {
        match *piece {
            Piece::Text(text) => push_text(target(&mut block, &mut segments), text),
            Piece::Marker(_) => {
                if let Some(index) = slots.next() {
                    target(&mut block, &mut segments).push(Segment::Slot(index));
                }
            }
            Piece::Open(open) => {
                if let Some(current) = block.as_mut() {
                    push_text(&mut current.body, open);
                } else {
                    block = Some(Block {
                        open,
                        body: Vec::new(),
                    });
                }
            }
            Piece::Close(close) => match block.take() {
                Some(Block { body, .. })
                    if body.iter().any(|s| matches!(s, Segment::Slot(_))) =>
                {
                    segments.push(Segment::Optional(body));
                }
                Some(Block { open, body }) => {
                    push_text(&mut segments, open);
                    extend(&mut segments, body);
                    push_text(&mut segments, close);
                }
                None => push_text(&mut segments, close),
            },
        }
    }
    if let Some(Block { open, body }) = block {
        push_text(&mut segments, open);
        extend(&mut segments, body);
    }
    segments
}

/// Writes the canonical form: every slot as `{index}`, blocks with their markers.
pub(crate) fn canonical(segments: &[Segment], open: &str, close: &str) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Slot(index) => out.push_str(&index.token()),
            Segment::Optional(body) => {
                out.push_str(open);
                out.push_str(&canonical(body, open, close));
                out.push_str(close);
            }
        }
    }
    out
}

/// Indices whose every occurrence lies inside an optional block.
pub(crate) fn conditional(segments: &[Segment]) -> HashMap<&Index, bool> {
    let mut inside: HashMap<&Index, bool> = HashMap::new();
    for segment in segments {
        match segment {
            Segment::Slot(index) => {
                inside.insert(index, false);
            }
            Segment::Optional(body) => {
                for segment in body {
                    if let Segment::Slot(index) = segment {
                        inside.entry(index).or_insert(true);
                    }
                }
            }
            Segment::Text(_) => {}
        }
    }
    inside
}

fn is_bound(segments: &[Segment], placeholders: &PlaceholderMap) -> bool {
    segments.iter().all(|segment| match segment {
        Segment::Slot(index) => placeholders
            .get(index)
            .is_some_and(|placeholder| placeholder.value().is_some()),
        _ => true,
    })
}

/// Renders `segments` with the values currently bound in `placeholders`.
///
/// An unbound slot outside a block renders as nothing; a block with an unbound
/// slot is dropped whole.
pub(crate) fn render(segments: &[Segment], placeholders: &PlaceholderMap, out: &mut String) {
    for segment in segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Slot(index) => {
                if let Some(value) = placeholders.get(index).and_then(Placeholder::value) {
                    out.push_str(value);
                }
            }
            Segment::Optional(body) => {
                if is_bound(body, placeholders) {
                    render(body, placeholders, out);
                }
            }
        }
    }
}
