// src/line.rs
//
// Splits a markup line into the tags it describes.
//
// A line is `selector attributes [<inner text>]`, optionally preceded by further
// `selector attributes` segments joined with `\-\`. Leading segments are always block tags;
// only the last one can carry inner text or be self-closing. Empty segments are dropped.

use crate::scan::{remove_markers, split_unescaped, TAG_SEPARATOR};
use crate::segment::LogicalLine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Opened now, closed when indentation returns to its level.
    Block,
    InnerText(String),
    SelfClosing,
}

/// One tag of a line, before selector and attribute parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub selector: &'a str,
    pub attributes: &'a str,
    pub content: Content,
}

pub fn segments(line: &LogicalLine) -> Vec<Segment<'_>> {
    let text = line.text.as_str();
    let (head, inner) = match line.inner_start {
        Some(start) => (&text[..start], Some(&text[start..])),
        None => (text, None),
    };

    let mut parts = split_unescaped(head, TAG_SEPARATOR);
    if parts.len() > 1 {
        parts.retain(|part| !part.trim().is_empty());
    }
    let last = parts.len().saturating_sub(1);
    parts
        .into_iter()
        .enumerate()
        .map(|(i, part)| {
            let (selector, attributes) = split_selector(part);
            let content = match (i == last, inner) {
                (true, Some(inner)) => Content::InnerText(inner_text(inner)),
                (true, None) if line.self_closing => Content::SelfClosing,
                _ => Content::Block,
            };
            Segment {
                selector,
                attributes,
                content,
            }
        })
        .collect()
}

/// Selector token and the attribute text after it.
fn split_selector(part: &str) -> (&str, &str) {
    let part = part.trim();
    match part.find(char::is_whitespace) {
        Some(i) => (&part[..i], part[i..].trim()),
        None => (part, ""),
    }
}

/// Inner text without its outer `<` `>` and embedding markers.
fn inner_text(raw: &str) -> String {
    let raw = raw.trim();
    let raw = raw.strip_prefix('<').unwrap_or(raw);
    let raw = raw.strip_suffix('>').unwrap_or(raw);
    remove_markers(raw.trim())
}
