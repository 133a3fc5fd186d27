// src/attributes.rs
//
// Attribute list: `key=value key2=value2 ...`, values unquoted.
//
// - A value starting with a backtick runs to the closing backtick; the markers are dropped.
// - A value starting with `{{` or `<%` runs through `}}` / `%>`, kept verbatim.
// - Otherwise a value ends at the last whitespace before the next `=` (the one that starts the
//   next key). An `=` with no whitespace before it since the current `=` is part of the value.
//   Embedding spans and expressions are skipped when looking for that next `=`.
// - Trailing text without `=` is dropped.

use memchr::memchr;

use crate::error::ErrorKind;
use crate::scan::{is_ws, remove_markers, Cursor, EMBED};

const EXPRESSIONS: [(&str, &str); 2] = [("{{", "}}"), ("<%", "%>")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub key: String,
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

pub fn parse_attributes(text: &str) -> Result<Vec<Attribute>, ErrorKind> {
    let mut attrs = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        let Some(eq) = memchr(b'=', rest.as_bytes()) else {
            break;
        };
        if memchr(EMBED, &rest.as_bytes()[..eq]).is_some() {
            return Err(ErrorKind::EmbeddingBeforeAssignment);
        }

        let end = token_end(rest, eq)?;
        let token = &rest[..end];
        rest = rest[end..].trim_start();

        let token = token.trim_end();
        let key = token[..eq].trim();
        let value = remove_markers(&token[eq + 1..]);
        attrs.push(Attribute::new(key, value));
    }

    Ok(attrs)
}

/// End offset of the attribute whose `=` is at `eq`.
fn token_end(rest: &str, eq: usize) -> Result<usize, ErrorKind> {
    let mut cur = Cursor::at(rest, eq + 1);

    if cur.peek() == Some(EMBED) {
        return if cur.skip_embedding() {
            Ok(cur.pos())
        } else {
            Err(ErrorKind::UnmatchedEmbeddingMarker)
        };
    }
    for (open, close) in EXPRESSIONS {
        if cur.starts_with(open) {
            return cur
                .match_delimiter(open, close)
                .ok_or(ErrorKind::UnmatchedExpressionDelimiter);
        }
    }

    let bytes = rest.as_bytes();
    while let Some(next_eq) = next_assignment(&mut cur) {
        if let Some(ws) = bytes[eq + 1..next_eq].iter().rposition(|&b| is_ws(b)) {
            return Ok(eq + 1 + ws);
        }
        cur.advance(1);
    }
    Ok(rest.len())
}

/// Moves to the next `=` outside embedding spans and expressions.
fn next_assignment(cur: &mut Cursor<'_>) -> Option<usize> {
    'scan: while let Some(b) = cur.peek() {
        match b {
            b'=' => return Some(cur.pos()),
            EMBED => {
                cur.skip_embedding();
            }
            _ => {
                for (open, close) in EXPRESSIONS {
                    if cur.starts_with(open) && cur.match_delimiter(open, close).is_some() {
                        continue 'scan;
                    }
                }
                cur.advance(1);
            }
        }
    }
    None
}
