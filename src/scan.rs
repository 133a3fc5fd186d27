// src/scan.rs
//
// Low-level scanning shared by the segmenter and the sub-parsers.
//
// - Every delimiter of the grammar is ASCII, so the byte offsets produced here always fall on
//   char boundaries and can be used to slice the `&str` they came from.
// - Embedding spans: successive backticks alternate between opening and closing a protected
//   span, per line. An unmatched backtick protects up to the end of the text.

use memchr::{memchr, memchr_iter, memmem};

/// The embedding marker.
pub const EMBED: u8 = b'`';

/// Multi-tag-per-line separator.
pub const TAG_SEPARATOR: &str = "\\-\\";

/* ================================ Cursor ================================= */

/// Forward-only cursor over a line with peek/advance and named scan routines.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn at(src: &'a str, pos: usize) -> Self {
        Self {
            src,
            pos: pos.min(src.len()),
        }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.src.len());
    }

    #[inline]
    pub fn starts_with(&self, pat: &str) -> bool {
        self.src.as_bytes()[self.pos..].starts_with(pat.as_bytes())
    }

    /// Moves to the next occurrence of `byte` and returns its offset. The cursor does not move
    /// when `byte` is absent.
    pub fn scan_until(&mut self, byte: u8) -> Option<usize> {
        let found = memchr(byte, &self.src.as_bytes()[self.pos..])?;
        self.pos += found;
        Some(self.pos)
    }

    /// With the cursor on `open`, finds the matching `close` and moves just past it, returning
    /// that offset. The cursor does not move when `close` is missing.
    pub fn match_delimiter(&mut self, open: &str, close: &str) -> Option<usize> {
        if !self.starts_with(open) {
            return None;
        }
        let from = self.pos + open.len();
        let found = memmem::find(&self.src.as_bytes()[from..], close.as_bytes())?;
        self.pos = from + found + close.len();
        Some(self.pos)
    }

    /// With the cursor on a backtick, moves past the closing backtick, or to the end of the
    /// text when there is none. Returns whether the span was closed.
    pub fn skip_embedding(&mut self) -> bool {
        self.advance(1);
        match self.scan_until(EMBED) {
            Some(_) => {
                self.advance(1);
                true
            }
            None => {
                self.pos = self.src.len();
                false
            }
        }
    }
}

/* ============================ Embedding spans ============================ */

/// Text outside embedding spans, markers and span contents removed.
pub fn strip_embedded(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut keep = true;
    while let Some(p) = memchr(EMBED, rest.as_bytes()) {
        if keep {
            out.push_str(&rest[..p]);
        }
        rest = &rest[p + 1..];
        keep = !keep;
    }
    if keep {
        out.push_str(rest);
    }
    out
}

/// Drops the embedding markers, keeping whatever they protected.
pub fn remove_markers(text: &str) -> String {
    if memchr(EMBED, text.as_bytes()).is_none() {
        return text.to_string();
    }
    text.replace(EMBED as char, "")
}

/// Whether byte offset `idx` lies inside an embedding span (or is its opening marker).
pub fn is_protected(text: &str, idx: usize) -> bool {
    let end = idx.min(text.len());
    memchr_iter(EMBED, &text.as_bytes()[..end]).count() % 2 == 1
}

/// Bytes outside embedding spans together with their offsets. Markers are not yielded.
pub fn unescaped(text: &str) -> impl Iterator<Item = (usize, u8)> + '_ {
    let mut protected = false;
    text.bytes().enumerate().filter_map(move |(i, b)| {
        if b == EMBED {
            protected = !protected;
            None
        } else if protected {
            None
        } else {
            Some((i, b))
        }
    })
}

/// First offset of `pat` that is not inside an embedding span.
pub fn find_unescaped(text: &str, pat: &str) -> Option<usize> {
    memmem::find_iter(text.as_bytes(), pat.as_bytes()).find(|&i| !is_protected(text, i))
}

/// Splits `text` at every unescaped occurrence of `sep`.
pub fn split_unescaped<'a>(text: &'a str, sep: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut start = 0usize;
    while let Some(off) = find_unescaped(&text[start..], sep) {
        // parity restarts at `start`, which is always outside a span
        parts.push(&text[start..start + off]);
        start += off + sep.len();
    }
    parts.push(&text[start..]);
    parts
}

#[inline]
pub fn is_ws(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' || b == 0x0b || b == 0x0c
}
