// src/segment.rs
//
// Line segmenter: carves the input into logical lines.
//
// - A whitespace-only physical line is a blank logical line: no indentation, no content, and it
//   does not count toward line numbers.
// - A line whose first non-blank character is the embedding marker is raw HTML: the marker is
//   dropped and the rest of the line is passed through untouched.
// - Otherwise the first `<` outside embedding spans opens inner text. Bracket depth is counted
//   from there (`<` +1, `>` -1, embedding spans ignored) and further physical lines are joined
//   with a single space until it returns to zero.
// - Without inner text, a trailing `/` outside embedding spans marks the tag self-closing.

use memchr::memchr;

use crate::error::{CompileError, ErrorKind, Result};
use crate::scan::{is_protected, is_ws, unescaped, Cursor, EMBED};

/// One line for parsing purposes; may span several physical lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// 1-based count of non-blank logical lines. A blank line carries the number of the last
    /// non-blank line before it.
    pub number: usize,
    /// Leading spaces/tabs of the first physical line.
    pub indent: String,
    /// Line content without indentation. For raw lines the marker is removed, for markup lines
    /// the content is trimmed and a self-closing `/` is removed.
    pub text: String,
    pub raw: bool,
    /// Offset in `text` of the `<` that opens inner text.
    pub inner_start: Option<usize>,
    pub self_closing: bool,
}

impl LogicalLine {
    pub fn has_inner_text(&self) -> bool {
        self.inner_start.is_some()
    }

    /// Whitespace-only source line. Emits nothing but still closes open tags.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty() && !self.raw && !self.self_closing && self.inner_start.is_none()
    }
}

/// Iterator over the logical lines of a document. Stops after the first error.
#[derive(Debug, Clone)]
pub struct Segmenter<'a> {
    rest: &'a str,
    line_number: usize,
}

impl<'a> Segmenter<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            rest: source,
            line_number: 0,
        }
    }

    #[cfg(test)]
    fn remaining(&self) -> &'a str {
        self.rest
    }

    fn next_physical(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        match memchr(b'\n', self.rest.as_bytes()) {
            Some(p) => {
                let line = &self.rest[..p];
                self.rest = &self.rest[p + 1..];
                Some(line)
            }
            None => {
                let line = self.rest;
                self.rest = "";
                Some(line)
            }
        }
    }

    fn error(&mut self, kind: ErrorKind) -> CompileError {
        self.rest = "";
        CompileError::new(kind, self.line_number)
    }

    fn markup_line(&mut self, indent: &str, content: &str) -> Result<LogicalLine> {
        let inner_start = find_inner_start(content).map_err(|k| self.error(k))?;

        let Some(start) = inner_start else {
            let (text, self_closing) = match strip_self_closing(content) {
                Some(body) => (body, true),
                None => (content, false),
            };
            return Ok(LogicalLine {
                number: self.line_number,
                indent: indent.to_string(),
                text: text.to_string(),
                raw: false,
                inner_start: None,
                self_closing,
            });
        };

        let mut text = content.to_string();
        let mut depth = track_depth(&content[start..], 0).map_err(|k| self.error(k))?;
        while depth > 0 {
            let Some(next) = self.next_physical() else {
                return Err(self.error(ErrorKind::UnmatchedOpenBracket));
            };
            let next = next.trim();
            if next.is_empty() {
                continue;
            }
            text.push(' ');
            text.push_str(next);
            depth = track_depth(next, depth).map_err(|k| self.error(k))?;
        }

        Ok(LogicalLine {
            number: self.line_number,
            indent: indent.to_string(),
            text,
            raw: false,
            inner_start: Some(start),
            self_closing: false,
        })
    }
}

impl<'a> Iterator for Segmenter<'a> {
    type Item = Result<LogicalLine>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.next_physical()?.trim_end();
        let content = line.trim_start_matches([' ', '\t']);
        if content.is_empty() {
            return Some(Ok(LogicalLine {
                number: self.line_number,
                indent: String::new(),
                text: String::new(),
                raw: false,
                inner_start: None,
                self_closing: false,
            }));
        }
        self.line_number += 1;
        let indent = &line[..line.len() - content.len()];

        if content.as_bytes()[0] == EMBED {
            return Some(Ok(LogicalLine {
                number: self.line_number,
                indent: indent.to_string(),
                text: content[1..].to_string(),
                raw: true,
                inner_start: None,
                self_closing: false,
            }));
        }

        Some(self.markup_line(indent, content))
    }
}

/* ============================ Inner text start =========================== */

/// Offset of the `<` opening inner text. Expression values directly after `=` (`={{ }}`,
/// `=<% %>`) and embedding spans are stepped over.
fn find_inner_start(content: &str) -> std::result::Result<Option<usize>, ErrorKind> {
    let mut cur = Cursor::new(content);
    while let Some(b) = cur.peek() {
        match b {
            EMBED => {
                cur.skip_embedding();
            }
            b'=' => {
                cur.advance(1);
                for (open, close) in [("{{", "}}"), ("<%", "%>")] {
                    if cur.starts_with(open) && cur.match_delimiter(open, close).is_none() {
                        return Err(ErrorKind::UnmatchedExpressionDelimiter);
                    }
                }
            }
            b'<' => return Ok(Some(cur.pos())),
            _ => cur.advance(1),
        }
    }
    Ok(None)
}

/// Adds the bracket balance of `text` to `depth`.
fn track_depth(text: &str, mut depth: usize) -> std::result::Result<usize, ErrorKind> {
    for (_, b) in unescaped(text) {
        match b {
            b'<' => depth += 1,
            b'>' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or(ErrorKind::TooManyClosingBrackets)?;
            }
            _ => {}
        }
    }
    Ok(depth)
}

/// Line text for a self-closing line, or `None` when `content` has no trailing `/` outside
/// embedding spans. The `/` is dropped when it follows whitespace or ends a lone selector
/// (`br/`); directly after an attribute value it stays in the value.
fn strip_self_closing(content: &str) -> Option<&str> {
    let body = content.strip_suffix('/')?;
    if is_protected(content, body.len()) {
        return None;
    }
    let trimmed = body.trim_end();
    let detached = trimmed.len() < body.len() || !body.bytes().any(is_ws);
    Some(if detached { trimmed } else { content })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(source: &str) -> LogicalLine {
        Segmenter::new(source).next().unwrap().unwrap()
    }

    #[test]
    fn takes_one_physical_line() {
        let mut seg = Segmenter::new("div\ndiv");
        let line = seg.next().unwrap().unwrap();
        assert_eq!(line.text, "div");
        assert_eq!(seg.remaining(), "div");
    }

    #[test]
    fn keeps_attributes_on_the_line() {
        let mut seg = Segmenter::new("div.class#id data-val=val data-val2=val2\ndiv\n");
        let line = seg.next().unwrap().unwrap();
        assert_eq!(line.text, "div.class#id data-val=val data-val2=val2");
        assert_eq!(seg.remaining(), "div\n");
    }

    #[test]
    fn detects_inline_inner_text() {
        let line = first("div.class#id data-val=val <Content goes here>\ndiv");
        assert_eq!(line.text, "div.class#id data-val=val <Content goes here>");
        assert_eq!(line.inner_start, Some(26));
        assert!(!line.raw);
    }

    #[test]
    fn self_closing_drops_marker() {
        let line = first("input.class#id type=text value=Content goes here / \ndiv");
        assert_eq!(line.text, "input.class#id type=text value=Content goes here");
        assert!(line.self_closing);
    }

    #[test]
    fn selector_only_self_closing() {
        let line = first("br/");
        assert_eq!(line.text, "br");
        assert!(line.self_closing);
    }

    #[test]
    fn slash_ending_a_value_self_closes_and_stays_in_the_value() {
        let line = first("input type=text value=hi/");
        assert_eq!(line.text, "input type=text value=hi/");
        assert!(line.self_closing);

        let line = first("a href=/");
        assert_eq!(line.text, "a href=/");
        assert!(line.self_closing);
    }

    #[test]
    fn lone_slash_is_self_closing_with_no_selector() {
        let line = first("/");
        assert_eq!(line.text, "");
        assert!(line.self_closing);
        assert!(!line.is_blank());
    }

    #[test]
    fn slash_inside_embedding_is_not_self_closing() {
        let line = first("a href=`/`");
        assert!(!line.self_closing);
        let line = first("a href=`x/");
        assert!(!line.self_closing);
    }

    #[test]
    fn joins_multiline_inner_text() {
        let mut seg = Segmenter::new("div.class#id data-val=val <Content goes\n   here>\ndiv");
        let line = seg.next().unwrap().unwrap();
        assert_eq!(line.text, "div.class#id data-val=val <Content goes here>");
        assert!(line.has_inner_text());
        assert_eq!(seg.remaining(), "div");
    }

    #[test]
    fn protected_brackets_do_not_count() {
        let line = first(
            "    div.class#id data-val=val data-val2=`<%= val2 %>` <Content `<i>haya!</i>` goes\nhere>\ndiv",
        );
        assert_eq!(
            line.text,
            "div.class#id data-val=val data-val2=`<%= val2 %>` <Content `<i>haya!</i>` goes here>"
        );
        assert_eq!(line.indent, "    ");
        assert_eq!(&line.text[line.inner_start.unwrap()..][..8], "<Content");
    }

    #[test]
    fn bare_expression_value_is_not_inner_text() {
        let line = first("div data-val=<%= val %> <Hi>");
        assert_eq!(&line.text[line.inner_start.unwrap()..], "<Hi>");
    }

    #[test]
    fn unclosed_inner_text_fails() {
        let err = Segmenter::new("p\ndiv.class#id data-val=val <Content goes\nhere\ndiv")
            .nth(1)
            .unwrap()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnmatchedOpenBracket);
        assert_eq!(err.line(), 2);
    }

    #[test]
    fn extra_closing_bracket_fails() {
        let err = first_err("div <a> b>");
        assert_eq!(err.kind(), ErrorKind::TooManyClosingBrackets);
    }

    #[test]
    fn unclosed_expression_fails() {
        let err = first_err("div data-val=<%= val");
        assert_eq!(err.kind(), ErrorKind::UnmatchedExpressionDelimiter);
    }

    #[test]
    fn raw_line_strips_leading_marker() {
        let line = first("`<div class='class' id='id'>Content goes here</div>\ndiv");
        assert_eq!(line.text, "<div class='class' id='id'>Content goes here</div>");
        assert!(line.raw);
    }

    #[test]
    fn blank_lines_are_kept_but_not_counted() {
        let lines: Vec<_> = Segmenter::new("\n   \na\n\n\tb\n")
            .map(|l| l.unwrap())
            .collect();
        let blank: Vec<_> = lines.iter().map(LogicalLine::is_blank).collect();
        assert_eq!(blank, vec![true, true, false, true, false]);
        assert_eq!(lines[1].indent, "");
        assert_eq!(lines[3].number, 1);
        assert_eq!(lines[4].number, 2);
        assert_eq!(lines[4].indent, "\t");
    }

    #[test]
    fn blank_lines_inside_inner_text_are_joined_away() {
        let mut seg = Segmenter::new("p <a\n\n  b>\ndiv");
        let line = seg.next().unwrap().unwrap();
        assert_eq!(line.text, "p <a b>");
        assert_eq!(seg.remaining(), "div");
    }

    #[test]
    fn stops_after_error() {
        let mut seg = Segmenter::new("div <x\n");
        assert!(seg.next().unwrap().is_err());
        assert!(seg.next().is_none());
    }

    fn first_err(source: &str) -> CompileError {
        Segmenter::new(source).next().unwrap().unwrap_err()
    }
}
