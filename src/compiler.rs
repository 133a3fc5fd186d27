// src/compiler.rs
//
// The compile loop. For each logical line:
//
//   1. compute its level from the indentation;
//   2. if the level did not increase, close every open tag at that level or deeper;
//   3. emit the raw line, or each tag of the line (chained tags nest one level per segment).
//      Blank lines sit at level 0 and emit nothing, so they only close;
//
// and once the input is exhausted, close whatever is still open, innermost first.

use crate::attributes::parse_attributes;
use crate::emit::Emitter;
use crate::error::{CompileError, ErrorKind, Result};
use crate::indent::IndentTracker;
use crate::line::{segments, Content};
use crate::segment::{LogicalLine, Segmenter};
use crate::selector::parse_selector;
use crate::stack::TagStack;
use crate::CompileOptions;

/// Everything one compile call mutates.
#[derive(Debug)]
pub(crate) struct CompileState {
    indent: IndentTracker,
    current_level: usize,
    previous_level: Option<usize>,
    open: TagStack,
    emitter: Emitter,
}

impl CompileState {
    pub(crate) fn new(options: CompileOptions, capacity: usize) -> Self {
        Self {
            indent: IndentTracker::new(),
            current_level: 0,
            previous_level: None,
            open: TagStack::new(),
            emitter: Emitter::with_capacity(options.compress, capacity),
        }
    }

    pub(crate) fn process(&mut self, line: &LogicalLine) -> Result<()> {
        self.previous_level = Some(self.current_level);
        self.current_level = self.indent.level(&line.indent);
        self.close_finished();

        if line.is_blank() {
            return Ok(());
        }
        if line.raw {
            let indent = self.indent.indentation(self.current_level);
            self.emitter.raw(&indent, &line.text);
            return Ok(());
        }

        self.emit_tags(line)
            .map_err(|kind| CompileError::new(kind, line.number))
    }

    fn emit_tags(&mut self, line: &LogicalLine) -> std::result::Result<(), ErrorKind> {
        let segs = segments(line);
        let last = segs.len().saturating_sub(1);

        for (i, seg) in segs.into_iter().enumerate() {
            let selector = parse_selector(seg.selector);
            let attrs = parse_attributes(seg.attributes)?;
            let indent = self.indent.indentation(self.current_level);

            match &seg.content {
                Content::Block => {
                    self.emitter.open(&indent, &selector, &attrs);
                    self.open.push(self.current_level, selector.tag);
                }
                Content::InnerText(text) => {
                    self.emitter.inline(&indent, &selector, &attrs, text);
                }
                Content::SelfClosing => {
                    self.emitter.self_closing(&indent, &selector, &attrs);
                }
            }

            if i < last {
                self.current_level += 1;
            }
        }
        Ok(())
    }

    /// Closes tags the current line is not nested in. An indentation increase never closes.
    fn close_finished(&mut self) {
        let Some(previous) = self.previous_level else {
            return;
        };
        if self.current_level > previous {
            return;
        }
        while let Some(tag) = self.open.pop_at_or_above(self.current_level) {
            let indent = self.indent.indentation(tag.level);
            self.emitter.close(&indent, &tag.name);
        }
    }

    pub(crate) fn finish(mut self) -> String {
        while let Some(tag) = self.open.pop() {
            let indent = self.indent.indentation(tag.level);
            self.emitter.close(&indent, &tag.name);
        }
        self.emitter.into_output()
    }

    #[cfg(test)]
    fn open_levels(&self) -> Vec<usize> {
        self.open.levels().collect()
    }
}

pub(crate) fn run(source: &str, options: CompileOptions) -> Result<String> {
    let mut state = CompileState::new(options, source.len() + source.len() / 2);
    for line in Segmenter::new(source) {
        state.process(&line?)?;
    }
    Ok(state.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> CompileState {
        CompileState::new(CompileOptions::default(), 0)
    }

    fn feed(state: &mut CompileState, source: &str) {
        for line in Segmenter::new(source) {
            state.process(&line.unwrap()).unwrap();
        }
    }

    #[test]
    fn closes_deeper_tags_on_dedent() {
        let mut st = state();
        feed(&mut st, "div\n  div\n    span\n");
        assert_eq!(st.open_levels(), vec![0, 1, 2]);

        feed(&mut st, "p\n");
        assert_eq!(st.open_levels(), vec![0]);
        assert_eq!(
            st.emitter.output(),
            "<div>\n  <div>\n    <span>\n    </span>\n  </div>\n</div>\n<p>\n"
        );
    }

    #[test]
    fn closes_sibling_at_same_level() {
        let mut st = state();
        feed(&mut st, "ul\n  li\n  li\n");
        assert_eq!(st.open_levels(), vec![0, 1]);
        assert_eq!(st.finish(), "<ul>\n  <li>\n  </li>\n  <li>\n  </li>\n</ul>\n");
    }

    #[test]
    fn inline_and_self_closing_are_never_pushed() {
        let mut st = state();
        feed(&mut st, "p <x>\nbr /\n");
        assert!(st.open_levels().is_empty());
    }

    #[test]
    fn chain_opens_one_level_per_segment() {
        let mut st = state();
        feed(&mut st, "ul \\-\\ li \\-\\ a <Home>\n");
        assert_eq!(st.open_levels(), vec![0, 1]);
        assert_eq!(st.current_level, 2);
        assert_eq!(
            st.finish(),
            "<ul>\n<li>\n<a>Home</a>\n</li>\n</ul>\n"
        );
    }

    #[test]
    fn blank_line_closes_everything() {
        let mut st = state();
        feed(&mut st, "div\n  ul\n    li <x>\n");
        assert_eq!(st.open_levels(), vec![0, 1]);

        feed(&mut st, "\n");
        assert!(st.open_levels().is_empty());
        assert_eq!(st.current_level, 0);

        feed(&mut st, "  p\n");
        assert_eq!(st.open_levels(), vec![1]);
    }

    #[test]
    fn separator_only_line_emits_nothing() {
        let mut st = state();
        feed(&mut st, "div\n  \\-\\\n");
        assert_eq!(st.open_levels(), vec![0]);
        assert_eq!(st.finish(), "<div>\n</div>\n");
    }

    #[test]
    fn errors_carry_line_number() {
        let err = run("div\n  a x=`y\n", CompileOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnmatchedEmbeddingMarker);
        assert_eq!(err.line(), 2);
    }
}
