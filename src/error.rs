// src/error.rs
//
// Compile errors. Every failure aborts the whole compile and carries the number of the
// logical line that was being processed when it was detected.

use thiserror::Error;

/// The kinds of syntax error the compiler can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Inner text opened with `<` but the input ended before the matching `>`.
    #[error("unmatched '<': inner text is never closed")]
    UnmatchedOpenBracket,

    /// Inner text has more `>` than `<`.
    #[error("too many closing '>' in inner text")]
    TooManyClosingBrackets,

    /// A backtick-protected attribute value is never closed.
    #[error("unmatched '`' in attribute value")]
    UnmatchedEmbeddingMarker,

    /// A backtick appears before the first `=` of the attribute list.
    #[error("'`' found before any '=' in attributes")]
    EmbeddingBeforeAssignment,

    /// `{{` or `<%` without its `}}` / `%>`.
    #[error("unmatched expression delimiter ('{{{{' or '<%')")]
    UnmatchedExpressionDelimiter,
}

/// A compile failure tied to the logical line it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct CompileError {
    line: usize,
    kind: ErrorKind,
}

impl CompileError {
    pub fn new(kind: ErrorKind, line: usize) -> Self {
        Self { line, kind }
    }

    /// 1-based number of the logical line the error was detected on.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
