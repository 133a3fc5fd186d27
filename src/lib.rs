//! WieldyMarkup to HTML compiler.
//!
//! WieldyMarkup is an indentation-based shorthand for HTML templates. Each line describes one
//! element; nesting follows indentation:
//!
//! ```text
//! div#main.content
//!   h1 <Welcome>
//!   a.button href=/signup data-id={{ user.id }} <Sign up>
//!   input type=text name=q /
//!   ul \-\ li <one line, two nested tags>
//!   `<p>raw HTML, passed through untouched</p>
//! ```
//!
//! - `tag#id.class.class` selector; a leading `#` or `.` means `div`.
//! - `key=value` attributes, unquoted. Values wrapped in backticks, `{{ }}` or `<% %>` may
//!   contain whitespace and `=`.
//! - `<...>` inner text, which may continue over several lines until its brackets balance.
//! - A trailing ` /` makes the element self-closing.
//! - `\-\` chains several elements on one line, each nested in the previous one.
//! - A line starting with a backtick is copied to the output as is (minus the backtick).
//!
//! The compiler works on a whole document in memory and either returns the complete HTML or
//! the first error, with its line number. It keeps no state between calls, so documents can be
//! compiled in parallel by simply calling [`compile`] from several threads.
//!
//! The [`batch`] module holds the file-system side: reading sources, writing `.html` files next
//! to them and walking directories.

pub mod attributes;
pub mod batch;
mod compiler;
pub mod emit;
pub mod error;
pub mod indent;
pub mod line;
pub mod scan;
pub mod segment;
pub mod selector;
pub mod stack;

pub use error::{CompileError, ErrorKind, Result};

/// Output formatting for one compile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Leave out indentation and line breaks between emitted tags.
    pub compress: bool,
}

impl CompileOptions {
    pub fn compressed() -> Self {
        Self { compress: true }
    }
}

/// A reusable compiler configured with [`CompileOptions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    pub fn compile(&self, source: &str) -> Result<String> {
        compiler::run(source, self.options)
    }
}

/// Compiles a whole WieldyMarkup document to HTML.
pub fn compile(source: &str, compress: bool) -> Result<String> {
    Compiler::new(CompileOptions { compress }).compile(source)
}
