// src/emit.rs
//
// HTML emitter. Each emitted unit (open tag, closing tag, inline element, raw line) goes on its
// own line with indentation; in compress mode both indentation and newline are left out.
// Attribute values and inner text are written as given, never escaped.

use crate::attributes::Attribute;
use crate::selector::Selector;

#[derive(Debug, Clone, Default)]
pub struct Emitter {
    out: String,
    compress: bool,
}

impl Emitter {
    #[cfg(test)]
    fn new(compress: bool) -> Self {
        Self {
            out: String::new(),
            compress,
        }
    }

    pub fn with_capacity(compress: bool, capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
            compress,
        }
    }

    pub fn output(&self) -> &str {
        &self.out
    }

    pub fn into_output(self) -> String {
        self.out
    }

    /// `<tag id=".." class="..">`, kept open.
    pub fn open(&mut self, indent: &str, selector: &Selector, attrs: &[Attribute]) {
        self.unit(indent, |out| {
            start_tag(out, selector, attrs);
            out.push('>');
        });
    }

    /// `<tag ... />`
    pub fn self_closing(&mut self, indent: &str, selector: &Selector, attrs: &[Attribute]) {
        self.unit(indent, |out| {
            start_tag(out, selector, attrs);
            out.push_str(" />");
        });
    }

    /// `<tag ...>text</tag>` on one line.
    pub fn inline(&mut self, indent: &str, selector: &Selector, attrs: &[Attribute], text: &str) {
        self.unit(indent, |out| {
            start_tag(out, selector, attrs);
            out.push('>');
            out.push_str(text);
            end_tag(out, &selector.tag);
        });
    }

    pub fn close(&mut self, indent: &str, name: &str) {
        self.unit(indent, |out| end_tag(out, name));
    }

    pub fn raw(&mut self, indent: &str, text: &str) {
        self.unit(indent, |out| out.push_str(text));
    }

    fn unit(&mut self, indent: &str, body: impl FnOnce(&mut String)) {
        if !self.compress {
            self.out.push_str(indent);
        }
        body(&mut self.out);
        if !self.compress {
            self.out.push('\n');
        }
    }
}

/// Everything of a start tag but its closing `>`.
fn start_tag(out: &mut String, selector: &Selector, attrs: &[Attribute]) {
    out.push('<');
    out.push_str(&selector.tag);
    if let Some(id) = &selector.id {
        push_attr(out, "id", id);
    }
    if !selector.classes.is_empty() {
        push_attr(out, "class", &selector.classes.join(" "));
    }
    for attr in attrs {
        push_attr(out, &attr.key, &attr.value);
    }
}

fn push_attr(out: &mut String, key: &str, value: &str) {
    out.push(' ');
    out.push_str(key);
    out.push_str("=\"");
    out.push_str(value);
    out.push('"');
}

fn end_tag(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}
