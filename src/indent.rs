// src/indent.rs
//
// Indentation tracker. The first non-empty indentation seen becomes the indent unit for the
// rest of the document; levels are whole repetitions of that unit, and any leftover that is not
// a full unit is ignored.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndentTracker {
    unit: Option<String>,
}

impl IndentTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The discovered unit, or "" before any indented line.
    pub fn unit(&self) -> &str {
        self.unit.as_deref().unwrap_or("")
    }

    /// Nesting level of a line with the given leading whitespace.
    pub fn level(&mut self, leading: &str) -> usize {
        if leading.is_empty() {
            return 0;
        }
        if self.unit.is_none() {
            self.unit = Some(leading.to_string());
            return 1;
        }

        let unit = self.unit();
        let mut rest = leading;
        let mut level = 0usize;
        while let Some(tail) = rest.strip_prefix(unit) {
            level += 1;
            rest = tail;
        }
        level
    }

    /// Indentation for a line at `level`.
    pub fn indentation(&self, level: usize) -> String {
        self.unit().repeat(level)
    }
}
