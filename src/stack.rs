// src/stack.rs
//
// Stack of block tags still waiting for their closing tag. Levels strictly increase from bottom
// to top: a tag is only pushed after everything at its level or deeper has been closed.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenTag {
    pub level: usize,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagStack {
    open: Vec<OpenTag>,
}

impl TagStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, level: usize, name: impl Into<String>) {
        debug_assert!(self.open.last().map_or(true, |top| top.level < level));
        self.open.push(OpenTag {
            level,
            name: name.into(),
        });
    }

    /// Pops the top tag if its level is `level` or deeper.
    pub fn pop_at_or_above(&mut self, level: usize) -> Option<OpenTag> {
        if self.open.last()?.level >= level {
            self.open.pop()
        } else {
            None
        }
    }

    pub fn pop(&mut self) -> Option<OpenTag> {
        self.open.pop()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.open.len()
    }

    pub fn levels(&self) -> impl Iterator<Item = usize> + '_ {
        self.open.iter().map(|t| t.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_only_at_or_above_level() {
        let mut stack = TagStack::new();
        stack.push(0, "div");
        stack.push(1, "ul");
        stack.push(2, "li");

        assert_eq!(stack.pop_at_or_above(1).map(|t| t.name), Some("li".into()));
        assert_eq!(stack.pop_at_or_above(1).map(|t| t.name), Some("ul".into()));
        assert_eq!(stack.pop_at_or_above(1), None);
        assert_eq!(stack.levels().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn pop_drains_in_reverse_order() {
        let mut stack = TagStack::new();
        stack.push(0, "a");
        stack.push(3, "b");
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.pop().map(|t| t.level), Some(3));
        assert_eq!(stack.pop().map(|t| t.level), Some(0));
        assert!(stack.is_empty());
    }
}
