// src/selector.rs
//
// Selector shorthand: `tag#id.class.class`.
//
// - A leading `#` or `.` means the tag is `div`.
// - Each `#x` replaces the id (last one wins); each `.x` appends a class, in order, duplicates
//   kept.

use memchr::memchr2;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

pub fn parse_selector(token: &str) -> Selector {
    let split = memchr2(b'#', b'.', token.as_bytes());
    let tag = match split {
        Some(0) => "div",
        Some(i) => &token[..i],
        None => token,
    };

    let mut selector = Selector {
        tag: tag.to_string(),
        ..Selector::default()
    };

    let mut rest = &token[split.unwrap_or(token.len())..];
    while !rest.is_empty() {
        // never split on the delimiter `rest` starts with
        let next = memchr2(b'#', b'.', &rest.as_bytes()[1..]).map_or(rest.len(), |i| i + 1);
        let (part, tail) = rest.split_at(next);
        if let Some(id) = part.strip_prefix('#') {
            selector.id = Some(id.to_string());
        } else if let Some(class) = part.strip_prefix('.') {
            selector.classes.push(class.to_string());
        }
        rest = tail;
    }

    selector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_tag() {
        let sel = parse_selector("div");
        assert_eq!(sel.tag, "div");
        assert_eq!(sel.id, None);
        assert!(sel.classes.is_empty());
    }

    #[test]
    fn defaults_to_div() {
        let sel = parse_selector(".class#id");
        assert_eq!(sel.tag, "div");
        assert_eq!(sel.id.as_deref(), Some("id"));
        assert_eq!(sel.classes, vec!["class"]);
    }

    #[test]
    fn last_id_wins_and_classes_accumulate() {
        let sel = parse_selector("input.class1#id1.class2#id2");
        assert_eq!(sel.tag, "input");
        assert_eq!(sel.id.as_deref(), Some("id2"));
        assert_eq!(sel.classes, vec!["class1", "class2"]);
    }

    #[test]
    fn duplicate_classes_are_kept() {
        let sel = parse_selector("li.a.a.b");
        assert_eq!(sel.classes, vec!["a", "a", "b"]);
    }

    #[test]
    fn empty_token_has_empty_tag() {
        assert_eq!(parse_selector(""), Selector::default());
    }

    #[test]
    fn empty_parts_are_kept() {
        let sel = parse_selector("p.#x");
        assert_eq!(sel.classes, vec![""]);
        assert_eq!(sel.id.as_deref(), Some("x"));
    }
}
