//! Location tracking inside a raw manifest document
//!
//! A manifest has no meaningful line/column information once it has been
//! decoded into a JSON value tree, so errors are located with a JSON-pointer
//! style path (`/readingOrder/0/href`) instead.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // RFC 6901 escaping
            Segment::Key(key) => write!(f, "{}", key.replace('~', "~0").replace('/', "~1")),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Path from the document root to a value.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Location {
    segments: Vec<Segment>,
}

impl Location {
    /// The document root
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn push_key(&mut self, key: &str) {
        self.segments.push(Segment::Key(key.to_string()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    /// Location of a key below this one
    pub fn child_key(&self, key: &str) -> Self {
        let mut child = self.clone();
        child.push_key(key);
        child
    }

    /// Location of an array item below this one
    pub fn child_index(&self, index: usize) -> Self {
        let mut child = self.clone();
        child.push_index(index);
        child
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Last object key on the path, skipping array indices
    pub fn last_key(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|segment| match segment {
            Segment::Key(key) => Some(key.as_str()),
            Segment::Index(_) => None,
        })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_location() {
        let location = Location::root();
        assert!(location.is_root());
        assert_eq!(location.to_string(), "/");
    }

    #[test]
    fn test_nested_location_display() {
        let mut location = Location::root();
        location.push_key("readingOrder");
        location.push_index(0);
        location.push_key("href");

        assert_eq!(location.to_string(), "/readingOrder/0/href");
        assert_eq!(location.depth(), 3);
        assert_eq!(location.last_key(), Some("href"));
    }

    #[test]
    fn test_pointer_escaping() {
        let location = Location::root().child_key("a/b").child_key("c~d");
        assert_eq!(location.to_string(), "/a~1b/c~0d");
    }

    #[test]
    fn test_pop_restores_parent() {
        let mut location = Location::root().child_key("links");
        location.push_index(2);
        assert_eq!(location.pop(), Some(Segment::Index(2)));
        assert_eq!(location.to_string(), "/links");
    }
}
