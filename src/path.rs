//! Field paths for locating failures inside nested rule map errors.
//!
//! A [`FieldPath`] is what [`AssertionError::leaves`](crate::AssertionError::leaves)
//! reports for every innermost failure, rendered like `users[0].email`.

use std::fmt::{self, Display};

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// An object property.
    Key(String),
    /// An array position.
    Index(usize),
}

/// A path from the validated value down to a nested field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    /// The empty path, i.e. the validated value itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path with a property segment appended.
    pub fn push_key(&self, key: impl Into<String>) -> Self {
        self.push(Segment::Key(key.into()))
    }

    /// Returns a new path with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        self.push(Segment::Index(index))
    }

    fn push(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_renders_empty() {
        let path = FieldPath::root();
        assert!(path.is_root());
        assert_eq!(path.len(), 0);
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn test_mixed_segments() {
        let path = FieldPath::root()
            .push_key("users")
            .push_index(0)
            .push_key("email");
        assert_eq!(path.to_string(), "users[0].email");
        assert_eq!(path.segments()[1], Segment::Index(0));
    }

    #[test]
    fn test_leading_index() {
        let path = FieldPath::root().push_index(3).push_key("id");
        assert_eq!(path.to_string(), "[3].id");
    }

    #[test]
    fn test_push_does_not_modify_base() {
        let base = FieldPath::root().push_key("tags");
        let first = base.push_index(0);
        let second = base.push_index(1);

        assert_eq!(base.to_string(), "tags");
        assert_eq!(first.to_string(), "tags[0]");
        assert_eq!(second.to_string(), "tags[1]");
    }
}
