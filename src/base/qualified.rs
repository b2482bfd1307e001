//! Fully-qualified names.

use std::fmt;
use std::sync::Arc;

use super::Name;

/// A fully-qualified name: an ordered sequence of identifier segments.
///
/// The root (zero segments) names the top of a namespace tree. Equality and
/// hashing are by segment sequence, which makes `QualifiedName` the primary
/// cache key of the resolver.
///
/// Segments are shared behind an `Arc`, so clones are cheap.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
pub struct QualifiedName {
    segments: Arc<[Name]>,
}

impl QualifiedName {
    /// The root name.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a dotted name like `"com.acme.Util"`.
    ///
    /// The empty string parses to the root. Returns `None` if any segment is
    /// not a valid identifier.
    pub fn parse(text: &str) -> Option<Self> {
        if text.is_empty() {
            return Some(Self::root());
        }
        text.split('.')
            .map(Name::identifier)
            .collect::<Option<Vec<_>>>()
            .map(Self::from_segments)
    }

    /// Build a name from already-validated segments.
    pub fn from_segments(segments: impl Into<Arc<[Name]>>) -> Self {
        Self {
            segments: segments.into(),
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The enclosing name. The parent of a top-level name is the root.
    ///
    /// # Panics
    /// Panics when called on the root.
    pub fn parent(&self) -> QualifiedName {
        assert!(!self.is_root(), "root has no parent");
        Self::from_segments(&self.segments[..self.segments.len() - 1])
    }

    /// Append a segment.
    pub fn child(&self, segment: Name) -> QualifiedName {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Self::from_segments(segments)
    }

    /// The last segment, or `None` for the root.
    pub fn last_segment(&self) -> Option<&Name> {
        self.segments.last()
    }

    pub fn segments(&self) -> &[Name] {
        &self.segments
    }

    /// Number of segments.
    #[inline]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Whether `self` equals `ancestor` or lies below it.
    pub fn starts_with(&self, ancestor: &QualifiedName) -> bool {
        self.segments.starts_with(&ancestor.segments)
    }
}

impl fmt::Debug for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QualifiedName({})", self)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}
