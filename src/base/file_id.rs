//! Source file identities.

use std::fmt;

/// An interned identifier for a source or class file.
///
/// `FileId` is a lightweight handle (just a u32). The actual path lives in
/// whatever owns the classpath or the source set.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct FileId(pub u32);

impl FileId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

/// Which toolchain a file originates from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SourceLanguage {
    /// The compiler's own language.
    Native,
    /// A foreign toolchain.
    Foreign,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FileKind {
    /// Source text.
    Source,
    /// Compiled output on the classpath.
    Binary,
}

/// A file together with its origin.
///
/// Search scopes partition files by origin, so every classpath entry that
/// can be probed carries one of these. A binary compiled from native sources
/// is `(Native, Binary)`: it lives on the classpath like any foreign class
/// file but still belongs to the native side.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SourceFile {
    pub id: FileId,
    pub language: SourceLanguage,
    pub kind: FileKind,
}

impl SourceFile {
    #[inline]
    pub const fn native_source(id: FileId) -> Self {
        Self {
            id,
            language: SourceLanguage::Native,
            kind: FileKind::Source,
        }
    }

    #[inline]
    pub const fn native_binary(id: FileId) -> Self {
        Self {
            id,
            language: SourceLanguage::Native,
            kind: FileKind::Binary,
        }
    }

    #[inline]
    pub const fn foreign_binary(id: FileId) -> Self {
        Self {
            id,
            language: SourceLanguage::Foreign,
            kind: FileKind::Binary,
        }
    }

    #[inline]
    pub fn is_native(&self) -> bool {
        self.language == SourceLanguage::Native
    }

    #[inline]
    pub fn is_native_source(&self) -> bool {
        self.is_native() && self.kind == FileKind::Source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_id_equality() {
        assert_eq!(FileId::new(1), FileId::new(1));
        assert_ne!(FileId::new(1), FileId::new(2));
    }

    #[test]
    fn test_source_file_origin() {
        let id = FileId::new(0);
        assert!(SourceFile::native_source(id).is_native_source());
        assert!(SourceFile::native_binary(id).is_native());
        assert!(!SourceFile::native_binary(id).is_native_source());
        assert!(!SourceFile::foreign_binary(id).is_native());
    }

    #[test]
    fn test_file_id_size() {
        assert_eq!(std::mem::size_of::<FileId>(), 4);
    }
}
