//! Identifier segments.

use smol_str::SmolStr;
use std::fmt;

/// A single identifier segment of a qualified name.
///
/// Ordinary names are validated identifiers (`Util`, `acme`). Special names
/// are wrapped in angle brackets (`<java_root>`) and can never collide with
/// identifiers coming from source code or the classpath.
///
/// Backed by [`SmolStr`], so short names are stored inline and cloning is cheap.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Name(SmolStr);

impl Name {
    /// Create an identifier name.
    ///
    /// Returns `None` if `text` is not a valid identifier: it must start with
    /// an XID start character, `_` or `$`, and continue with XID continue
    /// characters or `$`.
    pub fn identifier(text: &str) -> Option<Self> {
        if is_identifier(text) {
            Some(Self(SmolStr::new(text)))
        } else {
            None
        }
    }

    /// Create a special name, rendered as `<text>`.
    pub fn special(text: &str) -> Self {
        Self(SmolStr::new(format!("<{}>", text)))
    }

    /// Whether this is a special (non-identifier) name.
    #[inline]
    pub fn is_special(&self) -> bool {
        self.0.starts_with('<')
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(unicode_ident::is_xid_start(first) || first == '_' || first == '$') {
        return false;
    }
    chars.all(|c| unicode_ident::is_xid_continue(c) || c == '$')
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_accepts_java_names() {
        assert!(Name::identifier("Util").is_some());
        assert!(Name::identifier("_private").is_some());
        assert!(Name::identifier("Outer$Inner").is_some());
        assert!(Name::identifier("Größe").is_some());
    }

    #[test]
    fn test_identifier_rejects_garbage() {
        assert!(Name::identifier("").is_none());
        assert!(Name::identifier("1abc").is_none());
        assert!(Name::identifier("a.b").is_none());
        assert!(Name::identifier("<root>").is_none());
    }

    #[test]
    fn test_special_name() {
        let name = Name::special("java_root");
        assert!(name.is_special());
        assert_eq!(name.as_str(), "<java_root>");
        assert!(!Name::identifier("java").unwrap().is_special());
    }
}
