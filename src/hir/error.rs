//! Error types for descriptor resolution.
//!
//! "Not found" is never an error: resolution returns `None` or an empty map.
//! Errors are either a shadowing conflict, which callers turn into a user
//! diagnostic, or something that must abort the compilation pass.

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::QualifiedName;

/// Errors raised by the foreign introspection layer.
#[derive(Debug, Error)]
pub enum ClasspathError {
    /// IO error while reading the classpath.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A class or package entry could not be decoded.
    #[error("Malformed classpath entry {name}: {message}")]
    Malformed { name: String, message: String },
}

impl ClasspathError {
    /// Create a malformed entry error.
    pub fn malformed(name: impl ToString, message: impl Into<String>) -> Self {
        Self::Malformed {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

/// Errors that can occur while resolving descriptors.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The name is already defined in the native universe and the search
    /// rule forbids resolving it again.
    #[error("'{name}' is already defined in {universe}")]
    Shadowed { name: QualifiedName, universe: SmolStr },

    /// The cache already holds a different descriptor for this key.
    #[error("cache already holds a different descriptor for '{name}' in {universe}")]
    CacheConflict { name: QualifiedName, universe: SmolStr },

    /// A key was re-entered while its own computation was still running.
    #[error("cyclic resolution of '{0}'")]
    Cycle(String),

    /// A universe that the partition does not know about.
    #[error("unknown universe {0}")]
    UnknownUniverse(SmolStr),

    /// Failure inside the foreign introspection layer, propagated unchanged.
    #[error(transparent)]
    Classpath(#[from] ClasspathError),
}

impl ResolveError {
    /// Create a shadowing conflict.
    pub fn shadowed(name: &QualifiedName, universe: &str) -> Self {
        Self::Shadowed {
            name: name.clone(),
            universe: SmolStr::new(universe),
        }
    }

    /// Whether this error must abort the compilation pass.
    ///
    /// Shadowing is a user-facing condition; everything else is a logic bug
    /// or a collaborator failure.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ResolveError::Shadowed { .. })
    }
}

/// Result alias used throughout resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;
