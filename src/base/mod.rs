//! Foundation types for the resolver.
//!
//! This module provides the value types used throughout the crate:
//! - [`Name`] - A single identifier segment
//! - [`QualifiedName`] - Dotted names, the primary cache key
//! - [`FileId`], [`SourceFile`] - File identities tagged with their origin
//!
//! This module has NO dependencies on other modules of the crate.

mod file_id;
mod name;
mod qualified;

pub use file_id::{FileId, FileKind, SourceFile, SourceLanguage};
pub use name::Name;
pub use qualified::QualifiedName;
