//! # interop-resolve
//!
//! Resolution of foreign-language packages and classes into compiler
//! descriptors, alongside the compiler's own (native) definitions.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! hir     → Descriptors, resolvers, session caches
//!   ↓
//! base    → Primitives (Name, QualifiedName, FileId)
//! ```
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use interop::base::{FileId, QualifiedName, SourceFile};
//! use interop::hir::{
//!     ClassKind, ClasspathIndex, ForeignClass, NativeIndex, RecordingTrace, ResolverContext,
//!     StandardPartition,
//! };
//!
//! let partition = StandardPartition::new();
//! let native = NativeIndex::new(partition.native().unwrap().clone());
//! let mut classpath = ClasspathIndex::new();
//! let util = QualifiedName::parse("com.acme.Util").unwrap();
//! classpath
//!     .add_class(ForeignClass::new(util.clone(), ClassKind::Class, SourceFile::foreign_binary(FileId::new(0))))
//!     .unwrap();
//!
//! let ctx = ResolverContext::new(
//!     Arc::new(classpath),
//!     Arc::new(native),
//!     Arc::new(partition),
//!     Arc::new(RecordingTrace::new()),
//! );
//! let class = ctx.resolver().resolve_class(&util).unwrap().unwrap();
//! assert_eq!(class.fq_name(), &util);
//! ```

/// Foundation types: names and file identities
pub mod base;

/// Descriptors and their resolution
pub mod hir;

// Re-export foundation types
pub use base::{FileId, Name, QualifiedName};
