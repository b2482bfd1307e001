//! Descriptor resolution across native and foreign universes.
//!
//! ## Layering
//!
//! ```text
//! resolve     → DescriptorResolver facade
//!   ↓
//! namespace, class, members, scope → the resolvers proper
//!   ↓
//! context     → session: caches, collaborators, diagnostics
//!   ↓
//! cache, descriptors, universe, search_rule, visibility → building blocks
//! ```
//!
//! Collaborators are traits ([`ForeignClasspath`], [`NativeSymbols`],
//! [`BindingTrace`], [`UniversePartition`]) with in-memory implementations
//! ([`ClasspathIndex`], [`NativeIndex`], [`RecordingTrace`],
//! [`StandardPartition`]).

mod cache;
mod class;
mod classpath;
mod config;
mod context;
mod descriptors;
mod diagnostics;
mod error;
mod input;
mod members;
mod namespace;
mod native;
mod resolve;
mod scope;
mod search_rule;
mod trace;
mod universe;
mod visibility;

pub use cache::{DescriptorCache, OnceMap};
pub use class::PendingTasks;
pub use classpath::ClasspathIndex;
pub use config::{DEFAULT_PACKAGE_HOLDER, ResolverConfig};
pub use context::ResolverContext;
pub use descriptors::{
    ClassDescriptor, ConstructorDescriptor, Declaration, DescriptorOwner, FunctionDescriptor,
    NamespaceDescriptor, NamespaceKind, NamespaceParent, PropertyDescriptor, UniverseMap,
    ValueParameter,
};
pub use diagnostics::{Diagnostic, DiagnosticCollector, RelatedInfo, Severity, codes};
pub use error::{ClasspathError, ResolveError, ResolveResult};
pub use input::{
    ClassFindMode, ClassKind, ForeignClass, ForeignClasspath, ForeignConstructor, ForeignField,
    ForeignMethod, ForeignPackage, ForeignParameter,
};
pub use members::{DeclarationProvider, MemberFilter};
pub use native::{NativeDeclaration, NativeIndex, NativeSymbols, NoNativeSymbols};
pub use resolve::DescriptorResolver;
pub use scope::{ChainedScope, MemberScope, ScopeFlavor};
pub use search_rule::{NativeHit, SearchRule};
pub use trace::{BindingTrace, NoopTrace, RecordingTrace, SourceEntity, TraceRecord};
pub use universe::{SearchScope, StandardPartition, Universe, UniverseOrigin, UniversePartition};
pub use visibility::Visibility;
