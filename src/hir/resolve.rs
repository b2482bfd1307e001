//! Descriptor resolution: the entry point for callers.
//!
//! [`DescriptorResolver`] is a stateless facade over a [`ResolverContext`].
//! It is cheap to create and borrow, and every call goes through the
//! session's caches:
//!
//! - namespaces: [`DescriptorResolver::resolve_namespace`] and friends
//! - classes: [`DescriptorResolver::resolve_class`] and friends
//! - members: function groups, field groups, constructors and inner classes
//!
//! Search rules default to [`SearchRule::ErrorIfFoundInNative`] for explicit
//! lookups; pass a rule to change that.

use std::sync::Arc;

use rayon::prelude::*;

use crate::base::{Name, QualifiedName};

use super::class::{self, ClassResolver, PendingTasks};
use super::context::ResolverContext;
use super::descriptors::{
    ClassDescriptor, ConstructorDescriptor, DescriptorOwner, FunctionDescriptor, NamespaceDescriptor,
    PropertyDescriptor, UniverseMap,
};
use super::error::ResolveResult;
use super::members::{self, DeclarationProvider};
use super::namespace::NamespaceResolver;
use super::scope::ChainedScope;
use super::search_rule::SearchRule;
use super::universe::Universe;

/// Query-time resolution over a session.
#[derive(Clone, Copy)]
pub struct DescriptorResolver<'a> {
    ctx: &'a ResolverContext,
}

impl<'a> DescriptorResolver<'a> {
    pub fn new(ctx: &'a ResolverContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &'a ResolverContext {
        self.ctx
    }

    // ========================================================================
    // CLASSES
    // ========================================================================

    /// Resolve a class, failing if it is defined natively.
    pub fn resolve_class(&self, name: &QualifiedName) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        self.resolve_class_with(name, SearchRule::ErrorIfFoundInNative)
    }

    /// Resolve a class and run its validation right away.
    pub fn resolve_class_with(
        &self,
        name: &QualifiedName,
        rule: SearchRule,
    ) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        let mut tasks = PendingTasks::new();
        let class = self.resolve_class_deferred(name, rule, &mut tasks)?;
        if !tasks.is_empty() {
            tasks.perform(self)?;
        }
        Ok(class)
    }

    /// Resolve a class, queueing its validation on `tasks`.
    pub fn resolve_class_deferred(
        &self,
        name: &QualifiedName,
        rule: SearchRule,
        tasks: &mut PendingTasks,
    ) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        ClassResolver::new(self.ctx).resolve_class(self, name, rule, tasks)
    }

    // ========================================================================
    // NAMESPACES
    // ========================================================================

    /// Resolve a namespace in the first foreign universe, failing if it is
    /// defined natively.
    pub fn resolve_namespace(&self, name: &QualifiedName) -> ResolveResult<Option<Arc<NamespaceDescriptor>>> {
        let map = self.resolve_namespaces(name, SearchRule::ErrorIfFoundInNative)?;
        Ok(map
            .iter()
            .find(|(universe, _)| !universe.is_native())
            .map(|(_, ns)| ns.clone()))
    }

    /// Resolve a namespace in one universe.
    pub fn resolve_namespace_in(
        &self,
        name: &QualifiedName,
        universe: &Universe,
        rule: SearchRule,
    ) -> ResolveResult<Option<Arc<NamespaceDescriptor>>> {
        NamespaceResolver::new(self.ctx).resolve_namespace_in(name, universe, rule)
    }

    /// Resolve a namespace in every universe.
    pub fn resolve_namespaces(&self, name: &QualifiedName, rule: SearchRule) -> ResolveResult<UniverseMap> {
        NamespaceResolver::new(self.ctx).resolve_namespace(name, rule)
    }

    /// The member scopes of a package across universes, native part first.
    ///
    /// A native definition hides the foreign package entirely. Returns `None`
    /// when the package resolves nowhere.
    pub fn package_scope(&self, name: &QualifiedName) -> ResolveResult<Option<ChainedScope>> {
        let map = self.resolve_namespaces(name, SearchRule::IgnoreIfFoundInNative)?;
        if map.is_empty() {
            return Ok(None);
        }
        let mut namespaces: Vec<_> = map.values().cloned().collect();
        namespaces.sort_by_key(|ns| !ns.is_native());
        Ok(Some(ChainedScope::new(namespaces)))
    }

    /// Resolve a batch of namespaces in parallel.
    ///
    /// Returns how many resolved in at least one universe. The first error
    /// aborts the batch.
    pub fn prefetch(&self, names: &[QualifiedName]) -> ResolveResult<usize> {
        let found = names
            .par_iter()
            .map(|name| {
                self.resolve_namespaces(name, SearchRule::IncludeNative)
                    .map(|map| usize::from(!map.is_empty()))
            })
            .try_reduce(|| 0, |a, b| Ok(a + b))?;
        tracing::debug!("[DESCRIPTOR_RESOLVER] prefetched {}/{} namespace(s)", found, names.len());
        Ok(found)
    }

    // ========================================================================
    // MEMBERS
    // ========================================================================

    /// Properties named `name` declared by `provider`, owned by `owner`.
    pub fn resolve_field_group_by_name(
        &self,
        name: &Name,
        provider: &DeclarationProvider<'_>,
        owner: &DescriptorOwner,
    ) -> Vec<Arc<PropertyDescriptor>> {
        members::resolve_field_group_by_name(name, provider, owner)
    }

    /// Functions named `name` declared by `provider`, owned by `owner`.
    pub fn resolve_function_group(
        &self,
        name: &Name,
        provider: &DeclarationProvider<'_>,
        owner: &DescriptorOwner,
    ) -> Vec<Arc<FunctionDescriptor>> {
        members::resolve_function_group(name, provider, owner)
    }

    /// Constructors of a class.
    pub fn resolve_constructors(&self, class: &Arc<ClassDescriptor>) -> Arc<[Arc<ConstructorDescriptor>]> {
        class::constructors_of(class)
    }

    /// Nested classes of a class.
    pub fn resolve_inner_classes(&self, class: &Arc<ClassDescriptor>) -> ResolveResult<Arc<[Arc<ClassDescriptor>]>> {
        class::inner_classes_of(self, class)
    }
}

impl std::fmt::Debug for DescriptorResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorResolver").finish_non_exhaustive()
    }
}
