//! Class resolution.
//!
//! Classes are looked up natively first, then in each foreign universe in
//! partition order. A foreign class is owned by its outer class when it is
//! nested, otherwise by the namespace of its package in the same universe.
//!
//! Validation that needs other classes (supertype cycles) is deferred to a
//! [`PendingTasks`] list so a batch of resolutions can be checked together.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::base::{Name, QualifiedName};

use super::context::ResolverContext;
use super::descriptors::{
    ClassDescriptor, ConstructorDescriptor, DescriptorOwner, FunctionDescriptor, PropertyDescriptor,
};
use super::diagnostics::{Diagnostic, DiagnosticCollector};
use super::error::ResolveResult;
use super::members::{self, DeclarationProvider};
use super::resolve::DescriptorResolver;
use super::scope::ScopeFlavor;
use super::search_rule::{NativeHit, SearchRule};
use super::trace::SourceEntity;
use super::universe::{SearchScope, Universe};

// ============================================================================
// PENDING TASKS
// ============================================================================

#[derive(Debug)]
enum PendingTask {
    CheckSupertypes(Arc<ClassDescriptor>),
}

/// Deferred validation for freshly resolved classes.
#[derive(Debug, Default)]
pub struct PendingTasks {
    tasks: Vec<PendingTask>,
}

impl PendingTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub(crate) fn check_supertypes(&mut self, class: Arc<ClassDescriptor>) {
        self.tasks.push(PendingTask::CheckSupertypes(class));
    }

    /// Run every task, including tasks queued while running.
    ///
    /// Classes first resolved by a check are checked in turn. The resulting
    /// diagnostics are added to the session's collector and also returned.
    pub fn perform(mut self, resolver: &DescriptorResolver<'_>) -> ResolveResult<Vec<Diagnostic>> {
        let mut collector = DiagnosticCollector::new();
        let mut batch = std::mem::take(&mut self.tasks);
        while !batch.is_empty() {
            for task in batch {
                match task {
                    PendingTask::CheckSupertypes(class) => {
                        check_supertypes(resolver, &class, &mut collector, &mut self)?
                    }
                }
            }
            batch = std::mem::take(&mut self.tasks);
        }
        let diagnostics = collector.take();
        if !diagnostics.is_empty() {
            tracing::debug!("[CLASS_RESOLVER] {} diagnostic(s) from pending tasks", diagnostics.len());
            resolver.context().report(diagnostics.iter().cloned());
        }
        Ok(diagnostics)
    }
}

fn check_supertypes(
    resolver: &DescriptorResolver<'_>,
    class: &Arc<ClassDescriptor>,
    collector: &mut DiagnosticCollector,
    queue: &mut PendingTasks,
) -> ResolveResult<()> {
    let file = class.source().map(|source| source.source.id);

    for supertype in class.supertypes() {
        if resolver
            .resolve_class_deferred(supertype, SearchRule::IncludeNative, queue)?
            .is_none()
        {
            tracing::warn!("[CLASS_RESOLVER] supertype {} of {} not found", supertype, class.fq_name());
            collector.unresolved_supertype(class.fq_name(), supertype, file);
        }
    }

    let mut walk = SupertypeWalk {
        resolver,
        tasks: queue,
        path: Vec::new(),
        visited: FxHashSet::default(),
        cycles: Vec::new(),
    };
    walk.visit(class)?;

    for cycle in walk.cycles {
        if resolver.context().first_report_of_cycle(&cycle) {
            tracing::warn!("[CLASS_RESOLVER] cyclic supertypes at {}", class.fq_name());
            collector.supertype_cycle(&cycle, file);
        }
    }
    Ok(())
}

struct SupertypeWalk<'r, 'a> {
    resolver: &'r DescriptorResolver<'a>,
    tasks: &'r mut PendingTasks,
    path: Vec<QualifiedName>,
    visited: FxHashSet<QualifiedName>,
    cycles: Vec<Vec<QualifiedName>>,
}

impl SupertypeWalk<'_, '_> {
    fn visit(&mut self, class: &Arc<ClassDescriptor>) -> ResolveResult<()> {
        self.visited.insert(class.fq_name().clone());
        self.path.push(class.fq_name().clone());

        for supertype in class.supertypes() {
            if let Some(start) = self.path.iter().position(|name| name == supertype) {
                let mut cycle = self.path[start..].to_vec();
                cycle.push(supertype.clone());
                self.cycles.push(cycle);
                continue;
            }
            if self.visited.contains(supertype) {
                continue;
            }
            if let Some(next) =
                self.resolver
                    .resolve_class_deferred(supertype, SearchRule::IncludeNative, self.tasks)?
            {
                self.visit(&next)?;
            }
        }

        self.path.pop();
        Ok(())
    }
}

// ============================================================================
// CLASS RESOLVER
// ============================================================================

pub(crate) struct ClassResolver<'a> {
    ctx: &'a ResolverContext,
}

impl<'a> ClassResolver<'a> {
    pub(crate) fn new(ctx: &'a ResolverContext) -> Self {
        Self { ctx }
    }

    pub(crate) fn resolve_class(
        &self,
        resolver: &DescriptorResolver<'_>,
        name: &QualifiedName,
        rule: SearchRule,
        tasks: &mut PendingTasks,
    ) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        if name.is_root() {
            return Ok(None);
        }

        if let Some(native) = self.ctx.native().lookup_class(name) {
            let universe = native.universe().clone();
            return match rule.process_found_in_native(name, &universe, native)? {
                NativeHit::Return(class) | NativeHit::Continue(class) => Ok(Some(class)),
            };
        }

        self.ctx
            .classes()
            .get_or_try_init(name, || self.resolve_foreign(resolver, name, tasks))
    }

    fn resolve_foreign(
        &self,
        resolver: &DescriptorResolver<'_>,
        name: &QualifiedName,
        tasks: &mut PendingTasks,
    ) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        let partition = self.ctx.partition();
        let mode = self.ctx.config().class_find_mode;

        for universe in partition.all_universes().iter().filter(|u| !u.is_native()) {
            let scope = partition.search_scope_for(universe)?;
            let Some(source) = self.ctx.classpath().find_class(name, mode, &scope)? else {
                continue;
            };
            if source.is_synthetic {
                tracing::trace!("[CLASS_RESOLVER] skipping synthetic {}", name);
                continue;
            }
            let Some((owner, attributed)) = self.resolve_owner(resolver, name, universe, &scope, tasks)? else {
                tracing::trace!("[CLASS_RESOLVER] no owner for {} in {}", name, universe);
                continue;
            };

            let class = ClassDescriptor::foreign(source, attributed, owner);
            self.ctx.trace().record_class(SourceEntity::Class(name.clone()), &class);
            if self.ctx.config().check_supertype_cycles && !class.supertypes().is_empty() {
                tasks.check_supertypes(class.clone());
            }
            tracing::debug!("[CLASS_RESOLVER] resolved {} in {}", name, universe);
            return Ok(Some(class));
        }

        tracing::trace!("[CLASS_RESOLVER] {} not found", name);
        Ok(None)
    }

    /// The owner of `name` in `universe`, and the universe the class is
    /// attributed to.
    ///
    /// A class in a shadowed package belongs to the universe of the holder's
    /// file; a nested class follows its outer class.
    fn resolve_owner(
        &self,
        resolver: &DescriptorResolver<'_>,
        name: &QualifiedName,
        universe: &Universe,
        scope: &SearchScope,
        tasks: &mut PendingTasks,
    ) -> ResolveResult<Option<(DescriptorOwner, Universe)>> {
        let parent = name.parent();

        if !parent.is_root() {
            let outer = self
                .ctx
                .classpath()
                .find_class(&parent, self.ctx.config().class_find_mode, scope)?;
            let nested_here = match (&outer, name.last_segment()) {
                (Some(outer), Some(simple)) => outer.nested.contains(simple),
                _ => false,
            };
            if nested_here {
                let outer = resolver.resolve_class_deferred(&parent, SearchRule::IncludeNative, tasks)?;
                return Ok(outer.map(|outer| {
                    let attributed = if outer.is_native() {
                        universe.clone()
                    } else {
                        outer.universe().clone()
                    };
                    (outer.as_owner(), attributed)
                }));
            }
        }

        let namespaces = resolver.resolve_namespaces(&parent, SearchRule::IncludeNative)?;
        let ns = namespaces
            .get(universe)
            .or_else(|| namespaces.values().find(|ns| ns.is_native()));
        Ok(ns.map(|ns| {
            let members = ns.member_scope();
            let attributed = match members.flavor() {
                ScopeFlavor::ShadowedPackage => members.class_universe().clone(),
                _ => universe.clone(),
            };
            (DescriptorOwner::Namespace(Arc::downgrade(ns)), attributed)
        }))
    }
}

// ============================================================================
// CLASS MEMBERS
// ============================================================================

impl ClassDescriptor {
    /// Instance methods named `name`.
    pub fn functions(&self, name: &Name) -> ResolveResult<Arc<[Arc<FunctionDescriptor>]>> {
        self.members.functions.get_or_try_init(name, || {
            Ok(match self.source() {
                Some(source) => {
                    members::resolve_function_group(name, &DeclarationProvider::instance(source), &self.as_owner())
                        .into()
                }
                None => Arc::from(Vec::new()),
            })
        })
    }

    /// Instance fields named `name`, as properties.
    pub fn properties(&self, name: &Name) -> ResolveResult<Arc<[Arc<PropertyDescriptor>]>> {
        self.members.properties.get_or_try_init(name, || {
            Ok(match self.source() {
                Some(source) => members::resolve_field_group_by_name(
                    name,
                    &DeclarationProvider::instance(source),
                    &self.as_owner(),
                )
                .into(),
                None => Arc::from(Vec::new()),
            })
        })
    }
}

/// Constructors of `class`, computed once.
pub(crate) fn constructors_of(class: &Arc<ClassDescriptor>) -> Arc<[Arc<ConstructorDescriptor>]> {
    class
        .members
        .constructors
        .get_or_init(|| members::resolve_constructors(class).into())
        .clone()
}

/// Nested classes of `class` (static and inner), computed once.
pub(crate) fn inner_classes_of(
    resolver: &DescriptorResolver<'_>,
    class: &Arc<ClassDescriptor>,
) -> ResolveResult<Arc<[Arc<ClassDescriptor>]>> {
    class
        .members
        .inner_classes
        .get_or_try_init(|| {
            let Some(source) = class.source() else {
                return Ok(Arc::from(Vec::new()));
            };
            let mut inner = Vec::with_capacity(source.nested.len());
            for nested in &source.nested {
                let fq_name = class.fq_name().child(nested.clone());
                if let Some(found) = resolver.resolve_class_with(&fq_name, SearchRule::IncludeNative)? {
                    inner.push(found);
                }
            }
            Ok(inner.into())
        })
        .cloned()
}
