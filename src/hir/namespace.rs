//! Namespace resolution across universes.
//!
//! `resolve_namespace(name, rule)`:
//!
//! 1. A cached map is returned after applying the search rule to its native
//!    entry.
//! 2. On a miss, a native hit short-circuits `ErrorIfFoundInNative` (conflict)
//!    and `IgnoreIfFoundInNative` (native result, foreign side never probed).
//! 3. Otherwise every universe is resolved and the aggregate map, possibly
//!    empty, is cached before it is returned.
//!
//! Parents are resolved through the same cache under
//! [`SearchRule::IncludeNative`], so a parent chain is built at most once no
//! matter how many children ask for it.

use std::sync::Arc;

use crate::base::QualifiedName;

use super::context::ResolverContext;
use super::descriptors::{NamespaceDescriptor, NamespaceKind, NamespaceParent, UniverseMap};
use super::error::{ResolveError, ResolveResult};
use super::scope::{MemberScope, ScopeSource};
use super::search_rule::{NativeHit, SearchRule};
use super::trace::SourceEntity;
use super::universe::{SearchScope, Universe};

pub(crate) struct NamespaceResolver<'a> {
    ctx: &'a ResolverContext,
}

impl<'a> NamespaceResolver<'a> {
    pub(crate) fn new(ctx: &'a ResolverContext) -> Self {
        Self { ctx }
    }

    pub(crate) fn resolve_namespace(&self, name: &QualifiedName, rule: SearchRule) -> ResolveResult<UniverseMap> {
        if let Some(cached) = self.ctx.namespaces().lookup(name) {
            return apply_rule(name, cached, rule);
        }

        let native = self.ctx.native().lookup_namespace(name);
        if let Some(native) = &native {
            if rule != SearchRule::IncludeNative {
                let universe = native.universe().clone();
                if let NativeHit::Return(ns) = rule.process_found_in_native(name, &universe, native.clone())? {
                    tracing::trace!("[NAMESPACE_RESOLVER] {} taken from native {}", name, universe);
                    return Ok(single(universe, ns));
                }
            }
        }

        let resolved = self
            .ctx
            .namespaces()
            .get_or_resolve(name, || self.resolve_all(name, native))?;
        apply_rule(name, resolved, rule)
    }

    pub(crate) fn resolve_namespace_in(
        &self,
        name: &QualifiedName,
        universe: &Universe,
        rule: SearchRule,
    ) -> ResolveResult<Option<Arc<NamespaceDescriptor>>> {
        if !self.ctx.partition().all_universes().contains(universe) {
            return Err(ResolveError::UnknownUniverse(universe.name().as_str().into()));
        }
        Ok(self.resolve_namespace(name, rule)?.get(universe).cloned())
    }

    fn resolve_all(
        &self,
        name: &QualifiedName,
        native: Option<Arc<NamespaceDescriptor>>,
    ) -> ResolveResult<UniverseMap> {
        let mut result = UniverseMap::default();
        if let Some(native) = native {
            result.insert(native.universe().clone(), native);
        }

        let partition = self.ctx.partition();
        for universe in partition.all_universes().iter().filter(|u| !u.is_native()) {
            if let Some(ns) = self.resolve_foreign(name, universe)? {
                result.insert(universe.clone(), ns);
            }
        }

        tracing::debug!(
            "[NAMESPACE_RESOLVER] {} resolved in {} universe(s)",
            name,
            result.len()
        );
        Ok(result)
    }

    fn resolve_foreign(&self, name: &QualifiedName, universe: &Universe) -> ResolveResult<Option<Arc<NamespaceDescriptor>>> {
        let parent = if name.is_root() {
            NamespaceParent::Universe(universe.clone())
        } else {
            let parents = self.resolve_namespace(&name.parent(), SearchRule::IncludeNative)?;
            let parent = parents
                .get(universe)
                .or_else(|| parents.values().find(|ns| ns.is_native()));
            match parent {
                Some(parent) => NamespaceParent::Namespace(parent.clone()),
                None => {
                    tracing::trace!("[NAMESPACE_RESOLVER] no parent for {} in {}", name, universe);
                    return Ok(None);
                }
            }
        };

        let scope = self.ctx.partition().search_scope_for(universe)?;
        let Some((source, entity)) = self.find_scope_source(name, &scope)? else {
            return Ok(None);
        };
        let class_universe = match &source {
            ScopeSource::Package {
                holder: Some(holder), ..
            } => self
                .ctx
                .partition()
                .universe_for_file(&holder.source)
                .unwrap_or_else(|| universe.clone()),
            _ => universe.clone(),
        };

        let ns = NamespaceDescriptor::new_cyclic(name.clone(), universe.clone(), parent, |owner| {
            MemberScope::new(owner, source, class_universe)
        });
        let kind = ns.kind().unwrap_or(NamespaceKind::Proper);
        let trace = self.ctx.trace();
        trace.record_namespace(entity, &ns);
        trace.record_namespace_kind(&ns, kind);
        tracing::debug!("[NAMESPACE_RESOLVER] {} in {} is {:?}", name, universe, kind);
        Ok(Some(ns))
    }

    /// Decide what backs the namespace `name` inside `scope`, if anything.
    fn find_scope_source(
        &self,
        name: &QualifiedName,
        scope: &SearchScope,
    ) -> ResolveResult<Option<(ScopeSource, SourceEntity)>> {
        let classpath = self.ctx.classpath();
        let config = self.ctx.config();

        if let Some(package) = classpath.find_package(name, scope)? {
            let holder_name = name.child(config.package_holder.clone());
            let holder = classpath.find_class(&holder_name, config.namespace_find_mode, scope)?;
            if holder.is_some() {
                tracing::trace!("[NAMESPACE_RESOLVER] {} is shadowed by {}", name, holder_name);
            }
            return Ok(Some((
                ScopeSource::Package { package, holder },
                SourceEntity::Package(name.clone()),
            )));
        }

        if name.is_root() {
            return Ok(None);
        }
        let Some(class) = classpath.find_class(name, config.namespace_find_mode, scope)? else {
            return Ok(None);
        };
        if class.is_enum() {
            tracing::trace!("[NAMESPACE_RESOLVER] {} is an enum, no namespace", name);
            return Ok(None);
        }
        Ok(Some((
            ScopeSource::ClassStatics { class },
            SourceEntity::Class(name.clone()),
        )))
    }
}

fn single(universe: Universe, ns: Arc<NamespaceDescriptor>) -> UniverseMap {
    let mut map = UniverseMap::default();
    map.insert(universe, ns);
    map
}

/// Apply `rule` to the native entry of an aggregate map.
fn apply_rule(name: &QualifiedName, map: UniverseMap, rule: SearchRule) -> ResolveResult<UniverseMap> {
    let native = map
        .iter()
        .find(|(universe, _)| universe.is_native())
        .map(|(universe, ns)| (universe.clone(), ns.clone()));
    let Some((universe, native)) = native else {
        return Ok(map);
    };
    match rule.process_found_in_native(name, &universe, native)? {
        NativeHit::Return(ns) => Ok(single(universe, ns)),
        NativeHit::Continue(_) => Ok(map),
    }
}
