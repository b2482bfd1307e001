//! Member scopes of foreign namespaces.
//!
//! A namespace's scope is fixed when the namespace is built, but its members
//! are resolved lazily on first request and cached per name. Three flavors
//! exist for foreign namespaces:
//!
//! - a package: its top-level classes
//! - a package shadowed by a native holder class: the package's classes minus
//!   the holder, plus the holder's static functions and properties
//! - the statics of a class: static nested classes, static methods and
//!   static fields
//!
//! Native namespaces get an empty scope.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::base::{Name, QualifiedName};

use super::cache::OnceMap;
use super::descriptors::{
    ClassDescriptor, DescriptorOwner, FunctionDescriptor, NamespaceDescriptor, NamespaceKind,
    PropertyDescriptor,
};
use super::error::ResolveResult;
use super::input::{ForeignClass, ForeignPackage};
use super::members::DeclarationProvider;
use super::resolve::DescriptorResolver;
use super::search_rule::SearchRule;
use super::universe::Universe;

/// Where a scope takes its members from.
#[derive(Clone, Debug)]
pub(crate) enum ScopeSource {
    Empty,
    Package {
        package: Arc<ForeignPackage>,
        /// Native holder class shadowing the package, if any.
        holder: Option<Arc<ForeignClass>>,
    },
    ClassStatics {
        class: Arc<ForeignClass>,
    },
}

/// Public view of a scope's flavor.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ScopeFlavor {
    Empty,
    Package,
    ShadowedPackage,
    ClassStatics,
}

pub struct MemberScope {
    owner: Weak<NamespaceDescriptor>,
    source: ScopeSource,
    class_universe: Universe,
    classes: OnceMap<Name, Option<Arc<ClassDescriptor>>>,
    functions: OnceMap<Name, Arc<[Arc<FunctionDescriptor>]>>,
    properties: OnceMap<Name, Arc<[Arc<PropertyDescriptor>]>>,
}

impl MemberScope {
    pub(crate) fn new(owner: Weak<NamespaceDescriptor>, source: ScopeSource, class_universe: Universe) -> Self {
        Self {
            owner,
            source,
            class_universe,
            classes: OnceMap::new(),
            functions: OnceMap::new(),
            properties: OnceMap::new(),
        }
    }

    pub(crate) fn empty(owner: Weak<NamespaceDescriptor>, class_universe: Universe) -> Self {
        Self::new(owner, ScopeSource::Empty, class_universe)
    }

    pub fn flavor(&self) -> ScopeFlavor {
        match &self.source {
            ScopeSource::Empty => ScopeFlavor::Empty,
            ScopeSource::Package { holder: None, .. } => ScopeFlavor::Package,
            ScopeSource::Package { holder: Some(_), .. } => ScopeFlavor::ShadowedPackage,
            ScopeSource::ClassStatics { .. } => ScopeFlavor::ClassStatics,
        }
    }

    /// The kind of namespace this scope belongs to; `None` for native ones.
    pub fn namespace_kind(&self) -> Option<NamespaceKind> {
        match self.source {
            ScopeSource::Empty => None,
            ScopeSource::Package { .. } => Some(NamespaceKind::Proper),
            ScopeSource::ClassStatics { .. } => Some(NamespaceKind::ClassStatics),
        }
    }

    /// The universe classes found through this scope are attributed to.
    ///
    /// For a shadowed package this is the holder file's universe.
    pub fn class_universe(&self) -> &Universe {
        &self.class_universe
    }

    pub fn owner(&self) -> Option<Arc<NamespaceDescriptor>> {
        self.owner.upgrade()
    }

    /// Simple names of every class reachable through this scope.
    pub fn class_names(&self) -> Vec<Name> {
        match &self.source {
            ScopeSource::Empty => Vec::new(),
            ScopeSource::Package { package, holder } => {
                let hidden = holder.as_ref().and_then(|h| h.simple_name());
                package
                    .classes
                    .iter()
                    .filter(|name| Some(*name) != hidden)
                    .cloned()
                    .collect()
            }
            ScopeSource::ClassStatics { class } => class.nested.clone(),
        }
    }

    /// The class named `name` in this scope.
    pub fn get_class(
        &self,
        resolver: &DescriptorResolver<'_>,
        name: &Name,
    ) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        let Some(fq_name) = self.class_fq_name(name) else {
            return Ok(None);
        };
        self.classes.get_or_try_init(name, || {
            let class = resolver.resolve_class_with(&fq_name, SearchRule::IgnoreIfFoundInNative)?;
            // Only static nested classes are reachable through class statics.
            Ok(class.filter(|class| match &self.source {
                ScopeSource::ClassStatics { .. } => class.source().is_none_or(|source| source.is_static),
                _ => true,
            }))
        })
    }

    /// The functions named `name` in this scope.
    pub fn get_functions(
        &self,
        resolver: &DescriptorResolver<'_>,
        name: &Name,
    ) -> ResolveResult<Arc<[Arc<FunctionDescriptor>]>> {
        self.functions.get_or_try_init(name, || {
            let Some(provider) = self.static_provider() else {
                return Ok(Arc::from(Vec::new()));
            };
            Ok(resolver
                .resolve_function_group(name, &provider, &self.as_owner())
                .into())
        })
    }

    /// The properties named `name` in this scope.
    pub fn get_properties(
        &self,
        resolver: &DescriptorResolver<'_>,
        name: &Name,
    ) -> ResolveResult<Arc<[Arc<PropertyDescriptor>]>> {
        self.properties.get_or_try_init(name, || {
            let Some(provider) = self.static_provider() else {
                return Ok(Arc::from(Vec::new()));
            };
            Ok(resolver
                .resolve_field_group_by_name(name, &provider, &self.as_owner())
                .into())
        })
    }

    fn class_fq_name(&self, name: &Name) -> Option<QualifiedName> {
        match &self.source {
            ScopeSource::Empty => None,
            ScopeSource::Package { package, holder } => {
                if holder.as_ref().and_then(|h| h.simple_name()) == Some(name) {
                    return None;
                }
                package
                    .classes
                    .contains(name)
                    .then(|| package.fq_name.child(name.clone()))
            }
            ScopeSource::ClassStatics { class } => class
                .nested
                .contains(name)
                .then(|| class.fq_name.child(name.clone())),
        }
    }

    fn static_provider(&self) -> Option<DeclarationProvider<'_>> {
        match &self.source {
            ScopeSource::Package {
                holder: Some(holder),
                ..
            } => Some(DeclarationProvider::statics(holder)),
            ScopeSource::ClassStatics { class } => Some(DeclarationProvider::statics(class)),
            _ => None,
        }
    }

    fn as_owner(&self) -> DescriptorOwner {
        DescriptorOwner::Namespace(self.owner.clone())
    }
}

impl fmt::Debug for MemberScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberScope")
            .field("flavor", &self.flavor())
            .field("class_universe", &self.class_universe)
            .finish()
    }
}

/// Several namespace scopes searched in order.
///
/// Used for a package that resolves in more than one universe: the native
/// part (if any) comes first.
#[derive(Clone, Debug, Default)]
pub struct ChainedScope {
    namespaces: Vec<Arc<NamespaceDescriptor>>,
}

impl ChainedScope {
    pub fn new(namespaces: Vec<Arc<NamespaceDescriptor>>) -> Self {
        Self { namespaces }
    }

    pub fn namespaces(&self) -> &[Arc<NamespaceDescriptor>] {
        &self.namespaces
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    /// The first class named `name` along the chain.
    pub fn get_class(
        &self,
        resolver: &DescriptorResolver<'_>,
        name: &Name,
    ) -> ResolveResult<Option<Arc<ClassDescriptor>>> {
        for ns in &self.namespaces {
            if let Some(class) = ns.member_scope().get_class(resolver, name)? {
                return Ok(Some(class));
            }
        }
        Ok(None)
    }

    /// Functions named `name` from every scope in the chain.
    pub fn get_functions(
        &self,
        resolver: &DescriptorResolver<'_>,
        name: &Name,
    ) -> ResolveResult<Vec<Arc<FunctionDescriptor>>> {
        let mut result = Vec::new();
        for ns in &self.namespaces {
            result.extend(ns.member_scope().get_functions(resolver, name)?.iter().cloned());
        }
        Ok(result)
    }

    /// Properties named `name` from every scope in the chain.
    pub fn get_properties(
        &self,
        resolver: &DescriptorResolver<'_>,
        name: &Name,
    ) -> ResolveResult<Vec<Arc<PropertyDescriptor>>> {
        let mut result = Vec::new();
        for ns in &self.namespaces {
            result.extend(ns.member_scope().get_properties(resolver, name)?.iter().cloned());
        }
        Ok(result)
    }
}
