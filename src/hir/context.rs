//! The resolution session.
//!
//! A [`ResolverContext`] owns every cache and handle the resolvers need. It is
//! created once per compilation pass, shared by reference across threads, and
//! torn down explicitly when the pass ends. Between passes, the build driver
//! calls [`ResolverContext::invalidate`] for names whose definitions changed.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use crate::base::QualifiedName;

use super::cache::{DescriptorCache, OnceMap};
use super::config::ResolverConfig;
use super::descriptors::ClassDescriptor;
use super::diagnostics::{Diagnostic, DiagnosticCollector};
use super::input::ForeignClasspath;
use super::native::NativeSymbols;
use super::resolve::DescriptorResolver;
use super::trace::BindingTrace;
use super::universe::UniversePartition;

pub struct ResolverContext {
    config: ResolverConfig,
    classpath: Arc<dyn ForeignClasspath>,
    native: Arc<dyn NativeSymbols>,
    partition: Arc<dyn UniversePartition>,
    trace: Arc<dyn BindingTrace>,
    namespaces: DescriptorCache,
    classes: OnceMap<QualifiedName, Option<Arc<ClassDescriptor>>>,
    diagnostics: Mutex<DiagnosticCollector>,
    /// Supertype cycles already reported, normalized to start at their least name.
    reported_cycles: Mutex<FxHashSet<Vec<QualifiedName>>>,
}

impl ResolverContext {
    /// Create a session with the default configuration.
    pub fn new(
        classpath: Arc<dyn ForeignClasspath>,
        native: Arc<dyn NativeSymbols>,
        partition: Arc<dyn UniversePartition>,
        trace: Arc<dyn BindingTrace>,
    ) -> Self {
        Self {
            config: ResolverConfig::default(),
            classpath,
            native,
            partition,
            trace,
            namespaces: DescriptorCache::new(),
            classes: OnceMap::new(),
            diagnostics: Mutex::new(DiagnosticCollector::new()),
            reported_cycles: Mutex::new(FxHashSet::default()),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// The resolver facade over this session.
    pub fn resolver(&self) -> DescriptorResolver<'_> {
        DescriptorResolver::new(self)
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn partition(&self) -> &dyn UniversePartition {
        self.partition.as_ref()
    }

    /// The namespace cache, for inspection.
    pub fn namespace_cache(&self) -> &DescriptorCache {
        &self.namespaces
    }

    /// Number of class names with a cached result (found or not).
    pub fn cached_class_count(&self) -> usize {
        self.classes.len()
    }

    /// Drop cached results for `name` and every name below it.
    ///
    /// Returns how many cache entries were dropped. Descriptors already handed
    /// out stay valid but are no longer returned by later lookups.
    pub fn invalidate(&self, name: &QualifiedName) -> usize {
        let namespaces = self.namespaces.invalidate(name);
        let classes = self.classes.remove_where(|key| key.starts_with(name));
        tracing::debug!(
            "[RESOLVER_CONTEXT] invalidated {}: {} namespace(s), {} class(es)",
            name,
            namespaces,
            classes
        );
        namespaces + classes
    }

    /// Snapshot of the session's diagnostics.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().diagnostics().to_vec()
    }

    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().take()
    }

    /// End the session, dropping every cache.
    pub fn teardown(self) {
        let namespaces = self.namespaces.len();
        let classes = self.classes.len();
        self.namespaces.clear();
        self.classes.clear();
        tracing::debug!(
            "[RESOLVER_CONTEXT] teardown: dropped {} namespace(s), {} class(es)",
            namespaces,
            classes
        );
    }

    pub(crate) fn classpath(&self) -> &dyn ForeignClasspath {
        self.classpath.as_ref()
    }

    pub(crate) fn native(&self) -> &dyn NativeSymbols {
        self.native.as_ref()
    }

    pub(crate) fn trace(&self) -> &dyn BindingTrace {
        self.trace.as_ref()
    }

    pub(crate) fn namespaces(&self) -> &DescriptorCache {
        &self.namespaces
    }

    pub(crate) fn classes(&self) -> &OnceMap<QualifiedName, Option<Arc<ClassDescriptor>>> {
        &self.classes
    }

    pub(crate) fn report(&self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.lock().extend(diagnostics);
    }

    /// Whether `cycle` (first name repeated at the end) is reported for the
    /// first time in this session.
    pub(crate) fn first_report_of_cycle(&self, cycle: &[QualifiedName]) -> bool {
        let members = match cycle.split_last() {
            Some((_, members)) if !members.is_empty() => members,
            _ => return false,
        };
        let start = members
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.cmp(b))
            .map_or(0, |(index, _)| index);
        let mut key = members[start..].to_vec();
        key.extend_from_slice(&members[..start]);
        self.reported_cycles.lock().insert(key)
    }
}

impl fmt::Debug for ResolverContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolverContext")
            .field("config", &self.config)
            .field("namespaces", &self.namespaces.len())
            .field("classes", &self.classes.len())
            .finish()
    }
}
