//! The native symbol table.
//!
//! The resolver consults native definitions before touching the classpath.
//! [`NativeSymbols`] is that lookup; [`NativeIndex`] is an in-memory
//! implementation fed per file, the way a compiler session feeds parsed
//! sources.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::base::{FileId, QualifiedName};

use super::descriptors::{ClassDescriptor, DescriptorOwner, NamespaceDescriptor, NamespaceParent};
use super::input::ClassKind;
use super::universe::Universe;

/// Lookup of native definitions by qualified name.
pub trait NativeSymbols: Send + Sync {
    fn lookup_namespace(&self, name: &QualifiedName) -> Option<Arc<NamespaceDescriptor>>;

    fn lookup_class(&self, _name: &QualifiedName) -> Option<Arc<ClassDescriptor>> {
        None
    }
}

/// A table with no native definitions.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoNativeSymbols;

impl NativeSymbols for NoNativeSymbols {
    fn lookup_namespace(&self, _name: &QualifiedName) -> Option<Arc<NamespaceDescriptor>> {
        None
    }
}

/// A declaration contributed by one native source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NativeDeclaration {
    Namespace(QualifiedName),
    Class {
        fq_name: QualifiedName,
        kind: ClassKind,
        supertypes: Vec<QualifiedName>,
    },
}

impl NativeDeclaration {
    pub fn namespace(fq_name: QualifiedName) -> Self {
        NativeDeclaration::Namespace(fq_name)
    }

    pub fn class(fq_name: QualifiedName, kind: ClassKind) -> Self {
        NativeDeclaration::Class {
            fq_name,
            kind,
            supertypes: Vec::new(),
        }
    }

    pub fn with_supertype(mut self, name: QualifiedName) -> Self {
        if let NativeDeclaration::Class { supertypes, .. } = &mut self {
            supertypes.push(name);
        }
        self
    }
}

#[derive(Debug, Default)]
struct Descriptors {
    namespaces: FxHashMap<QualifiedName, Arc<NamespaceDescriptor>>,
    classes: FxHashMap<QualifiedName, Arc<ClassDescriptor>>,
}

#[derive(Debug, Default)]
struct IndexState {
    /// The single source of truth: declarations per file.
    by_file: FxHashMap<FileId, Vec<NativeDeclaration>>,
    descriptors: Descriptors,
    /// Descriptors are stale and must be rebuilt before the next lookup.
    dirty: bool,
}

/// In-memory native symbol table.
///
/// Declaring a namespace implicitly declares its ancestors, since native
/// namespaces have no existence of their own beyond the files that use them.
/// Descriptors are rebuilt lazily after any file change, so descriptor
/// identity is stable only between edits.
#[derive(Debug)]
pub struct NativeIndex {
    universe: Universe,
    state: RwLock<IndexState>,
    namespace_lookups: AtomicUsize,
    class_lookups: AtomicUsize,
}

impl NativeIndex {
    pub fn new(universe: Universe) -> Self {
        Self {
            universe,
            state: RwLock::new(IndexState::default()),
            namespace_lookups: AtomicUsize::new(0),
            class_lookups: AtomicUsize::new(0),
        }
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    /// Replace the declarations of a file.
    pub fn add_file(&self, file: FileId, declarations: Vec<NativeDeclaration>) {
        let mut state = self.state.write();
        state.by_file.insert(file, declarations);
        state.dirty = true;
    }

    /// Forget every declaration of a file.
    pub fn remove_file(&self, file: FileId) {
        let mut state = self.state.write();
        if state.by_file.remove(&file).is_some() {
            state.dirty = true;
        }
    }

    pub fn file_count(&self) -> usize {
        self.state.read().by_file.len()
    }

    /// How many times [`NativeSymbols::lookup_namespace`] was called.
    pub fn namespace_lookups(&self) -> usize {
        self.namespace_lookups.load(Ordering::Relaxed)
    }

    /// How many times [`NativeSymbols::lookup_class`] was called.
    pub fn class_lookups(&self) -> usize {
        self.class_lookups.load(Ordering::Relaxed)
    }

    fn with_descriptors<T>(&self, f: impl FnOnce(&Descriptors) -> T) -> T {
        {
            let state = self.state.read();
            if !state.dirty {
                return f(&state.descriptors);
            }
        }
        let mut state = self.state.write();
        if state.dirty {
            state.descriptors = build_descriptors(&self.universe, &state.by_file);
            state.dirty = false;
            tracing::debug!(
                "[NATIVE_INDEX] rebuilt {} namespace(s), {} class(es)",
                state.descriptors.namespaces.len(),
                state.descriptors.classes.len()
            );
        }
        f(&state.descriptors)
    }
}

impl NativeSymbols for NativeIndex {
    fn lookup_namespace(&self, name: &QualifiedName) -> Option<Arc<NamespaceDescriptor>> {
        self.namespace_lookups.fetch_add(1, Ordering::Relaxed);
        self.with_descriptors(|d| d.namespaces.get(name).cloned())
    }

    fn lookup_class(&self, name: &QualifiedName) -> Option<Arc<ClassDescriptor>> {
        self.class_lookups.fetch_add(1, Ordering::Relaxed);
        self.with_descriptors(|d| d.classes.get(name).cloned())
    }
}

fn build_descriptors(universe: &Universe, by_file: &FxHashMap<FileId, Vec<NativeDeclaration>>) -> Descriptors {
    let mut out = Descriptors::default();

    // Namespaces first, shallowest first, so every parent exists before its children.
    let mut namespaces: Vec<QualifiedName> = Vec::new();
    for declaration in by_file.values().flatten() {
        let declared = match declaration {
            NativeDeclaration::Namespace(name) => name.clone(),
            NativeDeclaration::Class { fq_name, .. } if !fq_name.is_root() => fq_name.parent(),
            NativeDeclaration::Class { .. } => continue,
        };
        let mut current = Some(declared);
        while let Some(name) = current {
            current = (!name.is_root()).then(|| name.parent());
            namespaces.push(name);
        }
    }
    namespaces.sort_by_key(|name| name.depth());
    namespaces.dedup();

    for name in namespaces {
        if out.namespaces.contains_key(&name) {
            continue;
        }
        let parent = if name.is_root() {
            NamespaceParent::Universe(universe.clone())
        } else {
            match out.namespaces.get(&name.parent()) {
                Some(parent) => NamespaceParent::Namespace(parent.clone()),
                None => NamespaceParent::Universe(universe.clone()),
            }
        };
        let ns = NamespaceDescriptor::native(name.clone(), universe.clone(), parent);
        out.namespaces.insert(name, ns);
    }

    let mut classes: Vec<_> = by_file
        .values()
        .flatten()
        .filter_map(|declaration| match declaration {
            NativeDeclaration::Class {
                fq_name,
                kind,
                supertypes,
            } if !fq_name.is_root() => Some((fq_name, *kind, supertypes)),
            _ => None,
        })
        .collect();
    classes.sort_by_key(|(name, _, _)| name.depth());

    for (fq_name, kind, supertypes) in classes {
        let parent = fq_name.parent();
        let owner = if let Some(outer) = out.classes.get(&parent) {
            outer.as_owner()
        } else if let Some(ns) = out.namespaces.get(&parent) {
            DescriptorOwner::Namespace(Arc::downgrade(ns))
        } else {
            continue;
        };
        let class = ClassDescriptor::native(fq_name.clone(), kind, universe.clone(), owner, supertypes.clone());
        out.classes.entry(fq_name.clone()).or_insert(class);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Name;
    use crate::hir::universe::UniverseOrigin;

    fn qn(text: &str) -> QualifiedName {
        QualifiedName::parse(text).unwrap()
    }

    fn index() -> NativeIndex {
        NativeIndex::new(Universe::new(Name::special("module"), UniverseOrigin::Native))
    }

    #[test]
    fn test_namespace_declares_ancestors() {
        let index = index();
        index.add_file(FileId::new(0), vec![NativeDeclaration::namespace(qn("com.acme"))]);

        let acme = index.lookup_namespace(&qn("com.acme")).unwrap();
        let com = index.lookup_namespace(&qn("com")).unwrap();
        let root = index.lookup_namespace(&QualifiedName::root()).unwrap();

        assert!(Arc::ptr_eq(acme.parent_namespace().unwrap(), &com));
        assert!(Arc::ptr_eq(com.parent_namespace().unwrap(), &root));
        assert!(root.parent_namespace().is_none());
        assert!(acme.is_native());
        assert_eq!(index.namespace_lookups(), 3);
    }

    #[test]
    fn test_class_owner_is_namespace() {
        let index = index();
        index.add_file(
            FileId::new(0),
            vec![NativeDeclaration::class(qn("com.acme.Util"), ClassKind::Class).with_supertype(qn("com.acme.Base"))],
        );

        let class = index.lookup_class(&qn("com.acme.Util")).unwrap();
        assert!(class.is_native());
        assert_eq!(class.supertypes(), &[qn("com.acme.Base")]);
        let owner = class.owner().upgrade();
        assert!(matches!(owner, Some(crate::hir::descriptors::Declaration::Namespace(ns)) if ns.fq_name() == &qn("com.acme")));
    }

    #[test]
    fn test_remove_file() {
        let index = index();
        index.add_file(FileId::new(0), vec![NativeDeclaration::namespace(qn("a"))]);
        index.add_file(FileId::new(1), vec![NativeDeclaration::namespace(qn("b"))]);
        assert_eq!(index.file_count(), 2);
        assert!(index.lookup_namespace(&qn("a")).is_some());

        index.remove_file(FileId::new(0));
        assert!(index.lookup_namespace(&qn("a")).is_none());
        assert!(index.lookup_namespace(&qn("b")).is_some());
    }

    #[test]
    fn test_identity_stable_between_edits() {
        let index = index();
        index.add_file(FileId::new(0), vec![NativeDeclaration::namespace(qn("a"))]);
        let first = index.lookup_namespace(&qn("a")).unwrap();
        let second = index.lookup_namespace(&qn("a")).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
