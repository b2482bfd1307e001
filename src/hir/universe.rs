//! Universes: the logical symbol spaces a name can resolve in.
//!
//! A deployment has at least one native universe (the compiler's own sources)
//! and one foreign universe (the external classpath). Universes are compared
//! by identity, never by name: two universes created with the same name are
//! still distinct.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::base::{Name, SourceFile, SourceLanguage};

use super::error::{ResolveError, ResolveResult};

/// Which kind of definitions a universe holds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum UniverseOrigin {
    Native,
    Foreign,
}

struct UniverseData {
    name: Name,
    origin: UniverseOrigin,
}

/// A handle to a universe. Cloning shares the identity.
#[derive(Clone)]
pub struct Universe(Arc<UniverseData>);

impl Universe {
    /// Create a new universe with its own identity.
    pub fn new(name: Name, origin: UniverseOrigin) -> Self {
        Self(Arc::new(UniverseData { name, origin }))
    }

    pub fn name(&self) -> &Name {
        &self.0.name
    }

    pub fn origin(&self) -> UniverseOrigin {
        self.0.origin
    }

    #[inline]
    pub fn is_native(&self) -> bool {
        self.0.origin == UniverseOrigin::Native
    }
}

impl PartialEq for Universe {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Universe {}

impl Hash for Universe {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state)
    }
}

impl fmt::Debug for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Universe({}, {:?})", self.0.name, self.0.origin)
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum FileFilter {
    Everything,
    NativeSources,
    ExcludingNativeSources,
}

/// The set of files a universe may see on the classpath.
///
/// Handed to the foreign introspection layer with every probe so lookups stay
/// inside the universe being resolved.
#[derive(Clone, Debug)]
pub struct SearchScope {
    universe: Universe,
    filter: FileFilter,
}

impl SearchScope {
    /// A scope containing every file.
    pub fn everything(universe: Universe) -> Self {
        Self {
            universe,
            filter: FileFilter::Everything,
        }
    }

    /// A scope containing only native source files.
    pub fn native_sources(universe: Universe) -> Self {
        Self {
            universe,
            filter: FileFilter::NativeSources,
        }
    }

    /// A scope containing every file except native sources.
    ///
    /// Binaries compiled from native sources stay visible.
    pub fn excluding_native_sources(universe: Universe) -> Self {
        Self {
            universe,
            filter: FileFilter::ExcludingNativeSources,
        }
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn contains(&self, file: &SourceFile) -> bool {
        match self.filter {
            FileFilter::Everything => true,
            FileFilter::NativeSources => file.is_native_source(),
            FileFilter::ExcludingNativeSources => !file.is_native_source(),
        }
    }
}

/// Partitioning of files and symbols into universes.
pub trait UniversePartition: Send + Sync {
    /// All universes, in resolution order.
    fn all_universes(&self) -> &[Universe];

    /// The search scope of a universe.
    fn search_scope_for(&self, universe: &Universe) -> ResolveResult<SearchScope>;

    /// The universe a file belongs to, if the partition can tell.
    fn universe_for_file(&self, _file: &SourceFile) -> Option<Universe> {
        None
    }
}

/// The default partition: a native `<module>` universe and a foreign
/// `<java_root>` universe.
///
/// The native universe sees only native source files; the foreign one sees
/// everything else, including binaries compiled from native sources.
#[derive(Clone, Debug)]
pub struct StandardPartition {
    universes: Vec<Universe>,
    native: Option<Universe>,
    foreign: Universe,
}

impl StandardPartition {
    pub fn new() -> Self {
        let native = Universe::new(Name::special("module"), UniverseOrigin::Native);
        let foreign = Universe::new(Name::special("java_root"), UniverseOrigin::Foreign);
        Self {
            universes: vec![native.clone(), foreign.clone()],
            native: Some(native),
            foreign,
        }
    }

    /// A partition with a single foreign root universe that sees every file.
    pub fn single_root() -> Self {
        let foreign = Universe::new(Name::special("java_root"), UniverseOrigin::Foreign);
        Self {
            universes: vec![foreign.clone()],
            native: None,
            foreign,
        }
    }

    pub fn native(&self) -> Option<&Universe> {
        self.native.as_ref()
    }

    pub fn foreign(&self) -> &Universe {
        &self.foreign
    }
}

impl Default for StandardPartition {
    fn default() -> Self {
        Self::new()
    }
}

impl UniversePartition for StandardPartition {
    fn all_universes(&self) -> &[Universe] {
        &self.universes
    }

    fn search_scope_for(&self, universe: &Universe) -> ResolveResult<SearchScope> {
        if self.native.as_ref() == Some(universe) {
            return Ok(SearchScope::native_sources(universe.clone()));
        }
        if *universe == self.foreign {
            return Ok(match self.native {
                Some(_) => SearchScope::excluding_native_sources(universe.clone()),
                None => SearchScope::everything(universe.clone()),
            });
        }
        Err(ResolveError::UnknownUniverse(universe.name().as_str().into()))
    }

    fn universe_for_file(&self, file: &SourceFile) -> Option<Universe> {
        match (&self.native, file.language) {
            (Some(native), SourceLanguage::Native) => Some(native.clone()),
            _ => Some(self.foreign.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::FileId;

    #[test]
    fn test_universe_identity() {
        let a = Universe::new(Name::special("x"), UniverseOrigin::Foreign);
        let b = Universe::new(Name::special("x"), UniverseOrigin::Foreign);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_standard_partition_scopes() {
        let partition = StandardPartition::new();
        let native = partition.native().unwrap().clone();
        let foreign = partition.foreign().clone();

        let native_file = SourceFile::native_source(FileId::new(0));
        let class_file = SourceFile::foreign_binary(FileId::new(1));
        let compiled_native = SourceFile::native_binary(FileId::new(2));

        let native_scope = partition.search_scope_for(&native).unwrap();
        assert!(native_scope.contains(&native_file));
        assert!(!native_scope.contains(&class_file));

        let foreign_scope = partition.search_scope_for(&foreign).unwrap();
        assert!(!foreign_scope.contains(&native_file));
        assert!(foreign_scope.contains(&class_file));
        assert!(foreign_scope.contains(&compiled_native));
        assert_eq!(partition.universe_for_file(&compiled_native), Some(native));
    }

    #[test]
    fn test_unknown_universe_is_rejected() {
        let partition = StandardPartition::new();
        let stranger = Universe::new(Name::special("stranger"), UniverseOrigin::Foreign);
        assert!(matches!(
            partition.search_scope_for(&stranger),
            Err(ResolveError::UnknownUniverse(_))
        ));
    }

    #[test]
    fn test_single_root_sees_everything() {
        let partition = StandardPartition::single_root();
        assert_eq!(partition.all_universes().len(), 1);
        let scope = partition.search_scope_for(partition.foreign()).unwrap();
        assert!(scope.contains(&SourceFile::native_source(FileId::new(0))));
        assert_eq!(
            partition.universe_for_file(&SourceFile::native_binary(FileId::new(0))),
            Some(partition.foreign().clone())
        );
    }
}
