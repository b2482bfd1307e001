//! In-memory classpath.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rustc_hash::FxHashMap;

use crate::base::QualifiedName;

use super::error::ClasspathError;
use super::input::{ClassFindMode, ForeignClass, ForeignClasspath, ForeignPackage};
use super::universe::SearchScope;

/// A [`ForeignClasspath`] over records registered up front.
///
/// Registering a top-level class creates its package (and every ancestor
/// package) on demand and lists the class there. A nested class is listed in
/// its outer class, which must be registered first. Probes are counted so
/// callers can check how often the classpath was consulted.
#[derive(Debug, Default)]
pub struct ClasspathIndex {
    packages: FxHashMap<QualifiedName, Arc<ForeignPackage>>,
    classes: FxHashMap<QualifiedName, Arc<ForeignClass>>,
    package_probes: AtomicUsize,
    class_probes: AtomicUsize,
}

impl ClasspathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package, merging with one created implicitly before.
    pub fn add_package(&mut self, package: ForeignPackage) {
        match self.packages.get_mut(&package.fq_name) {
            Some(existing) => {
                let existing = Arc::make_mut(existing);
                existing.source = package.source;
                for class in package.classes {
                    if !existing.classes.contains(&class) {
                        existing.classes.push(class);
                    }
                }
            }
            None => {
                self.ensure_ancestors(&package);
                self.packages.insert(package.fq_name.clone(), Arc::new(package));
            }
        }
    }

    /// Register a class.
    pub fn add_class(&mut self, class: ForeignClass) -> Result<(), ClasspathError> {
        let Some(simple_name) = class.simple_name().cloned() else {
            return Err(ClasspathError::malformed(class.fq_name.clone(), "a class needs a name"));
        };
        let parent = class.fq_name.parent();

        if let Some(outer) = self.classes.get_mut(&parent) {
            let outer = Arc::make_mut(outer);
            if !outer.nested.contains(&simple_name) {
                outer.nested.push(simple_name);
            }
        } else if !self.packages.contains_key(&parent) {
            self.add_package(ForeignPackage::new(parent, class.source).with_class(simple_name));
        } else if let Some(package) = self.packages.get_mut(&parent) {
            let package = Arc::make_mut(package);
            if !package.classes.contains(&simple_name) {
                package.classes.push(simple_name);
            }
        }

        self.classes.insert(class.fq_name.clone(), Arc::new(class));
        Ok(())
    }

    pub fn with_package(mut self, package: ForeignPackage) -> Self {
        self.add_package(package);
        self
    }

    pub fn with_class(mut self, class: ForeignClass) -> Result<Self, ClasspathError> {
        self.add_class(class)?;
        Ok(self)
    }

    /// How many `find_package` calls were made.
    pub fn package_probes(&self) -> usize {
        self.package_probes.load(Ordering::Relaxed)
    }

    /// How many `find_class` calls were made.
    pub fn class_probes(&self) -> usize {
        self.class_probes.load(Ordering::Relaxed)
    }

    pub fn probes(&self) -> usize {
        self.package_probes() + self.class_probes()
    }

    fn ensure_ancestors(&mut self, package: &ForeignPackage) {
        let mut current = package.fq_name.clone();
        while !current.is_root() {
            let parent = current.parent();
            self.packages
                .entry(parent.clone())
                .or_insert_with(|| Arc::new(ForeignPackage::new(parent.clone(), package.source)));
            current = parent;
        }
    }
}

impl ForeignClasspath for ClasspathIndex {
    fn find_package(
        &self,
        name: &QualifiedName,
        scope: &SearchScope,
    ) -> Result<Option<Arc<ForeignPackage>>, ClasspathError> {
        self.package_probes.fetch_add(1, Ordering::Relaxed);
        let found = self
            .packages
            .get(name)
            .filter(|package| scope.contains(&package.source))
            .cloned();
        tracing::trace!("[CLASSPATH] find_package {} in {}: {}", name, scope.universe(), found.is_some());
        Ok(found)
    }

    fn find_class(
        &self,
        name: &QualifiedName,
        mode: ClassFindMode,
        scope: &SearchScope,
    ) -> Result<Option<Arc<ForeignClass>>, ClasspathError> {
        self.class_probes.fetch_add(1, Ordering::Relaxed);
        let found = self
            .classes
            .get(name)
            .filter(|class| scope.contains(&class.source))
            .filter(|class| mode == ClassFindMode::Strict || !class.is_synthetic)
            .cloned();
        tracing::trace!("[CLASSPATH] find_class {} ({:?}) in {}: {}", name, mode, scope.universe(), found.is_some());
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{FileId, Name, SourceFile};
    use crate::hir::input::ClassKind;
    use crate::hir::universe::{Universe, UniverseOrigin};

    fn qn(text: &str) -> QualifiedName {
        QualifiedName::parse(text).unwrap()
    }

    fn class(text: &str) -> ForeignClass {
        ForeignClass::new(qn(text), ClassKind::Class, SourceFile::foreign_binary(FileId::new(0)))
    }

    fn everything() -> SearchScope {
        SearchScope::everything(Universe::new(Name::special("u"), UniverseOrigin::Foreign))
    }

    #[test]
    fn test_add_class_creates_packages() {
        let mut classpath = ClasspathIndex::new();
        classpath.add_class(class("com.acme.Util")).unwrap();

        let scope = everything();
        let acme = classpath.find_package(&qn("com.acme"), &scope).unwrap().unwrap();
        assert_eq!(acme.classes, vec![Name::identifier("Util").unwrap()]);
        assert!(classpath.find_package(&qn("com"), &scope).unwrap().is_some());
        assert!(classpath.find_package(&QualifiedName::root(), &scope).unwrap().is_some());
        assert_eq!(classpath.package_probes(), 3);
    }

    #[test]
    fn test_nested_class_listed_in_outer() {
        let mut classpath = ClasspathIndex::new();
        classpath.add_class(class("a.Outer")).unwrap();
        classpath.add_class(class("a.Outer.Inner")).unwrap();

        let outer = classpath
            .find_class(&qn("a.Outer"), ClassFindMode::Strict, &everything())
            .unwrap()
            .unwrap();
        assert_eq!(outer.nested, vec![Name::identifier("Inner").unwrap()]);
        let package = classpath.find_package(&qn("a"), &everything()).unwrap().unwrap();
        assert_eq!(package.classes.len(), 1);
    }

    #[test]
    fn test_find_mode_skips_synthetic() {
        let mut classpath = ClasspathIndex::new();
        classpath.add_class(class("a.Gen").synthetic()).unwrap();
        let scope = everything();
        assert!(classpath.find_class(&qn("a.Gen"), ClassFindMode::Strict, &scope).unwrap().is_some());
        assert!(classpath
            .find_class(&qn("a.Gen"), ClassFindMode::IgnoreSynthetic, &scope)
            .unwrap()
            .is_none());
        assert_eq!(classpath.class_probes(), 2);
    }

    #[test]
    fn test_scope_filters_native_sources() {
        let mut classpath = ClasspathIndex::new();
        classpath
            .add_class(ForeignClass::new(
                qn("k.Src"),
                ClassKind::Class,
                SourceFile::native_source(FileId::new(3)),
            ))
            .unwrap();
        let scope = SearchScope::excluding_native_sources(Universe::new(Name::special("j"), UniverseOrigin::Foreign));
        assert!(classpath.find_class(&qn("k.Src"), ClassFindMode::Strict, &scope).unwrap().is_none());
    }

    #[test]
    fn test_root_class_is_malformed() {
        let mut classpath = ClasspathIndex::new();
        let result = classpath.add_class(ForeignClass::new(
            QualifiedName::root(),
            ClassKind::Class,
            SourceFile::foreign_binary(FileId::new(0)),
        ));
        assert!(matches!(result, Err(ClasspathError::Malformed { .. })));
    }
}
