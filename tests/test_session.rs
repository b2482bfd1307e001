//! Session lifecycle: invalidation, teardown, package scopes, batch
//! resolution, collaborator failures and visibility over resolved members.

mod helpers;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread;

use helpers::{World, acme_util, class, name, qn};
use interop::base::QualifiedName;
use interop::hir::{
    ClassFindMode, ClasspathError, ClasspathIndex, Declaration, ForeignClass, ForeignClasspath, ForeignPackage,
    NativeDeclaration, NoNativeSymbols, NoopTrace, ResolveError, ResolverContext, SearchScope, StandardPartition,
};

#[test]
fn test_invalidate_drops_subtree() {
    let world = World::builder().classes(acme_util()).build();
    let resolver = world.ctx.resolver();

    let before = resolver.resolve_namespace(&qn("com.acme")).unwrap().unwrap();
    assert_eq!(world.ctx.namespace_cache().len(), 3);

    assert_eq!(world.ctx.invalidate(&qn("com")), 2);
    assert_eq!(world.ctx.namespace_cache().len(), 1);

    let after = resolver.resolve_namespace(&qn("com.acme")).unwrap().unwrap();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.fq_name(), before.fq_name());
}

#[test]
fn test_invalidate_covers_classes() {
    let world = World::builder().classes(acme_util()).build();
    let resolver = world.ctx.resolver();

    let util = resolver.resolve_class(&qn("com.acme.Util")).unwrap().unwrap();
    assert_eq!(world.ctx.cached_class_count(), 1);

    // com.acme as a namespace and com.acme.Util as a class.
    assert_eq!(world.ctx.invalidate(&qn("com.acme")), 2);
    assert_eq!(world.ctx.cached_class_count(), 0);

    let again = resolver.resolve_class(&qn("com.acme.Util")).unwrap().unwrap();
    assert!(!Arc::ptr_eq(&util, &again));
}

#[test]
fn test_teardown_releases_descriptors() {
    let classpath = ClasspathIndex::new()
        .with_class(class("com.acme.Util"))
        .unwrap();
    let ctx = ResolverContext::new(
        Arc::new(classpath),
        Arc::new(NoNativeSymbols),
        Arc::new(StandardPartition::new()),
        Arc::new(NoopTrace),
    );

    let (ns, util): (Weak<_>, Weak<_>) = {
        let resolver = ctx.resolver();
        let ns = resolver.resolve_namespace(&qn("com.acme")).unwrap().unwrap();
        let util = resolver.resolve_class(&qn("com.acme.Util")).unwrap().unwrap();
        (Arc::downgrade(&ns), Arc::downgrade(&util))
    };
    assert!(ns.upgrade().is_some());
    assert!(util.upgrade().is_some());

    ctx.teardown();
    assert!(ns.upgrade().is_none());
    assert!(util.upgrade().is_none());
}

// ============================================================================
// PACKAGE SCOPES
// ============================================================================

#[test]
fn test_package_scope_foreign_only() {
    let world = World::builder().classes(acme_util()).build();
    let resolver = world.ctx.resolver();

    let scope = resolver.package_scope(&qn("com.acme")).unwrap().unwrap();
    assert_eq!(scope.namespaces().len(), 1);
    let util = scope.get_class(&resolver, &name("Util")).unwrap().unwrap();
    assert_eq!(util.fq_name(), &qn("com.acme.Util"));
    assert!(scope.get_class(&resolver, &name("Nope")).unwrap().is_none());
}

#[test]
fn test_package_scope_native_hides_foreign() {
    let world = World::builder()
        .classes(acme_util())
        .native(1, vec![NativeDeclaration::namespace(qn("com.acme"))])
        .build();
    let resolver = world.ctx.resolver();

    let scope = resolver.package_scope(&qn("com.acme")).unwrap().unwrap();
    assert_eq!(scope.namespaces().len(), 1);
    assert!(scope.namespaces()[0].is_native());
    assert!(scope.get_class(&resolver, &name("Util")).unwrap().is_none());
    assert_eq!(world.classpath.package_probes(), 0);
}

#[test]
fn test_package_scope_missing() {
    let world = World::builder().classes(acme_util()).build();
    assert!(world.ctx.resolver().package_scope(&qn("org.none")).unwrap().is_none());
}

// ============================================================================
// BATCH RESOLUTION
// ============================================================================

#[test]
fn test_prefetch_counts_found_names() {
    let world = World::builder().classes(acme_util()).build();
    let names = vec![qn("com"), qn("com.acme"), qn("org.none")];

    assert_eq!(world.ctx.resolver().prefetch(&names).unwrap(), 2);
    assert!(world.ctx.namespace_cache().lookup(&qn("org.none")).is_some());
}

#[test]
fn test_concurrent_resolution_probes_once() {
    let world = World::builder().classes(acme_util()).build();
    let names = vec![qn("com"), qn("com.acme")];

    thread::scope(|s| {
        for _ in 0..16 {
            s.spawn(|| {
                assert_eq!(world.ctx.resolver().prefetch(&names).unwrap(), 2);
            });
        }
    });

    // root, com and com.acme, each probed exactly once.
    assert_eq!(world.classpath.package_probes(), 3);

    let first = world.ctx.resolver().resolve_namespace(&qn("com.acme")).unwrap().unwrap();
    let second = world.ctx.resolver().resolve_namespace(&qn("com.acme")).unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

// ============================================================================
// COLLABORATOR FAILURES
// ============================================================================

/// Fails the first package probe, then delegates.
struct FlakyClasspath {
    inner: ClasspathIndex,
    failed: AtomicBool,
}

impl ForeignClasspath for FlakyClasspath {
    fn find_package(
        &self,
        name: &QualifiedName,
        scope: &SearchScope,
    ) -> Result<Option<Arc<ForeignPackage>>, ClasspathError> {
        if !self.failed.swap(true, Ordering::SeqCst) {
            return Err(ClasspathError::malformed(name, "truncated entry"));
        }
        self.inner.find_package(name, scope)
    }

    fn find_class(
        &self,
        name: &QualifiedName,
        mode: ClassFindMode,
        scope: &SearchScope,
    ) -> Result<Option<Arc<ForeignClass>>, ClasspathError> {
        self.inner.find_class(name, mode, scope)
    }
}

#[test]
fn test_classpath_failure_is_fatal_and_not_cached() {
    let classpath = FlakyClasspath {
        inner: ClasspathIndex::new().with_class(class("com.acme.Util")).unwrap(),
        failed: AtomicBool::new(false),
    };
    let ctx = ResolverContext::new(
        Arc::new(classpath),
        Arc::new(NoNativeSymbols),
        Arc::new(StandardPartition::new()),
        Arc::new(NoopTrace),
    );
    let resolver = ctx.resolver();

    let err = resolver.resolve_namespace(&qn("com.acme")).unwrap_err();
    assert!(matches!(err, ResolveError::Classpath(ClasspathError::Malformed { .. })));
    assert!(err.is_fatal());
    assert!(ctx.namespace_cache().lookup(&qn("com.acme")).is_none());

    let ns = resolver.resolve_namespace(&qn("com.acme")).unwrap();
    assert!(ns.is_some());
}

// ============================================================================
// VISIBILITY
// ============================================================================

#[test]
fn test_member_visibility_from_declarations() {
    let world = World::builder()
        .classes(acme_util())
        .class(class("org.other.Client"))
        .build();
    let resolver = world.ctx.resolver();

    let util = resolver.resolve_class(&qn("com.acme.Util")).unwrap().unwrap();
    let helper = resolver.resolve_class(&qn("com.acme.Util.Helper")).unwrap().unwrap();
    let acme = resolver.resolve_namespace(&qn("com.acme")).unwrap().unwrap();
    let other = resolver.resolve_namespace(&qn("org.other")).unwrap().unwrap();

    let secret = Declaration::Property(util.properties(&name("secret")).unwrap()[0].clone());
    assert!(secret.is_visible_from(&Declaration::Namespace(acme.clone())));
    assert!(secret.is_visible_from(&Declaration::Class(helper.clone())));
    assert!(!secret.is_visible_from(&Declaration::Namespace(other)));

    let hidden = Declaration::Property(util.properties(&name("hidden")).unwrap()[0].clone());
    assert!(hidden.is_visible_from(&Declaration::Class(helper)));
    assert!(hidden.is_visible_from(&Declaration::Class(util.clone())));
    assert!(!hidden.is_visible_from(&Declaration::Namespace(acme)));
}

#[test]
fn test_containing_namespace_of_member() {
    let world = World::builder().classes(acme_util()).build();
    let util = world.ctx.resolver().resolve_class(&qn("com.acme.Util")).unwrap().unwrap();

    let run = Declaration::Function(util.functions(&name("run")).unwrap()[0].clone());
    let ns = run.containing_namespace(true).unwrap();
    assert_eq!(ns.fq_name(), &qn("com.acme"));
    assert!(run.is_within(&Declaration::Class(util)));
}
