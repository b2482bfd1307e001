//! Resolved descriptors: the compiler-side view of namespaces, classes and
//! their members.
//!
//! Ownership runs downward through strong references (namespace → parent
//! namespace, cache → namespace, scope → member) and upward through weak
//! ones (member → owner), so no reference cycle keeps a descriptor alive.

use std::fmt;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use once_cell::sync::OnceCell;

use crate::base::{Name, QualifiedName};

use super::cache::OnceMap;
use super::input::{ClassKind, ForeignClass};
use super::scope::MemberScope;
use super::universe::Universe;
use super::visibility::Visibility;

/// Per-universe resolution result for one qualified name.
///
/// A universe absent from the map means "confirmed unresolved there".
pub type UniverseMap = IndexMap<Universe, Arc<NamespaceDescriptor>>;

// ============================================================================
// NAMESPACES
// ============================================================================

/// How a foreign namespace is represented.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NamespaceKind {
    /// A genuine foreign package.
    Proper,
    /// The static members of a foreign class, exposed as a namespace.
    ClassStatics,
}

/// What a namespace hangs off.
#[derive(Clone, Debug)]
pub enum NamespaceParent {
    /// The root namespace of a universe.
    Universe(Universe),
    Namespace(Arc<NamespaceDescriptor>),
}

/// A resolved namespace within one universe.
///
/// The member scope is attached at construction, so a descriptor is never
/// observable without one.
pub struct NamespaceDescriptor {
    fq_name: QualifiedName,
    universe: Universe,
    parent: NamespaceParent,
    scope: MemberScope,
}

impl NamespaceDescriptor {
    /// Build a descriptor whose scope needs a handle to the descriptor itself.
    pub(crate) fn new_cyclic(
        fq_name: QualifiedName,
        universe: Universe,
        parent: NamespaceParent,
        scope: impl FnOnce(Weak<NamespaceDescriptor>) -> MemberScope,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            fq_name,
            universe,
            parent,
            scope: scope(this.clone()),
        })
    }

    /// A namespace defined in native sources.
    ///
    /// Its member scope exposes no foreign members; native members are the
    /// native symbol table's business.
    pub fn native(fq_name: QualifiedName, universe: Universe, parent: NamespaceParent) -> Arc<Self> {
        let class_universe = universe.clone();
        Self::new_cyclic(fq_name, universe, parent, |owner| {
            MemberScope::empty(owner, class_universe)
        })
    }

    pub fn fq_name(&self) -> &QualifiedName {
        &self.fq_name
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn parent(&self) -> &NamespaceParent {
        &self.parent
    }

    /// The parent namespace, or `None` at the root of a universe.
    pub fn parent_namespace(&self) -> Option<&Arc<NamespaceDescriptor>> {
        match &self.parent {
            NamespaceParent::Namespace(parent) => Some(parent),
            NamespaceParent::Universe(_) => None,
        }
    }

    pub fn member_scope(&self) -> &MemberScope {
        &self.scope
    }

    /// The foreign representation, or `None` for a native namespace.
    pub fn kind(&self) -> Option<NamespaceKind> {
        self.scope.namespace_kind()
    }

    #[inline]
    pub fn is_native(&self) -> bool {
        self.kind().is_none()
    }
}

impl fmt::Debug for NamespaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamespaceDescriptor")
            .field("fq_name", &self.fq_name)
            .field("universe", &self.universe)
            .field("kind", &self.kind())
            .finish()
    }
}

// ============================================================================
// OWNERS
// ============================================================================

/// Weak link from a member to the declaration that owns it.
#[derive(Clone, Debug)]
pub enum DescriptorOwner {
    Namespace(Weak<NamespaceDescriptor>),
    Class(Weak<ClassDescriptor>),
}

impl DescriptorOwner {
    pub fn upgrade(&self) -> Option<Declaration> {
        match self {
            DescriptorOwner::Namespace(ns) => ns.upgrade().map(Declaration::Namespace),
            DescriptorOwner::Class(class) => class.upgrade().map(Declaration::Class),
        }
    }
}

// ============================================================================
// CLASSES AND MEMBERS
// ============================================================================

/// Lazily resolved members of a foreign class.
#[derive(Default)]
pub(crate) struct ClassMembers {
    pub(crate) functions: OnceMap<Name, Arc<[Arc<FunctionDescriptor>]>>,
    pub(crate) properties: OnceMap<Name, Arc<[Arc<PropertyDescriptor>]>>,
    pub(crate) inner_classes: OnceCell<Arc<[Arc<ClassDescriptor>]>>,
    pub(crate) constructors: OnceCell<Arc<[Arc<ConstructorDescriptor>]>>,
}

pub struct ClassDescriptor {
    fq_name: QualifiedName,
    kind: ClassKind,
    universe: Universe,
    owner: DescriptorOwner,
    visibility: Visibility,
    supertypes: Vec<QualifiedName>,
    source: Option<Arc<ForeignClass>>,
    this: Weak<ClassDescriptor>,
    pub(crate) members: ClassMembers,
}

impl ClassDescriptor {
    /// A class backed by a foreign classpath record.
    pub fn foreign(source: Arc<ForeignClass>, universe: Universe, owner: DescriptorOwner) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            fq_name: source.fq_name.clone(),
            kind: source.kind,
            universe,
            owner,
            visibility: source.visibility,
            supertypes: source.supertypes.clone(),
            source: Some(source),
            this: this.clone(),
            members: ClassMembers::default(),
        })
    }

    /// A class defined in native sources.
    pub fn native(
        fq_name: QualifiedName,
        kind: ClassKind,
        universe: Universe,
        owner: DescriptorOwner,
        supertypes: Vec<QualifiedName>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            fq_name,
            kind,
            universe,
            owner,
            visibility: Visibility::Public,
            supertypes,
            source: None,
            this: this.clone(),
            members: ClassMembers::default(),
        })
    }

    pub fn fq_name(&self) -> &QualifiedName {
        &self.fq_name
    }

    pub fn name(&self) -> Option<&Name> {
        self.fq_name.last_segment()
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn owner(&self) -> &DescriptorOwner {
        &self.owner
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Names of the direct supertypes, unresolved.
    pub fn supertypes(&self) -> &[QualifiedName] {
        &self.supertypes
    }

    /// The classpath record, or `None` for a native class.
    pub fn source(&self) -> Option<&Arc<ForeignClass>> {
        self.source.as_ref()
    }

    pub fn is_native(&self) -> bool {
        self.source.is_none()
    }

    /// Owner link for members of this class.
    pub fn as_owner(&self) -> DescriptorOwner {
        DescriptorOwner::Class(self.this.clone())
    }
}

impl fmt::Debug for ClassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassDescriptor")
            .field("fq_name", &self.fq_name)
            .field("kind", &self.kind)
            .field("universe", &self.universe)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueParameter {
    pub index: usize,
    pub name: Name,
    pub ty: QualifiedName,
}

#[derive(Debug)]
pub struct FunctionDescriptor {
    pub name: Name,
    pub owner: DescriptorOwner,
    pub visibility: Visibility,
    pub is_static: bool,
    pub parameters: Vec<ValueParameter>,
    pub return_type: QualifiedName,
}

#[derive(Debug)]
pub struct PropertyDescriptor {
    pub name: Name,
    pub owner: DescriptorOwner,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_mutable: bool,
    pub ty: QualifiedName,
}

#[derive(Debug)]
pub struct ConstructorDescriptor {
    pub owner: Weak<ClassDescriptor>,
    pub visibility: Visibility,
    pub parameters: Vec<ValueParameter>,
    /// Synthesized for a class that declares no constructor.
    pub is_default: bool,
}

// ============================================================================
// DECLARATIONS
// ============================================================================

/// Any descriptor, for walking owner chains.
#[derive(Clone, Debug)]
pub enum Declaration {
    Namespace(Arc<NamespaceDescriptor>),
    Class(Arc<ClassDescriptor>),
    Function(Arc<FunctionDescriptor>),
    Property(Arc<PropertyDescriptor>),
    Constructor(Arc<ConstructorDescriptor>),
}

impl Declaration {
    /// The directly enclosing declaration.
    pub fn owner(&self) -> Option<Declaration> {
        match self {
            Declaration::Namespace(ns) => ns.parent_namespace().cloned().map(Declaration::Namespace),
            Declaration::Class(class) => class.owner().upgrade(),
            Declaration::Function(function) => function.owner.upgrade(),
            Declaration::Property(property) => property.owner.upgrade(),
            Declaration::Constructor(ctor) => ctor.owner.upgrade().map(Declaration::Class),
        }
    }

    /// The nearest enclosing namespace.
    ///
    /// With `strict == false` a namespace is its own nearest namespace.
    pub fn containing_namespace(&self, strict: bool) -> Option<Arc<NamespaceDescriptor>> {
        if !strict {
            if let Declaration::Namespace(ns) = self {
                return Some(ns.clone());
            }
        }
        let mut current = self.owner();
        while let Some(declaration) = current {
            if let Declaration::Namespace(ns) = declaration {
                return Some(ns);
            }
            current = declaration.owner();
        }
        None
    }

    /// Whether `self` is `ancestor` or nested somewhere inside it.
    pub fn is_within(&self, ancestor: &Declaration) -> bool {
        if self.same(ancestor) {
            return true;
        }
        let mut current = self.owner();
        while let Some(declaration) = current {
            if declaration.same(ancestor) {
                return true;
            }
            current = declaration.owner();
        }
        false
    }

    /// Identity comparison.
    pub fn same(&self, other: &Declaration) -> bool {
        match (self, other) {
            (Declaration::Namespace(a), Declaration::Namespace(b)) => Arc::ptr_eq(a, b),
            (Declaration::Class(a), Declaration::Class(b)) => Arc::ptr_eq(a, b),
            (Declaration::Function(a), Declaration::Function(b)) => Arc::ptr_eq(a, b),
            (Declaration::Property(a), Declaration::Property(b)) => Arc::ptr_eq(a, b),
            (Declaration::Constructor(a), Declaration::Constructor(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The declared visibility; namespaces are public.
    pub fn visibility(&self) -> Visibility {
        match self {
            Declaration::Namespace(_) => Visibility::Public,
            Declaration::Class(class) => class.visibility(),
            Declaration::Function(function) => function.visibility,
            Declaration::Property(property) => property.visibility,
            Declaration::Constructor(ctor) => ctor.visibility,
        }
    }

    /// Whether this declaration can be seen from `from`.
    pub fn is_visible_from(&self, from: &Declaration) -> bool {
        self.visibility().is_visible(self, from)
    }
}
