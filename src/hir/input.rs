//! Inputs from the foreign introspection layer.
//!
//! The classpath is exposed as raw structural records: packages with the
//! simple names of their classes, and classes with their members. The resolver
//! never mutates these records; it only turns them into descriptors.

use std::sync::Arc;

use crate::base::{Name, QualifiedName, SourceFile};

use super::error::ClasspathError;
use super::universe::SearchScope;
use super::visibility::Visibility;

/// How strictly the introspection layer should treat synthetic entries.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ClassFindMode {
    /// Return whatever the classpath holds under the name.
    Strict,
    /// Skip compiler-generated classes.
    IgnoreSynthetic,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Annotation,
}

/// A package on the classpath.
#[derive(Clone, Debug)]
pub struct ForeignPackage {
    pub fq_name: QualifiedName,
    /// Simple names of the top-level classes in the package.
    pub classes: Vec<Name>,
    pub source: SourceFile,
}

impl ForeignPackage {
    pub fn new(fq_name: QualifiedName, source: SourceFile) -> Self {
        Self {
            fq_name,
            classes: Vec::new(),
            source,
        }
    }

    pub fn with_class(mut self, name: Name) -> Self {
        if !self.classes.contains(&name) {
            self.classes.push(name);
        }
        self
    }
}

/// A parameter of a foreign method or constructor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForeignParameter {
    pub name: Name,
    pub ty: QualifiedName,
}

#[derive(Clone, Debug)]
pub struct ForeignMethod {
    pub name: Name,
    pub visibility: Visibility,
    pub is_static: bool,
    pub parameters: Vec<ForeignParameter>,
    pub return_type: QualifiedName,
}

impl ForeignMethod {
    pub fn new(name: Name, return_type: QualifiedName) -> Self {
        Self {
            name,
            visibility: Visibility::Public,
            is_static: false,
            parameters: Vec::new(),
            return_type,
        }
    }

    pub fn with_parameter(mut self, name: Name, ty: QualifiedName) -> Self {
        self.parameters.push(ForeignParameter { name, ty });
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }
}

#[derive(Clone, Debug)]
pub struct ForeignField {
    pub name: Name,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    pub ty: QualifiedName,
}

impl ForeignField {
    pub fn new(name: Name, ty: QualifiedName) -> Self {
        Self {
            name,
            visibility: Visibility::Public,
            is_static: false,
            is_final: false,
            ty,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn final_member(mut self) -> Self {
        self.is_final = true;
        self
    }
}

#[derive(Clone, Debug)]
pub struct ForeignConstructor {
    pub visibility: Visibility,
    pub parameters: Vec<ForeignParameter>,
}

impl ForeignConstructor {
    pub fn new(visibility: Visibility) -> Self {
        Self {
            visibility,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: Name, ty: QualifiedName) -> Self {
        self.parameters.push(ForeignParameter { name, ty });
        self
    }
}

/// A class on the classpath.
///
/// Nested classes are separate records whose `fq_name` extends the outer
/// class name; the outer record lists their simple names in `nested`.
#[derive(Clone, Debug)]
pub struct ForeignClass {
    pub fq_name: QualifiedName,
    pub kind: ClassKind,
    pub visibility: Visibility,
    /// A static nested class (or a top-level class).
    pub is_static: bool,
    pub is_synthetic: bool,
    pub supertypes: Vec<QualifiedName>,
    pub methods: Vec<ForeignMethod>,
    pub fields: Vec<ForeignField>,
    pub constructors: Vec<ForeignConstructor>,
    pub nested: Vec<Name>,
    pub source: SourceFile,
}

impl ForeignClass {
    pub fn new(fq_name: QualifiedName, kind: ClassKind, source: SourceFile) -> Self {
        Self {
            fq_name,
            kind,
            visibility: Visibility::Public,
            is_static: true,
            is_synthetic: false,
            supertypes: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            nested: Vec::new(),
            source,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_supertype(mut self, name: QualifiedName) -> Self {
        self.supertypes.push(name);
        self
    }

    pub fn with_method(mut self, method: ForeignMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_field(mut self, field: ForeignField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_constructor(mut self, constructor: ForeignConstructor) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn with_nested(mut self, name: Name) -> Self {
        self.nested.push(name);
        self
    }

    /// Mark as an inner (non-static nested) class.
    pub fn inner(mut self) -> Self {
        self.is_static = false;
        self
    }

    pub fn synthetic(mut self) -> Self {
        self.is_synthetic = true;
        self
    }

    #[inline]
    pub fn is_enum(&self) -> bool {
        self.kind == ClassKind::Enum
    }

    pub fn simple_name(&self) -> Option<&Name> {
        self.fq_name.last_segment()
    }
}

/// The foreign introspection layer.
///
/// Every probe is restricted to the files of `scope`. Failures are returned
/// unchanged to the caller; the resolver never retries.
pub trait ForeignClasspath: Send + Sync {
    fn find_package(
        &self,
        name: &QualifiedName,
        scope: &SearchScope,
    ) -> Result<Option<Arc<ForeignPackage>>, ClasspathError>;

    fn find_class(
        &self,
        name: &QualifiedName,
        mode: ClassFindMode,
        scope: &SearchScope,
    ) -> Result<Option<Arc<ForeignClass>>, ClasspathError>;
}
