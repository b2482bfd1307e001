//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use interop::base::{FileId, Name, QualifiedName, SourceFile};
use interop::hir::{
    BindingTrace, ClassKind, ClasspathIndex, ForeignClass, ForeignClasspath, ForeignField, ForeignMethod,
    ForeignPackage, NativeDeclaration, NativeIndex, NativeSymbols, RecordingTrace, ResolverConfig,
    ResolverContext, StandardPartition, Universe, UniversePartition, Visibility,
};

pub fn qn(text: &str) -> QualifiedName {
    QualifiedName::parse(text).expect("valid qualified name")
}

pub fn name(text: &str) -> Name {
    Name::identifier(text).expect("valid identifier")
}

pub fn class_file() -> SourceFile {
    SourceFile::foreign_binary(FileId::new(0))
}

pub fn class(text: &str) -> ForeignClass {
    ForeignClass::new(qn(text), ClassKind::Class, class_file())
}

pub fn class_of_kind(text: &str, kind: ClassKind) -> ForeignClass {
    ForeignClass::new(qn(text), kind, class_file())
}

/// `com.acme.Util` with static and instance members and two nested classes.
pub fn acme_util() -> Vec<ForeignClass> {
    vec![
        class("com.acme.Util")
            .with_method(ForeignMethod::new(name("help"), qn("java.lang.String")).static_member())
            .with_method(
                ForeignMethod::new(name("help"), qn("java.lang.String"))
                    .static_member()
                    .with_parameter(name("topic"), qn("java.lang.String")),
            )
            .with_method(ForeignMethod::new(name("run"), qn("void")))
            .with_field(
                ForeignField::new(name("VERSION"), qn("int"))
                    .static_member()
                    .final_member(),
            )
            .with_field(ForeignField::new(name("count"), qn("int")))
            .with_field(ForeignField::new(name("secret"), qn("int")).with_visibility(Visibility::PackageVisible))
            .with_field(ForeignField::new(name("hidden"), qn("int")).with_visibility(Visibility::Private)),
        class("com.acme.Util.Helper"),
        class("com.acme.Util.Inner").inner(),
    ]
}

/// A resolution session over in-memory collaborators, with handles kept for
/// inspection.
pub struct World {
    pub partition: StandardPartition,
    pub classpath: Arc<ClasspathIndex>,
    pub native: Arc<NativeIndex>,
    pub trace: Arc<RecordingTrace>,
    pub ctx: ResolverContext,
}

impl World {
    pub fn builder() -> WorldBuilder {
        WorldBuilder::new()
    }

    pub fn native_universe(&self) -> Universe {
        self.partition.native().cloned().expect("standard partition has a native universe")
    }

    pub fn foreign_universe(&self) -> Universe {
        self.partition.foreign().clone()
    }
}

pub struct WorldBuilder {
    partition: StandardPartition,
    classpath: ClasspathIndex,
    native: Vec<(FileId, Vec<NativeDeclaration>)>,
    config: ResolverConfig,
}

impl WorldBuilder {
    pub fn new() -> Self {
        Self {
            partition: StandardPartition::new(),
            classpath: ClasspathIndex::new(),
            native: Vec::new(),
            config: ResolverConfig::default(),
        }
    }

    pub fn class(mut self, class: ForeignClass) -> Self {
        self.classpath.add_class(class).expect("well-formed class");
        self
    }

    pub fn package(mut self, package: ForeignPackage) -> Self {
        self.classpath.add_package(package);
        self
    }

    pub fn classes(self, classes: impl IntoIterator<Item = ForeignClass>) -> Self {
        classes.into_iter().fold(self, |builder, class| builder.class(class))
    }

    pub fn native(mut self, file: u32, declarations: Vec<NativeDeclaration>) -> Self {
        self.native.push((FileId::new(file), declarations));
        self
    }

    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> World {
        let native_universe = self
            .partition
            .native()
            .cloned()
            .expect("standard partition has a native universe");
        let native = Arc::new(NativeIndex::new(native_universe));
        for (file, declarations) in self.native {
            native.add_file(file, declarations);
        }
        let classpath = Arc::new(self.classpath);
        let trace = Arc::new(RecordingTrace::new());

        let classpath_dyn: Arc<dyn ForeignClasspath> = classpath.clone();
        let native_dyn: Arc<dyn NativeSymbols> = native.clone();
        let partition_dyn: Arc<dyn UniversePartition> = Arc::new(self.partition.clone());
        let trace_dyn: Arc<dyn BindingTrace> = trace.clone();

        let ctx = ResolverContext::new(classpath_dyn, native_dyn, partition_dyn, trace_dyn).with_config(self.config);
        World {
            partition: self.partition,
            classpath,
            native,
            trace,
            ctx,
        }
    }
}

impl Default for WorldBuilder {
    fn default() -> Self {
        Self::new()
    }
}
