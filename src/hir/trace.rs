//! Binding trace: where freshly built descriptors are reported.
//!
//! The resolver records every namespace and class it creates, keyed by the
//! classpath entity it came from. A trace is write-only from the resolver's
//! point of view; the session decides what to keep.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::base::QualifiedName;

use super::descriptors::{ClassDescriptor, NamespaceDescriptor, NamespaceKind};

/// The classpath entity a descriptor was built from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SourceEntity {
    Package(QualifiedName),
    Class(QualifiedName),
}

impl SourceEntity {
    pub fn fq_name(&self) -> &QualifiedName {
        match self {
            SourceEntity::Package(name) | SourceEntity::Class(name) => name,
        }
    }
}

/// Sink for resolution records.
pub trait BindingTrace: Send + Sync {
    fn record_namespace(&self, source: SourceEntity, descriptor: &Arc<NamespaceDescriptor>);

    fn record_namespace_kind(&self, descriptor: &Arc<NamespaceDescriptor>, kind: NamespaceKind);

    fn record_class(&self, _source: SourceEntity, _descriptor: &Arc<ClassDescriptor>) {}
}

/// A trace that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTrace;

impl BindingTrace for NoopTrace {
    fn record_namespace(&self, _source: SourceEntity, _descriptor: &Arc<NamespaceDescriptor>) {}

    fn record_namespace_kind(&self, _descriptor: &Arc<NamespaceDescriptor>, _kind: NamespaceKind) {}
}

/// One entry of a [`RecordingTrace`].
#[derive(Clone, Debug)]
pub enum TraceRecord {
    Namespace {
        source: SourceEntity,
        descriptor: Arc<NamespaceDescriptor>,
    },
    NamespaceKind {
        descriptor: Arc<NamespaceDescriptor>,
        kind: NamespaceKind,
    },
    Class {
        source: SourceEntity,
        descriptor: Arc<ClassDescriptor>,
    },
}

/// A trace that keeps every record in order.
#[derive(Debug, Default)]
pub struct RecordingTrace {
    records: Mutex<Vec<TraceRecord>>,
}

impl RecordingTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records so far.
    pub fn records(&self) -> Vec<TraceRecord> {
        self.records.lock().clone()
    }

    /// The namespace recorded for a classpath entity, if any.
    pub fn namespace_for(&self, source: &SourceEntity) -> Option<Arc<NamespaceDescriptor>> {
        self.records.lock().iter().find_map(|record| match record {
            TraceRecord::Namespace {
                source: recorded,
                descriptor,
            } if recorded == source => Some(descriptor.clone()),
            _ => None,
        })
    }

    /// The kind recorded for a namespace descriptor, if any.
    pub fn kind_of(&self, descriptor: &Arc<NamespaceDescriptor>) -> Option<NamespaceKind> {
        self.records.lock().iter().find_map(|record| match record {
            TraceRecord::NamespaceKind {
                descriptor: recorded,
                kind,
            } if Arc::ptr_eq(recorded, descriptor) => Some(*kind),
            _ => None,
        })
    }

    /// How many classes were recorded.
    pub fn class_count(&self) -> usize {
        self.records
            .lock()
            .iter()
            .filter(|record| matches!(record, TraceRecord::Class { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl BindingTrace for RecordingTrace {
    fn record_namespace(&self, source: SourceEntity, descriptor: &Arc<NamespaceDescriptor>) {
        self.records.lock().push(TraceRecord::Namespace {
            source,
            descriptor: descriptor.clone(),
        });
    }

    fn record_namespace_kind(&self, descriptor: &Arc<NamespaceDescriptor>, kind: NamespaceKind) {
        self.records.lock().push(TraceRecord::NamespaceKind {
            descriptor: descriptor.clone(),
            kind,
        });
    }

    fn record_class(&self, source: SourceEntity, descriptor: &Arc<ClassDescriptor>) {
        self.records.lock().push(TraceRecord::Class {
            source,
            descriptor: descriptor.clone(),
        });
    }
}
