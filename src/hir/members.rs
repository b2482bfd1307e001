//! Member resolution: turning classpath member records into descriptors.
//!
//! These resolvers are stateless. Caching happens one level up, in the member
//! scope or class that asked.

use std::sync::Arc;

use crate::base::Name;

use super::descriptors::{
    ClassDescriptor, ConstructorDescriptor, DescriptorOwner, FunctionDescriptor, PropertyDescriptor,
    ValueParameter,
};
use super::input::{ClassKind, ForeignClass, ForeignParameter};
use super::visibility::Visibility;

/// Which members of a class a provider exposes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MemberFilter {
    Static,
    Instance,
}

/// Member declarations of one class, filtered to statics or instance members.
#[derive(Clone, Copy, Debug)]
pub struct DeclarationProvider<'a> {
    class: &'a ForeignClass,
    filter: MemberFilter,
}

impl<'a> DeclarationProvider<'a> {
    pub fn new(class: &'a ForeignClass, filter: MemberFilter) -> Self {
        Self { class, filter }
    }

    pub fn statics(class: &'a ForeignClass) -> Self {
        Self::new(class, MemberFilter::Static)
    }

    pub fn instance(class: &'a ForeignClass) -> Self {
        Self::new(class, MemberFilter::Instance)
    }

    pub fn class(&self) -> &'a ForeignClass {
        self.class
    }

    pub fn filter(&self) -> MemberFilter {
        self.filter
    }

    fn accepts(&self, is_static: bool) -> bool {
        match self.filter {
            MemberFilter::Static => is_static,
            MemberFilter::Instance => !is_static,
        }
    }
}

fn value_parameters(parameters: &[ForeignParameter]) -> Vec<ValueParameter> {
    parameters
        .iter()
        .enumerate()
        .map(|(index, param)| ValueParameter {
            index,
            name: param.name.clone(),
            ty: param.ty.clone(),
        })
        .collect()
}

/// All methods named `name`, in declaration order.
///
/// Overloads share a name, so the result may hold several descriptors.
pub fn resolve_function_group(
    name: &Name,
    provider: &DeclarationProvider<'_>,
    owner: &DescriptorOwner,
) -> Vec<Arc<FunctionDescriptor>> {
    let functions: Vec<_> = provider
        .class
        .methods
        .iter()
        .filter(|method| method.name == *name && provider.accepts(method.is_static))
        .map(|method| {
            Arc::new(FunctionDescriptor {
                name: method.name.clone(),
                owner: owner.clone(),
                visibility: method.visibility,
                is_static: method.is_static,
                parameters: value_parameters(&method.parameters),
                return_type: method.return_type.clone(),
            })
        })
        .collect();
    tracing::trace!(
        "[MEMBERS] {}.{}: {} function(s)",
        provider.class.fq_name,
        name,
        functions.len()
    );
    functions
}

/// All fields named `name`, as properties.
///
/// A final field becomes a read-only property.
pub fn resolve_field_group_by_name(
    name: &Name,
    provider: &DeclarationProvider<'_>,
    owner: &DescriptorOwner,
) -> Vec<Arc<PropertyDescriptor>> {
    provider
        .class
        .fields
        .iter()
        .filter(|field| field.name == *name && provider.accepts(field.is_static))
        .map(|field| {
            Arc::new(PropertyDescriptor {
                name: field.name.clone(),
                owner: owner.clone(),
                visibility: field.visibility,
                is_static: field.is_static,
                is_mutable: !field.is_final,
                ty: field.ty.clone(),
            })
        })
        .collect()
}

/// Constructors of a class.
///
/// A plain class that declares none gets a synthesized no-arg constructor
/// (private for enums). Interfaces and annotations have none, and neither
/// do native classes.
pub fn resolve_constructors(class: &Arc<ClassDescriptor>) -> Vec<Arc<ConstructorDescriptor>> {
    let Some(source) = class.source() else {
        return Vec::new();
    };
    let owner = Arc::downgrade(class);

    if matches!(source.kind, ClassKind::Interface | ClassKind::Annotation) {
        return Vec::new();
    }

    if source.constructors.is_empty() {
        let visibility = if source.is_enum() {
            Visibility::Private
        } else {
            Visibility::Public
        };
        return vec![Arc::new(ConstructorDescriptor {
            owner,
            visibility,
            parameters: Vec::new(),
            is_default: true,
        })];
    }

    source
        .constructors
        .iter()
        .map(|ctor| {
            Arc::new(ConstructorDescriptor {
                owner: owner.clone(),
                visibility: ctor.visibility,
                parameters: value_parameters(&ctor.parameters),
                is_default: false,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{FileId, QualifiedName, SourceFile};
    use crate::hir::input::{ForeignConstructor, ForeignField, ForeignMethod};
    use std::sync::Weak;

    fn qn(text: &str) -> QualifiedName {
        QualifiedName::parse(text).unwrap()
    }

    fn name(text: &str) -> Name {
        Name::identifier(text).unwrap()
    }

    fn owner() -> DescriptorOwner {
        DescriptorOwner::Class(Weak::new())
    }

    fn util_class() -> ForeignClass {
        ForeignClass::new(qn("com.acme.Util"), ClassKind::Class, SourceFile::foreign_binary(FileId::new(0)))
            .with_method(ForeignMethod::new(name("run"), qn("void")).static_member())
            .with_method(
                ForeignMethod::new(name("run"), qn("void"))
                    .static_member()
                    .with_parameter(name("times"), qn("int")),
            )
            .with_method(ForeignMethod::new(name("run"), qn("void")))
            .with_field(ForeignField::new(name("LIMIT"), qn("int")).static_member().final_member())
            .with_field(ForeignField::new(name("count"), qn("int")))
    }

    #[test]
    fn test_function_group_keeps_overloads() {
        let class = util_class();
        let statics = resolve_function_group(&name("run"), &DeclarationProvider::statics(&class), &owner());
        assert_eq!(statics.len(), 2);
        assert!(statics.iter().all(|f| f.is_static));
        assert_eq!(statics[1].parameters[0].name, name("times"));
        assert_eq!(statics[1].parameters[0].index, 0);

        let instance = resolve_function_group(&name("run"), &DeclarationProvider::instance(&class), &owner());
        assert_eq!(instance.len(), 1);
        assert!(!instance[0].is_static);
    }

    #[test]
    fn test_function_group_unknown_name_is_empty() {
        let class = util_class();
        let found = resolve_function_group(&name("missing"), &DeclarationProvider::statics(&class), &owner());
        assert!(found.is_empty());
    }

    #[test]
    fn test_field_group_mutability() {
        let class = util_class();
        let limit = resolve_field_group_by_name(&name("LIMIT"), &DeclarationProvider::statics(&class), &owner());
        assert_eq!(limit.len(), 1);
        assert!(!limit[0].is_mutable);

        let count = resolve_field_group_by_name(&name("count"), &DeclarationProvider::instance(&class), &owner());
        assert_eq!(count.len(), 1);
        assert!(count[0].is_mutable);

        let none = resolve_field_group_by_name(&name("count"), &DeclarationProvider::statics(&class), &owner());
        assert!(none.is_empty());
    }

    #[test]
    fn test_constructors() {
        use crate::hir::universe::{Universe, UniverseOrigin};
        let universe = Universe::new(Name::special("u"), UniverseOrigin::Foreign);
        let file = SourceFile::foreign_binary(FileId::new(0));

        let plain = ClassDescriptor::foreign(Arc::new(util_class()), universe.clone(), owner());
        let ctors = resolve_constructors(&plain);
        assert_eq!(ctors.len(), 1);
        assert!(ctors[0].is_default);
        assert_eq!(ctors[0].visibility, Visibility::Public);
        assert!(Arc::ptr_eq(&ctors[0].owner.upgrade().unwrap(), &plain));

        let declared = ForeignClass::new(qn("a.B"), ClassKind::Class, file)
            .with_constructor(ForeignConstructor::new(Visibility::Protected).with_parameter(name("x"), qn("int")));
        let declared = ClassDescriptor::foreign(Arc::new(declared), universe.clone(), owner());
        let ctors = resolve_constructors(&declared);
        assert_eq!(ctors.len(), 1);
        assert!(!ctors[0].is_default);
        assert_eq!(ctors[0].parameters.len(), 1);

        let iface = ClassDescriptor::foreign(
            Arc::new(ForeignClass::new(qn("a.I"), ClassKind::Interface, file)),
            universe.clone(),
            owner(),
        );
        assert!(resolve_constructors(&iface).is_empty());

        let native = ClassDescriptor::native(qn("a.K"), ClassKind::Class, universe, owner(), Vec::new());
        assert!(resolve_constructors(&native).is_empty());
    }
}
