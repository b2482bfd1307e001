//! Visibility levels and their partial order.
//!
//! On top of the standard levels the foreign universe contributes
//! [`Visibility::PackageVisible`]: a member visible only from declarations
//! whose nearest enclosing namespace is the member's own namespace.

use std::cmp::Ordering;

use super::descriptors::Declaration;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Internal,
    PackageVisible,
    Private,
}

impl Visibility {
    /// Diagnostic name of the level.
    pub fn name(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Internal => "internal",
            Visibility::PackageVisible => "package",
            Visibility::Private => "private",
        }
    }

    /// Whether `what` (declared with this visibility) can be seen from `from`.
    ///
    /// Only the package-visible rule is decided here. `Protected` and
    /// `Private` need subtyping and containment information owned by the type
    /// checker, so they are answered conservatively: a private member is
    /// visible only from inside its own owner chain, and a protected member is
    /// treated as public.
    pub fn is_visible(self, what: &Declaration, from: &Declaration) -> bool {
        match self {
            Visibility::Public | Visibility::Internal | Visibility::Protected => true,
            Visibility::PackageVisible => {
                let Some(what_ns) = what.containing_namespace(true) else {
                    return false;
                };
                match from.containing_namespace(false) {
                    Some(from_ns) => what_ns.fq_name() == from_ns.fq_name(),
                    None => false,
                }
            }
            Visibility::Private => match what.owner() {
                Some(owner) => from.is_within(&owner),
                None => false,
            },
        }
    }

    /// Compare two levels; `None` when they are incomparable.
    ///
    /// Package visibility ranks above `Private` and below every other level.
    /// Among the standard levels `Private < Internal < Public` and
    /// `Private < Protected < Public`, with `Internal` and `Protected`
    /// incomparable.
    pub fn compare_to(self, other: Visibility) -> Option<Ordering> {
        use Visibility::*;
        if self == other {
            return Some(Ordering::Equal);
        }
        match (self, other) {
            (PackageVisible, Private) => Some(Ordering::Greater),
            (PackageVisible, _) => Some(Ordering::Less),
            (Private, PackageVisible) => Some(Ordering::Less),
            (_, PackageVisible) => Some(Ordering::Greater),
            (Internal, Protected) | (Protected, Internal) => None,
            _ => Some(self.standard_rank().cmp(&other.standard_rank())),
        }
    }

    fn standard_rank(self) -> u8 {
        match self {
            Visibility::Private => 0,
            Visibility::PackageVisible => 1,
            Visibility::Internal | Visibility::Protected => 2,
            Visibility::Public => 3,
        }
    }

    /// The most permissive of the candidates.
    ///
    /// Returns `None` for an empty iterator, or when the maximum is ambiguous
    /// because two incomparable levels tie for it.
    pub fn most_permissive(candidates: impl IntoIterator<Item = Visibility>) -> Option<Visibility> {
        let candidates: Vec<_> = candidates.into_iter().collect();
        candidates.iter().copied().find(|&candidate| {
            candidates
                .iter()
                .all(|&other| matches!(candidate.compare_to(other), Some(Ordering::Greater | Ordering::Equal)))
        })
    }
}
