//! Search rules: what a native hit means for foreign resolution.

use crate::base::QualifiedName;

use super::error::{ResolveError, ResolveResult};
use super::universe::Universe;

/// How a name already defined in the native universe affects resolving the
/// same name against the foreign universe.
///
/// The rule is applied per qualified name at every level of recursion. Parent
/// namespaces are always resolved with [`SearchRule::IncludeNative`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SearchRule {
    /// A native hit is a shadowing conflict. Used for explicit lookups.
    ErrorIfFoundInNative,
    /// A native hit is returned as-is and the foreign side is never probed.
    IgnoreIfFoundInNative,
    /// Native and foreign results are both kept.
    IncludeNative,
}

/// What to do after a native hit.
#[derive(Debug)]
pub enum NativeHit<T> {
    /// Return the native result; do not probe the foreign side.
    Return(T),
    /// Keep the native result and probe the foreign side as well.
    Continue(T),
}

impl SearchRule {
    /// Apply the rule to a native hit for `name` found in `universe`.
    pub fn process_found_in_native<T>(
        self,
        name: &QualifiedName,
        universe: &Universe,
        found: T,
    ) -> ResolveResult<NativeHit<T>> {
        match self {
            SearchRule::ErrorIfFoundInNative => {
                tracing::warn!("{} is shadowed by a native definition in {}", name, universe);
                Err(ResolveError::shadowed(name, universe.name().as_str()))
            }
            SearchRule::IgnoreIfFoundInNative => Ok(NativeHit::Return(found)),
            SearchRule::IncludeNative => Ok(NativeHit::Continue(found)),
        }
    }
}
