//! Resolver configuration.

use crate::base::Name;

use super::input::ClassFindMode;

/// Simple name of the class that holds the top-level members of a native
/// package once it is compiled onto the foreign classpath.
pub const DEFAULT_PACKAGE_HOLDER: &str = "namespace";

/// Settings for one resolution session.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    /// Class whose presence marks a foreign package as compiled from native sources.
    pub package_holder: Name,
    /// Find mode used when probing a class that may back a namespace.
    pub namespace_find_mode: ClassFindMode,
    /// Find mode used by class resolution.
    pub class_find_mode: ClassFindMode,
    /// Run supertype cycle checks for resolved classes.
    pub check_supertype_cycles: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            package_holder: Name::identifier(DEFAULT_PACKAGE_HOLDER)
                .unwrap_or_else(|| Name::special(DEFAULT_PACKAGE_HOLDER)),
            namespace_find_mode: ClassFindMode::IgnoreSynthetic,
            class_find_mode: ClassFindMode::Strict,
            check_supertype_cycles: true,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the package holder class name.
    pub fn with_package_holder(mut self, name: Name) -> Self {
        self.package_holder = name;
        self
    }

    /// Set the find mode used when probing namespace-backing classes.
    pub fn with_namespace_find_mode(mut self, mode: ClassFindMode) -> Self {
        self.namespace_find_mode = mode;
        self
    }

    /// Set the find mode used by class resolution.
    pub fn with_class_find_mode(mut self, mode: ClassFindMode) -> Self {
        self.class_find_mode = mode;
        self
    }

    /// Enable or disable supertype cycle checks.
    pub fn with_supertype_checks(mut self, enabled: bool) -> Self {
        self.check_supertype_cycles = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.package_holder.as_str(), "namespace");
        assert_eq!(config.namespace_find_mode, ClassFindMode::IgnoreSynthetic);
        assert_eq!(config.class_find_mode, ClassFindMode::Strict);
        assert!(config.check_supertype_cycles);
    }

    #[test]
    fn test_builder() {
        let config = ResolverConfig::new()
            .with_package_holder(Name::identifier("Holder").unwrap())
            .with_supertype_checks(false);
        assert_eq!(config.package_holder.as_str(), "Holder");
        assert!(!config.check_supertype_cycles);
    }
}
