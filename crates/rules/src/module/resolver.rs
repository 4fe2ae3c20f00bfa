use indexmap::IndexMap;
use tracing::debug;

use textlint_core::{HandlerFactory, NamingConvention, ProcessorFactory};

use super::{Module, ModuleLocator, PackageKind, RuleMapping};
use crate::loader::{LoaderError, Result};

/// Turns package references into loadable modules.
///
/// `resolve` finds the package, `require` loads its exports. Both are
/// synchronous and fallible; errors are passed through the loader unchanged.
pub trait ModuleResolver {
    fn resolve(
        &self,
        kind: PackageKind,
        name: &str,
        naming: &NamingConvention,
    ) -> Result<ModuleLocator>;

    fn require(&self, locator: &ModuleLocator) -> Result<Module>;
}

impl<R: ModuleResolver + ?Sized> ModuleResolver for &R {
    fn resolve(
        &self,
        kind: PackageKind,
        name: &str,
        naming: &NamingConvention,
    ) -> Result<ModuleLocator> {
        (**self).resolve(kind, name, naming)
    }

    fn require(&self, locator: &ModuleLocator) -> Result<Module> {
        (**self).require(locator)
    }
}

// ── Catalog ─────────────────────────────────────────────────────────

/// In-memory package catalog keyed by full package name.
///
/// Used for packages compiled into the host binary.
#[derive(Debug, Default, Clone)]
pub struct CatalogResolver {
    packages: IndexMap<String, Module>,
}

impl CatalogResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, package: impl Into<String>, module: Module) {
        self.packages.insert(package.into(), module);
    }

    pub fn with_rule(mut self, package: impl Into<String>, factory: HandlerFactory) -> Self {
        self.insert(package, Module::Rule(factory));
        self
    }

    pub fn with_preset(mut self, package: impl Into<String>, rules: RuleMapping) -> Self {
        self.insert(package, Module::preset(rules));
        self
    }

    pub fn with_plugin(
        mut self,
        package: impl Into<String>,
        rules: Option<RuleMapping>,
        processor: Option<ProcessorFactory>,
    ) -> Self {
        self.insert(package, Module::plugin(rules, processor));
        self
    }

    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }
}

impl ModuleResolver for CatalogResolver {
    fn resolve(
        &self,
        kind: PackageKind,
        name: &str,
        naming: &NamingConvention,
    ) -> Result<ModuleLocator> {
        let searched = kind.candidates(name, naming);
        match searched.iter().find(|c| self.packages.contains_key(c.as_str())) {
            Some(package) => {
                debug!(%kind, name, package = %package, "resolved from catalog");
                Ok(ModuleLocator {
                    kind,
                    package_name: package.clone(),
                    path: None,
                })
            }
            None => Err(LoaderError::NotFound {
                kind,
                name: name.to_string(),
                searched,
            }),
        }
    }

    fn require(&self, locator: &ModuleLocator) -> Result<Module> {
        self.packages
            .get(&locator.package_name)
            .cloned()
            .ok_or_else(|| LoaderError::NotFound {
                kind: locator.kind,
                name: locator.package_name.clone(),
                searched: vec![locator.package_name.clone()],
            })
    }
}

// ── Chain ───────────────────────────────────────────────────────────

/// Tries several resolvers in order; the first one that knows the package wins.
#[derive(Default)]
pub struct ChainResolver {
    resolvers: Vec<Box<dyn ModuleResolver + Send + Sync>>,
}

impl ChainResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, resolver: impl ModuleResolver + Send + Sync + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }
}

impl ModuleResolver for ChainResolver {
    fn resolve(
        &self,
        kind: PackageKind,
        name: &str,
        naming: &NamingConvention,
    ) -> Result<ModuleLocator> {
        let mut searched = Vec::new();
        for resolver in &self.resolvers {
            match resolver.resolve(kind, name, naming) {
                Err(LoaderError::NotFound { searched: s, .. }) => searched.extend(s),
                other => return other,
            }
        }
        Err(LoaderError::NotFound {
            kind,
            name: name.to_string(),
            searched,
        })
    }

    fn require(&self, locator: &ModuleLocator) -> Result<Module> {
        for resolver in &self.resolvers {
            match resolver.require(locator) {
                Err(LoaderError::NotFound { .. }) => continue,
                other => return other,
            }
        }
        Err(LoaderError::NotFound {
            kind: locator.kind,
            name: locator.package_name.clone(),
            searched: vec![locator.package_name.clone()],
        })
    }
}
