use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use textlint_core::NamingConvention;

use super::{Module, ModuleLocator, ModuleResolver, PackageKind};
use crate::loader::{LoaderError, Result};
use crate::manifest::{parse_manifest, ManifestKind};

/// File names tried for a package directory.
const PACKAGE_ENTRY_FILES: &[&str] = &["textlint.yml", "textlint.yaml", "textlint.json"];

/// Extensions tried for a single-file package.
const MANIFEST_EXTENSIONS: &[&str] = &["yml", "yaml", "json"];

/// Resolves packages to manifest files below a base directory.
///
/// For candidate `textlint-rule-no-todo` it looks for
/// `<base>/textlint-rule-no-todo.{yml,yaml,json}` and then
/// `<base>/textlint-rule-no-todo/textlint.{yml,yaml,json}`.
#[derive(Debug, Clone)]
pub struct FsResolver {
    base_dir: PathBuf,
}

impl FsResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn find_manifest(&self, package: &str) -> Option<PathBuf> {
        let single = MANIFEST_EXTENSIONS
            .iter()
            .map(|ext| self.base_dir.join(format!("{}.{}", package, ext)));
        let nested = PACKAGE_ENTRY_FILES
            .iter()
            .map(|file| self.base_dir.join(package).join(file));
        single.chain(nested).find(|p| p.is_file())
    }
}

impl ModuleResolver for FsResolver {
    fn resolve(
        &self,
        kind: PackageKind,
        name: &str,
        naming: &NamingConvention,
    ) -> Result<ModuleLocator> {
        let searched = kind.candidates(name, naming);
        for package in &searched {
            if let Some(path) = self.find_manifest(package) {
                debug!(%kind, name, path = %path.display(), "resolved package manifest");
                return Ok(ModuleLocator {
                    kind,
                    package_name: package.clone(),
                    path: Some(path),
                });
            }
        }
        Err(LoaderError::NotFound {
            kind,
            name: name.to_string(),
            searched,
        })
    }

    fn require(&self, locator: &ModuleLocator) -> Result<Module> {
        let Some(path) = locator.path.as_deref() else {
            return Err(LoaderError::NotFound {
                kind: locator.kind,
                name: locator.package_name.clone(),
                searched: vec![locator.package_name.clone()],
            });
        };
        let contents = fs::read_to_string(path).map_err(|e| LoaderError::io(path, e))?;
        let mut manifest = parse_manifest(&contents, path)?;
        // A manifest without `kind` found through a preset/plugin reference is
        // read as that kind.
        if manifest.kind == ManifestKind::Rule && manifest.terms.is_empty() {
            match locator.kind {
                PackageKind::Preset => manifest.kind = ManifestKind::Preset,
                PackageKind::Plugin => manifest.kind = ManifestKind::Plugin,
                PackageKind::Rule => {}
            }
        }
        manifest.into_module(&locator.package_name)
    }
}
