//! Rule directory scanning (`--rulesdir`).
//!
//! Every eligible file directly inside a directory is one rule, named after
//! its file stem. There is no package resolution and no prefix stripping.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::loader::{LoaderError, Result};
use crate::manifest::{parse_manifest, ManifestKind};
use crate::module::{Module, RuleMapping};

/// Extensions recognised as rule manifests.
pub const RULE_FILE_EXTENSIONS: &[&str] = &["yml", "yaml", "json"];

/// Outcome of scanning one directory.
#[derive(Debug, Default)]
pub struct DirScan {
    /// Bare rule name -> handler factory, in file-name order.
    pub rules: RuleMapping,
    /// Files that looked like rules but could not be loaded.
    pub failures: Vec<ScanFailure>,
}

/// A file skipped because it failed to load.
#[derive(Debug)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: LoaderError,
}

/// Lists a rule directory and loads every rule file in it.
pub trait DirectoryScanner {
    /// An unreadable directory is an error; unreadable files are reported in
    /// [`DirScan::failures`].
    fn scan(&self, dir: &Path) -> Result<DirScan>;
}

/// Whether `path` names a file the scanner would pick up.
///
/// Dotfiles and files without a manifest extension are ignored.
pub fn is_rule_file(path: &Path) -> bool {
    let visible = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| !n.starts_with('.'));
    let known_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| RULE_FILE_EXTENSIONS.contains(&e));
    visible && known_ext
}

/// Scanner for directories of declarative rule manifests.
#[derive(Debug, Default, Clone, Copy)]
pub struct ManifestDirScanner;

impl ManifestDirScanner {
    fn load_rule_file(&self, path: &Path, name: &str) -> Result<Module> {
        let contents = fs::read_to_string(path).map_err(|e| LoaderError::io(path, e))?;
        let manifest = parse_manifest(&contents, path)?;
        if manifest.kind != ManifestKind::Rule {
            return Err(LoaderError::UnexpectedExport {
                package: name.to_string(),
                expected: "a rule",
            });
        }
        manifest.into_module(name)
    }
}

impl DirectoryScanner for ManifestDirScanner {
    fn scan(&self, dir: &Path) -> Result<DirScan> {
        let entries = fs::read_dir(dir).map_err(|e| LoaderError::io(dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| LoaderError::io(dir, e))?.path();
            if path.is_file() && is_rule_file(&path) {
                paths.push(path);
            } else {
                debug!(path = %path.display(), "skipping non-rule entry");
            }
        }
        paths.sort();

        let mut scan = DirScan::default();
        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                warn!(path = %path.display(), "skipping rule file with a non UTF-8 name");
                continue;
            };
            if scan.rules.contains_key(&name) {
                let error = LoaderError::InvalidModule {
                    package: name.clone(),
                    reason: format!("duplicate rule name \"{}\" in {}", name, dir.display()),
                };
                warn!(path = %path.display(), error = %error, "failed to load rule file");
                scan.failures.push(ScanFailure { path, error });
                continue;
            }
            match self
                .load_rule_file(&path, &name)
                .and_then(|module| module.into_rule(&name))
            {
                Ok(factory) => {
                    debug!(rule = %name, path = %path.display(), "loaded rule file");
                    scan.rules.insert(name, factory);
                }
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "failed to load rule file");
                    scan.failures.push(ScanFailure { path, error });
                }
            }
        }
        Ok(scan)
    }
}
