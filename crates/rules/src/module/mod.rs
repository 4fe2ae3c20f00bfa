//! Loadable modules and how package references resolve to them.
//!
//! A rule, preset or plugin reference from the config is turned into a
//! [`ModuleLocator`] by a [`ModuleResolver`], then loaded into a [`Module`].

mod fs;
mod resolver;

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use textlint_core::config::PRESET_NAME_PREFIX;
use textlint_core::{HandlerFactory, NamingConvention, ProcessorFactory};

use crate::loader::{LoaderError, Result};

pub use self::fs::FsResolver;
pub use self::resolver::{CatalogResolver, ChainResolver, ModuleResolver};

/// Ordered `rule id -> handler factory` mapping exported by presets, plugins
/// and rule directories.
pub type RuleMapping = IndexMap<String, HandlerFactory>;

/// What a package reference is expected to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageKind {
    Rule,
    Preset,
    Plugin,
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageKind::Rule => write!(f, "rule"),
            PackageKind::Preset => write!(f, "preset"),
            PackageKind::Plugin => write!(f, "plugin"),
        }
    }
}

impl PackageKind {
    /// Package names to try for `name`, most specific first.
    ///
    /// - rule `no-todo` -> `textlint-rule-no-todo`, `no-todo`
    /// - preset `foo` / `preset-foo` -> `textlint-rule-preset-foo`, then as given
    /// - plugin `html` -> `textlint-plugin-html`, `html`
    ///
    /// A name that already carries its prefix is never prefixed twice.
    pub fn candidates(self, name: &str, naming: &NamingConvention) -> Vec<String> {
        let full = match self {
            PackageKind::Rule => {
                format!("{}{}", naming.rule_prefix, naming.strip_rule_prefix(name))
            }
            PackageKind::Preset => {
                let defined = naming.strip_rule_prefix(name);
                if defined.starts_with(PRESET_NAME_PREFIX) {
                    format!("{}{}", naming.rule_prefix, defined)
                } else {
                    format!("{}{}{}", naming.rule_prefix, PRESET_NAME_PREFIX, defined)
                }
            }
            PackageKind::Plugin => {
                format!("{}{}", naming.plugin_prefix, naming.strip_plugin_prefix(name))
            }
        };
        if full == name {
            vec![full]
        } else {
            vec![full, name.to_string()]
        }
    }
}

/// A resolved, loadable package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLocator {
    pub kind: PackageKind,
    /// Package name that matched.
    pub package_name: String,
    /// Manifest path, for file-system backed packages.
    pub path: Option<PathBuf>,
}

/// The exports of a loaded package.
#[derive(Debug, Clone)]
pub enum Module {
    /// A rule package: the module itself is the handler factory.
    Rule(HandlerFactory),
    /// A preset or plugin package.
    Bundle {
        rules: Option<RuleMapping>,
        processor: Option<ProcessorFactory>,
    },
}

impl Module {
    pub fn preset(rules: RuleMapping) -> Self {
        Module::Bundle {
            rules: Some(rules),
            processor: None,
        }
    }

    pub fn plugin(rules: Option<RuleMapping>, processor: Option<ProcessorFactory>) -> Self {
        Module::Bundle { rules, processor }
    }

    pub(crate) fn into_rule(self, package: &str) -> Result<HandlerFactory> {
        match self {
            Module::Rule(factory) => Ok(factory),
            Module::Bundle { .. } => Err(LoaderError::UnexpectedExport {
                package: package.to_string(),
                expected: "a rule",
            }),
        }
    }

    pub(crate) fn into_preset_rules(self, package: &str) -> Result<RuleMapping> {
        match self {
            Module::Bundle {
                rules: Some(rules), ..
            } => Ok(rules),
            _ => Err(LoaderError::UnexpectedExport {
                package: package.to_string(),
                expected: "a `rules` mapping",
            }),
        }
    }

    pub(crate) fn into_plugin_parts(
        self,
        package: &str,
    ) -> Result<(Option<RuleMapping>, Option<ProcessorFactory>)> {
        match self {
            Module::Bundle { rules, processor } => Ok((rules, processor)),
            Module::Rule(_) => Err(LoaderError::UnexpectedExport {
                package: package.to_string(),
                expected: "plugin rules or a processor",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naming() -> NamingConvention {
        NamingConvention::default()
    }

    #[test]
    fn rule_candidates() {
        assert_eq!(
            PackageKind::Rule.candidates("no-todo", &naming()),
            vec!["textlint-rule-no-todo", "no-todo"]
        );
        assert_eq!(
            PackageKind::Rule.candidates("textlint-rule-no-todo", &naming()),
            vec!["textlint-rule-no-todo"]
        );
    }

    #[test]
    fn preset_candidates() {
        assert_eq!(
            PackageKind::Preset.candidates("foo", &naming()),
            vec!["textlint-rule-preset-foo", "foo"]
        );
        assert_eq!(
            PackageKind::Preset.candidates("preset-foo", &naming()),
            vec!["textlint-rule-preset-foo", "preset-foo"]
        );
        assert_eq!(
            PackageKind::Preset.candidates("textlint-rule-preset-foo", &naming()),
            vec!["textlint-rule-preset-foo"]
        );
    }

    #[test]
    fn plugin_candidates() {
        assert_eq!(
            PackageKind::Plugin.candidates("html", &naming()),
            vec!["textlint-plugin-html", "html"]
        );
        assert_eq!(
            PackageKind::Plugin.candidates("textlint-plugin-html", &naming()),
            vec!["textlint-plugin-html"]
        );
    }
}
