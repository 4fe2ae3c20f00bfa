//! Declarative package manifests.
//!
//! Rule packages, presets and plugins on disk are YAML (or JSON) documents:
//!
//! ```yaml
//! kind: rule            # rule | preset | plugin, defaults to rule
//! description: Disallow TODO markers
//! terms:
//!   - pattern: TODO
//!     message: Found TODO
//!   - pattern: colour
//!     replacement: color
//! ```
//!
//! Presets and plugins carry a `rules` mapping of inline rule manifests;
//! plugins may add `processor: { extensions: [".html"] }`.

use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;

use textlint_core::{Capabilities, HandlerFactory, Processor, ProcessorFactory, RuleCreator};

use crate::loader::{LoaderError, Result};
use crate::module::{Module, RuleMapping};

// ── Schema ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    #[default]
    Rule,
    Preset,
    Plugin,
}

/// Top-level manifest document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageManifest {
    pub kind: ManifestKind,
    pub description: Option<String>,
    pub terms: Vec<TermSpec>,
    pub rules: Option<IndexMap<String, RuleManifest>>,
    pub processor: Option<ProcessorManifest>,
}

/// A single rule definition, inline in a bundle.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleManifest {
    pub description: Option<String>,
    pub terms: Vec<TermSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TermSpec {
    pub pattern: String,
    #[serde(default)]
    pub replacement: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessorManifest {
    pub extensions: Vec<String>,
}

// ── Capabilities built from manifests ───────────────────────────────

/// Rule that flags fixed terms, optionally proposing a replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermRule {
    description: Option<String>,
    terms: Vec<TermSpec>,
}

impl TermRule {
    pub fn new(description: Option<String>, terms: Vec<TermSpec>) -> Self {
        Self { description, terms }
    }

    pub fn terms(&self) -> &[TermSpec] {
        &self.terms
    }
}

impl RuleCreator for TermRule {
    fn capabilities(&self) -> Capabilities {
        if self.terms.iter().any(|t| t.replacement.is_some()) {
            Capabilities::FIXER
        } else {
            Capabilities::LINTER
        }
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Processor declared by a plugin manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionProcessor {
    extensions: Vec<String>,
}

impl ExtensionProcessor {
    /// Extensions are normalized to carry a leading dot.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|e| {
                let e = e.as_ref();
                if e.starts_with('.') {
                    e.to_string()
                } else {
                    format!(".{}", e)
                }
            })
            .collect();
        Self { extensions }
    }
}

impl Processor for ExtensionProcessor {
    fn extensions(&self) -> Vec<String> {
        self.extensions.clone()
    }
}

// ── Parsing ─────────────────────────────────────────────────────────

/// Parse manifest text. `path` is only used for error reporting.
pub fn parse_manifest(contents: &str, path: &Path) -> Result<PackageManifest> {
    serde_yaml::from_str(contents).map_err(|source| LoaderError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn build_rule(package: &str, rule: RuleManifest) -> Result<HandlerFactory> {
    if rule.terms.is_empty() {
        return Err(LoaderError::InvalidModule {
            package: package.to_string(),
            reason: "rule defines no terms".to_string(),
        });
    }
    if rule.terms.iter().any(|t| t.pattern.is_empty()) {
        return Err(LoaderError::InvalidModule {
            package: package.to_string(),
            reason: "term pattern must not be empty".to_string(),
        });
    }
    Ok(Arc::new(TermRule::new(rule.description, rule.terms)))
}

fn build_mapping(package: &str, rules: IndexMap<String, RuleManifest>) -> Result<RuleMapping> {
    rules
        .into_iter()
        .map(|(id, rule)| {
            let factory = build_rule(&format!("{}/{}", package, id), rule)?;
            Ok((id, factory))
        })
        .collect()
}

impl PackageManifest {
    /// Turn the manifest into module exports.
    pub fn into_module(self, package: &str) -> Result<Module> {
        match self.kind {
            ManifestKind::Rule => {
                if self.rules.is_some() || self.processor.is_some() {
                    return Err(LoaderError::InvalidModule {
                        package: package.to_string(),
                        reason: "a rule manifest cannot declare `rules` or `processor`".to_string(),
                    });
                }
                let rule = RuleManifest {
                    description: self.description,
                    terms: self.terms,
                };
                Ok(Module::Rule(build_rule(package, rule)?))
            }
            ManifestKind::Preset => {
                if self.processor.is_some() {
                    return Err(LoaderError::InvalidModule {
                        package: package.to_string(),
                        reason: "a preset cannot declare a processor".to_string(),
                    });
                }
                let rules = self.rules.ok_or_else(|| LoaderError::UnexpectedExport {
                    package: package.to_string(),
                    expected: "a `rules` mapping",
                })?;
                Ok(Module::preset(build_mapping(package, rules)?))
            }
            ManifestKind::Plugin => {
                let rules = self
                    .rules
                    .map(|rules| build_mapping(package, rules))
                    .transpose()?;
                let processor = self.processor.map(|p| {
                    Arc::new(ExtensionProcessor::new(p.extensions)) as ProcessorFactory
                });
                Ok(Module::plugin(rules, processor))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(yaml: &str) -> Result<Module> {
        parse_manifest(yaml, Path::new("test.yml"))?.into_module("pkg")
    }

    #[test]
    fn rule_manifest_is_default_kind() {
        let m = module("terms:\n  - pattern: TODO\n").unwrap();
        let Module::Rule(factory) = m else {
            panic!("expected rule module");
        };
        assert_eq!(factory.capabilities(), Capabilities::LINTER);
    }

    #[test]
    fn replacement_makes_rule_fixable() {
        let m = module(
            "description: spelling\nterms:\n  - pattern: colour\n    replacement: color\n",
        )
        .unwrap();
        let Module::Rule(factory) = m else {
            panic!("expected rule module");
        };
        assert_eq!(factory.capabilities(), Capabilities::FIXER);
        assert_eq!(factory.description(), Some("spelling"));
    }

    #[test]
    fn preset_keeps_rule_order() {
        let m = module(
            r#"
kind: preset
rules:
  zeta:
    terms: [{ pattern: z }]
  alpha:
    terms: [{ pattern: a }]
"#,
        )
        .unwrap();
        let Module::Bundle {
            rules: Some(rules),
            processor: None,
        } = m
        else {
            panic!("expected preset bundle");
        };
        let ids: Vec<_> = rules.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["zeta", "alpha"]);
    }

    #[test]
    fn preset_without_rules_is_rejected() {
        let err = module("kind: preset\n").unwrap_err();
        assert!(matches!(err, LoaderError::UnexpectedExport { .. }));
    }

    #[test]
    fn plugin_with_processor_only() {
        let m = module("kind: plugin\nprocessor:\n  extensions: [html, .htm]\n").unwrap();
        let Module::Bundle {
            rules: None,
            processor: Some(processor),
        } = m
        else {
            panic!("expected processor-only plugin");
        };
        assert_eq!(processor.extensions(), vec![".html", ".htm"]);
    }

    #[test]
    fn empty_terms_are_invalid() {
        let err = module("terms: []\n").unwrap_err();
        assert!(matches!(err, LoaderError::InvalidModule { .. }));
    }

    #[test]
    fn unknown_fields_fail_to_parse() {
        let err = module("kind: rule\nbogus: 1\n").unwrap_err();
        assert!(matches!(err, LoaderError::Parse { .. }));
    }
}
