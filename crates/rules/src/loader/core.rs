//! Core [`ModuleLoader`]: turns config references into registration events.

use tracing::{debug, info, warn};

use textlint_core::Config;

use super::error::Result;
use super::event::{Listeners, LoaderEvent, LoaderListener, ProcessorEntry, RuleEntry};
use crate::key::{is_plugin_rule_key, RuleKey};
use crate::module::{ModuleResolver, PackageKind};
use crate::registry::{ProcessorMap, RuleMap};
use crate::scanner::{DirectoryScanner, ManifestDirScanner};

/// Resolves the rule directories, rules, presets and plugins named by a
/// [`Config`] and announces every contributed rule and processor.
///
/// Holds no state between calls besides the config, the resolver and the
/// directory scanner it was built with.
pub struct ModuleLoader<'a> {
    config: &'a Config,
    resolver: &'a dyn ModuleResolver,
    scanner: &'a dyn DirectoryScanner,
}

impl<'a> ModuleLoader<'a> {
    /// Create a loader that scans rule directories for manifest files.
    pub fn new(config: &'a Config, resolver: &'a dyn ModuleResolver) -> Self {
        Self {
            config,
            resolver,
            scanner: &ManifestDirScanner,
        }
    }

    /// Replace the directory scanner.
    pub fn with_scanner(mut self, scanner: &'a dyn DirectoryScanner) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    /// Load every source of the config, in order: rule directories, rules,
    /// presets, plugins. Later sources override earlier ones on id collision.
    ///
    /// Resolution and module-load failures abort the load. Broken files in a
    /// rule directory are announced as [`LoaderEvent::Error`] and skipped.
    pub fn load_from_config(&self, listener: &mut dyn LoaderListener) -> Result<()> {
        debug!(config = ?self.config, "loading from config");

        for dir in &self.config.rule_paths {
            debug!(dir = %dir.display(), "loading rules from directory");
            let scan = self.scanner.scan(dir)?;
            for (name, factory) in scan.rules {
                let entry = RuleEntry {
                    key: RuleKey::Flat(name),
                    factory,
                };
                listener.on_event(&LoaderEvent::Rule(entry))?;
            }
            for failure in scan.failures {
                listener.on_event(&LoaderEvent::Error(failure.error))?;
            }
        }

        for rule_name in &self.config.rules {
            self.load_rule(rule_name, listener)?;
        }

        for preset_name in &self.config.presets {
            self.load_preset(preset_name, listener)?;
        }

        for plugin_name in &self.config.plugins {
            self.load_plugin(plugin_name, listener)?;
        }

        info!(
            rule_paths = self.config.rule_paths.len(),
            rules = self.config.rules.len(),
            presets = self.config.presets.len(),
            plugins = self.config.plugins.len(),
            "loaded modules from config"
        );
        Ok(())
    }

    /// Load the whole config into fresh registries.
    ///
    /// Every event is also passed to `observer`. On failure nothing is
    /// returned, so registries built by an earlier call stay untouched.
    pub fn load_registries(
        &self,
        observer: &mut dyn LoaderListener,
    ) -> Result<(RuleMap, ProcessorMap)> {
        let mut rules = RuleMap::new();
        let mut processors = ProcessorMap::new();
        {
            let mut listeners = Listeners::new()
                .with(&mut rules)
                .with(&mut processors)
                .with(observer);
            self.load_from_config(&mut listeners)?;
        }
        Ok((rules, processors))
    }

    /// Load a single rule package and announce it under its unprefixed name.
    ///
    /// `textlint-rule-no-todo` is announced as `no-todo`.
    pub fn load_rule(&self, rule_name: &str, listener: &mut dyn LoaderListener) -> Result<()> {
        let defined_name = self.config.naming.strip_rule_prefix(rule_name);
        if is_plugin_rule_key(defined_name) {
            warn!(
                rule = %defined_name,
                "{} is Plugin's rule. This is unknown case, please report issue.",
                defined_name
            );
            return Ok(());
        }

        let locator = self
            .resolver
            .resolve(PackageKind::Rule, rule_name, &self.config.naming)?;
        debug!(rule = %defined_name, package = %locator.package_name, "loading rule");
        let factory = self
            .resolver
            .require(&locator)?
            .into_rule(&locator.package_name)?;

        let entry = RuleEntry {
            key: RuleKey::flat(defined_name),
            factory,
        };
        listener.on_event(&LoaderEvent::Rule(entry))
    }

    /// Load a preset and announce each of its rules as `<preset>/<rule>`.
    ///
    /// The preset name keeps its `preset-` part: `textlint-rule-preset-foo`
    /// with rule `bar` is announced as `preset-foo/bar`.
    pub fn load_preset(&self, preset_name: &str, listener: &mut dyn LoaderListener) -> Result<()> {
        let defined_name = self.config.naming.strip_rule_prefix(preset_name);
        if is_plugin_rule_key(defined_name) {
            warn!(
                preset = %defined_name,
                "{} is Plugin's rule. This is unknown case, please report issue.",
                defined_name
            );
            return Ok(());
        }

        let locator = self
            .resolver
            .resolve(PackageKind::Preset, preset_name, &self.config.naming)?;
        debug!(preset = %defined_name, package = %locator.package_name, "loading rules from preset");
        let rules = self
            .resolver
            .require(&locator)?
            .into_preset_rules(&locator.package_name)?;

        for (rule_id, factory) in rules {
            let entry = RuleEntry {
                key: RuleKey::preset(defined_name, rule_id),
                factory,
            };
            listener.on_event(&LoaderEvent::Rule(entry))?;
        }
        Ok(())
    }

    /// Load a plugin: announce its rules as `<plugin>/<rule>` and its
    /// processor under the plugin name. Either part may be missing.
    pub fn load_plugin(&self, plugin_name: &str, listener: &mut dyn LoaderListener) -> Result<()> {
        let defined_name = self.config.naming.strip_plugin_prefix(plugin_name);

        let locator = self
            .resolver
            .resolve(PackageKind::Plugin, plugin_name, &self.config.naming)?;
        debug!(plugin = %defined_name, package = %locator.package_name, "loading rules from plugin");
        let (rules, processor) = self
            .resolver
            .require(&locator)?
            .into_plugin_parts(&locator.package_name)?;

        // Processor-only plugins define no rules.
        for (rule_id, factory) in rules.into_iter().flatten() {
            let entry = RuleEntry {
                key: RuleKey::plugin(defined_name, rule_id),
                factory,
            };
            listener.on_event(&LoaderEvent::Rule(entry))?;
        }

        if let Some(processor) = processor {
            let entry = ProcessorEntry {
                name: defined_name.to_string(),
                processor,
            };
            listener.on_event(&LoaderEvent::Processor(entry))?;
        }
        Ok(())
    }
}
