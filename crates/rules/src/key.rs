//! Qualified rule identifiers.
//!
//! Provenance is carried as data in [`RuleKey`] and only flattened to the
//! `"preset/rule"` string form when a rule reaches the registry.

use std::fmt;

/// Separator between a bundle name and a rule id inside it.
pub const KEY_SEPARATOR: char = '/';

/// Identifier under which a rule is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleKey {
    /// Bare rule name, from `rules` or a rule directory.
    Flat(String),
    /// Rule bundled in a preset, registered as `<preset>/<rule>`.
    PresetScoped { preset: String, rule: String },
    /// Rule bundled in a plugin, registered as `<plugin>/<rule>`.
    PluginScoped { plugin: String, rule: String },
}

impl RuleKey {
    pub fn flat(name: impl Into<String>) -> Self {
        RuleKey::Flat(name.into())
    }

    pub fn preset(preset: impl Into<String>, rule: impl Into<String>) -> Self {
        RuleKey::PresetScoped {
            preset: preset.into(),
            rule: rule.into(),
        }
    }

    pub fn plugin(plugin: impl Into<String>, rule: impl Into<String>) -> Self {
        RuleKey::PluginScoped {
            plugin: plugin.into(),
            rule: rule.into(),
        }
    }

    /// Rule id without its bundle name.
    pub fn rule_id(&self) -> &str {
        match self {
            RuleKey::Flat(name) => name,
            RuleKey::PresetScoped { rule, .. } | RuleKey::PluginScoped { rule, .. } => rule,
        }
    }

    /// Name of the preset or plugin the rule came from.
    pub fn bundle(&self) -> Option<&str> {
        match self {
            RuleKey::Flat(_) => None,
            RuleKey::PresetScoped { preset, .. } => Some(preset),
            RuleKey::PluginScoped { plugin, .. } => Some(plugin),
        }
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKey::Flat(name) => f.write_str(name),
            RuleKey::PresetScoped { preset: bundle, rule }
            | RuleKey::PluginScoped { plugin: bundle, rule } => {
                write!(f, "{}{}{}", bundle, KEY_SEPARATOR, rule)
            }
        }
    }
}

/// Whether a user-written name has the `<plugin>/<rule>` shape.
///
/// Such names can only refer to a rule inside a plugin and cannot be
/// resolved as a standalone rule or preset package.
pub fn is_plugin_rule_key(name: &str) -> bool {
    name.split_once(KEY_SEPARATOR)
        .is_some_and(|(plugin, rule)| !plugin.is_empty() && !rule.is_empty())
}
