use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Package-name prefix marking "this string names a rule (or preset) package".
pub const RULE_NAME_PREFIX: &str = "textlint-rule-";

/// Package-name prefix marking "this string names a plugin package".
pub const PLUGIN_NAME_PREFIX: &str = "textlint-plugin-";

/// Name prefix that turns a rule reference in an rc file into a preset.
pub const PRESET_NAME_PREFIX: &str = "preset-";

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

// ── Naming ────────────────────────────────────────────────────

/// Package naming prefixes. They only matter for package resolution and are
/// stripped from every registered identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamingConvention {
    pub rule_prefix: String,
    pub plugin_prefix: String,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            rule_prefix: RULE_NAME_PREFIX.to_string(),
            plugin_prefix: PLUGIN_NAME_PREFIX.to_string(),
        }
    }
}

impl NamingConvention {
    /// Defaults, overridden by `TEXTLINT_RULE_PREFIX` / `TEXTLINT_PLUGIN_PREFIX`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            rule_prefix: env_opt("TEXTLINT_RULE_PREFIX").unwrap_or(defaults.rule_prefix),
            plugin_prefix: env_opt("TEXTLINT_PLUGIN_PREFIX").unwrap_or(defaults.plugin_prefix),
        }
    }

    /// `textlint-rule-no-todo` -> `no-todo`. Only a leading prefix is removed.
    pub fn strip_rule_prefix<'a>(&self, name: &'a str) -> &'a str {
        name.strip_prefix(self.rule_prefix.as_str()).unwrap_or(name)
    }

    /// `textlint-plugin-html` -> `html`.
    pub fn strip_plugin_prefix<'a>(&self, name: &'a str) -> &'a str {
        name.strip_prefix(self.plugin_prefix.as_str()).unwrap_or(name)
    }
}

// ── Top-level config ──────────────────────────────────────────

/// Resolved configuration consumed by the module loader.
///
/// Immutable for the duration of a load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Rule directories (`--rulesdir`).
    pub rule_paths: Vec<PathBuf>,
    /// Rule package names (`--rule`).
    pub rules: Vec<String>,
    /// Preset package names (`--preset`).
    pub presets: Vec<String>,
    /// Plugin package names (`--plugin`).
    pub plugins: Vec<String>,
    /// Rule names switched off in the rc file. They are never loaded.
    pub disabled_rules: Vec<String>,
    /// Per-rule options from the rc file, keyed by the name as written there.
    pub rules_config: IndexMap<String, serde_json::Value>,
    /// Base directory for resolving rule, preset and plugin packages.
    pub rules_base_directory: Option<PathBuf>,
    pub naming: NamingConvention,
}

impl Config {
    /// Empty config with naming prefixes and base directory taken from the
    /// environment (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            naming: NamingConvention::from_env(),
            rules_base_directory: env_opt("TEXTLINT_RULES_BASE_DIRECTORY").map(PathBuf::from),
            ..Self::default()
        }
    }

    /// Read a `.textlintrc` file (YAML or JSON) on top of [`Config::from_env`].
    pub fn load_rc(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config = Self::from_env();
        config.apply_rc_str(&contents, path)?;
        Ok(config)
    }

    /// Merge the contents of an rc file into this config.
    ///
    /// `rules` maps a name to `true`, `false` or an options object. `false`
    /// disables the rule; names whose unprefixed form starts with `preset-`
    /// are presets. `plugins` is either a list of names or a name -> bool map.
    pub fn apply_rc_str(&mut self, contents: &str, path: &Path) -> Result<()> {
        let rc: RcFile = serde_yaml::from_str(contents).map_err(|source| CoreError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

        for (name, value) in rc.rules {
            if matches!(value, serde_yaml::Value::Bool(false)) {
                self.disabled_rules.push(name);
                continue;
            }
            if !matches!(value, serde_yaml::Value::Bool(true) | serde_yaml::Value::Null) {
                let options = serde_json::to_value(&value).map_err(|e| {
                    CoreError::InvalidConfig(format!("options of rule '{}': {}", name, e))
                })?;
                self.rules_config.insert(name.clone(), options);
            }
            if self.naming.strip_rule_prefix(&name).starts_with(PRESET_NAME_PREFIX) {
                self.presets.push(name);
            } else {
                self.rules.push(name);
            }
        }

        match rc.plugins {
            None => {}
            Some(RcPlugins::List(names)) => self.plugins.extend(names),
            Some(RcPlugins::Map(map)) => self
                .plugins
                .extend(map.into_iter().filter(|(_, enabled)| *enabled).map(|(name, _)| name)),
        }

        if let Some(dir) = rc.rules_base_directory {
            let dir = match path.parent() {
                Some(parent) if dir.is_relative() => parent.join(dir),
                _ => dir,
            };
            self.rules_base_directory = Some(dir);
        }
        Ok(())
    }

    /// Append the lists of `other` to this config (command-line flags on top
    /// of an rc file). Scalar settings of `other` win when present.
    pub fn extend(&mut self, other: Config) {
        self.rule_paths.extend(other.rule_paths);
        self.rules.extend(other.rules);
        self.presets.extend(other.presets);
        self.plugins.extend(other.plugins);
        self.disabled_rules.extend(other.disabled_rules);
        self.rules_config.extend(other.rules_config);
        if other.rules_base_directory.is_some() {
            self.rules_base_directory = other.rules_base_directory;
        }
    }

    /// True when no source would contribute anything.
    pub fn is_empty(&self) -> bool {
        self.rule_paths.is_empty()
            && self.rules.is_empty()
            && self.presets.is_empty()
            && self.plugins.is_empty()
    }

    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  rulePaths: {:?}", self.rule_paths);
        tracing::info!("  rules:     {:?}", self.rules);
        tracing::info!("  presets:   {:?}", self.presets);
        tracing::info!("  plugins:   {:?}", self.plugins);
        tracing::info!(
            "  baseDir:   {}",
            self.rules_base_directory
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(cwd)".to_string())
        );
    }
}

// ── rc file ───────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RcFile {
    rules: IndexMap<String, serde_yaml::Value>,
    plugins: Option<RcPlugins>,
    rules_base_directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RcPlugins {
    List(Vec<String>),
    Map(IndexMap<String, bool>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rc(contents: &str) -> Config {
        let mut config = Config::default();
        config
            .apply_rc_str(contents, Path::new("/work/.textlintrc"))
            .unwrap();
        config
    }

    #[test]
    fn strips_only_leading_prefix() {
        let naming = NamingConvention::default();
        assert_eq!(naming.strip_rule_prefix("textlint-rule-no-todo"), "no-todo");
        assert_eq!(naming.strip_rule_prefix("no-todo"), "no-todo");
        assert_eq!(
            naming.strip_rule_prefix("x-textlint-rule-no-todo"),
            "x-textlint-rule-no-todo"
        );
        assert_eq!(naming.strip_plugin_prefix("textlint-plugin-html"), "html");
    }

    #[test]
    fn rc_splits_rules_presets_and_disabled() {
        let config = rc(r#"
rules:
  no-todo: true
  textlint-rule-preset-jtf: true
  max-ten:
    max: 3
  spellcheck: false
plugins:
  - html
"#);
        assert_eq!(config.rules, vec!["no-todo", "max-ten"]);
        assert_eq!(config.presets, vec!["textlint-rule-preset-jtf"]);
        assert_eq!(config.disabled_rules, vec!["spellcheck"]);
        assert_eq!(config.plugins, vec!["html"]);
        assert_eq!(config.rules_config["max-ten"]["max"], 3);
    }

    #[test]
    fn rc_accepts_json_and_plugin_map() {
        let config = rc(r#"{
  "rules": { "no-todo": true },
  "plugins": { "html": true, "markdown": false },
  "rulesBaseDirectory": "packages"
}"#);
        assert_eq!(config.rules, vec!["no-todo"]);
        assert_eq!(config.plugins, vec!["html"]);
        assert_eq!(
            config.rules_base_directory,
            Some(PathBuf::from("/work/packages"))
        );
    }

    #[test]
    fn rc_empty_keys_are_accepted() {
        let config = rc("rules:\n  a: true\nplugins:\n");
        assert_eq!(config.rules, vec!["a"]);
        assert!(config.plugins.is_empty());

        let config = rc("rules:\n");
        assert!(config.is_empty());
    }

    #[test]
    fn rc_parse_error_names_the_file() {
        let mut config = Config::default();
        let err = config
            .apply_rc_str("rules: [unclosed", Path::new("broken.yml"))
            .unwrap_err();
        assert!(err.to_string().contains("broken.yml"));
    }

    #[test]
    fn load_rc_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".textlintrc");
        fs::write(&path, "rules:\n  no-todo: true\n").unwrap();
        let config = Config::load_rc(&path).unwrap();
        assert_eq!(config.rules, vec!["no-todo"]);
    }

    #[test]
    fn extend_appends_lists() {
        let mut base = rc("rules:\n  a: true\n");
        base.extend(Config {
            rules: vec!["b".into()],
            rule_paths: vec![PathBuf::from("rules")],
            ..Config::default()
        });
        assert_eq!(base.rules, vec!["a", "b"]);
        assert_eq!(base.rule_paths, vec![PathBuf::from("rules")]);
        assert!(!base.is_empty());
        assert!(Config::default().is_empty());
    }
}
