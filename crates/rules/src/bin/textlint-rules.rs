//! textlint-rules: resolve the rules, presets and plugins of a textlint
//! config and print what ends up registered.
//!
//! With `--watch` the rule directories are watched and the registries are
//! rebuilt whenever a rule file changes.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use textlint_core::{load_dotenv, Config, Processor, RuleCreator};
use textlint_rules::loader::listener_fn;
use textlint_rules::watcher::RuleDirWatcher;
use textlint_rules::{FsResolver, LoaderEvent, ModuleLoader, ProcessorMap, RuleMap};

/// Config file looked up in the working directory when `--config` is absent.
const DEFAULT_RC_FILE: &str = ".textlintrc";

// ── CLI ─────────────────────────────────────────────────────────────

/// Resolve textlint rules, presets and plugins and list the registered rules.
#[derive(Parser, Debug)]
#[command(name = "textlint-rules", version, about)]
struct Cli {
    /// Path to a .textlintrc file (YAML or JSON).
    #[arg(short, long, env = "TEXTLINT_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of rule files. Can be repeated.
    #[arg(long = "rulesdir")]
    rulesdir: Vec<PathBuf>,

    /// Rule package name. Can be repeated.
    #[arg(long = "rule")]
    rules: Vec<String>,

    /// Preset package name. Can be repeated.
    #[arg(long = "preset")]
    presets: Vec<String>,

    /// Plugin package name. Can be repeated.
    #[arg(long = "plugin")]
    plugins: Vec<String>,

    /// Base directory for resolving packages (defaults to the working directory).
    #[arg(long)]
    rules_base_directory: Option<PathBuf>,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Keep running and reload when a rule directory changes.
    #[arg(long)]
    watch: bool,
}

impl Cli {
    fn build_config(&self) -> anyhow::Result<Config> {
        let rc_path = match &self.config {
            Some(path) => Some(path.clone()),
            None => Some(PathBuf::from(DEFAULT_RC_FILE)).filter(|p| p.is_file()),
        };
        let mut config = match rc_path {
            Some(path) => Config::load_rc(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => Config::from_env(),
        };
        config.extend(Config {
            rule_paths: self.rulesdir.clone(),
            rules: self.rules.clone(),
            presets: self.presets.clone(),
            plugins: self.plugins.clone(),
            rules_base_directory: self.rules_base_directory.clone(),
            ..Config::default()
        });
        Ok(config)
    }
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the config into fresh registries, logging skipped rule files.
fn load(config: &Config, resolver: &FsResolver) -> anyhow::Result<(RuleMap, ProcessorMap)> {
    let mut report_errors = listener_fn(|event: &LoaderEvent| {
        if let LoaderEvent::Error(e) = event {
            warn!(error = %e, "skipped rule file");
        }
        Ok(())
    });
    let registries = ModuleLoader::new(config, resolver).load_registries(&mut report_errors)?;
    Ok(registries)
}

fn print_report(rules: &RuleMap, processors: &ProcessorMap, json: bool) -> anyhow::Result<()> {
    if json {
        let rules: Vec<_> = rules
            .iter()
            .map(|(id, f)| {
                serde_json::json!({
                    "id": id,
                    "capabilities": f.capabilities(),
                    "description": f.description(),
                })
            })
            .collect();
        let processors: Vec<_> = processors
            .iter()
            .map(|(name, p)| serde_json::json!({ "name": name, "extensions": p.extensions() }))
            .collect();
        let out = serde_json::json!({ "rules": rules, "processors": processors });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if !rules.has_at_least_one() {
        println!("No rules found.");
    }
    for (id, f) in rules.iter() {
        match f.description() {
            Some(desc) => println!("{:<40} {:<9} {}", id, f.capabilities(), desc),
            None => println!("{:<40} {}", id, f.capabilities()),
        }
    }
    for (name, p) in processors.iter() {
        println!("processor {:<30} {}", name, p.extensions().join(", "));
    }
    Ok(())
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let cli = Cli::parse();
    let config = cli.build_config()?;
    config.log_summary();

    let base_dir = config
        .rules_base_directory
        .clone()
        .unwrap_or_else(|| Path::new(".").to_path_buf());
    let resolver = FsResolver::new(base_dir);

    let (mut rules, mut processors) = load(&config, &resolver)?;
    print_report(&rules, &processors, cli.json)?;

    if !cli.watch {
        return Ok(());
    }
    if config.rule_paths.is_empty() {
        warn!("--watch given but no rule directories configured");
        return Ok(());
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let _watcher = RuleDirWatcher::start(&config.rule_paths, move |change| {
        let _ = tx.send(change);
    })?;

    loop {
        tokio::select! {
            Some(change) = rx.recv() => {
                // Editors emit several events per save; reload once.
                while rx.try_recv().is_ok() {}
                info!(path = %change.path().display(), "rule directory changed, reloading");

                match load(&config, &resolver) {
                    Ok(next) => {
                        (rules, processors) = next;
                        print_report(&rules, &processors, cli.json)?;
                    }
                    Err(e) => error!(error = %e, "reload failed, keeping previous rules"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("textlint-rules shutting down");
                break;
            }
        }
    }
    Ok(())
}
