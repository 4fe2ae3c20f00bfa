//! Rule loading and registration for the textlint engine.
//!
//! This crate provides:
//! - [`RuleMap`] / [`ProcessorMap`] registries consumed by the execution engine
//! - [`ModuleLoader`], which turns rule directories, rule names, presets and
//!   plugins from a [`textlint_core::Config`] into registration events
//! - Pluggable package resolution ([`ModuleResolver`]) backed by an in-memory
//!   catalog or by YAML/JSON manifests on disk
//! - A `notify` based watcher for rule directories (watch mode)

pub mod key;
pub mod loader;
pub mod manifest;
pub mod module;
pub mod registry;
pub mod scanner;
pub mod watcher;

#[cfg(test)]
mod test_log;

pub use key::RuleKey;
pub use loader::{LoaderError, LoaderEvent, LoaderListener, ModuleLoader};
pub use module::{CatalogResolver, ChainResolver, FsResolver, Module, ModuleResolver};
pub use registry::{ProcessorMap, RuleMap};
