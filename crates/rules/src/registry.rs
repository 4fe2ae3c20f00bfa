//! Rule and processor registries.
//!
//! The seam between loading and execution: the engine reads handler
//! factories from here and never learns how a rule was discovered.

use indexmap::IndexMap;
use tracing::debug;

use textlint_core::{HandlerFactory, ProcessorFactory};

use crate::loader::{LoaderEvent, LoaderListener, Result};

/// Qualified rule id -> handler factory.
///
/// Keys are unique. Defining an existing key replaces its factory and keeps
/// the key's original position.
#[derive(Debug, Default, Clone)]
pub struct RuleMap {
    rules: IndexMap<String, HandlerFactory>,
}

impl RuleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `id`.
    pub fn define(&mut self, id: impl Into<String>, factory: HandlerFactory) {
        self.rules.insert(id.into(), factory);
    }

    pub fn is_defined(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&HandlerFactory> {
        self.rules.get(id)
    }

    /// Registered ids in insertion order.
    pub fn all_ids(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }

    pub fn has_at_least_one(&self) -> bool {
        !self.rules.is_empty()
    }

    /// Snapshot for the execution engine.
    pub fn all_entries(&self) -> IndexMap<String, HandlerFactory> {
        self.rules.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HandlerFactory)> {
        self.rules.iter().map(|(id, f)| (id.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Remove every rule.
    pub fn reset(&mut self) {
        self.rules.clear();
    }
}

impl LoaderListener for RuleMap {
    fn on_event(&mut self, event: &LoaderEvent) -> Result<()> {
        if let LoaderEvent::Rule(entry) = event {
            let id = entry.key.to_string();
            if self.is_defined(&id) {
                debug!(rule = %id, "overriding previously defined rule");
            }
            self.define(id, entry.factory.clone());
        }
        Ok(())
    }
}

/// Plugin name -> processor.
#[derive(Debug, Default, Clone)]
pub struct ProcessorMap {
    processors: IndexMap<String, ProcessorFactory>,
}

impl ProcessorMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: impl Into<String>, processor: ProcessorFactory) {
        self.processors.insert(name.into(), processor);
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.processors.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ProcessorFactory> {
        self.processors.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.processors.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProcessorFactory)> {
        self.processors.iter().map(|(name, p)| (name.as_str(), p))
    }

    /// Last registered processor that handles `ext` (`.html` or `html`).
    ///
    /// Later plugins take precedence, matching rule override order.
    pub fn find_by_extension(&self, ext: &str) -> Option<(&str, &ProcessorFactory)> {
        let ext = ext.trim_start_matches('.');
        self.processors
            .iter()
            .rev()
            .find(|(_, p)| {
                p.extensions()
                    .iter()
                    .any(|e| e.trim_start_matches('.') == ext)
            })
            .map(|(name, p)| (name.as_str(), p))
    }

    pub fn len(&self) -> usize {
        self.processors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    pub fn reset(&mut self) {
        self.processors.clear();
    }
}

impl LoaderListener for ProcessorMap {
    fn on_event(&mut self, event: &LoaderEvent) -> Result<()> {
        if let LoaderEvent::Processor(entry) = event {
            self.define(entry.name.clone(), entry.processor.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use textlint_core::{Capabilities, RuleCreator};

    use super::*;
    use crate::manifest::ExtensionProcessor;

    #[derive(Debug)]
    struct Stub;

    impl RuleCreator for Stub {
        fn capabilities(&self) -> Capabilities {
            Capabilities::LINTER
        }
    }

    fn factory() -> HandlerFactory {
        Arc::new(Stub)
    }

    #[test]
    fn define_twice_is_idempotent() {
        let f = factory();
        let mut once = RuleMap::new();
        once.define("a", f.clone());
        let mut twice = RuleMap::new();
        twice.define("a", f.clone());
        twice.define("a", f.clone());

        assert_eq!(once.all_ids(), twice.all_ids());
        assert!(Arc::ptr_eq(twice.get("a").unwrap(), &f));
    }

    #[test]
    fn later_define_overrides_and_keeps_position() {
        let (f1, f2) = (factory(), factory());
        let mut map = RuleMap::new();
        map.define("a", f1);
        map.define("b", factory());
        map.define("a", f2.clone());

        assert!(Arc::ptr_eq(map.get("a").unwrap(), &f2));
        assert_eq!(map.all_ids(), vec!["a", "b"]);
    }

    #[test]
    fn lookup_absent_and_reset() {
        let mut map = RuleMap::new();
        assert!(!map.has_at_least_one());
        assert!(map.get("missing").is_none());
        assert!(!map.is_defined("missing"));

        map.define("a", factory());
        assert!(map.has_at_least_one());
        assert_eq!(map.all_entries().len(), 1);

        map.reset();
        assert!(map.is_empty());
        assert!(map.all_ids().is_empty());
    }

    #[test]
    fn processor_lookup_by_extension() {
        let mut map = ProcessorMap::new();
        map.define("html", Arc::new(ExtensionProcessor::new([".html", ".htm"])));
        map.define("mdx", Arc::new(ExtensionProcessor::new(["mdx"])));
        map.define("html5", Arc::new(ExtensionProcessor::new(["html"])));

        assert_eq!(map.find_by_extension(".htm").map(|(n, _)| n), Some("html"));
        assert_eq!(map.find_by_extension("html").map(|(n, _)| n), Some("html5"));
        assert_eq!(map.find_by_extension(".mdx").map(|(n, _)| n), Some("mdx"));
        assert!(map.find_by_extension(".txt").is_none());
        assert_eq!(map.names(), vec!["html", "mdx", "html5"]);
    }
}
