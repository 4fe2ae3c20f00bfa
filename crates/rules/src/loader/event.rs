//! Events announced by the module loader and the listeners that consume them.

use textlint_core::{HandlerFactory, ProcessorFactory};

use super::error::{LoaderError, Result};
use crate::key::RuleKey;
use crate::registry::RuleMap;

/// A rule ready to be registered.
#[derive(Debug, Clone)]
pub struct RuleEntry {
    pub key: RuleKey,
    pub factory: HandlerFactory,
}

/// A processor contributed by a plugin, under the plugin's unprefixed name.
#[derive(Debug, Clone)]
pub struct ProcessorEntry {
    pub name: String,
    pub processor: ProcessorFactory,
}

/// One announcement from the loader.
#[derive(Debug)]
pub enum LoaderEvent {
    Rule(RuleEntry),
    Processor(ProcessorEntry),
    /// A non-fatal failure (a broken file in a rule directory).
    Error(LoaderError),
}

/// Consumer of loader events.
///
/// Events arrive one at a time, as soon as they are produced. Returning an
/// error aborts the load and the error propagates to the caller.
pub trait LoaderListener {
    fn on_event(&mut self, event: &LoaderEvent) -> Result<()>;
}

impl<L: LoaderListener + ?Sized> LoaderListener for &mut L {
    fn on_event(&mut self, event: &LoaderEvent) -> Result<()> {
        (**self).on_event(event)
    }
}

/// Listener backed by a closure.
pub struct FnListener<F>(F);

/// Wrap a closure as a [`LoaderListener`].
pub fn listener_fn<F>(f: F) -> FnListener<F>
where
    F: FnMut(&LoaderEvent) -> Result<()>,
{
    FnListener(f)
}

impl<F> LoaderListener for FnListener<F>
where
    F: FnMut(&LoaderEvent) -> Result<()>,
{
    fn on_event(&mut self, event: &LoaderEvent) -> Result<()> {
        (self.0)(event)
    }
}

/// Fans every event out to several listeners, in registration order.
/// The first listener error stops delivery.
#[derive(Default)]
pub struct Listeners<'a> {
    listeners: Vec<&'a mut dyn LoaderListener>,
}

impl<'a> Listeners<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, listener: &'a mut dyn LoaderListener) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl LoaderListener for Listeners<'_> {
    fn on_event(&mut self, event: &LoaderEvent) -> Result<()> {
        for listener in self.listeners.iter_mut() {
            listener.on_event(event)?;
        }
        Ok(())
    }
}

/// Registers rules like [`RuleMap`] but refuses to overwrite an existing id.
pub struct RejectDuplicates<'a> {
    rules: &'a mut RuleMap,
}

impl<'a> RejectDuplicates<'a> {
    pub fn new(rules: &'a mut RuleMap) -> Self {
        Self { rules }
    }
}

impl LoaderListener for RejectDuplicates<'_> {
    fn on_event(&mut self, event: &LoaderEvent) -> Result<()> {
        if let LoaderEvent::Rule(entry) = event {
            let id = entry.key.to_string();
            if self.rules.is_defined(&id) {
                return Err(LoaderError::Rejected(format!(
                    "rule \"{}\" is already defined",
                    id
                )));
            }
            self.rules.define(id, entry.factory.clone());
        }
        Ok(())
    }
}
