//! Capability objects exported by rule and plugin packages.
//!
//! The loading layer treats these as opaque: it moves them from a resolved
//! module into the registries and never looks inside. Only the execution
//! engine calls into them.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// What a rule handler is able to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Produces a linter behavior (reports issues).
    pub linter: bool,
    /// Produces a fixer behavior (proposes text replacements).
    pub fixer: bool,
}

impl Capabilities {
    pub const LINTER: Self = Self {
        linter: true,
        fixer: false,
    };

    pub const FIXER: Self = Self {
        linter: true,
        fixer: true,
    };
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match (self.linter, self.fixer) {
            (true, true) => "lint+fix",
            (true, false) => "lint",
            (false, true) => "fix",
            (false, false) => "none",
        })
    }
}

/// A rule handler factory as exported by a rule module.
pub trait RuleCreator: fmt::Debug + Send + Sync {
    fn capabilities(&self) -> Capabilities;

    /// Human-readable description, if the rule ships one.
    fn description(&self) -> Option<&str> {
        None
    }
}

/// Shared handle to a rule handler factory.
pub type HandlerFactory = Arc<dyn RuleCreator>;

/// A custom document parser contributed by a plugin.
pub trait Processor: fmt::Debug + Send + Sync {
    /// File extensions this processor handles, with the leading dot (`.html`).
    fn extensions(&self) -> Vec<String>;
}

/// Shared handle to a processor capability.
pub type ProcessorFactory = Arc<dyn Processor>;
