//! Shared types for the textlint rule loading layer: configuration, naming
//! conventions and the capability traits exported by rule packages.

pub mod config;
pub mod error;
pub mod rule;

pub use config::{load_dotenv, Config, NamingConvention, PLUGIN_NAME_PREFIX, RULE_NAME_PREFIX};
pub use error::*;
pub use rule::{Capabilities, HandlerFactory, Processor, ProcessorFactory, RuleCreator};
