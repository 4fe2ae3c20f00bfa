//! Module loader: walks the rule sources of a config, resolves each
//! reference and announces the rules and processors it contributes.

mod core;
mod error;
mod event;


pub use self::core::ModuleLoader;
pub use self::error::{LoaderError, Result};
pub use self::event::{
    listener_fn, FnListener, Listeners, LoaderEvent, LoaderListener, ProcessorEntry,
    RejectDuplicates, RuleEntry,
};
