//! Binds command line options to setters declared on plain structs.
//!
//! A tool describes its bindable properties once, either by hand through
//! [`Binder`] or with `#[derive(Bindable)]`:
//!
//! ```ignore
//! #[derive(Debug, Default, optbind::Bindable)]
//! struct Tool {
//!     /// Write output to FILE
//!     #[option(short = "o", argument = "FILE")]
//!     output: Option<PathBuf>,
//!     #[command(name = "list", ty = ListCommand, priority = 1)]
//!     command: Option<Box<dyn optbind::Command>>,
//!     #[unknown_arguments]
//!     inputs: Vec<String>,
//! }
//! ```
//!
//! [`introspect`] turns a set of such types into a [`Catalog`]. A command
//! line parser uses the catalog to produce [`Value`]s, and
//! [`Catalog::evaluate`] feeds them back into live targets.
use std::fmt;

pub use optbind_macros::Bindable;

mod bind;
mod catalog;
mod eval;
mod value;

/// Private impl details for macros.
#[doc(hidden)]
pub mod rt;

pub use crate::{
    bind::{has_unknown_arguments, Bindable, Binder, Class, Command, Factory, Target, UnknownSink},
    catalog::{introspect, Catalog, CommandDesc, Entry, Id, OptionDesc},
    eval::Value,
    value::{ArgumentType, FromValue, RawValue},
};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error raised by a setter, a command factory or a value conversion.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A type registered a property the catalog can't represent.
    #[error("can't introspect `{class}`: {msg}")]
    Introspection { class: &'static str, msg: String },

    #[error("can't instantiate command `{command}`: {source}")]
    Instantiation {
        command: String,
        #[source]
        source: BoxError,
    },

    #[error("can't set `{property}` on `{target}`: {source}")]
    Dispatch {
        property: String,
        target: &'static str,
        #[source]
        source: BoxError,
    },

    /// Positional arguments were left over, but no target accepts them.
    #[error("no property for unknown arguments found")]
    MissingUnknownSink,

    /// The identifier was not minted by the catalog that evaluates it.
    #[error("unknown option identifier: {0}")]
    UnknownIdentifier(Id),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub(crate) fn internal(msg: impl fmt::Display) -> Error {
        Error::Internal(msg.to_string())
    }
}
