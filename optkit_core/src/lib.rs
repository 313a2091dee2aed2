//! Core of optkit: typed options, the command line parser, configuration
//! files and the help screen.
//!
//! Applications register their options in an [`OptionsCont`], either by hand,
//! from definitions ([`OptionsSpec`], [`parse_definitions`]) or through the
//! `#[options]` attribute of the `optkit` crate, and then resolve them with
//! [`parse_and_load`].

pub mod config;
pub mod container;
pub mod definition;
pub mod error;
pub mod help;
pub mod io;
pub mod option;
pub mod parser;

pub use config::{ConfigFormat, TomlConfig, XmlConfig};
pub use container::{OptionId, OptionsCont};
pub use definition::{
    Definitions, OptionSpec, OptionsSpec, load_definitions, parse_definitions,
};
pub use error::{OptionsError, Result, SynonymConflictKind, ValueError};
pub use help::HelpFormatter;
pub use io::{
    SetOptionsStyle, format_set_options, parse_and_load, parse_and_load_with, print_set_options,
};
pub use option::{OptionKind, OptionValue, TypedOption};
pub use parser::{OptionsParser, ParseSettings};
