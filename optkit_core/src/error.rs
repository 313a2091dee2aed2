//! Error types for option registration, parsing and configuration IO.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::option::OptionKind;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, OptionsError>;

/// Which side of a synonym registration was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynonymConflictKind {
    /// Both names are already registered.
    BothKnown,
    /// Neither name is registered.
    NeitherKnown,
}

/// A textual value could not be converted into an option's kind.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("'{value}' is not a valid {kind} value: {reason}")]
pub struct ValueError {
    pub value: String,
    pub kind: OptionKind,
    pub reason: String,
}

/// The main error type of the crate.
///
/// Every failure is fatal to the current operation; the orchestrating
/// functions in [`crate::io`] abort on the first error they see.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("An option with the name '{0}' already exists.")]
    NameConflict(String),

    #[error("The option '{0}' is not known.")]
    UnknownOption(String),

    #[error("{}", synonym_message(.conflict, .first, .second))]
    SynonymConflict {
        conflict: SynonymConflictKind,
        first: String,
        second: String,
    },

    #[error("The option '{name}' is of type {actual}, not {expected}.")]
    TypeMismatch {
        name: String,
        expected: OptionKind,
        actual: OptionKind,
    },

    #[error("The option '{0}' is not set.")]
    NotSet(String),

    #[error("Invalid value for option '{name}': {source}")]
    InvalidValue {
        name: String,
        #[source]
        source: ValueError,
    },

    #[error("The option '{0}' needs a value.")]
    MissingValue(String),

    #[error("Unexpected argument '{0}'.")]
    UnexpectedArgument(String),

    #[error("Could not access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed XML in '{}': {message}", .path.display())]
    Xml { path: PathBuf, message: String },

    #[error("Malformed TOML in '{}': {message}", .path.display())]
    Toml { path: PathBuf, message: String },

    #[error("Unsupported file format of '{}'.", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Invalid definition in line {line}: {message}")]
    Definition { line: usize, message: String },

    #[error("The configuration '{}' is part of a parent cycle.", .0.display())]
    ConfigCycle(PathBuf),
}

fn synonym_message(conflict: &SynonymConflictKind, first: &str, second: &str) -> String {
    match conflict {
        SynonymConflictKind::BothKnown => {
            format!("Both options are already set ('{first}' and '{second}')!")
        }
        SynonymConflictKind::NeitherKnown => format!(
            "Neither an option with the name '{first}' nor an option with the name '{second}' is known."
        ),
    }
}

impl OptionsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn definition(line: usize, message: impl Into<String>) -> Self {
        Self::Definition {
            line,
            message: message.into(),
        }
    }
}
