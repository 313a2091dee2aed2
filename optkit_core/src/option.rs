//! The typed value cell behind every registered name.

use std::fmt;

use serde::Deserialize;

use crate::error::{OptionsError, Result, ValueError};

/// The kind of value an option stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Bool,
    Int,
    Double,
    #[default]
    String,
    /// A string naming a file; parsed exactly like [`OptionKind::String`].
    #[serde(alias = "file")]
    FileName,
}

impl OptionKind {
    /// The lower-case name used in help and error output.
    pub fn type_name(self) -> &'static str {
        match self {
            OptionKind::Bool => "bool",
            OptionKind::Int => "int",
            OptionKind::Double => "double",
            OptionKind::String => "string",
            OptionKind::FileName => "filename",
        }
    }

    /// Whether values of this kind are stored as [`OptionValue::String`].
    pub fn is_textual(self) -> bool {
        matches!(self, OptionKind::String | OptionKind::FileName)
    }

    /// Parses `raw` into a value of this kind.
    pub fn parse(self, raw: &str) -> std::result::Result<OptionValue, ValueError> {
        let invalid = |reason: String| ValueError {
            value: raw.to_string(),
            kind: self,
            reason,
        };
        match self {
            OptionKind::Bool => parse_bool(raw)
                .map(OptionValue::Bool)
                .ok_or_else(|| invalid("inconvertible".to_string())),
            OptionKind::Int => raw
                .parse::<i64>()
                .map(OptionValue::Int)
                .map_err(|e| invalid(e.to_string())),
            OptionKind::Double => raw
                .parse::<f64>()
                .map(OptionValue::Double)
                .map_err(|e| invalid(e.to_string())),
            OptionKind::String | OptionKind::FileName => Ok(OptionValue::String(raw.to_string())),
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Accepts `t`, `true`, `1`, `f`, `false` and `0`, ignoring case.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "t" | "true" | "1" => Some(true),
        "f" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// A stored option value.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(true) => f.write_str("true"),
            OptionValue::Bool(false) => f.write_str("false"),
            OptionValue::Int(v) => write!(f, "{v}"),
            OptionValue::Double(v) => write!(f, "{v}"),
            OptionValue::String(v) => f.write_str(v),
        }
    }
}

/// One configurable value, shared by all of its names.
///
/// An option is *set* as soon as it holds a value, either its default or an
/// assigned one. Independently, it remembers whether it was assigned since the
/// last [`TypedOption::remark_unset`], which is what the two-pass loading in
/// [`crate::io`] and the parent chaining in [`crate::config`] ask about.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedOption {
    kind: OptionKind,
    value: Option<OptionValue>,
    has_default: bool,
    is_default: bool,
    set_in_pass: bool,
    description: Option<String>,
}

impl TypedOption {
    /// Creates an option without a value.
    pub fn new(kind: OptionKind) -> Self {
        Self {
            kind,
            value: None,
            has_default: false,
            is_default: false,
            set_in_pass: false,
            description: None,
        }
    }

    /// Creates an option whose default is parsed from `raw`.
    pub fn with_default(kind: OptionKind, raw: &str) -> std::result::Result<Self, ValueError> {
        let value = kind.parse(raw)?;
        Ok(Self::defaulted(kind, value))
    }

    fn defaulted(kind: OptionKind, value: OptionValue) -> Self {
        Self {
            value: Some(value),
            has_default: true,
            is_default: true,
            ..Self::new(kind)
        }
    }

    pub fn bool() -> Self {
        Self::new(OptionKind::Bool)
    }

    pub fn int() -> Self {
        Self::new(OptionKind::Int)
    }

    pub fn double() -> Self {
        Self::new(OptionKind::Double)
    }

    pub fn string() -> Self {
        Self::new(OptionKind::String)
    }

    pub fn file_name() -> Self {
        Self::new(OptionKind::FileName)
    }

    pub fn bool_default(value: bool) -> Self {
        Self::defaulted(OptionKind::Bool, OptionValue::Bool(value))
    }

    pub fn int_default(value: i64) -> Self {
        Self::defaulted(OptionKind::Int, OptionValue::Int(value))
    }

    pub fn double_default(value: f64) -> Self {
        Self::defaulted(OptionKind::Double, OptionValue::Double(value))
    }

    pub fn string_default(value: impl Into<String>) -> Self {
        Self::defaulted(OptionKind::String, OptionValue::String(value.into()))
    }

    pub fn file_name_default(value: impl Into<String>) -> Self {
        Self::defaulted(OptionKind::FileName, OptionValue::String(value.into()))
    }

    /// Builder-style description setter.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Parses and stores `raw`. The previous value is kept on failure.
    pub fn set(&mut self, raw: &str) -> std::result::Result<(), ValueError> {
        let value = self.kind.parse(raw)?;
        self.value = Some(value);
        self.is_default = false;
        self.set_in_pass = true;
        Ok(())
    }

    /// Forgets that the option was assigned in the current pass.
    ///
    /// The stored value stays readable.
    pub fn remark_unset(&mut self) {
        self.set_in_pass = false;
    }

    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn is_bool(&self) -> bool {
        self.kind == OptionKind::Bool
    }

    pub fn is_file_name(&self) -> bool {
        self.kind == OptionKind::FileName
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn has_default(&self) -> bool {
        self.has_default
    }

    /// Whether the stored value is still the registered default.
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn was_set_in_pass(&self) -> bool {
        self.set_in_pass
    }

    pub fn value(&self) -> Option<&OptionValue> {
        self.value.as_ref()
    }

    pub fn value_as_string(&self) -> Option<String> {
        self.value.as_ref().map(ToString::to_string)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub(crate) fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Returns the value, or [`OptionsError::NotSet`] naming `name`.
    pub(crate) fn require(&self, name: &str) -> Result<&OptionValue> {
        self.value
            .as_ref()
            .ok_or_else(|| OptionsError::NotSet(name.to_string()))
    }
}
