//! Declarative option definitions.
//!
//! Two formats describe a set of options without code:
//!
//! * a line based format, one `TYPE;name;x;synonym;!description;+default`
//!   entry per line, with the directives `HELPHEADTAIL;head;tail`,
//!   `CONFIG;option` and `SECTION;title`;
//! * a TOML document deserialized into [`OptionsSpec`], which is also what the
//!   `#[options]` attribute reads at compile time.

use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::{
    config::raw_value,
    container::OptionsCont,
    error::{OptionsError, Result},
    option::{OptionKind, TypedOption},
};

/// Options read from the line based format.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    pub options: OptionsCont,
    /// The option named by a `CONFIG` directive.
    pub config_option: Option<String>,
}

/// Reads line based definitions from `path`.
pub fn load_definitions(path: &Path) -> Result<Definitions> {
    let content = std::fs::read_to_string(path).map_err(|e| OptionsError::io(path, e))?;
    parse_definitions(&content)
}

/// Parses line based definitions. Empty lines are skipped.
pub fn parse_definitions(text: &str) -> Result<Definitions> {
    let mut definitions = Definitions::default();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        apply_line(&mut definitions, index + 1, line)?;
    }
    Ok(definitions)
}

#[derive(Default)]
struct Fields<'a> {
    abbr: Option<char>,
    description: Option<&'a str>,
    default: Option<&'a str>,
    names: Vec<&'a str>,
}

fn split_fields<'a>(rest: &[&'a str]) -> Fields<'a> {
    let mut fields = Fields::default();
    for &field in rest {
        let mut chars = field.chars();
        match (chars.next(), chars.next()) {
            (Some(abbr), None) => fields.abbr = Some(abbr),
            (Some('!'), _) => fields.description = Some(&field[1..]),
            (Some('+'), _) => fields.default = Some(&field[1..]),
            _ => fields.names.push(field),
        }
    }
    fields
}

fn apply_line(definitions: &mut Definitions, line_no: usize, line: &str) -> Result<()> {
    let tokens: Vec<&str> = line.split(';').filter(|t| !t.is_empty()).collect();
    let Some((directive, rest)) = tokens.split_first() else {
        return Ok(());
    };
    let fields = split_fields(rest);
    let name_at = |index: usize| {
        fields.names.get(index).copied().ok_or_else(|| {
            OptionsError::definition(line_no, format!("{directive} needs {} name(s)", index + 1))
        })
    };
    let options = &mut definitions.options;
    let kind = match *directive {
        "HELPHEADTAIL" => {
            options.set_help_head_and_tail(name_at(0)?, name_at(1)?);
            return Ok(());
        }
        "CONFIG" => {
            definitions.config_option = Some(name_at(0)?.to_string());
            return Ok(());
        }
        "SECTION" => {
            options.begin_section(name_at(0)?);
            return Ok(());
        }
        "INT" => OptionKind::Int,
        "DOUBLE" => OptionKind::Double,
        "BOOL" => OptionKind::Bool,
        "STRING" => OptionKind::String,
        "FILE" => OptionKind::FileName,
        other => {
            return Err(OptionsError::definition(
                line_no,
                format!("unknown option type '{other}'"),
            ));
        }
    };
    let name = name_at(0)?;
    let option = match fields.default {
        Some(raw) => TypedOption::with_default(kind, raw)
            .map_err(|e| OptionsError::definition(line_no, e.to_string()))?,
        None => TypedOption::new(kind),
    };
    match fields.abbr {
        Some(abbr) => options.add_with_abbr(name, abbr, option),
        None => options.add(name, option),
    }
    .map_err(|e| OptionsError::definition(line_no, e.to_string()))?;
    for synonym in &fields.names[1..] {
        options
            .add_synonym(name, synonym)
            .map_err(|e| OptionsError::definition(line_no, e.to_string()))?;
    }
    if let Some(description) = fields.description {
        options.set_description(name, description)?;
    }
    debug!(line = line_no, name = name, kind:%; "Defined option");
    Ok(())
}

/// The TOML definition of a whole option set.
///
/// ```toml
/// head = "Usage: greeter [option]+"
/// config = "config"
///
/// [[option]]
/// name = "name"
/// short = "n"
/// default = "World"
/// doc = "Defines how to call the user."
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionsSpec {
    pub head: Option<String>,
    pub tail: Option<String>,
    /// Name of the option holding the configuration file path.
    pub config: Option<String>,
    /// Name of the option a configuration file uses to point at its parent.
    pub parent: Option<String>,
    #[serde(default, rename = "option")]
    pub options: Vec<OptionSpec>,
}

/// One `[[option]]` entry of an [`OptionsSpec`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OptionSpec {
    pub name: String,
    pub short: Option<char>,
    #[serde(rename = "type", default)]
    pub kind: OptionKind,
    pub default: Option<toml::Value>,
    pub doc: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    /// Starts a new help section at this option.
    pub section: Option<String>,
}

impl OptionSpec {
    /// The textual default, if one is given.
    pub fn default_raw(&self) -> Result<Option<String>> {
        self.default
            .as_ref()
            .map(|value| {
                raw_value(value).ok_or_else(|| OptionsError::Toml {
                    path: PathBuf::from("<definition>"),
                    message: format!("the default of '{}' must be a single value", self.name),
                })
            })
            .transpose()
    }
}

impl OptionsSpec {
    pub fn from_file(path: &Path) -> Result<Self> {
        if path.extension().and_then(|s| s.to_str()) != Some("toml") {
            return Err(OptionsError::UnsupportedFormat(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|e| OptionsError::io(path, e))?;
        toml::from_str(&content).map_err(|e| OptionsError::Toml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Registers every option in a fresh container.
    pub fn build(&self) -> Result<OptionsCont> {
        let mut options = OptionsCont::new();
        if let Some(head) = &self.head {
            options.set_help_head(head);
        }
        if let Some(tail) = &self.tail {
            options.set_help_tail(tail);
        }
        if let Some(parent) = &self.parent {
            options.set_parent_configuration_name(parent);
        }
        for spec in &self.options {
            if let Some(section) = &spec.section {
                options.begin_section(section);
            }
            let option = match spec.default_raw()? {
                Some(raw) => TypedOption::with_default(spec.kind, &raw).map_err(|source| {
                    OptionsError::InvalidValue {
                        name: spec.name.clone(),
                        source,
                    }
                })?,
                None => TypedOption::new(spec.kind),
            };
            match spec.short {
                Some(abbr) => options.add_with_abbr(spec.name.as_str(), abbr, option)?,
                None => options.add(spec.name.as_str(), option)?,
            };
            for synonym in &spec.synonyms {
                options.add_synonym(&spec.name, synonym)?;
            }
            if let Some(doc) = &spec.doc {
                options.set_description(&spec.name, doc)?;
            }
        }
        Ok(options)
    }
}
