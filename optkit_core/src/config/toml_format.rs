use std::{fmt::Write as _, path::Path};

use super::{ConfigEvents, ConfigFormat, OptionsHandler, read_file, write_file};
use crate::{
    container::OptionsCont,
    error::{OptionsError, Result},
    option::OptionValue,
};

/// TOML configurations: a flat table of `name = value` pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlConfig {
    accept_unknown: bool,
}

impl TomlConfig {
    pub fn new(accept_unknown: bool) -> Self {
        Self { accept_unknown }
    }
}

impl ConfigFormat for TomlConfig {
    fn load_file(&self, into: &mut OptionsCont, path: &Path) -> Result<()> {
        let malformed = |message: String| OptionsError::Toml {
            path: path.to_path_buf(),
            message,
        };
        let content = read_file(path)?;
        let table: ::toml::Table =
            ::toml::from_str(&content).map_err(|e| malformed(e.to_string()))?;
        let mut handler = OptionsHandler::new(into, self.accept_unknown);
        for (name, value) in &table {
            let raw = raw_value(value)
                .ok_or_else(|| malformed(format!("'{name}' must hold a single value")))?;
            handler.on_element_start(name)?;
            handler.on_text(&raw)?;
            handler.on_element_end(name)?;
        }
        Ok(())
    }

    fn write_configuration(&self, path: &Path, options: &OptionsCont) -> Result<()> {
        let mut table = ::toml::Table::new();
        for (id, option) in options.iter() {
            if option.is_default() {
                continue;
            }
            if let (Some(name), Some(value)) = (options.primary_name(id), option.value()) {
                table.insert(name.to_string(), toml_value(value));
            }
        }
        let content = ::toml::to_string(&table).map_err(|e| OptionsError::Toml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        write_file(path, &content)
    }

    fn write_template(&self, path: &Path, options: &OptionsCont) -> Result<()> {
        let mut out = String::new();
        for (id, option) in options.iter() {
            let Some(name) = options.primary_name(id) else {
                continue;
            };
            if let Some(description) = option.description() {
                let _ = writeln!(out, "# {description}");
            }
            match option.value() {
                Some(value) => {
                    let _ = writeln!(out, "# {name} = {}", toml_value(value));
                }
                None => {
                    let _ = writeln!(out, "# {name} = ");
                }
            }
        }
        write_file(path, &out)
    }
}

/// The textual form of a scalar TOML value; `None` for arrays and tables.
pub(crate) fn raw_value(value: &::toml::Value) -> Option<String> {
    match value {
        ::toml::Value::String(s) => Some(s.clone()),
        ::toml::Value::Integer(i) => Some(i.to_string()),
        ::toml::Value::Float(f) => Some(f.to_string()),
        ::toml::Value::Boolean(b) => Some(b.to_string()),
        ::toml::Value::Datetime(d) => Some(d.to_string()),
        ::toml::Value::Array(_) | ::toml::Value::Table(_) => None,
    }
}

fn toml_value(value: &OptionValue) -> ::toml::Value {
    match value {
        OptionValue::Bool(b) => ::toml::Value::Boolean(*b),
        OptionValue::Int(i) => ::toml::Value::Integer(*i),
        OptionValue::Double(f) => ::toml::Value::Float(*f),
        OptionValue::String(s) => ::toml::Value::String(s.clone()),
    }
}
