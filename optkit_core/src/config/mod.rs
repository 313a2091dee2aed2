//! Loading and writing configuration files.
//!
//! A [`ConfigFormat`] knows how to apply a single file to an
//! [`OptionsCont`] and how to serialize one. [`ConfigFormat::load_configuration`]
//! adds hierarchical loading on top: when the container names a parent
//! configuration option and a file sets it, the referenced file is loaded
//! next. Values a child file already set are kept when a parent names them
//! again.

mod handler;
mod toml_format;
mod xml_format;

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};

pub use handler::{ConfigEvents, OptionsHandler, ROOT_ELEMENT};
pub use toml_format::TomlConfig;
pub(crate) use toml_format::raw_value;
pub use xml_format::{XmlConfig, read_xml_events};

use crate::{
    container::OptionsCont,
    error::{OptionsError, Result},
};

/// A configuration file format.
pub trait ConfigFormat {
    /// Applies the settings of one file, without following parents.
    fn load_file(&self, into: &mut OptionsCont, path: &Path) -> Result<()>;

    /// Writes every option that is set to a non-default value.
    fn write_configuration(&self, path: &Path, options: &OptionsCont) -> Result<()>;

    /// Writes an empty entry for every option.
    fn write_template(&self, path: &Path, options: &OptionsCont) -> Result<()>;

    /// Loads `path` and then each parent configuration it names.
    fn load_configuration(&self, into: &mut OptionsCont, path: &Path) -> Result<()> {
        let parent = into.parent_configuration_name().map(str::to_string);
        let mut visited = HashSet::new();
        let mut next = Some(path.to_path_buf());
        while let Some(path) = next.take() {
            if !visited.insert(path.clone()) {
                return Err(OptionsError::ConfigCycle(path));
            }
            if let Some(parent) = &parent {
                into.remark_unset(parent)?;
            }
            let resolved = into.assigned_in_pass();
            info!(path:?; "Loading configuration");
            self.load_file(into, &path)?;
            into.restore(resolved);
            if let Some(parent) = &parent
                && into.was_set_in_pass(parent)?
            {
                let parent_path = PathBuf::from(into.get_string(parent)?);
                debug!(child:? = path, parent:? = parent_path; "Following parent configuration");
                next = Some(parent_path);
            }
        }
        Ok(())
    }
}

/// Picks the format by file extension: `.toml` files are TOML, everything
/// else is read as XML.
pub fn format_for_path(path: &Path, accept_unknown: bool) -> Box<dyn ConfigFormat> {
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        Box::new(TomlConfig::new(accept_unknown))
    } else {
        Box::new(XmlConfig::new(accept_unknown))
    }
}

pub(crate) fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| OptionsError::io(path, e))
}

pub(crate) fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| OptionsError::io(path, e))
}
