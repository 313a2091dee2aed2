//! The option registry.

use indexmap::IndexMap;

use crate::{
    error::{OptionsError, Result, SynonymConflictKind},
    option::{OptionKind, OptionValue, TypedOption},
};

/// Stable handle of an option inside an [`OptionsCont`].
///
/// A handle only means something to the container that issued it (or a clone
/// of it); lookups with a handle from another container return `None` or an
/// empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionId(usize);

impl OptionId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Stores options under their names, synonyms and sections.
///
/// Options live in an arena in registration order; every name maps to the
/// handle of the option it belongs to, so an assignment through one name is
/// visible through all others.
#[derive(Debug, Clone, Default)]
pub struct OptionsCont {
    options: Vec<TypedOption>,
    sections: Vec<Option<String>>,
    names: IndexMap<String, OptionId>,
    current_section: Option<String>,
    help_head: Option<String>,
    help_tail: Option<String>,
    parent_config: Option<String>,
}

impl OptionsCont {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `option` under `name` in the current section.
    pub fn add(&mut self, name: impl Into<String>, option: TypedOption) -> Result<OptionId> {
        let name = name.into();
        self.ensure_free(&name)?;
        Ok(self.insert(name, option))
    }

    /// Registers `option` under a long name and a one-character abbreviation.
    pub fn add_with_abbr(
        &mut self,
        name: impl Into<String>,
        abbr: char,
        option: TypedOption,
    ) -> Result<OptionId> {
        let name = name.into();
        let abbr = abbr.to_string();
        self.ensure_free(&name)?;
        self.ensure_free(&abbr)?;
        if name == abbr {
            return Err(OptionsError::NameConflict(abbr));
        }
        let id = self.insert(name, option);
        self.names.insert(abbr, id);
        Ok(id)
    }

    /// Makes whichever of the two names is unknown an alias of the other one.
    pub fn add_synonym(&mut self, first: &str, second: &str) -> Result<()> {
        let conflict = |conflict| OptionsError::SynonymConflict {
            conflict,
            first: first.to_string(),
            second: second.to_string(),
        };
        match (self.names.get(first).copied(), self.names.get(second).copied()) {
            (Some(_), Some(_)) => Err(conflict(SynonymConflictKind::BothKnown)),
            (None, None) => Err(conflict(SynonymConflictKind::NeitherKnown)),
            (Some(id), None) => {
                self.names.insert(second.to_string(), id);
                Ok(())
            }
            (None, Some(id)) => {
                self.names.insert(first.to_string(), id);
                Ok(())
            }
        }
    }

    pub fn set_description(&mut self, name: &str, description: impl Into<String>) -> Result<()> {
        let id = self.id(name)?;
        self.options[id.0].set_description(description);
        Ok(())
    }

    /// Options added from now on belong to `section`.
    pub fn begin_section(&mut self, section: impl Into<String>) {
        self.current_section = Some(section.into());
    }

    pub fn set_help_head_and_tail(&mut self, head: impl Into<String>, tail: impl Into<String>) {
        self.help_head = Some(head.into());
        self.help_tail = Some(tail.into());
    }

    pub fn set_help_head(&mut self, head: impl Into<String>) {
        self.help_head = Some(head.into());
    }

    pub fn set_help_tail(&mut self, tail: impl Into<String>) {
        self.help_tail = Some(tail.into());
    }

    /// Names the option a configuration file uses to point at its parent.
    pub fn set_parent_configuration_name(&mut self, name: impl Into<String>) {
        self.parent_config = Some(name.into());
    }

    pub fn help_head(&self) -> Option<&str> {
        self.help_head.as_deref()
    }

    pub fn help_tail(&self) -> Option<&str> {
        self.help_tail.as_deref()
    }

    pub fn parent_configuration_name(&self) -> Option<&str> {
        self.parent_config.as_deref().filter(|name| !name.is_empty())
    }

    pub fn get_int(&self, name: &str) -> Result<i64> {
        match self.typed_value(name, OptionKind::Int)? {
            OptionValue::Int(v) => Ok(*v),
            other => unreachable!("int option holds {other:?}"),
        }
    }

    pub fn get_double(&self, name: &str) -> Result<f64> {
        match self.typed_value(name, OptionKind::Double)? {
            OptionValue::Double(v) => Ok(*v),
            other => unreachable!("double option holds {other:?}"),
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool> {
        match self.typed_value(name, OptionKind::Bool)? {
            OptionValue::Bool(v) => Ok(*v),
            other => unreachable!("bool option holds {other:?}"),
        }
    }

    /// Returns the value of a string or file name option.
    pub fn get_string(&self, name: &str) -> Result<&str> {
        match self.typed_value(name, OptionKind::String)? {
            OptionValue::String(v) => Ok(v),
            other => unreachable!("string option holds {other:?}"),
        }
    }

    pub fn is_set(&self, name: &str) -> Result<bool> {
        Ok(self.option(name)?.is_set())
    }

    pub fn is_default(&self, name: &str) -> Result<bool> {
        Ok(self.option(name)?.is_default())
    }

    pub fn was_set_in_pass(&self, name: &str) -> Result<bool> {
        Ok(self.option(name)?.was_set_in_pass())
    }

    /// Unknown names are reported as non-bool.
    pub fn is_bool(&self, name: &str) -> bool {
        self.find(name).is_some_and(TypedOption::is_bool)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn kind(&self, name: &str) -> Result<OptionKind> {
        Ok(self.option(name)?.kind())
    }

    pub fn description(&self, name: &str) -> Result<Option<&str>> {
        Ok(self.option(name)?.description())
    }

    pub fn section(&self, name: &str) -> Result<Option<&str>> {
        let id = self.id(name)?;
        Ok(self.section_of(id))
    }

    pub fn section_of(&self, id: OptionId) -> Option<&str> {
        self.sections.get(id.0).and_then(Option::as_deref)
    }

    pub fn value_as_string(&self, name: &str) -> Result<Option<String>> {
        Ok(self.option(name)?.value_as_string())
    }

    /// All names of the named option, shortest first.
    pub fn synonyms(&self, name: &str) -> Result<Vec<&str>> {
        let id = self.id(name)?;
        Ok(self.synonyms_of(id))
    }

    /// All names of the option, shortest first; equal lengths keep
    /// registration order.
    pub fn synonyms_of(&self, id: OptionId) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .names
            .iter()
            .filter(|(_, other)| **other == id)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_by_key(|name| name.chars().count());
        names
    }

    /// The first name the option was registered under.
    pub fn primary_name(&self, id: OptionId) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, other)| **other == id)
            .map(|(name, _)| name.as_str())
    }

    /// Parses `raw` into the named option.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<()> {
        let id = self.id(name)?;
        self.options[id.0]
            .set(raw)
            .map_err(|source| OptionsError::InvalidValue {
                name: name.to_string(),
                source,
            })
    }

    pub fn set_bool(&mut self, name: &str, value: bool) -> Result<()> {
        let kind = self.kind(name)?;
        if kind != OptionKind::Bool {
            return Err(OptionsError::TypeMismatch {
                name: name.to_string(),
                expected: OptionKind::Bool,
                actual: kind,
            });
        }
        self.set(name, if value { "true" } else { "false" })
    }

    /// Clears the "set in this pass" marker of every option.
    pub fn remark_unset_all(&mut self) {
        self.options.iter_mut().for_each(TypedOption::remark_unset);
    }

    pub fn remark_unset(&mut self, name: &str) -> Result<()> {
        let id = self.id(name)?;
        self.options[id.0].remark_unset();
        Ok(())
    }

    pub fn id(&self, name: &str) -> Result<OptionId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| OptionsError::UnknownOption(name.to_string()))
    }

    pub fn get(&self, id: OptionId) -> Option<&TypedOption> {
        self.options.get(id.0)
    }

    pub fn option(&self, name: &str) -> Result<&TypedOption> {
        self.find(name)
            .ok_or_else(|| OptionsError::UnknownOption(name.to_string()))
    }

    /// Distinct options in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (OptionId, &TypedOption)> {
        self.options
            .iter()
            .enumerate()
            .map(|(index, option)| (OptionId(index), option))
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Copies of the options assigned in the current pass.
    pub(crate) fn assigned_in_pass(&self) -> Vec<(OptionId, TypedOption)> {
        self.iter()
            .filter(|(_, option)| option.was_set_in_pass())
            .map(|(id, option)| (id, option.clone()))
            .collect()
    }

    pub(crate) fn restore(&mut self, snapshot: Vec<(OptionId, TypedOption)>) {
        for (id, option) in snapshot {
            self.options[id.0] = option;
        }
    }

    fn find(&self, name: &str) -> Option<&TypedOption> {
        self.names.get(name).map(|id| &self.options[id.0])
    }

    fn ensure_free(&self, name: &str) -> Result<()> {
        if self.names.contains_key(name) {
            return Err(OptionsError::NameConflict(name.to_string()));
        }
        Ok(())
    }

    fn insert(&mut self, name: String, option: TypedOption) -> OptionId {
        let id = OptionId(self.options.len());
        self.options.push(option);
        self.sections.push(self.current_section.clone());
        self.names.insert(name, id);
        id
    }

    fn typed_value(&self, name: &str, expected: OptionKind) -> Result<&OptionValue> {
        let option = self.option(name)?;
        let actual = option.kind();
        let matches = actual == expected || (expected.is_textual() && actual.is_textual());
        if !matches {
            return Err(OptionsError::TypeMismatch {
                name: name.to_string(),
                expected,
                actual,
            });
        }
        option.require(name)
    }
}
