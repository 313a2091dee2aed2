use log::{trace, warn};

use crate::{
    container::OptionsCont,
    error::{OptionsError, Result},
};

/// Name of the root element of XML configurations.
pub const ROOT_ELEMENT: &str = "configuration";

/// Receives the content of a configuration document in document order.
pub trait ConfigEvents {
    fn on_element_start(&mut self, name: &str) -> Result<()>;

    fn on_text(&mut self, text: &str) -> Result<()>;

    fn on_element_end(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }
}

/// Sets options from `(element, text)` events.
///
/// Text is trimmed; whitespace-only text is ignored. Text belongs to the most
/// recently started element; text of the root element is skipped.
pub struct OptionsHandler<'a> {
    options: &'a mut OptionsCont,
    accept_unknown: bool,
    current: Option<String>,
}

impl<'a> OptionsHandler<'a> {
    pub fn new(options: &'a mut OptionsCont, accept_unknown: bool) -> Self {
        Self {
            options,
            accept_unknown,
            current: None,
        }
    }
}

impl ConfigEvents for OptionsHandler<'_> {
    fn on_element_start(&mut self, name: &str) -> Result<()> {
        self.current = Some(name.to_string());
        Ok(())
    }

    fn on_text(&mut self, text: &str) -> Result<()> {
        let value = text.trim();
        if value.is_empty() {
            return Ok(());
        }
        let Some(name) = self.current.as_deref() else {
            return Err(OptionsError::UnexpectedArgument(value.to_string()));
        };
        if name == ROOT_ELEMENT {
            trace!(value; "Skipping text of the root element");
            return Ok(());
        }
        if !self.options.contains(name) {
            if self.accept_unknown {
                warn!(name; "Skipping unknown configuration entry");
                return Ok(());
            }
            return Err(OptionsError::UnknownOption(name.to_string()));
        }
        trace!(name, value; "Setting option from configuration");
        self.options.set(name, value)
    }

    fn on_element_end(&mut self, _name: &str) -> Result<()> {
        self.current = None;
        Ok(())
    }
}
