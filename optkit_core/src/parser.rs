//! Applies command line arguments to an [`OptionsCont`].
//!
//! Recognized forms are `--name value`, `--name=value`, `-x value` and
//! clusters of one-character boolean flags such as `-vq`. A boolean option
//! takes the following token only if it is a boolean literal; any other
//! option always consumes the next token as its value.

use log::{debug, warn};

use crate::{
    container::OptionsCont,
    error::{OptionsError, Result},
    option::parse_bool,
};

/// How lenient the parser is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseSettings {
    /// Skip unknown option names and stray arguments instead of failing.
    pub accept_unknown: bool,
}

/// Walks an argument list and sets the named options.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionsParser {
    settings: ParseSettings,
}

impl OptionsParser {
    pub fn new(settings: ParseSettings) -> Self {
        Self { settings }
    }

    /// Parses `args` into `into`, stopping at the first error.
    pub fn parse<S: AsRef<str>>(&self, into: &mut OptionsCont, args: &[S]) -> Result<()> {
        debug!(count = args.len(); "Parsing arguments");
        let mut tokens = args.iter().map(AsRef::<str>::as_ref).peekable();
        while let Some(token) = tokens.next() {
            if token == "--" {
                self.stray(token)?;
            } else if let Some(body) = token.strip_prefix("--") {
                match body.split_once('=') {
                    Some((name, value)) => self.assign(into, name, value)?,
                    None => self.named(into, body, &mut tokens)?,
                }
            } else if let Some(body) = token.strip_prefix('-').filter(|body| !body.is_empty()) {
                self.abbreviations(into, body, &mut tokens)?;
            } else {
                self.stray(token)?;
            }
        }
        Ok(())
    }

    fn abbreviations<'a, I>(
        &self,
        into: &mut OptionsCont,
        body: &str,
        tokens: &mut std::iter::Peekable<I>,
    ) -> Result<()>
    where
        I: Iterator<Item = &'a str>,
    {
        if let Some((name, value)) = body.split_once('=') {
            return self.assign(into, name, value);
        }
        let mut chars = body.chars().peekable();
        while let Some(abbr) = chars.next() {
            let name = abbr.to_string();
            if chars.peek().is_none() {
                return self.named(into, &name, tokens);
            }
            if !into.contains(&name) && self.settings.accept_unknown {
                warn!(name; "Skipping unknown option");
                continue;
            }
            if !into.is_bool(&name) {
                // only the last member of a cluster may take a value
                into.id(&name)?;
                return Err(OptionsError::MissingValue(name));
            }
            into.set_bool(&name, true)?;
        }
        Ok(())
    }

    fn named<'a, I>(
        &self,
        into: &mut OptionsCont,
        name: &str,
        tokens: &mut std::iter::Peekable<I>,
    ) -> Result<()>
    where
        I: Iterator<Item = &'a str>,
    {
        if !into.contains(name) {
            if self.settings.accept_unknown {
                warn!(name; "Skipping unknown option");
                return Ok(());
            }
            return Err(OptionsError::UnknownOption(name.to_string()));
        }
        if into.is_bool(name) {
            let value = tokens.next_if(|next| parse_bool(next).is_some());
            return into.set(name, value.unwrap_or("true"));
        }
        match tokens.next() {
            Some(value) => into.set(name, value),
            None => Err(OptionsError::MissingValue(name.to_string())),
        }
    }

    fn assign(&self, into: &mut OptionsCont, name: &str, value: &str) -> Result<()> {
        if !into.contains(name) && self.settings.accept_unknown {
            warn!(name; "Skipping unknown option");
            return Ok(());
        }
        into.set(name, value)
    }

    fn stray(&self, token: &str) -> Result<()> {
        if self.settings.accept_unknown {
            warn!(token; "Skipping unexpected argument");
            return Ok(());
        }
        Err(OptionsError::UnexpectedArgument(token.to_string()))
    }
}
