//! Orchestrates command line parsing and configuration loading.
//!
//! [`parse_and_load`] resolves every option with the precedence
//! "command line over configuration file over default": the arguments are
//! parsed, the configuration file they name is applied, and the arguments are
//! parsed a second time so they win over the file.

use std::{
    cmp::Reverse,
    fmt::Write as _,
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::{debug, info};

use crate::{
    config::{ConfigFormat, format_for_path},
    container::OptionsCont,
    error::Result,
    parser::{OptionsParser, ParseSettings},
};

/// Parses `args`, loads the configuration named by `config_option_name` (if
/// that option is set) and parses `args` again.
///
/// The format of the configuration is picked from its file extension. An
/// empty `config_option_name` disables loading. On error `into` is left
/// untouched.
pub fn parse_and_load<S: AsRef<str>>(
    into: &mut OptionsCont,
    args: &[S],
    config_option_name: &str,
    settings: ParseSettings,
) -> Result<()> {
    two_pass(into, args, config_option_name, settings, |options, path| {
        format_for_path(path, settings.accept_unknown).load_configuration(options, path)
    })
}

/// Like [`parse_and_load`], reading the configuration with `format`.
pub fn parse_and_load_with<S: AsRef<str>>(
    into: &mut OptionsCont,
    args: &[S],
    format: &dyn ConfigFormat,
    config_option_name: &str,
    settings: ParseSettings,
) -> Result<()> {
    two_pass(into, args, config_option_name, settings, |options, path| {
        format.load_configuration(options, path)
    })
}

fn two_pass<S, F>(
    into: &mut OptionsCont,
    args: &[S],
    config_option_name: &str,
    settings: ParseSettings,
    load: F,
) -> Result<()>
where
    S: AsRef<str>,
    F: FnOnce(&mut OptionsCont, &Path) -> Result<()>,
{
    let parser = OptionsParser::new(settings);
    let mut options = into.clone();
    parser.parse(&mut options, args)?;
    let config = config_path(&options, config_option_name)?;
    options.remark_unset_all();
    if let Some(path) = config {
        info!(path:?; "Reading configuration named on the command line");
        load(&mut options, &path)?;
        options.remark_unset_all();
        debug!("Re-applying command line arguments");
        parser.parse(&mut options, args)?;
    }
    *into = options;
    Ok(())
}

fn config_path(options: &OptionsCont, config_option_name: &str) -> Result<Option<PathBuf>> {
    if config_option_name.is_empty() || !options.is_set(config_option_name)? {
        return Ok(None);
    }
    Ok(Some(PathBuf::from(options.get_string(config_option_name)?)))
}

/// Controls [`format_set_options`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetOptionsStyle {
    /// List the other names in parentheses after the first one.
    pub include_synonyms: bool,
    /// Order names shortest first; longest first otherwise.
    pub shortest_first: bool,
    /// Leave out options that still hold their default.
    pub skip_default: bool,
}

impl Default for SetOptionsStyle {
    fn default() -> Self {
        Self {
            include_synonyms: true,
            shortest_first: true,
            skip_default: false,
        }
    }
}

/// Renders one `name (synonyms): value` line per set option.
pub fn format_set_options(options: &OptionsCont, style: &SetOptionsStyle) -> String {
    let mut out = String::new();
    for (id, option) in options.iter() {
        let Some(value) = option.value_as_string() else {
            continue;
        };
        if style.skip_default && option.is_default() {
            continue;
        }
        let mut names = options.synonyms_of(id);
        if !style.shortest_first {
            names.sort_by_key(|name| Reverse(name.chars().count()));
        }
        let Some((first, others)) = names.split_first() else {
            continue;
        };
        out.push_str(first);
        if style.include_synonyms && !others.is_empty() {
            let _ = write!(out, " ({})", others.join(", "));
        }
        let _ = write!(out, ": {value}");
        if option.is_default() {
            out.push_str(" (default)");
        }
        out.push('\n');
    }
    out
}

pub fn print_set_options(
    out: &mut impl Write,
    options: &OptionsCont,
    style: &SetOptionsStyle,
) -> io::Result<()> {
    out.write_all(format_set_options(options, style).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::XmlConfig, error::OptionsError, option::TypedOption};
    use std::fs;
    use tempfile::TempDir;

    fn greeter() -> OptionsCont {
        let mut options = OptionsCont::new();
        options
            .add_with_abbr("name", 'n', TypedOption::string_default("World"))
            .unwrap();
        options
            .add_with_abbr("greet", 'g', TypedOption::string_default("Hello"))
            .unwrap();
        options
            .add_with_abbr("repeat", 'r', TypedOption::int())
            .unwrap();
        options
            .add_with_abbr("config", 'c', TypedOption::file_name())
            .unwrap();
        options
    }

    fn config_file(dir: &TempDir, name: &str, content: &str) -> String {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_args_only() {
        let mut options = greeter();
        parse_and_load(
            &mut options,
            &["--name", "Ada"],
            "config",
            ParseSettings::default(),
        )
        .unwrap();
        assert_eq!(options.get_string("name").unwrap(), "Ada");
        assert_eq!(options.get_string("greet").unwrap(), "Hello");
        assert!(!options.is_set("repeat").unwrap());
    }

    #[test]
    fn test_file_overrides_default() {
        let dir = TempDir::new().unwrap();
        let path = config_file(
            &dir,
            "c.xml",
            "<configuration><name>Grace</name></configuration>",
        );
        let mut options = greeter();
        parse_and_load(
            &mut options,
            &["--config", path.as_str()],
            "config",
            ParseSettings::default(),
        )
        .unwrap();
        assert_eq!(options.get_string("name").unwrap(), "Grace");
        assert!(!options.is_default("name").unwrap());
        assert_eq!(options.get_string("greet").unwrap(), "Hello");
    }

    #[test]
    fn test_command_line_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = config_file(
            &dir,
            "c.xml",
            "<configuration><name>Grace</name><repeat>2</repeat></configuration>",
        );
        let mut options = greeter();
        parse_and_load(
            &mut options,
            &["--config", path.as_str(), "--name", "Ada"],
            "config",
            ParseSettings::default(),
        )
        .unwrap();
        assert_eq!(options.get_string("name").unwrap(), "Ada");
        assert_eq!(options.get_int("repeat").unwrap(), 2);
    }

    #[test]
    fn test_default_config_file_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = config_file(&dir, "c.toml", "greet = \"Moin\"\n");
        let mut options = OptionsCont::new();
        options
            .add("greet", TypedOption::string_default("Hello"))
            .unwrap();
        options
            .add("config", TypedOption::file_name_default(path))
            .unwrap();
        parse_and_load(&mut options, &[] as &[&str], "config", ParseSettings::default())
            .unwrap();
        assert_eq!(options.get_string("greet").unwrap(), "Moin");
    }

    #[test]
    fn test_empty_config_option_name_skips_loading() {
        let mut options = greeter();
        parse_and_load(
            &mut options,
            &["--config", "does-not-exist.xml"],
            "",
            ParseSettings::default(),
        )
        .unwrap();
        assert_eq!(options.get_string("config").unwrap(), "does-not-exist.xml");
    }

    #[test]
    fn test_failure_leaves_container_untouched() {
        let dir = TempDir::new().unwrap();
        let path = config_file(
            &dir,
            "c.xml",
            "<configuration><repeat>often</repeat></configuration>",
        );
        let mut options = greeter();
        let err = parse_and_load(
            &mut options,
            &["--name", "Ada", "--config", path.as_str()],
            "config",
            ParseSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, OptionsError::InvalidValue { name, .. } if name == "repeat"));
        assert_eq!(options.get_string("name").unwrap(), "World");
        assert!(!options.is_set("config").unwrap());
    }

    #[test]
    fn test_missing_file_is_reported() {
        let mut options = greeter();
        let err = parse_and_load(
            &mut options,
            &["-c", "/nonexistent/c.xml"],
            "config",
            ParseSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, OptionsError::Io { .. }));
    }

    #[test]
    fn test_explicit_format() {
        let dir = TempDir::new().unwrap();
        let path = config_file(
            &dir,
            "c.conf",
            "<configuration><colour>red</colour><greet>Hi</greet></configuration>",
        );
        let mut options = greeter();
        parse_and_load_with(
            &mut options,
            &["-c", path.as_str()],
            &XmlConfig::new(true),
            "config",
            ParseSettings::default(),
        )
        .unwrap();
        assert_eq!(options.get_string("greet").unwrap(), "Hi");
    }

    #[test]
    fn test_format_set_options() {
        let mut options = greeter();
        options.set("repeat", "3").unwrap();
        assert_eq!(
            format_set_options(&options, &SetOptionsStyle::default()),
            "n (name): World (default)\ng (greet): Hello (default)\nr (repeat): 3\n"
        );
        let style = SetOptionsStyle {
            include_synonyms: false,
            shortest_first: true,
            skip_default: true,
        };
        assert_eq!(format_set_options(&options, &style), "r: 3\n");
    }

    #[test]
    fn test_print_set_options() {
        let mut options = greeter();
        options.set("config", "c.xml").unwrap();
        let mut out = Vec::new();
        let style = SetOptionsStyle {
            skip_default: true,
            ..SetOptionsStyle::default()
        };
        print_set_options(&mut out, &options, &style).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "c (config): c.xml\n");
    }

    #[test]
    fn test_longest_first_keeps_registration_order_of_ties() {
        let mut options = OptionsCont::new();
        options
            .add_with_abbr("name", 'n', TypedOption::string_default("World"))
            .unwrap();
        options.add_synonym("name", "user").unwrap();
        assert_eq!(
            format_set_options(&options, &SetOptionsStyle::default()),
            "n (name, user): World (default)\n"
        );
        let style = SetOptionsStyle {
            shortest_first: false,
            ..SetOptionsStyle::default()
        };
        assert_eq!(
            format_set_options(&options, &style),
            "name (user, n): World (default)\n"
        );
    }
}
