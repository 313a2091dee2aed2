//! Runs a set of options described in a definitions file against a command
//! line and prints what came out of it.

use std::{
    error::Error,
    io::{self, Write},
    path::Path,
};

use log::debug;
use optkit::{
    Definitions, HelpFormatter, ParseSettings, SetOptionsStyle, load_definitions,
    parse_and_load, print_set_options,
};

/// Name of the definitions file read from the working directory.
pub const DEFINITIONS_FILE: &str = "options.txt";

const SEPARATOR: &str =
    "-------------------------------------------------------------------------------";

/// Loads the definitions at `path` (an empty set if the file is missing),
/// resolves `args` and prints help and set options to `out`.
pub fn run<S: AsRef<str>>(
    path: &Path,
    args: &[S],
    out: &mut impl Write,
) -> Result<(), Box<dyn Error>> {
    let Definitions {
        mut options,
        config_option,
    } = if path.exists() {
        load_definitions(path)?
    } else {
        debug!(path:?; "No definitions file, using an empty option set");
        Definitions::default()
    };
    parse_and_load(
        &mut options,
        args,
        config_option.as_deref().unwrap_or_default(),
        ParseSettings::default(),
    )?;
    HelpFormatter::default().write(&options, out)?;
    writeln!(out, "{SEPARATOR}")?;
    print_set_options(out, &options, &SetOptionsStyle::default())?;
    writeln!(out, "{SEPARATOR}")?;
    Ok(())
}

/// Like [`run`], reporting a failure to `err`. Returns whether it succeeded.
pub fn run_reporting<S: AsRef<str>>(
    path: &Path,
    args: &[S],
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<bool> {
    match run(path, args, out) {
        Ok(()) => Ok(true),
        Err(e) => {
            writeln!(err, "{e}")?;
            writeln!(err, "Quitting (on error).")?;
            Ok(false)
        }
    }
}
