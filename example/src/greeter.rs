use std::{error::Error, io::Write};

use log::info;
use optkit::options;

/// Options of the greeter, declared in `options.toml`.
#[options]
pub struct Greeter;

/// Prints `<greet> <name>!` as often as requested, or the help screen.
pub fn run<I, T>(args: I, out: &mut impl Write) -> Result<(), Box<dyn Error>>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let (greeter, _) = Greeter::parse_from(args)?;
    if greeter.help {
        write!(out, "{}", Greeter::help()?)?;
        return Ok(());
    }
    let repeat = greeter.repeat.unwrap_or(1);
    info!(repeat = repeat, name = greeter.name.as_str(); "Greeting");
    for _ in 0..repeat {
        writeln!(out, "{} {}!", greeter.greet, greeter.name)?;
    }
    Ok(())
}
