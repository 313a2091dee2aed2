// Licensed under the Eclipse Public License 2.0
// (see LICENSE or <https://www.eclipse.org/legal/epl-2.0/>)
//! > optkit registers typed command line options in one container, overlays
//! > them from XML or TOML configuration files and prints an aligned help
//! > screen. Every option resolves with the precedence "command line over
//! > configuration file over default".
//!
//! # How it works
//!
//! 1- Describe the options: list them in a TOML file next to your `Cargo.toml`,
//! giving each a name, an optional one-character abbreviation, a type, a
//! default and a description.
//!
//! ```toml
//! head = "Usage: greeter [option]+\n\nOptions:"
//! config = "config"
//!
//! [[option]]
//! name = "name"
//! short = "n"
//! default = "World"
//! doc = "Defines how to call the user."
//!
//! [[option]]
//! name = "config"
//! short = "c"
//! type = "filename"
//! doc = "Reads the named configuration file."
//! ```
//!
//! 2- Apply the macro: `#[options]` on an empty struct reads the file at
//! compile time and generates one typed field per option.
//!
//! ```text
//! use optkit::options;
//!
//! #[options]
//! struct Greeter;
//! ```
//!
//! 3- Parse and use: `Greeter::parse()` reads the command line, loads the
//! configuration file named by `--config` and reads the command line again so
//! it wins over the file.
//!
//! ```text
//! fn main() -> optkit::Result<()> {
//!     let (greeter, _options) = Greeter::parse()?;
//!     println!("Hello {}!", greeter.name);
//!     Ok(())
//! }
//! ```
//!
//! Without the macro, options are registered by hand:
//!
//! ```
//! use optkit::{OptionsCont, ParseSettings, TypedOption, parse_and_load};
//!
//! let mut options = OptionsCont::new();
//! options.add_with_abbr("name", 'n', TypedOption::string_default("World"))?;
//! options.add_with_abbr("repeat", 'r', TypedOption::int())?;
//! parse_and_load(&mut options, &["-r", "2"], "", ParseSettings::default())?;
//! assert_eq!(options.get_string("name")?, "World");
//! assert_eq!(options.get_int("repeat")?, 2);
//! # Ok::<(), optkit::OptionsError>(())
//! ```
//!
//! The help screen produced for such a container lines the descriptions up
//! in one column:
//!
//! ```text
//! Usage: greeter [option]+
//!
//! Options:
//!   -n, --name    Defines how to call the user.
//!   -g, --greet   Defines how to greet.
//!   -r, --repeat  Sets an optional number of repetitions.
//!   -?, --help    Prints this help screen.
//! ```
pub use optkit_core::*;
pub use optkit_derive::options;
