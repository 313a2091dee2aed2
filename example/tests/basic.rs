use std::{fs, path::PathBuf};

use example::{
    greeter::{self, Greeter},
    tester::{self, DEFINITIONS_FILE},
};
use optkit::{OptionsError, options};
use serial_test::serial;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_defaults() {
    let (config, options) = Greeter::parse_from(Vec::<String>::new()).unwrap();
    assert_eq!(config.name, "World".to_string());
    assert_eq!(config.greet, "Hello".to_string());
    assert_eq!(config.repeat, None);
    assert_eq!(config.config, None);
    assert!(!config.help);
    assert!(options.is_default("name").unwrap());
}

#[test]
fn test_command_line() {
    let (config, _) = Greeter::parse_from(["-n", "Ada", "--repeat=3", "-?"]).unwrap();
    assert_eq!(config.name, "Ada");
    assert_eq!(config.repeat, Some(3));
    assert!(config.help);
}

#[test]
fn test_command_line_wins_over_xml_file() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "greeter.xml",
        "<configuration>\n   <name>Grace</name>\n   <repeat>2</repeat>\n</configuration>\n",
    );
    let (config, _) = Greeter::parse_from(["-c", path.as_str(), "-n", "Ada"]).unwrap();
    assert_eq!(config.name, "Ada");
    assert_eq!(config.repeat, Some(2));
    assert_eq!(config.greet, "Hello");
    assert_eq!(config.config, Some(PathBuf::from(&path)));
}

#[test]
fn test_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "greeter.toml", "greet = \"Moin\"\nhelp = true\n");
    let (config, options) = Greeter::parse_from(["--config", path.as_str()]).unwrap();
    assert_eq!(config.greet, "Moin");
    assert!(config.help);
    assert!(!options.is_default("greet").unwrap());
}

#[test]
fn test_errors() {
    assert!(matches!(
        Greeter::parse_from(["--colour", "red"]),
        Err(OptionsError::UnknownOption(name)) if name == "colour"
    ));
    assert!(matches!(
        Greeter::parse_from(["--repeat"]),
        Err(OptionsError::MissingValue(_))
    ));
    assert!(matches!(
        Greeter::parse_from(["-r", "often"]),
        Err(OptionsError::InvalidValue { .. })
    ));
    assert!(matches!(
        Greeter::parse_from(["-c", "/nonexistent/greeter.xml"]),
        Err(OptionsError::Io { .. })
    ));
}

#[test]
fn test_help() {
    let expected = "\
Usage: greeter [option]+

Options:
  -n, --name    Defines how to call the user.
  -g, --greet   Defines how to greet.
  -r, --repeat  Sets an optional number of repetitions.
  -c, --config  Reads options from the named XML or TOML configuration file.
  -?, --help    Prints this help screen.

";
    assert_eq!(Greeter::help().unwrap(), expected);
}

#[test]
fn test_greeter_run() {
    let mut out = Vec::new();
    greeter::run(Vec::<String>::new(), &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "Hello World!\n");

    let mut out = Vec::new();
    greeter::run(["-g", "Hi", "-n", "Ada", "-r", "2"], &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "Hi Ada!\nHi Ada!\n");

    let mut out = Vec::new();
    greeter::run(["--help"], &mut out).unwrap();
    assert!(String::from_utf8(out).unwrap().starts_with("Usage: greeter"));
}

#[test]
fn test_layered_types() {
    #[options("layered.toml")]
    struct Layered;

    let (config, _) = Layered::parse_from(["--level", "4", "-v"]).unwrap();
    assert_eq!(config.max_level, 4);
    assert_eq!(config.scale, 1.5);
    assert!(config.verbose);
    assert_eq!(config.label, None);
    assert_eq!(config.base, None);

    let (config, _) = Layered::parse_from(Vec::<String>::new()).unwrap();
    assert_eq!(config.max_level, 0);
    assert!(!config.verbose);
}

#[test]
fn test_layered_parent_chain() {
    #[options(path = "layered.toml")]
    struct Layered;

    let dir = TempDir::new().unwrap();
    let base = write(&dir, "base.toml", "label = 'base'\nscale = 2.0\nmax-level = 1\n");
    let leaf = write(
        &dir,
        "leaf.toml",
        &format!("base = '{base}'\nlabel = 'leaf'\n"),
    );
    let (config, _) = Layered::parse_from(["-c", leaf.as_str(), "-l", "7"]).unwrap();
    assert_eq!(config.label.as_deref(), Some("leaf"));
    assert_eq!(config.scale, 2.0);
    assert_eq!(config.max_level, 7);
    assert_eq!(config.base, Some(PathBuf::from(base)));
}

#[test]
fn test_layered_help_sections() {
    #[options("layered.toml")]
    struct Layered;

    let help = Layered::help().unwrap();
    assert!(help.contains("\n Output\n  --label\n"), "{help}");
    assert!(help.contains("  -l, --level, --max-level\n"), "{help}");
}

const DEFINITIONS: &str = "\
HELPHEADTAIL;Usage: tester [option]+;Bye
STRING;name;n;!The name.;+World
INT;repeat;r
BOOL;verbose;v
";

const SEPARATOR: &str =
    "-------------------------------------------------------------------------------";

#[test]
#[serial]
fn test_tester_reads_definitions_from_working_directory() {
    let dir = TempDir::new().unwrap();
    write(&dir, DEFINITIONS_FILE, DEFINITIONS);
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let mut out = Vec::new();
    let mut err = Vec::new();
    let ok = tester::run_reporting(
        std::path::Path::new(DEFINITIONS_FILE),
        &["-r", "2", "-v"],
        &mut out,
        &mut err,
    );
    std::env::set_current_dir(previous).unwrap();

    assert!(ok.unwrap());
    assert!(err.is_empty());
    let expected = format!(
        "\
Usage: tester [option]+
  -n, --name     The name.
  -r, --repeat
  -v, --verbose
Bye
{SEPARATOR}
n (name): World (default)
r (repeat): 2
v (verbose): true
{SEPARATOR}
"
    );
    assert_eq!(String::from_utf8(out).unwrap(), expected);
}

#[test]
#[serial]
fn test_tester_without_definitions() {
    let dir = TempDir::new().unwrap();
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let mut out = Vec::new();
    let mut err = Vec::new();
    let ok = tester::run_reporting(
        std::path::Path::new(DEFINITIONS_FILE),
        &[] as &[&str],
        &mut out,
        &mut err,
    );
    std::env::set_current_dir(previous).unwrap();

    assert!(ok.unwrap());
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("{SEPARATOR}\n{SEPARATOR}\n")
    );
}

#[test]
fn test_tester_reports_errors() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "options.txt", DEFINITIONS);
    let mut out = Vec::new();
    let mut err = Vec::new();
    let ok = tester::run_reporting(
        std::path::Path::new(&path),
        &["--repeat", "often"],
        &mut out,
        &mut err,
    )
    .unwrap();
    assert!(!ok);
    assert!(out.is_empty());
    let err = String::from_utf8(err).unwrap();
    assert!(err.starts_with("Invalid value for option 'repeat'"), "{err}");
    assert!(err.ends_with("Quitting (on error).\n"));
}

#[test]
fn test_tester_config_directive() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "tester.xml", "<configuration><name>Grace</name></configuration>");
    let path = write(
        &dir,
        "options.txt",
        &format!("{DEFINITIONS}CONFIG;config\nFILE;config;c\n"),
    );
    let mut out = Vec::new();
    tester::run(std::path::Path::new(&path), &["-c", config.as_str()], &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    assert!(out.contains("\nn (name): Grace\n"), "{out}");
}
