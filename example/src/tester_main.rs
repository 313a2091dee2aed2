use std::{path::Path, process::ExitCode};

use example::tester::{DEFINITIONS_FILE, run_reporting};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let ok = run_reporting(
        Path::new(DEFINITIONS_FILE),
        &args,
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    );
    match ok {
        Ok(true) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}
