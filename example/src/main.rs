use std::process::ExitCode;

use log::info;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let mut stdout = std::io::stdout().lock();
    if let Err(err) = example::greeter::run(std::env::args().skip(1), &mut stdout) {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    info!("Completed successfully");
    ExitCode::SUCCESS
}
