//! Main application entry point.

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let cli = scribble_app::Cli::parse();
    match scribble_app::run(cli, &mut std::io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("scribble: {}", e);
            ExitCode::FAILURE
        }
    }
}
