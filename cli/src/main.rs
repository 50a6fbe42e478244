use clap::Parser;
use cli::commands::{self, Cli};
use cli::{config, logger};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::load_config(cli.config.as_deref()).into_result() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logger::setup_logger(config.logging()) {
        eprintln!("Warning: Failed to initialize logger: {e}");
    }

    let result = match commands::build_engine(&config) {
        Ok(engine) => commands::run(cli.command, &engine, &mut std::io::stdout().lock()).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Command failed: {e}");
            eprintln!("Error: {e}");
            if let Some(suggestion) = e.suggestion() {
                eprintln!("{suggestion}");
            }
            ExitCode::FAILURE
        }
    }
}
