use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use rusty_inpainter::{GeminiClient, StudioArgs, app, cli};

/// Launch the desktop studio, or run a single request headless.
fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = StudioArgs::parse();
    if let Some(command) = args.command {
        return cli::run(command, &args.api);
    }

    let client = match GeminiClient::new(args.api.to_api_config()) {
        Ok(client) => client,
        Err(err) => {
            log::error!("Could not build HTTP client: {err}");
            return ExitCode::FAILURE;
        }
    };

    match app::run_native(Arc::new(client), args.history_limit) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("Failed to start the window: {err}");
            ExitCode::FAILURE
        }
    }
}
