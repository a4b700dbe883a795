//! easycommons: resource pool harness.

use std::process::ExitCode;

use easycommons_lib::{app, config, errors};
use easycommons_pool::CancellationToken;

fn main() -> ExitCode {
    let config = config::AppConfig::parse();
    easycommons_log::init(easycommons_log::level_for(config.verbose, config.quiet));

    // Ctrl+C interrupts workers blocked on the pool
    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        tracing::warn!(error = %e, "could not install Ctrl+C handler");
    }

    match app::run(&config, &cancel) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(errors::exit_code_for(&err))
        }
    }
}
