pub mod app;
pub mod commands;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod logger;
pub mod peer;
pub mod session;
pub mod signaling;
pub mod utils;
pub mod view;

use clap::Parser;
use config::ClientConfig;

/// Process entry: parse flags, start logging, run the front end on a
/// single-threaded runtime.
pub fn run() -> std::process::ExitCode {
    let config = ClientConfig::parse();
    logger::init(config.log_filter.as_deref());

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error while starting runtime: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    match runtime.block_on(app::run(config)) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}
