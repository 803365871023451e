// tagbridge/src/main.rs
//! Bridge daemon entry point: load configuration, open the reader, run the
//! poll loop until the process is stopped.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tagbridge::service::register_stop_signals;
use tagbridge::{Bridge, Config};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tagbridge.toml"));

    match run(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(path: &Path) -> tagbridge::Result<()> {
    let config = Config::load(path)?;
    let mut bridge = Bridge::from_config(&config)?;
    register_stop_signals(bridge.stop_handle())?;
    bridge.run()
}
