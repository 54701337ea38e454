//! Logging set-up

use std::{fs::OpenOptions, io, sync::Mutex};

use tracing_subscriber::{EnvFilter, filter::LevelFilter};

use crate::{config::WllvmConfig, error::Error};

/// Install the global `tracing` subscriber described by `config`.
///
/// Logs go to stderr, or are appended to the configured output file.
/// Fails if a subscriber is already installed.
pub fn init_logging(config: &WllvmConfig) -> Result<(), Error> {
    let filter =
        EnvFilter::default().add_directive(LevelFilter::from_level(config.log_level()).into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let result = match config.output_file() {
        Some(output_filepath) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(output_filepath)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(io::stderr).try_init(),
    };

    result.map_err(|err| Error::Logger(err.to_string()))
}
