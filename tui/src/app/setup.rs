use std::{env, fs::File};

use anyhow::{Context, Result};
use neuroflow::VizConfig;

const DEFAULT_LOG: &str = "neuroflow-tui.log";

/// Routes `env_logger` to a file so log lines never land on the alternate
/// screen. The path comes from `NEUROFLOW_LOG`.
///
/// # Errors
/// Returns an error if the log file cannot be created.
pub fn init_logging() -> Result<()> {
    let path = env::var("NEUROFLOW_LOG").unwrap_or_else(|_| DEFAULT_LOG.to_string());
    let file = File::create(&path).with_context(|| format!("creating log file {path}"))?;

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Loads the configuration named by `NEUROFLOW_CONFIG`, or the defaults.
///
/// # Errors
/// Returns an error if the file cannot be read or is invalid.
pub fn load_config() -> Result<VizConfig> {
    match env::var("NEUROFLOW_CONFIG") {
        Ok(path) => {
            let config = VizConfig::from_json_file(&path)?;
            log::info!("loaded config from {path}");
            Ok(config)
        }
        Err(_) => Ok(VizConfig::default()),
    }
}
