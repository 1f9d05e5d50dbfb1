use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::{Result, RustlinksError};

/// Overrides `log.level` from the config when set.
pub const LOG_FILTER_ENV: &str = "RUSTLINKS_LOG_FILTER";

/// Send traces to the log file. The terminal belongs to the UI.
pub fn init(config: &AppConfig) -> Result<()> {
    let path = config.log_file();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(&config.log.level)?)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| RustlinksError::Config(format!("failed to install logger: {}", e)))?;

    tracing::info!(file = %path.display(), "logging initialised");
    Ok(())
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_env(LOG_FILTER_ENV) {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| RustlinksError::Config(format!("invalid log.level '{}': {}", level, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_builds_filter() {
        if std::env::var(LOG_FILTER_ENV).is_ok() {
            return;
        }
        let filter = build_filter("debug").unwrap();
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn per_target_directives_are_accepted() {
        if std::env::var(LOG_FILTER_ENV).is_ok() {
            return;
        }
        assert!(build_filter("warn,rustlinks=debug").is_ok());
    }
}
