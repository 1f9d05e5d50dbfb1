// Re-export SDK modules so binary-internal modules can use crate::api:: and crate::error::
pub(crate) use rustlinks_sdk::{api, error};

mod app;
mod config;
mod keys;
mod logging;
mod ui;

use std::path::{Path, PathBuf};

use config::AppConfig;

fn config_path() -> PathBuf {
    AppConfig::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.toml")
}

/// First run writes defaults and exits so the user can point the client at
/// their link store before anything is sent.
fn load_config(path: &Path) -> Result<Option<AppConfig>, Box<dyn std::error::Error>> {
    if !path.exists() {
        AppConfig::write_default(path)?;
        eprintln!("Wrote a default config to {}", path.display());
        eprintln!("Set server.base_url (or RUSTLINKS_SERVER__BASE_URL) to your link store and start rustlinks again.");
        return Ok(None);
    }

    match AppConfig::load_from_path(path) {
        Ok(config) => Ok(Some(config)),
        Err(e) => {
            eprintln!("Cannot use {}: {}", path.display(), e);
            eprintln!("Fix the value above, or delete the file to regenerate defaults.");
            Ok(None)
        }
    }
}

/// Restore the terminal before the default hook prints, and keep a copy of
/// the panic in the log file since the screen is about to be torn down.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        tracing::error!(panic = %info, "rustlinks panicked");
        default_hook(info);
    }));
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = config_path();
    let Some(config) = load_config(&path)? else {
        return Ok(());
    };

    if let Err(e) = logging::init(&config) {
        eprintln!("Logging disabled: {}", e);
    }
    tracing::info!(config = %path.display(), server = %config.server.base_url, "starting");

    let mut terminal = ratatui::init();
    install_panic_hook();

    let result = app::run(&config, &mut terminal).await;
    ratatui::restore();

    if let Err(e) = result {
        tracing::error!(error = %e, "exited with error");
        eprintln!("rustlinks: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
