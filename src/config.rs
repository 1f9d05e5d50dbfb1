use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, RustlinksError};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_token: String,
    /// Prefix shown in front of aliases; the server URL when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_base: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct KeybindingsConfig {
    #[serde(default)]
    pub bindings: HashMap<String, String>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080".into()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    2
}

fn default_log_level() -> String {
    "info".into()
}

impl AppConfig {
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        let config: AppConfig = Figment::new()
            .merge(Serialized::defaults(AppConfig::defaults()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("RUSTLINKS_").split("__"))
            .extract()
            .map_err(|e| RustlinksError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.server.base_url).map_err(|e| {
            RustlinksError::Config(format!("server.base_url is not a valid URL: {}", e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RustlinksError::Config(format!(
                "server.base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.search.debounce_ms == 0 {
            return Err(RustlinksError::Config(
                "search.debounce_ms must be greater than zero".into(),
            ));
        }
        if self.search.min_query_len < 2 {
            return Err(RustlinksError::Config(
                "search.min_query_len must be at least 2".into(),
            ));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(RustlinksError::Config(
                "server.request_timeout_secs must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    pub fn api_token(&self) -> Option<&str> {
        Some(self.server.api_token.as_str()).filter(|t| !t.is_empty())
    }

    pub fn redirect_base(&self) -> &str {
        self.server
            .redirect_base
            .as_deref()
            .unwrap_or(&self.server.base_url)
    }

    pub fn log_file(&self) -> PathBuf {
        self.log.file.clone().unwrap_or_else(|| {
            Self::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("rustlinks.log")
        })
    }

    pub fn config_dir() -> Option<PathBuf> {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(|xdg| PathBuf::from(xdg).join("rustlinks"))
            .or_else(|| {
                directories::BaseDirs::new()
                    .map(|dirs| dirs.home_dir().join(".config").join("rustlinks"))
            })
    }

    pub fn write_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut content = toml::to_string_pretty(&Self::defaults())?;
        content.push_str(
            r#"
# Override specific keys:
# [keybindings.bindings]
# quit = "Ctrl+q"
# clear = "Ctrl+u"
"#,
        );

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn defaults() -> Self {
        Self {
            server: ServerConfig {
                base_url: default_base_url(),
                api_token: String::new(),
                redirect_base: None,
                request_timeout_secs: default_timeout_secs(),
            },
            search: SearchConfig::default(),
            log: LogConfig::default(),
            keybindings: KeybindingsConfig::default(),
        }
    }
}
