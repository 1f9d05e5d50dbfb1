use thiserror::Error;

#[derive(Debug, Error)]
pub enum RustlinksError {
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl RustlinksError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Human-readable server message, pulled out of a JSON `{"message": ...}`
    /// body when the store sends one.
    pub fn server_message(&self) -> Option<String> {
        match self {
            Self::Api { message, .. } => {
                Some(extract_json_message(message).unwrap_or_else(|| truncate(message, 200)))
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RustlinksError>;

/// Failure taxonomy surfaced to the presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SearchFailed,
    NotFound,
    LookupError,
    CreateError,
    AliasConflict,
}

impl ErrorKind {
    pub fn for_search(_: &RustlinksError) -> Self {
        Self::SearchFailed
    }

    pub fn for_lookup(e: &RustlinksError) -> Self {
        match e.status() {
            Some(404) => Self::NotFound,
            _ => Self::LookupError,
        }
    }

    pub fn for_create(e: &RustlinksError) -> Self {
        match e.status() {
            Some(409) => Self::AliasConflict,
            _ => Self::CreateError,
        }
    }
}

/// Ready-to-render error notice
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorNotice {
    pub title: String,
    pub message: String,
    pub hint: String,
}

impl ErrorNotice {
    pub fn from_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::SearchFailed => Self {
                title: "Search Failed".into(),
                message: "Could not search existing links".into(),
                hint: "You can still shorten what you typed".into(),
            },
            ErrorKind::NotFound => Self {
                title: "Not Found".into(),
                message: "That link no longer exists".into(),
                hint: "Pick another result or shorten it again".into(),
            },
            ErrorKind::LookupError => Self {
                title: "Lookup Failed".into(),
                message: "The link store did not answer the lookup".into(),
                hint: "Select it again to retry".into(),
            },
            ErrorKind::CreateError => Self {
                title: "Create Failed".into(),
                message: "The link store could not create the link".into(),
                hint: "Select it again to retry".into(),
            },
            ErrorKind::AliasConflict => Self {
                title: "Alias Conflict".into(),
                message: "The store could not assign a free alias".into(),
                hint: "Try again or pick an existing link".into(),
            },
        }
    }
}

fn extract_json_message(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(String::from))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
