use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Serialize)]
pub struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<LinkSummary>,
}

#[derive(Debug, Serialize)]
pub struct CreateRequest {
    pub url: String,
}

/// A search hit. Search payloads may be partial, so selection always performs
/// a fresh lookup instead of trusting this.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkSummary {
    pub alias: String,
    #[serde(rename = "url", default, deserialize_with = "null_as_empty")]
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Views {
    #[serde(default)]
    pub today: u64,
    #[serde(default)]
    pub week: u64,
    #[serde(default)]
    pub all: u64,
}

/// A fully resolved link as returned by lookup and create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rustlink {
    pub alias: String,
    #[serde(rename = "url", default, deserialize_with = "null_as_empty")]
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<Views>,
}

impl Rustlink {
    /// Full short URL under the given redirect base, e.g. `http://go/docs`.
    pub fn short_url(&self, redirect_base: &str) -> String {
        format!("{}/{}", redirect_base.trim_end_matches('/'), self.alias)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
