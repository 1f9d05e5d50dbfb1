use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use url::Url;

use crate::api::types::{CreateRequest, LinkSummary, Rustlink, SearchRequest, SearchResponse};
use crate::error::{Result, RustlinksError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct RustlinksClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl RustlinksClient {
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(RustlinksError::Config(format!(
                "server URL cannot carry a path: {}",
                base_url
            )));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            token: token.filter(|t| !t.is_empty()).map(str::to_string),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub async fn search(&self, query: &str) -> Result<Vec<LinkSummary>> {
        let req = SearchRequest {
            query: query.to_string(),
        };
        let resp = self
            .authorize(self.client.post(self.endpoint(&["api", "links", "search"])))
            .json(&req)
            .send()
            .await?;

        let body = check_status(resp).await?.json::<SearchResponse>().await?;
        Ok(body.results)
    }

    pub async fn lookup(&self, alias: &str) -> Result<Rustlink> {
        let resp = self
            .authorize(self.client.get(self.endpoint(&["api", "links", alias])))
            .send()
            .await?;

        let body = check_status(resp).await?.json::<Rustlink>().await?;
        Ok(body)
    }

    pub async fn create(&self, target: &str) -> Result<Rustlink> {
        let req = CreateRequest {
            url: target.to_string(),
        };
        let resp = self
            .authorize(self.client.post(self.endpoint(&["api", "links"])))
            .json(&req)
            .send()
            .await?;

        let body = check_status(resp).await?.json::<Rustlink>().await?;
        Ok(body)
    }

    pub async fn health(&self) -> Result<()> {
        let resp = self
            .authorize(self.client.get(self.endpoint(&["api", "health"])))
            .send()
            .await?;

        check_status(resp).await?;
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

async fn check_status(resp: Response) -> Result<Response> {
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        return Err(RustlinksError::Api { status, message });
    }
    Ok(resp)
}
