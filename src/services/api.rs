use crate::core::config::ApiConfig;
use crate::core::model::{ApiErrorBody, Character, Episode, Page};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use log::{debug, info};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[cfg(target_arch = "wasm32")]
pub trait TransportBounds {}
#[cfg(target_arch = "wasm32")]
impl<T> TransportBounds for T {}

#[cfg(not(target_arch = "wasm32"))]
pub trait TransportBounds: Send + Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + Sync> TransportBounds for T {}

/// Issues a single `GET`. Non-success statuses are returned, not raised;
/// only network-level failures are errors here.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait Transport: TransportBounds {
    async fn get(&self, url: &Url) -> Result<HttpResponse>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?;
        let status = resp.status();
        let body = resp.text().await.context("Failed to read response body")?;
        Ok(HttpResponse { status, body })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Character,
    Episode,
}

impl Resource {
    fn path(&self) -> &'static str {
        match self {
            Resource::Character => "character/",
            Resource::Episode => "episode/",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Character => f.write_str("characters"),
            Resource::Episode => f.write_str("episodes"),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Self::with_transport(&config.base_url, Arc::new(ReqwestTransport::new()))
    }

    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Result<Self> {
        // Url::join drops the last segment unless the base ends with a slash.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url =
            Url::parse(&normalized).with_context(|| format!("Invalid API base URL: {}", base_url))?;
        Ok(Self {
            base_url,
            transport,
        })
    }

    fn endpoint(&self, resource: Resource) -> Result<Url> {
        self.base_url
            .join(resource.path())
            .with_context(|| format!("Failed to build {} endpoint", resource))
    }

    fn page_url(&self, resource: Resource, page: u32) -> Result<Url> {
        let mut url = self.endpoint(resource)?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Ok(url)
    }

    /// Walks a listing endpoint from page 1 until `info.next` is empty and
    /// returns every result in page order. Any failed page aborts the walk.
    ///
    /// `on_page` receives the page just read and the total page count.
    pub async fn fetch_all_pages<T, F>(&self, resource: Resource, mut on_page: F) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        F: FnMut(u32, u32),
    {
        let mut all = Vec::new();
        let mut page = 1u32;

        loop {
            let url = self.page_url(resource, page)?;
            debug!("Fetching {} page {}", resource, page);

            let resp = self.transport.get(&url).await?;
            if !resp.is_success() {
                return Err(api_error(&resp, resource));
            }

            let parsed: Page<T> = serde_json::from_str(&resp.body)
                .with_context(|| format!("Failed to parse {} page {}", resource, page))?;
            all.extend(parsed.results);
            on_page(page, parsed.info.pages);

            if parsed.info.next.is_none() {
                break;
            }
            page += 1;
        }

        info!("Fetched {} {} across {} pages", all.len(), resource, page);
        Ok(all)
    }

    pub async fn fetch_all_characters(&self) -> Result<Vec<Character>> {
        self.fetch_all_pages(Resource::Character, |_, _| {}).await
    }

    pub async fn fetch_all_episodes(&self) -> Result<Vec<Episode>> {
        self.fetch_all_pages(Resource::Episode, |_, _| {}).await
    }

    /// Name search. The API answers 404 when nothing matches, which surfaces
    /// here as an error like any other failure.
    pub async fn search_characters(&self, name: &str) -> Result<Vec<Character>> {
        let mut url = self.endpoint(Resource::Character)?;
        url.query_pairs_mut().append_pair("name", name);

        let resp = self.transport.get(&url).await?;
        if !resp.is_success() {
            return Err(api_error(&resp, Resource::Character));
        }

        let parsed: Page<Character> =
            serde_json::from_str(&resp.body).context("Failed to parse search results")?;
        Ok(parsed.results)
    }
}

fn api_error(resp: &HttpResponse, resource: Resource) -> anyhow::Error {
    let message = serde_json::from_str::<ApiErrorBody>(&resp.body)
        .map(|b| b.error)
        .unwrap_or_else(|_| format!("Failed to fetch {}", resource));
    anyhow!("{} (HTTP {})", message, resp.status.as_u16())
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned responses keyed by full URL and records every request.
    pub struct MockTransport {
        responses: HashMap<String, HttpResponse>,
        pub requests: Arc<Mutex<Vec<String>>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self {
                responses: HashMap::new(),
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn respond(mut self, url: &str, status: u16, body: &str) -> Self {
            self.responses.insert(
                url.to_string(),
                HttpResponse {
                    status: StatusCode::from_u16(status).unwrap(),
                    body: body.to_string(),
                },
            );
            self
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get(&self, url: &Url) -> Result<HttpResponse> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .get(url.as_str())
                .cloned()
                .ok_or_else(|| anyhow!("connection refused: {}", url))
        }
    }

    pub fn page_body(next: Option<&str>, pages: u32, results: &str) -> String {
        let next = match next {
            Some(n) => format!("\"{}\"", n),
            None => "null".to_string(),
        };
        format!(
            r#"{{"info": {{"count": 0, "pages": {}, "next": {}, "prev": null}}, "results": {}}}"#,
            pages, next, results
        )
    }
}
