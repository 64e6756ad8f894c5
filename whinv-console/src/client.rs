//! HTTP client for the items API

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use whinv_common::{Item, ItemFields};

const USER_AGENT: &str = concat!("whinv-console/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server answered with a non-success status
    #[error("Request rejected ({0}): {1}")]
    Rejected(u16, String),

    /// Connection, timeout or body decoding failure
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

/// Item operations the console needs
#[async_trait]
pub trait ItemsApi: Send + Sync {
    async fn list(&self, search: Option<&str>) -> Result<Vec<Item>, ClientError>;

    async fn create(&self, fields: &ItemFields) -> Result<Item, ClientError>;

    async fn update(&self, id: &str, fields: &ItemFields) -> Result<Item, ClientError>;

    async fn delete(&self, id: &str) -> Result<(), ClientError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// reqwest-backed [`ItemsApi`] against a whinv-server base URL
pub struct HttpItemsApi {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpItemsApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn items_url(&self) -> String {
        format!("{}/items", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/items/{}", self.base_url, id)
    }
}

/// Map a non-success response to a `ClientError`, using the `{ "error" }` body when present
async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    if status == StatusCode::NOT_FOUND {
        Err(ClientError::NotFound(what.to_string()))
    } else {
        Err(ClientError::Rejected(status.as_u16(), message))
    }
}

#[async_trait]
impl ItemsApi for HttpItemsApi {
    async fn list(&self, search: Option<&str>) -> Result<Vec<Item>, ClientError> {
        let mut request = self.http_client.get(self.items_url());
        if let Some(term) = search.filter(|t| !t.trim().is_empty()) {
            request = request.query(&[("search", term)]);
        }

        tracing::debug!(search = ?search, "Fetching items");
        let response = check(request.send().await?, "items").await?;
        Ok(response.json().await?)
    }

    async fn create(&self, fields: &ItemFields) -> Result<Item, ClientError> {
        let response = self
            .http_client
            .post(self.items_url())
            .json(fields)
            .send()
            .await?;
        let response = check(response, "items").await?;
        Ok(response.json().await?)
    }

    async fn update(&self, id: &str, fields: &ItemFields) -> Result<Item, ClientError> {
        let response = self
            .http_client
            .put(self.item_url(id))
            .json(fields)
            .send()
            .await?;
        let response = check(response, id).await?;
        Ok(response.json().await?)
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let response = self.http_client.delete(self.item_url(id)).send().await?;
        check(response, id).await?;
        Ok(())
    }
}
