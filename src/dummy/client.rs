use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::{config::UpstreamConfig, posts::repo_types::Post};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("upstream answered {0}")]
    Status(StatusCode),
}

/// The third-party demo post API.
#[async_trait]
pub trait DummyPostApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Post>, UpstreamError>;
    /// `Ok(None)` when the upstream does not answer 2xx for this id.
    async fn get(&self, id: i32) -> Result<Option<Post>, UpstreamError>;
    async fn create(&self, post: &Post) -> Result<Post, UpstreamError>;
}

#[derive(Clone)]
pub struct HttpDummyApi {
    client: Client,
    read_base_url: String,
    write_url: String,
}

impl HttpDummyApi {
    pub fn new(cfg: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            read_base_url: cfg.read_base_url.clone(),
            write_url: cfg.write_url.clone(),
        })
    }
}

#[async_trait]
impl DummyPostApi for HttpDummyApi {
    async fn list(&self) -> Result<Vec<Post>, UpstreamError> {
        let url = format!("{}/posts", self.read_base_url);
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(UpstreamError::Status(resp.status()));
        }
        let posts = resp.json::<Vec<Post>>().await?;
        debug!(count = posts.len(), "fetched dummy posts");
        Ok(posts)
    }

    async fn get(&self, id: i32) -> Result<Option<Post>, UpstreamError> {
        let url = format!("{}/posts/{}", self.read_base_url, id);
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            debug!(id, status = %resp.status(), "dummy post not available");
            return Ok(None);
        }
        Ok(Some(resp.json::<Post>().await?))
    }

    async fn create(&self, post: &Post) -> Result<Post, UpstreamError> {
        let resp = self.client.post(&self.write_url).json(post).send().await?;
        if !resp.status().is_success() {
            return Err(UpstreamError::Status(resp.status()));
        }
        Ok(resp.json::<Post>().await?)
    }
}
