use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use crate::app::ports::{DocumentFetcherPort, FetchOutcome, TitleSearchPort};
use crate::config::SourceConfig;
use crate::error::{EnrichError, Result};

/// reqwest-backed client for article fetches and title search.
pub struct ReqwestWiki {
    client: reqwest::Client,
    article_base: Url,
    search_api: Url,
}

impl ReqwestWiki {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Self::with_client(client_builder(config).build()?, config)
    }

    /// Wrap an already configured client; `config` supplies the endpoints.
    pub fn with_client(client: reqwest::Client, config: &SourceConfig) -> Result<Self> {
        let article_base = Url::parse(&config.article_base_url).map_err(|e| {
            EnrichError::Config(format!(
                "Invalid article base URL '{}': {}",
                config.article_base_url, e
            ))
        })?;
        let search_api = Url::parse(&config.search_api_url).map_err(|e| {
            EnrichError::Config(format!(
                "Invalid search API URL '{}': {}",
                config.search_api_url, e
            ))
        })?;
        Ok(Self {
            client,
            article_base,
            search_api,
        })
    }

    /// Article URL for a slug; the slug is percent-encoded as one path segment.
    pub fn article_url(&self, slug: &str) -> Option<Url> {
        let mut url = self.article_base.clone();
        url.path_segments_mut().ok()?.pop_if_empty().push(slug);
        Some(url)
    }
}

#[async_trait]
impl DocumentFetcherPort for ReqwestWiki {
    async fn fetch(&self, identifier: &str) -> FetchOutcome {
        let Some(url) = self.article_url(identifier) else {
            return FetchOutcome::TransportError(format!(
                "cannot build article URL for '{}'",
                identifier
            ));
        };
        let resp = match self.client.get(url.clone()).send().await {
            Ok(resp) => resp,
            Err(e) => return FetchOutcome::TransportError(e.to_string()),
        };
        let status = resp.status();
        debug!("GET {} -> {}", url, status);
        if status == StatusCode::NOT_FOUND {
            return FetchOutcome::NotFound;
        }
        if !status.is_success() {
            return FetchOutcome::TransportError(format!("HTTP {}", status.as_u16()));
        }
        match resp.text().await {
            Ok(body) => FetchOutcome::Document(body),
            Err(e) => FetchOutcome::TransportError(e.to_string()),
        }
    }
}

#[async_trait]
impl TitleSearchPort for ReqwestWiki {
    async fn search(&self, query: &str) -> std::result::Result<Option<String>, String> {
        let resp = self
            .client
            .get(self.search_api.clone())
            .query(&[
                ("action", "opensearch"),
                ("search", query),
                ("limit", "1"),
                ("namespace", "0"),
                ("format", "json"),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = resp.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status.as_u16()));
        }
        let data: Value = resp.json().await.map_err(|e| e.to_string())?;
        Ok(best_title(&data))
    }
}

/// Client settings shared by every remote call: identifying user agent and a
/// per-request timeout, which surfaces as a transport error.
pub fn client_builder(config: &SourceConfig) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_seconds))
}

/// First title of an opensearch response: `[query, [titles...], ...]`.
pub fn best_title(data: &Value) -> Option<String> {
    data.get(1)?
        .as_array()?
        .first()?
        .as_str()
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
}
