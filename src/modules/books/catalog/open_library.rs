//! reqwest-backed Open Library client.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::debug;

use atheneum_kernel::settings::CatalogSettings;

use super::{CatalogClient, CatalogError, RawAuthor, RawEdition, RawSearchResponse};

const USER_AGENT: &str = concat!("atheneum/", env!("CARGO_PKG_VERSION"));

pub struct OpenLibraryClient {
    http: reqwest::Client,
    base_url: String,
    lookup_timeout: Duration,
    search_timeout: Duration,
    author_timeout: Duration,
}

impl OpenLibraryClient {
    pub fn new(settings: &CatalogSettings) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("failed to build catalog HTTP client")?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            lookup_timeout: Duration::from_secs(settings.lookup_timeout_secs),
            search_timeout: Duration::from_secs(settings.search_timeout_secs),
            author_timeout: Duration::from_secs(settings.author_timeout_secs),
        })
    }

    fn author_url(&self, key: &str) -> String {
        // Keys usually arrive as "/authors/OL23919A" but bare ids appear too.
        if key.starts_with('/') {
            format!("{}{}.json", self.base_url, key)
        } else {
            format!("{}/authors/{}.json", self.base_url, key)
        }
    }
}

#[async_trait]
impl CatalogClient for OpenLibraryClient {
    async fn edition_by_isbn(&self, isbn: &str) -> Result<RawEdition, CatalogError> {
        let url = format!("{}/isbn/{}.json", self.base_url, isbn.trim());
        debug!(%url, "edition lookup");

        let response = self
            .http
            .get(&url)
            .timeout(self.lookup_timeout)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            return Err(CatalogError::NotFound {
                isbn: isbn.to_string(),
            });
        }
        if !status.is_success() {
            return Err(CatalogError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<RawEdition>().await?)
    }

    async fn author_by_key(&self, key: &str) -> Option<RawAuthor> {
        let url = self.author_url(key);
        debug!(%url, "author lookup");

        match self
            .http
            .get(&url)
            .timeout(self.author_timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                match response.json::<RawAuthor>().await {
                    Ok(author) => Some(author),
                    Err(err) => {
                        debug!(key, error = %err, "author response failed to decode");
                        None
                    }
                }
            }
            Ok(response) => {
                debug!(key, status = %response.status(), "author lookup non-success");
                None
            }
            Err(err) => {
                debug!(key, error = %err, "author lookup failed");
                None
            }
        }
    }

    async fn search_by_title(&self, title: &str) -> Result<RawSearchResponse, CatalogError> {
        let url = format!("{}/search.json", self.base_url);
        debug!(%url, title, "title search");

        let response = self
            .http
            .get(&url)
            .query(&[("title", title)])
            .timeout(self.search_timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<RawSearchResponse>().await?)
    }
}
