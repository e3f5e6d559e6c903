use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::SourceError;
use crate::source::{Release, ReleaseSource, Repository, SearchResponse};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const SEARCH_PAGE_SIZE: &str = "50";
const RELEASES_PAGE_SIZE: &str = "10";

fn build_headers(token: Option<&str>) -> Result<HeaderMap, SourceError> {
    let user_agent = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(user_agent));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

/// GitHub REST client. Unauthenticated when no token is given, which works
/// under the much lower anonymous rate limit.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_url: String,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .default_headers(build_headers(token)?)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_api_response<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, SourceError> {
        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: response_text,
            });
        }

        Ok(serde_json::from_str(&response_text)?)
    }
}

#[async_trait]
impl ReleaseSource for GitHubClient {
    async fn search_repositories(&self, query: &str) -> Result<Vec<Repository>, SourceError> {
        let request = self
            .http
            .get(format!("{}/search/repositories", self.api_url))
            .query(&[
                ("q", query),
                ("sort", "updated"),
                ("per_page", SEARCH_PAGE_SIZE),
            ]);

        let response: SearchResponse = self.fetch_api_response(request).await?;
        Ok(response.items)
    }

    async fn list_releases(&self, owner: &str, name: &str) -> Result<Vec<Release>, SourceError> {
        let request = self
            .http
            .get(format!("{}/repos/{owner}/{name}/releases", self.api_url))
            .query(&[("per_page", RELEASES_PAGE_SIZE)]);

        self.fetch_api_response(request).await
    }
}
