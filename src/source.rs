//! Release source port.
//!
//! The refresh worker only needs two calls from the hosting service: a
//! repository search and a per-repository release listing. Everything
//! behind them (HTTP, auth, rate limits) stays in the implementation.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::error::SourceError;

/// Helper to deserialize null as default (empty string, false, etc.)
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Owner {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub login: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Repository {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub description: String,
    #[serde(default)]
    pub owner: Option<Owner>,
}

impl Repository {
    /// Owner login, if the record carries a usable one.
    pub fn owner_login(&self) -> Option<&str> {
        self.owner
            .as_ref()
            .map(|o| o.login.as_str())
            .filter(|login| !login.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Release {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub tag_name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub body: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub html_url: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub prerelease: bool,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub draft: bool,
    #[serde(default)]
    pub author: Option<Owner>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub items: Vec<Repository>,
}

#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Runs a repository search, most recently updated first.
    async fn search_repositories(&self, query: &str) -> Result<Vec<Repository>, SourceError>;

    /// Lists the latest releases of `owner/name`.
    async fn list_releases(&self, owner: &str, name: &str) -> Result<Vec<Release>, SourceError>;
}
