//! In-memory fakes and fixtures shared by the unit tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{RenderError, SourceError};
use crate::feed::FeedEntry;
use crate::markdown::MarkdownRenderer;
use crate::source::{Owner, Release, ReleaseSource, Repository};

/// Fixed base time plus `offset` seconds.
pub fn t(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(offset)
}

pub fn entry(id: &str, updated_at: DateTime<Utc>) -> FeedEntry {
    FeedEntry {
        id: id.to_string(),
        title: format!("title {id}"),
        link: id.to_string(),
        description: format!("<p>{id}</p>"),
        author: "octocat".to_string(),
        updated_at,
    }
}

pub fn repository(owner: &str, name: &str, description: &str) -> Repository {
    Repository {
        name: name.to_string(),
        full_name: format!("{owner}/{name}"),
        description: description.to_string(),
        owner: Some(Owner {
            login: owner.to_string(),
        }),
    }
}

pub fn release(full_name: &str, tag: &str, published_at: &str) -> Release {
    let owner = full_name.split('/').next().unwrap_or_default();
    Release {
        tag_name: tag.to_string(),
        name: tag.to_string(),
        body: String::new(),
        html_url: format!("https://github.com/{full_name}/releases/tag/{tag}"),
        prerelease: false,
        draft: false,
        author: Some(Owner {
            login: owner.to_string(),
        }),
        published_at: Some(published_at.to_string()),
        created_at: None,
    }
}

pub struct FailingRenderer;

impl MarkdownRenderer for FailingRenderer {
    fn render(&self, _markdown: &str) -> Result<String, RenderError> {
        Err(RenderError("renderer unavailable".to_string()))
    }
}

/// Scriptable source: serves fixed repositories and releases, and can be
/// told to fail or panic.
#[derive(Default)]
pub struct FakeSource {
    repositories: Mutex<Vec<Repository>>,
    releases: Mutex<HashMap<String, Vec<Release>>>,
    failing: Mutex<HashSet<String>>,
    fail_search: AtomicBool,
    panic_next_search: AtomicBool,
    search_calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository(self, repo: Repository, releases: Vec<Release>) -> Self {
        self.releases
            .lock()
            .unwrap()
            .insert(repo.full_name.clone(), releases);
        self.repositories.lock().unwrap().push(repo);
        self
    }

    pub fn add_release(&self, full_name: &str, release: Release) {
        self.releases
            .lock()
            .unwrap()
            .entry(full_name.to_string())
            .or_default()
            .insert(0, release);
    }

    pub fn set_search_failing(&self, failing: bool) {
        self.fail_search.store(failing, Ordering::SeqCst);
    }

    pub fn set_releases_failing(&self, full_name: &str, failing: bool) {
        let mut set = self.failing.lock().unwrap();
        if failing {
            set.insert(full_name.to_string());
        } else {
            set.remove(full_name);
        }
    }

    pub fn panic_on_next_search(&self) {
        self.panic_next_search.store(true, Ordering::SeqCst);
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReleaseSource for FakeSource {
    async fn search_repositories(&self, query: &str) -> Result<Vec<Repository>, SourceError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());

        if self.panic_next_search.swap(false, Ordering::SeqCst) {
            panic!("fake source blew up");
        }
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(SourceError::Api {
                status: 502,
                message: "bad gateway".to_string(),
            });
        }
        Ok(self.repositories.lock().unwrap().clone())
    }

    async fn list_releases(&self, owner: &str, name: &str) -> Result<Vec<Release>, SourceError> {
        let full_name = format!("{owner}/{name}");
        if self.failing.lock().unwrap().contains(&full_name) {
            return Err(SourceError::Api {
                status: 500,
                message: format!("{full_name} unavailable"),
            });
        }
        Ok(self
            .releases
            .lock()
            .unwrap()
            .get(&full_name)
            .cloned()
            .unwrap_or_default())
    }
}
