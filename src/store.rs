use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::error::FeedError;
use crate::feed::{FeedEntry, LanguageFeed, MergeSummary};
use crate::rss;

pub struct RenderedFeed {
    pub body: String,
    pub last_updated_at: Option<DateTime<Utc>>,
}

/// All tracked feeds behind one lock.
///
/// Keys are fixed at construction. Merges and renders hold the same mutex
/// for their whole duration, so a reader never sees a half-merged feed.
pub struct FeedStore {
    languages: Vec<String>,
    feeds: Mutex<HashMap<String, LanguageFeed>>,
    recent_since: DateTime<Utc>,
}

impl FeedStore {
    /// Creates an empty feed per language. Releases published in the day
    /// before `started_at` or later count as notable.
    pub fn new<S: AsRef<str>>(languages: &[S], started_at: DateTime<Utc>) -> Self {
        let mut keys: Vec<String> = Vec::with_capacity(languages.len());
        for language in languages {
            let key = language.as_ref().to_lowercase();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        let feeds = keys
            .iter()
            .map(|key| (key.clone(), LanguageFeed::new(key)))
            .collect();

        Self {
            languages: keys,
            feeds: Mutex::new(feeds),
            recent_since: started_at - Duration::days(1),
        }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Returns `None` if `language` is not tracked.
    pub async fn merge(&self, language: &str, candidates: Vec<FeedEntry>) -> Option<MergeSummary> {
        let mut feeds = self.feeds.lock().await;
        let feed = feeds.get_mut(language)?;
        Some(feed.merge(candidates, self.recent_since))
    }

    pub async fn snapshot(&self, language: &str) -> Option<LanguageFeed> {
        self.feeds.lock().await.get(language).cloned()
    }

    /// Serializes the feed while holding the lock.
    pub async fn render(&self, language: &str) -> Option<Result<RenderedFeed, FeedError>> {
        let feeds = self.feeds.lock().await;
        let feed = feeds.get(language)?;
        Some(rss::render(feed).map(|body| RenderedFeed {
            body,
            last_updated_at: feed.last_updated_at,
        }))
    }
}
