//! Per-language feed state and the merge that keeps it bounded.
//!
//! After every [`LanguageFeed::merge`]:
//! - no two entries share an `id`;
//! - entries are ordered newest first;
//! - at most [`MAX_ENTRIES`] entries are retained;
//! - `last_updated_at` is the `updated_at` of the first entry.

use chrono::{DateTime, Utc};

pub const MAX_ENTRIES: usize = 10;
pub const HOMEPAGE_URL: &str = "https://github.com";

/// One published release. Never mutated after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// Canonical release URL, unique within a feed.
    pub id: String,
    pub title: String,
    pub link: String,
    pub description: String,
    pub author: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: usize,
    pub evicted: usize,
    pub notable: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageFeed {
    pub language: String,
    pub title: String,
    pub link: String,
    pub entries: Vec<FeedEntry>,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl LanguageFeed {
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            title: format!("GitHub {} releases feed", title_case(language)),
            link: HOMEPAGE_URL.to_string(),
            entries: Vec::new(),
            last_updated_at: None,
        }
    }

    /// Merges a batch of candidates into the feed.
    ///
    /// Candidates whose `id` is already present are dropped, so the first
    /// recorded version of a release wins. An evicted entry is forgotten
    /// entirely and will be accepted again if the source resubmits it.
    ///
    /// Entries newer than both `recent_since` and the previous watermark are
    /// logged as notable; this has no effect on the stored state.
    pub fn merge(
        &mut self,
        candidates: Vec<FeedEntry>,
        recent_since: DateTime<Utc>,
    ) -> MergeSummary {
        let previous_watermark = self.last_updated_at;
        let mut summary = MergeSummary::default();

        for candidate in candidates {
            if self.entries.iter().any(|entry| entry.id == candidate.id) {
                continue;
            }
            self.entries.push(candidate);
            summary.added += 1;
        }

        // stable: equal timestamps keep their prior relative order
        self.entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        if self.entries.len() > MAX_ENTRIES {
            summary.evicted = self.entries.len() - MAX_ENTRIES;
            self.entries.truncate(MAX_ENTRIES);
        }

        for entry in self.entries.iter().rev() {
            let after_watermark = previous_watermark.map_or(true, |w| entry.updated_at > w);
            if entry.updated_at > recent_since && after_watermark {
                tracing::info!(
                    language = %self.language,
                    updated_at = %entry.updated_at,
                    "{}",
                    entry.title
                );
                summary.notable += 1;
            }
        }

        if let Some(first) = self.entries.first() {
            self.last_updated_at = Some(first.updated_at);
        }

        summary
    }
}

/// Upper-cases the first letter of every word, where anything but a letter,
/// digit or underscore separates words (`c++` -> `C++`, `objective-c` ->
/// `Objective-C`).
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    out
}
