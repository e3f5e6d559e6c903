//! Background refresh: one long-lived task per tracked language.
//!
//! Each task alternates between querying the source and sleeping. Nothing a
//! cycle does can stop the task: source errors are logged and the cycle is
//! dropped, and a panic inside a cycle is caught and treated the same way.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::error::SourceError;
use crate::feed::FeedEntry;
use crate::markdown::MarkdownRenderer;
use crate::release::normalize;
use crate::source::ReleaseSource;
use crate::store::FeedStore;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_MIN_STARS: u32 = 1;

#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub min_stars: u32,
    pub interval: Duration,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            min_stars: DEFAULT_MIN_STARS,
            interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub candidates: usize,
    pub added: usize,
    pub evicted: usize,
    pub notable: usize,
}

pub fn build_query(language: &str, min_stars: u32) -> String {
    format!("language:{language} stars:>{min_stars}")
}

/// Runs the search and collects entries for every release found.
///
/// Any failing call fails the whole batch; entries gathered from earlier
/// repositories are dropped with it.
pub async fn collect_entries(
    source: &dyn ReleaseSource,
    renderer: &dyn MarkdownRenderer,
    query: &str,
) -> Result<Vec<FeedEntry>, SourceError> {
    let repositories = source.search_repositories(query).await?;

    let mut entries = Vec::new();
    for repo in repositories.iter() {
        let Some(owner) = repo.owner_login() else {
            tracing::debug!(repo = %repo.full_name, "Skipping repository without owner");
            continue;
        };

        let releases = source.list_releases(owner, &repo.name).await?;
        entries.extend(
            releases
                .iter()
                .filter_map(|release| normalize(repo, release, renderer)),
        );
    }

    Ok(entries)
}

/// One query-and-merge pass for `language`. On error the store is left
/// untouched.
pub async fn refresh_once(
    store: &FeedStore,
    source: &dyn ReleaseSource,
    renderer: &dyn MarkdownRenderer,
    language: &str,
    min_stars: u32,
) -> Result<CycleReport, SourceError> {
    let query = build_query(language, min_stars);
    let entries = collect_entries(source, renderer, &query).await?;
    let candidates = entries.len();

    let summary = store.merge(language, entries).await.unwrap_or_default();

    Ok(CycleReport {
        candidates,
        added: summary.added,
        evicted: summary.evicted,
        notable: summary.notable,
    })
}

pub fn spawn_worker(
    store: Arc<FeedStore>,
    source: Arc<dyn ReleaseSource>,
    renderer: Arc<dyn MarkdownRenderer>,
    language: String,
    settings: WorkerSettings,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!(language = %language, "Starting refresh worker");
        loop {
            let cycle = refresh_once(
                &store,
                source.as_ref(),
                renderer.as_ref(),
                &language,
                settings.min_stars,
            );

            match AssertUnwindSafe(cycle).catch_unwind().await {
                Ok(Ok(report)) => {
                    tracing::debug!(
                        language = %language,
                        candidates = report.candidates,
                        added = report.added,
                        evicted = report.evicted,
                        "Refresh cycle complete"
                    );
                }
                Ok(Err(e)) => {
                    tracing::error!(language = %language, error = %e, "Refresh cycle failed");
                }
                Err(panic) => {
                    tracing::error!(
                        language = %language,
                        panic = %panic_message(panic.as_ref()),
                        "Refresh cycle panicked"
                    );
                }
            }

            tokio::time::sleep(settings.interval).await;
        }
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
