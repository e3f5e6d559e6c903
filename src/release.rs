use chrono::{DateTime, Utc};
use quick_xml::escape::escape;

use crate::custom_date::parse_timestamp;
use crate::feed::FeedEntry;
use crate::markdown::MarkdownRenderer;
use crate::source::{Release, Repository};

/// Converts one release of `repo` into a feed entry.
///
/// Prereleases, drafts and releases without a URL produce nothing. Notes
/// fall back to the release name when the body is blank; if rendering
/// fails the escaped plain text is used instead.
pub fn normalize(
    repo: &Repository,
    release: &Release,
    renderer: &dyn MarkdownRenderer,
) -> Option<FeedEntry> {
    if release.prerelease || release.draft {
        return None;
    }
    if release.html_url.is_empty() {
        tracing::debug!(
            repo = %repo.full_name,
            tag = %release.tag_name,
            "Skipping release without a URL"
        );
        return None;
    }

    let notes = if release.body.trim().is_empty() {
        release.name.trim()
    } else {
        release.body.trim()
    };

    let mut description = match renderer.render(notes) {
        Ok(html) => html,
        Err(e) => {
            tracing::error!(repo = %repo.full_name, error = %e, "md convert");
            escape(notes).into_owned()
        }
    };
    if !repo.description.is_empty() {
        description = format!("{}<br>{}", escape(repo.description.as_str()), description);
    }

    let author = release
        .author
        .as_ref()
        .map(|a| a.login.clone())
        .unwrap_or_default();

    Some(FeedEntry {
        id: release.html_url.clone(),
        title: format!("{} release {}", repo.full_name, release.tag_name),
        link: release.html_url.clone(),
        description,
        author,
        updated_at: release_time(release),
    })
}

fn release_time(release: &Release) -> DateTime<Utc> {
    parse_timestamp(release.published_at.as_deref())
        .or_else(|| parse_timestamp(release.created_at.as_deref()))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
