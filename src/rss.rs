use quick_xml::escape::escape;
use std::fmt::Write;

use crate::custom_date::format_rfc822;
use crate::error::FeedError;
use crate::feed::{FeedEntry, LanguageFeed};

/// Renders a feed as an RSS 2.0 document.
pub fn render(feed: &LanguageFeed) -> Result<String, FeedError> {
    let mut items = String::new();
    for entry in feed.entries.iter() {
        write_item(&mut items, entry)?;
    }

    let app_name = env!("CARGO_PKG_NAME");
    let app_version = env!("CARGO_PKG_VERSION");

    let mut last_build_date = String::new();
    if let Some(updated) = feed.last_updated_at {
        write!(
            last_build_date,
            "\n    <lastBuildDate>{}</lastBuildDate>",
            format_rfc822(updated)
        )?;
    }

    let mut out = String::new();
    write!(
        out,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
<channel>
    <title>{title}</title>
    <link>{link}</link>
    <description>{title}</description>{last_build_date}
    <generator>{app_name} v{app_version}</generator>
    <docs>http://www.rssboard.org/rss-specification</docs>
{items}</channel>
</rss>
"#,
        title = escape(feed.title.as_str()),
        link = escape(feed.link.as_str()),
        last_build_date = last_build_date,
        app_name = app_name,
        app_version = app_version,
        items = items,
    )?;

    Ok(out)
}

fn write_item(out: &mut String, entry: &FeedEntry) -> Result<(), FeedError> {
    write!(
        out,
        r#"    <item>
        <title>{title}</title>
        <link>{link}</link>
        <guid isPermaLink="true">{id}</guid>
        <description>{description}</description>
        <author>{author}</author>
        <pubDate>{published}</pubDate>
    </item>
"#,
        title = escape(entry.title.as_str()),
        link = escape(entry.link.as_str()),
        id = escape(entry.id.as_str()),
        description = escape(entry.description.as_str()),
        author = escape(entry.author.as_str()),
        published = format_rfc822(entry.updated_at),
    )?;
    Ok(())
}
