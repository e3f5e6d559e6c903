use actix_web::{web, App, HttpServer};
use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use github_releases_feed::github::GitHubClient;
use github_releases_feed::markdown::{CmarkRenderer, MarkdownRenderer};
use github_releases_feed::source::ReleaseSource;
use github_releases_feed::store::FeedStore;
use github_releases_feed::worker::{spawn_worker, WorkerSettings};
use github_releases_feed::{routes, AppState, Args};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let languages = args.validate().context("invalid configuration")?;
    tracing::debug!(config = ?args, "Loaded configuration");

    let client = GitHubClient::new(
        &args.api_url,
        args.token.as_deref(),
        Duration::from_secs(args.request_timeout),
    )
    .context("failed to build GitHub client")?;
    if args.token.is_none() {
        tracing::warn!("GITHUB_TOKEN not set, using anonymous API access");
    }

    let store = Arc::new(FeedStore::new(&languages, Utc::now()));
    let source: Arc<dyn ReleaseSource> = Arc::new(client);
    let renderer: Arc<dyn MarkdownRenderer> = Arc::new(CmarkRenderer);
    let settings = WorkerSettings {
        min_stars: args.stars,
        interval: Duration::from_secs(args.refresh_interval),
    };

    for language in store.languages() {
        spawn_worker(
            store.clone(),
            source.clone(),
            renderer.clone(),
            language.clone(),
            settings.clone(),
        );
    }

    let address = format!("{}:{}", args.ip, args.port);
    let app_state = web::Data::new(AppState { store });

    tracing::info!(languages = ?languages, "Server running at http://{}", address);
    HttpServer::new(move || App::new().app_data(app_state.clone()).configure(routes))
        .bind(&address)
        .with_context(|| format!("failed to bind {address}"))?
        .run()
        .await?;

    Ok(())
}
