use actix_web::{
    http::{header, Method},
    route, web, HttpRequest, HttpResponse, Responder,
};
use clap::Parser;
use std::sync::Arc;
use std::time::SystemTime;

pub mod custom_date;
pub mod error;
pub mod feed;
pub mod github;
pub mod markdown;
pub mod release;
pub mod rss;
pub mod source;
pub mod store;
pub mod worker;

#[cfg(test)]
mod testing;

use error::ConfigError;
use store::{FeedStore, RenderedFeed};

pub const FAVICON_URL: &str = "https://github.githubassets.com/favicons/favicon.png";

#[derive(Parser, Clone)]
#[clap(about, version, author)]
pub struct Args {
    /// GitHub access token; anonymous access is rate limited much harder
    #[clap(long, env = "GITHUB_TOKEN")]
    pub token: Option<String>,

    /// Only repositories with more stars than this are searched
    #[clap(short, long, env = "GITHUB_STARS", default_value_t = worker::DEFAULT_MIN_STARS)]
    pub stars: u32,

    /// Comma-separated languages to track
    #[clap(
        short,
        long,
        env = "GITHUB_LANGUAGES",
        value_delimiter = ',',
        default_value = "go"
    )]
    pub languages: Vec<String>,

    #[clap(short, long, env = "IP", default_value = "0.0.0.0")]
    pub ip: String,

    #[clap(short, long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Seconds between refresh cycles
    #[clap(
        short,
        long,
        env = "REFRESH_INTERVAL",
        default_value_t = worker::DEFAULT_REFRESH_INTERVAL.as_secs()
    )]
    pub refresh_interval: u64,

    /// Seconds before a GitHub API request is abandoned
    #[clap(long, env = "REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    #[clap(long, env = "GITHUB_API_URL", default_value = github::DEFAULT_API_URL)]
    pub api_url: String,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("stars", &self.stars)
            .field("languages", &self.languages)
            .field("ip", &self.ip)
            .field("port", &self.port)
            .field("refresh_interval", &self.refresh_interval)
            .field("request_timeout", &self.request_timeout)
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Args {
    /// Checks the configuration and returns the tracked languages,
    /// lower-cased and without duplicates.
    pub fn validate(&self) -> Result<Vec<String>, ConfigError> {
        if self.refresh_interval == 0 {
            return Err(ConfigError::ZeroDuration("refresh interval"));
        }
        if self.request_timeout == 0 {
            return Err(ConfigError::ZeroDuration("request timeout"));
        }

        let mut languages: Vec<String> = Vec::with_capacity(self.languages.len());
        for language in &self.languages {
            let language = language.trim().to_lowercase();
            if language.is_empty() {
                return Err(ConfigError::EmptyLanguage);
            }
            if !languages.contains(&language) {
                languages.push(language);
            }
        }

        if languages.is_empty() {
            return Err(ConfigError::NoLanguages);
        }
        Ok(languages)
    }
}

pub struct AppState {
    pub store: Arc<FeedStore>,
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(favicon).service(language_feed);
}

#[route("/favicon.ico", method = "GET", method = "HEAD")]
async fn favicon() -> impl Responder {
    HttpResponse::MovedPermanently()
        .insert_header((header::LOCATION, FAVICON_URL))
        .finish()
}

#[route("/{language}", method = "GET", method = "HEAD")]
async fn language_feed(
    language: web::Path<String>,
    app_data: web::Data<AppState>,
    req: HttpRequest,
) -> impl Responder {
    let language = language.to_lowercase();

    match app_data.store.render(&language).await {
        None => HttpResponse::NotFound()
            .content_type("text/plain; charset=utf-8")
            .body(format!("language {language} not found")),
        Some(Err(e)) => {
            tracing::error!(language = %language, error = %e, "Failed to render feed");
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body(e.to_string())
        }
        Some(Ok(rendered)) => create_response(&req, &rendered),
    }
}

fn create_response(req: &HttpRequest, rendered: &RenderedFeed) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    response.insert_header((header::CONTENT_TYPE, "application/xml"));
    if let Some(updated) = rendered.last_updated_at {
        let last_modified = header::HttpDate::from(SystemTime::from(updated));
        response.insert_header((header::LAST_MODIFIED, last_modified.to_string()));
    }

    if req.method() == Method::HEAD {
        response
            .insert_header((header::CONTENT_LENGTH, rendered.body.len()))
            .finish()
    } else {
        response.body(rendered.body.clone())
    }
}
