use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, RETRY_AFTER, USER_AGENT};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::settings::Settings;

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const RETRY_STATUSES: &[u16] = &[429, 500, 502, 503, 504];
// Retry-After is only meaningful on these
const RETRY_AFTER_STATUSES: &[u16] = &[413, 429, 503];
const MAX_RETRY_AFTER_SECS: u64 = 120;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("could not read response body from {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// Anything that can turn a URL into page text.
pub trait Fetch {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// reqwest-backed fetcher with browser-like headers and a bounded retry budget.
pub struct HttpFetcher {
    client: Client,
    max_attempts: u32,
    backoff_ms: u64,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&settings.user_agent)?);
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(&settings.accept_language)?);
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(REFERER, HeaderValue::from_str(&settings.referer)?);

        let timeout = Duration::from_secs(settings.timeout_secs);
        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(HttpFetcher {
            client,
            max_attempts: settings.max_attempts.max(1),
            backoff_ms: settings.backoff_ms,
        })
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<String, FetchError> {
        let mut attempt = 1;
        loop {
            let last = attempt >= self.max_attempts;
            let delay = match self.client.get(url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    debug!("{} answered {}", url, resp.status());
                    return resp.text().await.map_err(|source| FetchError::Body {
                        url: url.to_string(),
                        source,
                    });
                }
                Ok(resp) if is_retryable(resp.status()) && !last => {
                    let delay = retry_delay(resp.status(), resp.headers(), self.backoff_ms, attempt);
                    warn!(
                        "{} answered {} (attempt {}/{}), retrying in {:.1}s",
                        url,
                        resp.status(),
                        attempt,
                        self.max_attempts,
                        delay.as_secs_f64()
                    );
                    delay
                }
                Ok(resp) => {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status: resp.status(),
                    })
                }
                Err(e) if (e.is_timeout() || e.is_connect()) && !last => {
                    let delay = backoff_delay(self.backoff_ms, attempt);
                    warn!(
                        "Request to {} failed (attempt {}/{}): {}; retrying in {:.1}s",
                        url,
                        attempt,
                        self.max_attempts,
                        e,
                        delay.as_secs_f64()
                    );
                    delay
                }
                Err(source) => {
                    return Err(FetchError::Transport {
                        url: url.to_string(),
                        source,
                    })
                }
            };
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        info!("Fetching {}", url);

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Downloading eligible vehicles page");
        pb.enable_steady_tick(Duration::from_millis(120));

        let result = self.fetch_with_retry(url).await;
        pb.finish_and_clear();

        if let Ok(body) = &result {
            info!("Fetched {} bytes", body.len());
        }
        result
    }
}

pub fn is_retryable(status: StatusCode) -> bool {
    RETRY_STATUSES.contains(&status.as_u16())
}

/// Delay before the attempt following `attempt` (1-based): base, 2×base, 4×base, ...
pub fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(base_ms.saturating_mul(factor))
}

/// Server-requested wait for 413/429/503, computed back-off otherwise.
fn retry_delay(status: StatusCode, headers: &HeaderMap, base_ms: u64, attempt: u32) -> Duration {
    if RETRY_AFTER_STATUSES.contains(&status.as_u16()) {
        if let Some(delay) = headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after)
        {
            return delay;
        }
    }
    backoff_delay(base_ms, attempt)
}

/// Only the delta-seconds form is honoured; HTTP dates fall back to back-off.
fn parse_retry_after(value: &str) -> Option<Duration> {
    let secs: u64 = value.trim().parse().ok()?;
    Some(Duration::from_secs(secs.min(MAX_RETRY_AFTER_SECS)))
}

// ── Tests ──
