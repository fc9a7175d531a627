//! Minimal HTTP client for fetching HTML pages with safe logging.
//!
//! - One GET per call, redirects followed up to a fixed cap
//! - Whole-request and connect timeouts from [`FetchConfig`]
//! - Response bodies are read incrementally and cut at `max_body_bytes`
//! - No retries; the caller decides what a failure means
//! - Optional *raw* request/response logging via `SITEINFO_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), siteinfo_http::HttpError> {
//! use siteinfo_common::FetchConfig;
//!
//! let client = siteinfo_http::HttpClient::new(&FetchConfig::default())?;
//! let page = client.get_page("https://example.com/").await?;
//! println!("{} bytes from {}", page.body.len(), page.final_url);
//! # Ok(()) }
//! ```
//!
//! Security: URL passwords are never logged; logs show `<redacted>` in
//! their place.

use reqwest::header::{CONTENT_LENGTH, HeaderMap};
use reqwest::{Client, StatusCode, Url, redirect};
use siteinfo_common::FetchConfig;
use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use thiserror::Error;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "SITEINFO_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024; // cap raw body logs (64 KiB)

static NEXT_REQ_ID: AtomicU64 = AtomicU64::new(1);

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug, with credentials redacted.
fn make_curl(url: &Url, user_agent: Option<&str>) -> String {
    let mut parts = vec!["curl".to_string(), "-L".to_string()];
    if let Some(ua) = user_agent {
        parts.push(format!("-A '{}'", ua.replace('\'', r"'\''")));
    }
    parts.push(format!("'{}'", redact_url(url)));
    parts.join(" ")
}

/// URL string safe for logs: the password (if any) is replaced.
pub fn redact_url(url: &Url) -> String {
    if url.password().is_none() {
        return url.as_str().to_string();
    }
    let mut shown = url.clone();
    let _ = shown.set_password(Some("<redacted>"));
    shown.as_str().to_string()
}

fn header_pairs(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if key.eq_ignore_ascii_case("set-cookie") {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("client build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status} for {url}")]
    Status { status: StatusCode, url: String },
}

// ==============================
// Response
// ==============================

/// Body of a successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after all redirects.
    pub final_url: Url,
    pub status: StatusCode,
    /// Body decoded lossily as UTF-8.
    pub body: String,
    /// Whether bytes past `max_body_bytes` were dropped.
    pub truncated: bool,
}

// ==============================
// Client
// ==============================

#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: Client,
    user_agent: Option<String>,
    pub timeout: Duration,
    pub max_body_bytes: usize,
}

impl HttpClient {
    /// Build a client from fetch settings.
    ///
    /// ```no_run
    /// use siteinfo_common::FetchConfig;
    /// use siteinfo_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new(&FetchConfig::default())?;
    /// assert_eq!(client.timeout, Duration::from_secs(10));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(cfg: &FetchConfig) -> Result<Self, HttpError> {
        let mut builder = Client::builder()
            .connect_timeout(cfg.connect_timeout())
            .timeout(cfg.timeout())
            .redirect(redirect::Policy::limited(cfg.max_redirects));
        if let Some(ua) = &cfg.user_agent {
            builder = builder.user_agent(ua.as_str());
        }
        let inner = builder
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            user_agent: cfg.user_agent.clone(),
            timeout: cfg.timeout(),
            max_body_bytes: cfg.max_body_bytes,
        })
    }

    /// GET `url` and return its (possibly truncated) body.
    ///
    /// Non-2xx responses are errors; their bodies are not read past the
    /// snippet used for logging.
    pub async fn get_page(&self, url: &str) -> Result<FetchedPage, HttpError> {
        let url = Url::parse(url).map_err(|e| HttpError::Url(e.to_string()))?;
        let req_id = format!("r{}", NEXT_REQ_ID.fetch_add(1, Ordering::Relaxed));
        let shown_url = redact_url(&url);

        tracing::debug!(
            req_id=%req_id,
            url=%shown_url,
            timeout_ms=self.timeout.as_millis() as u64,
            max_body_bytes=self.max_body_bytes,
            "http.request.start"
        );

        if raw_enabled() {
            let curl = make_curl(&url, self.user_agent.as_deref());
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        // ----- Send -----
        let t0 = Instant::now();
        let mut resp = self.inner.get(url.clone()).send().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(
                req_id=%req_id,
                url=%shown_url,
                is_timeout=err.is_timeout(),
                is_redirect=err.is_redirect(),
                message=%message,
                "http.network_error.send"
            );
            HttpError::Network(message)
        })?;

        let status = resp.status();
        let final_url = resp.url().clone();
        let headers = resp.headers().clone();

        tracing::debug!(
            req_id=%req_id,
            %status,
            final_url=%redact_url(&final_url),
            content_length=?declared_len(&headers),
            "http.response.headers"
        );

        if !status.is_success() {
            tracing::warn!(
                req_id=%req_id,
                %status,
                url=%shown_url,
                "http.error"
            );
            return Err(HttpError::Status {
                status,
                url: shown_url,
            });
        }

        // ----- Body (capped) -----
        let mut bytes: Vec<u8> = Vec::new();
        let mut truncated = false;
        loop {
            let chunk = match resp.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(err) => {
                    let message = err.to_string();
                    tracing::warn!(
                        req_id=%req_id,
                        message=%message,
                        "http.network_error.body"
                    );
                    return Err(HttpError::Network(message));
                }
            };
            let room = self.max_body_bytes.saturating_sub(bytes.len());
            if chunk.len() > room {
                bytes.extend_from_slice(&chunk[..room]);
                truncated = true;
                break;
            }
            bytes.extend_from_slice(&chunk);
        }
        let dur_ms = t0.elapsed().as_millis() as u64;

        if truncated {
            tracing::warn!(
                req_id=%req_id,
                kept_bytes=bytes.len(),
                "http.response.truncated"
            );
        }

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=bytes.len(),
            truncated,
            "http.response.done"
        );

        if raw_enabled() {
            let hdrs = header_pairs(&headers);
            let end = bytes.len().min(RAW_MAX_BODY);
            let text = String::from_utf8_lossy(&bytes[..end]);
            tracing::info!(
                target:"http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?hdrs,
                body=%text,
                truncated=bytes.len() > RAW_MAX_BODY
            );
        }

        tracing::trace!(
            req_id=%req_id,
            body_snippet=%snip_body(&bytes),
            "http.response.body_snippet"
        );

        Ok(FetchedPage {
            final_url,
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
            truncated,
        })
    }
}

// ==============================
// Helpers
// ==============================

fn snip_body(body: &[u8]) -> String {
    let end = body.len().min(500);
    let mut snip = String::from_utf8_lossy(&body[..end]).into_owned();
    if body.len() > 500 {
        snip.push_str("...");
    }
    snip
}

fn declared_len(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok())
}
