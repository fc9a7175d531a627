//! Common types and utilities shared across SiteInfo crates.
//!
//! This crate defines fetch configuration, observability helpers, and the
//! shared error type used throughout the SiteInfo workspace. It stays
//! dependency-minimal so every other crate can depend on it.
//!
//! # Overview
//!
//! - [`FetchConfig`]: knobs for the single page fetch (timeouts, redirect
//!   cap, body cap, user agent)
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`SiteInfoError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use siteinfo_common::FetchConfig;
//!
//! let cfg = FetchConfig::default();
//! assert_eq!(cfg.timeout_secs, 10);
//! assert_eq!(cfg.max_redirects, 10);
//! ```
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod observability;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default TCP connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
/// Redirect hops followed before a fetch is abandoned.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
/// Response bytes kept for parsing; anything past this is dropped.
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Settings for the one HTTP GET performed per page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Maximum number of redirects followed.
    pub max_redirects: usize,
    /// Maximum number of body bytes handed to the parser.
    pub max_body_bytes: usize,
    /// Optional `User-Agent`; when unset no custom header is sent.
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            user_agent: None,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Error types used across the SiteInfo system.
#[derive(thiserror::Error, Debug)]
pub enum SiteInfoError {
    /// A page URL could not be parsed while resolving a relative link.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HTTP client could not be built or used.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SiteInfoError {
    pub fn invalid_url(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenient alias for results that use [`SiteInfoError`].
pub type Result<T> = std::result::Result<T, SiteInfoError>;
