use clap::{Parser, ValueEnum};
use siteinfo_common::FetchConfig;
use std::path::PathBuf;

/// Fetch web pages and print their preview metadata.
#[derive(Debug, Parser)]
#[command(name = "siteinfo", version)]
pub struct Args {
    /// Pages to inspect; fetched concurrently.
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// YAML config file (default: ~/.config/siteinfo/siteinfo.yaml if present).
    #[arg(short, long, env = "SITEINFO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Whole-request timeout in seconds.
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Redirect hops to follow.
    #[arg(long)]
    pub max_redirects: Option<usize>,

    /// User-Agent header to send.
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Print only this field.
    #[arg(short, long, value_enum)]
    pub field: Option<Field>,

    /// One JSON object per page instead of `key: value` lines.
    #[arg(long)]
    pub json: bool,

    /// Also log to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Field {
    Title,
    Description,
    Keywords,
    Icon,
    Image,
}

impl Field {
    pub fn key(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Keywords => "keywords",
            Field::Icon => "icon",
            Field::Image => "image",
        }
    }
}

impl Args {
    /// Command-line flags win over file and environment settings.
    pub fn apply_overrides(&self, fetch: &mut FetchConfig) {
        if let Some(secs) = self.timeout {
            fetch.timeout_secs = secs;
        }
        if let Some(n) = self.max_redirects {
            fetch.max_redirects = n;
        }
        if let Some(ua) = &self.user_agent {
            fetch.user_agent = Some(ua.clone());
        }
    }
}
