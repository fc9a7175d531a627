use anyhow::{Context, Result};
use clap::Parser;
use futures::future::join_all;
use siteinfo_common::observability::{LogConfig, init_logging};
use siteinfo_config::{SiteInfoConfig, SiteInfoConfigLoader};
use siteinfo_web::{MetadataExtractor, PageLoader};
use std::io::Write;
use std::path::PathBuf;

mod cli;
mod report;

fn default_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("siteinfo")
            .join("siteinfo.yaml")
    })
}

fn load_config(args: &cli::Args) -> Result<SiteInfoConfig> {
    let loader = SiteInfoConfigLoader::new();
    let loader = match (&args.config, default_config_path()) {
        (Some(path), _) => loader.with_file(path),
        (None, Some(path)) => loader.with_optional_file(path),
        (None, None) => loader,
    };
    loader.load().context("failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    // 1) Config: file < env < flags
    let mut cfg = load_config(&args)?;
    args.apply_overrides(&mut cfg.fetch);

    // 2) Logging
    init_logging(LogConfig {
        log_dir: cfg.log.dir.clone(),
        emit_stderr: cfg.log.stderr || args.verbose,
        format: cfg.log.format,
        default_filter: cfg.log.level.clone(),
        ..LogConfig::default()
    })?;
    tracing::info!(urls = args.urls.len(), fetch = ?cfg.fetch, "siteinfo.start");

    // 3) Fetch everything at once; each page is independent
    let loader = PageLoader::new(&cfg.fetch)?;
    let pages = join_all(
        args.urls
            .iter()
            .map(|url| MetadataExtractor::fetch(&loader, url)),
    )
    .await;

    let mut out = std::io::stdout().lock();
    for (idx, page) in pages.iter().enumerate() {
        let rendered = report::render(page, args.field, args.json)
            .with_context(|| format!("failed to resolve metadata for {}", page.url()))?;
        if idx > 0 && !args.json && args.field.is_none() {
            writeln!(out)?;
        }
        writeln!(out, "{rendered}")?;
    }
    Ok(())
}
