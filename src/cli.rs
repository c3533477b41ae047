//! CLI for the gtfs-fetch downloader.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::config::{self, FetchConfig};
use crate::feed;
use crate::http::TransportOptions;

/// Download the newest GTFS archive linked from a static listing page.
#[derive(Debug, Parser)]
#[command(name = "gtfs-fetch")]
#[command(about = "Download the newest GTFS archive from a listing page", long_about = None)]
pub struct Cli {
    /// Listing page URL (overrides the config file).
    #[arg(long)]
    pub url: Option<String>,

    /// Destination path for the archive (overrides the config file).
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Print the selected archive URL without downloading it.
    #[arg(long)]
    pub dry_run: bool,

    /// Fail on TLS verification errors instead of retrying insecurely.
    #[arg(long)]
    pub strict_tls: bool,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        Cli::parse().run()
    }

    pub fn run(self) -> Result<()> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let raw_url = self.url.as_deref().unwrap_or(&cfg.listing_url);
        let page_url = Url::parse(raw_url)
            .with_context(|| format!("invalid listing page URL: {raw_url}"))?;
        let opts = self.transport_options(&cfg);
        let dest = self
            .output
            .unwrap_or_else(|| PathBuf::from(&cfg.output_path));

        if self.dry_run {
            let chosen = feed::latest_feed(&page_url, &opts)?;
            println!("{}", chosen.url);
            return Ok(());
        }

        let (chosen, bytes) = feed::fetch_latest(&page_url, &dest, &opts)?;
        println!(
            "Downloaded {} ({} bytes) -> {}",
            chosen.url,
            bytes,
            dest.display()
        );
        Ok(())
    }

    /// Transport options for this run. The insecure-TLS fallback stays on
    /// only when the config allows it and `--strict-tls` was not given.
    fn transport_options(&self, cfg: &FetchConfig) -> TransportOptions {
        TransportOptions {
            page_timeout: Duration::from_secs(cfg.page_timeout_secs),
            allow_insecure_fallback: cfg.allow_insecure_fallback && !self.strict_tls,
        }
    }
}
