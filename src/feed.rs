//! End-to-end pipeline: fetch the listing, pick the newest feed, download.
//!
//! Strictly sequential: fetch → parse → annotate → select → download. The
//! first failure aborts the whole run.

use crate::error::FetchError;
use crate::http::{self, TransportOptions};
use crate::listing;
use crate::select::{self, Candidate};
use std::path::Path;
use url::Url;

/// Fetches the listing page and returns the selected candidate without
/// downloading anything.
pub fn latest_feed(page_url: &Url, opts: &TransportOptions) -> Result<Candidate, FetchError> {
    let html = http::fetch_page(page_url.as_str(), opts)?;
    let anchors = listing::zip_anchors(&html, page_url);
    tracing::debug!(anchors = anchors.len(), "parsed listing page");

    let candidates = anchors
        .iter()
        .map(Candidate::from_anchor)
        .collect::<Result<Vec<_>, _>>()?;
    let chosen = select::select_latest(&candidates)?;

    match chosen.end {
        Some(end) => tracing::info!(url = %chosen.url, end = %end, "selected feed by end date"),
        None => tracing::info!(url = %chosen.url, "no dated candidates; taking last listed archive"),
    }
    Ok(chosen)
}

/// Full run: select the newest feed and stream it to `dest`, overwriting
/// any existing file. Returns the chosen candidate and the byte count.
pub fn fetch_latest(
    page_url: &Url,
    dest: &Path,
    opts: &TransportOptions,
) -> Result<(Candidate, u64), FetchError> {
    let chosen = latest_feed(page_url, opts)?;
    let bytes = http::download_to_path(&chosen.url, dest, opts)?;
    Ok((chosen, bytes))
}
