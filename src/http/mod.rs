//! HTTP transport built on libcurl: listing-page fetch and archive download.
//!
//! Both request kinds share one TLS policy: verify against the system trust
//! bundle, and on a TLS verification failure retry the same request once
//! with verification disabled. The fallback is a deliberate trade-off
//! inherited from the feed publisher's broken certificate chain; it is
//! gated by [`TransportOptions::allow_insecure_fallback`] and logged loudly
//! whenever it triggers.

mod download;
mod fetch_page;

pub use download::download_to_path;
pub use fetch_page::fetch_page;

use crate::error::FetchError;
use std::time::Duration;

/// Connect timeout applied to every request.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-run transport options.
#[derive(Debug, Clone, Copy)]
pub struct TransportOptions {
    /// Whole-request bound for the listing-page fetch.
    pub page_timeout: Duration,
    /// Retry once with certificate verification disabled after a TLS
    /// verification failure.
    pub allow_insecure_fallback: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            page_timeout: Duration::from_secs(30),
            allow_insecure_fallback: true,
        }
    }
}

/// Builds a configured Easy handle for a GET. `total_timeout` bounds the
/// whole transfer when set; downloads instead rely on libcurl's low-speed
/// stall detection so large archives are not cut off mid-stream.
fn build_easy(
    url: &str,
    verify_tls: bool,
    total_timeout: Option<Duration>,
) -> Result<curl::easy::Easy, FetchError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url).map_err(|e| transport(url, e))?;
    easy.get(true).map_err(|e| transport(url, e))?;
    easy.follow_location(true).map_err(|e| transport(url, e))?;
    easy.max_redirections(10).map_err(|e| transport(url, e))?;
    easy.connect_timeout(CONNECT_TIMEOUT)
        .map_err(|e| transport(url, e))?;
    if let Some(t) = total_timeout {
        easy.timeout(t).map_err(|e| transport(url, e))?;
    }
    if !verify_tls {
        easy.ssl_verify_peer(false).map_err(|e| transport(url, e))?;
        easy.ssl_verify_host(false).map_err(|e| transport(url, e))?;
    }
    Ok(easy)
}

fn transport(url: &str, source: curl::Error) -> FetchError {
    FetchError::Transport {
        url: url.to_string(),
        source,
    }
}

/// True when the error is a TLS verification failure eligible for the
/// one-shot insecure retry. Other transport failures are never retried.
fn should_retry_insecure(err: &FetchError, opts: &TransportOptions) -> bool {
    if !opts.allow_insecure_fallback {
        return false;
    }
    match err {
        FetchError::Transport { source, .. } => {
            source.is_ssl_connect_error()
                || source.is_peer_failed_verification()
                || source.is_ssl_certproblem()
        }
        _ => false,
    }
}

fn check_status(easy: &mut curl::easy::Easy, url: &str) -> Result<(), FetchError> {
    let code = easy.response_code().map_err(|e| transport(url, e))?;
    if !(200..300).contains(&code) {
        return Err(FetchError::HttpStatus {
            url: url.to_string(),
            code,
        });
    }
    Ok(())
}
