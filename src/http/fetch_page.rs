//! Listing-page fetch: one GET, body returned as text.

use super::{build_easy, check_status, should_retry_insecure, transport, TransportOptions};
use crate::error::FetchError;

/// Fetches `url` and returns the response body as text.
///
/// Follows redirects; the whole request is bounded by
/// [`TransportOptions::page_timeout`]. On a TLS verification failure the
/// request is retried once with verification disabled (see module docs).
/// A non-2xx status is a terminal [`FetchError::HttpStatus`].
pub fn fetch_page(url: &str, opts: &TransportOptions) -> Result<String, FetchError> {
    match fetch_page_once(url, opts, true) {
        Err(err) if should_retry_insecure(&err, opts) => {
            tracing::warn!(
                url = %url,
                "TLS verification failed; retrying once with verification disabled"
            );
            fetch_page_once(url, opts, false)
        }
        other => other,
    }
}

fn fetch_page_once(
    url: &str,
    opts: &TransportOptions,
    verify_tls: bool,
) -> Result<String, FetchError> {
    let mut easy = build_easy(url, verify_tls, Some(opts.page_timeout))?;

    let mut body: Vec<u8> = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer
            .write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })
            .map_err(|e| transport(url, e))?;
        transfer.perform().map_err(|e| transport(url, e))?;
    }

    check_status(&mut easy, url)?;

    // Listing pages are effectively ASCII; lossy decoding keeps a stray
    // byte from killing the run.
    Ok(String::from_utf8_lossy(&body).into_owned())
}
