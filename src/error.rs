//! Error types for the fetch/select/download pipeline.
//!
//! One enum covers every terminal failure so callers (and tests) can tell
//! a transport problem apart from a bad listing. There is no partial-success
//! mode: the first error aborts the run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure on a GET (DNS, connect, timeout, or TLS after
    /// the one verification-disabled retry).
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// Server answered with a non-2xx status. Fatal, never retried.
    #[error("GET {url} returned HTTP {code}")]
    HttpStatus { url: String, code: u32 },

    /// A text span matched the date-token digit pattern but is not a valid
    /// calendar date. Surfaced rather than skipped so a broken listing
    /// cannot silently mis-select a feed.
    #[error("invalid date token in link text: {token:?}")]
    InvalidDateToken { token: String },

    /// The listing page contains no `.zip` links at all.
    #[error("no .zip links found on the listing page")]
    NoCandidatesFound,

    /// Local file I/O failed while writing the archive.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
}
