//! Service-period extraction from listing link text.
//!
//! Feed archives on the listing page usually carry their service period in
//! the link text as `YYYY_MM_DD` tokens (e.g. "rozklad 2024_03_15 -
//! 2024_06_20.zip"). The first token is the start, the second the end; a
//! lone token means a single-day (or open-ended) feed.

use crate::error::FetchError;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

const DATE_TOKEN_PATTERN: &str = r"\d{4}_\d{2}_\d{2}";
const DATE_TOKEN_FORMAT: &str = "%Y_%m_%d";

/// Cached compiled pattern; compiled once per process.
static DATE_TOKEN_REGEX: OnceLock<Regex> = OnceLock::new();

fn date_token_regex() -> &'static Regex {
    DATE_TOKEN_REGEX.get_or_init(|| {
        Regex::new(DATE_TOKEN_PATTERN).expect("DATE_TOKEN_PATTERN is a valid regex")
    })
}

/// Extracts the (start, end) service period from `text`.
///
/// Scans for non-overlapping `YYYY_MM_DD` tokens left to right:
/// - zero tokens → `Ok(None)`
/// - one token `T` → `Ok(Some((T, T)))`
/// - two or more → `Ok(Some((first, second)))`; later tokens are ignored
///   and never parsed.
///
/// Tokens are taken in textual order with no chronological reordering, so
/// a listing that prints the end date first yields start > end. Selection
/// only ever compares `end`, so this is left as observed.
///
/// A token with the right digit shape but an invalid calendar date (e.g.
/// month 13) fails with [`FetchError::InvalidDateToken`].
pub fn extract_date_range(text: &str) -> Result<Option<(NaiveDate, NaiveDate)>, FetchError> {
    let mut matches = date_token_regex().find_iter(text);

    let first = match matches.next() {
        Some(m) => parse_token(m.as_str())?,
        None => return Ok(None),
    };
    let second = match matches.next() {
        Some(m) => parse_token(m.as_str())?,
        None => first,
    };
    Ok(Some((first, second)))
}

fn parse_token(token: &str) -> Result<NaiveDate, FetchError> {
    NaiveDate::parse_from_str(token, DATE_TOKEN_FORMAT).map_err(|_| {
        FetchError::InvalidDateToken {
            token: token.to_string(),
        }
    })
}
