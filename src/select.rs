//! Candidate selection: newest feed by end date, positional fallback.

use crate::date_range::extract_date_range;
use crate::error::FetchError;
use crate::listing::ZipAnchor;
use chrono::NaiveDate;

/// One discovered downloadable archive with optional service-period dates.
/// `start` and `end` are both present or both absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub text: String,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Candidate {
    /// Builds a candidate from a listing anchor, extracting the service
    /// period from its display text. Extraction failure (malformed date
    /// token) propagates.
    pub fn from_anchor(anchor: &ZipAnchor) -> Result<Self, FetchError> {
        let range = extract_date_range(&anchor.text)?;
        let (start, end) = match range {
            Some((s, e)) => (Some(s), Some(e)),
            None => (None, None),
        };
        Ok(Candidate {
            url: anchor.url.clone(),
            text: anchor.text.clone(),
            start,
            end,
        })
    }

    fn is_dated(&self) -> bool {
        self.end.is_some()
    }
}

/// Picks exactly one candidate.
///
/// Dated candidates (service period extracted) win: the one with the
/// latest `end` date is returned, with ties resolved to the earliest
/// listed (stable sort keyed on `end` descending). If nothing is dated
/// but the list is non-empty, the fallback assumes the listing is kept
/// in chronological append order and returns a synthetic candidate for
/// the **last** anchor, with its URL standing in for the display text.
/// An empty list is a terminal [`FetchError::NoCandidatesFound`].
pub fn select_latest(candidates: &[Candidate]) -> Result<Candidate, FetchError> {
    let mut dated: Vec<&Candidate> = candidates.iter().filter(|c| c.is_dated()).collect();
    if !dated.is_empty() {
        // sort_by is stable, so equal end dates keep listing order.
        dated.sort_by(|a, b| b.end.cmp(&a.end));
        return Ok(dated[0].clone());
    }

    match candidates.last() {
        Some(last) => Ok(Candidate {
            url: last.url.clone(),
            text: last.url.clone(),
            start: None,
            end: None,
        }),
        None => Err(FetchError::NoCandidatesFound),
    }
}
