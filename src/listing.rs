//! Listing-page parsing: the ordered set of `.zip` anchors.
//!
//! The publisher's page is a plain directory-style listing. We only care
//! about anchor elements whose raw `href` ends in `.zip` (case-sensitive);
//! everything else on the page is noise. Parsing is best-effort: malformed
//! HTML never aborts the run, it just yields whatever anchors the lenient
//! tree construction recovers.

use scraper::{Html, Selector};
use std::sync::OnceLock;
use url::Url;

const ZIP_LINK_SELECTOR: &str = r#"a[href$=".zip"]"#;

static ZIP_LINK_SELECTOR_CACHED: OnceLock<Selector> = OnceLock::new();

/// One anchor from the listing page whose target ends in `.zip`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZipAnchor {
    /// Absolute download URL (relative hrefs resolved against the page URL).
    pub url: String,
    /// Anchor visible text, whitespace-trimmed; may be empty.
    pub text: String,
}

/// Extracts every `.zip` anchor from `html`, in document order.
///
/// Anchors without an `href`, or whose href cannot be resolved against
/// `base_url`, are excluded. Document order matters downstream: when no
/// anchor carries a parseable date range, the selector falls back to the
/// last one listed.
pub fn zip_anchors(html: &str, base_url: &Url) -> Vec<ZipAnchor> {
    let document = Html::parse_document(html);

    let selector = ZIP_LINK_SELECTOR_CACHED.get_or_init(|| {
        Selector::parse(ZIP_LINK_SELECTOR).expect("ZIP_LINK_SELECTOR is a valid CSS selector")
    });

    document
        .select(selector)
        .filter_map(|el| {
            let href = el.value().attr("href")?;
            let url = base_url.join(href).ok()?;
            let text = el.text().collect::<String>().trim().to_string();
            Some(ZipAnchor {
                url: url.to_string(),
                text,
            })
        })
        .collect()
}
