//! Report link discovery in the market page HTML.

use scraper::{Html, Selector};
use url::Url;

use crate::FetchError;

/// Locate the report attachment link and resolve it against `base`.
///
/// The market page carries its downloads in a `report_attachment_links`
/// paragraph; the first anchor inside it is the current report. The page is
/// server-rendered and this structure has been stable for years, so anything
/// missing is treated as a hard acquisition failure rather than silently
/// producing an empty table.
pub fn find_report_link(html: &str, base: &Url) -> Result<Url, FetchError> {
    let document = Html::parse_document(html);

    let container = Selector::parse("p.report_attachment_links")
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .ok_or(FetchError::MissingAttachmentContainer)?;

    let href = Selector::parse("a[href]")
        .ok()
        .and_then(|selector| container.select(&selector).next())
        .and_then(|anchor| anchor.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .ok_or(FetchError::MissingAttachmentLink)?;

    base.join(href).map_err(|source| FetchError::BadLink {
        href: href.to_string(),
        base: base.clone(),
        source,
    })
}
