//! HTML anchor extraction
//!
//! Pulls the raw `href` attribute of every `<a href>` element out of a page.
//! Interpretation of the values is left to the link filter.

use crate::CrawlError;
use scraper::{Html, Selector};

/// Extracts raw anchor hrefs from an HTML document, in document order
///
/// Values are returned exactly as written in the markup, so relative
/// references, fragments and foreign schemes all come through.
///
/// # Arguments
///
/// * `html` - The HTML content to scan
/// * `page_url` - The URL the document was fetched from (error context)
///
/// # Example
///
/// ```
/// use sitemap_ripple::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/page">Link</a><a>No target</a></body></html>"#;
/// let hrefs = extract_hrefs(html, "https://example.com/").unwrap();
/// assert_eq!(hrefs, vec!["/page".to_string()]);
/// ```
pub fn extract_hrefs(html: &str, page_url: &str) -> Result<Vec<String>, CrawlError> {
    let document = Html::parse_document(html);

    let selector = Selector::parse("a[href]").map_err(|e| CrawlError::Parse {
        url: page_url.to_string(),
        message: format!("invalid anchor selector: {:?}", e),
    })?;

    Ok(document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect())
}
