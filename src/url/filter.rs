//! Same-host link filtering
//!
//! Turns the raw `href` values found on a page into the absolute, same-host
//! URLs the crawler follows.

use crate::{UrlError, UrlResult};
use serde::Deserialize;
use std::collections::HashMap;
use url::{ParseError, Url};

/// How an href that is relative to the current page (no scheme, no leading
/// `/`) is handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelativeLinks {
    /// Keep the href exactly as written
    #[default]
    Verbatim,

    /// Resolve it against the page it appeared on, drop the fragment, and
    /// apply the same-host check
    ResolveAgainstPage,
}

/// A URL accepted from one page, with how often it appeared there
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// The accepted URL
    pub url: String,

    /// Number of anchors on the page that produced this URL
    pub occurrences: u32,
}

/// Parses and checks the crawl's base URL
///
/// The base must be an absolute `http`/`https` URL with a host. Any
/// fragment is dropped; the query is kept.
///
/// # Examples
///
/// ```
/// use sitemap_ripple::url::parse_base_url;
///
/// let base = parse_base_url("https://example.com").unwrap();
/// assert_eq!(base.as_str(), "https://example.com/");
///
/// assert!(parse_base_url("ftp://example.com/").is_err());
/// assert!(parse_base_url("/relative").is_err());
/// ```
pub fn parse_base_url(raw: &str) -> UrlResult<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| UrlError::InvalidBase(format!("'{}': {}", raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidBase(format!(
            "'{}': only http and https are supported, got {}",
            raw,
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::InvalidBase(format!("'{}': missing host", raw)));
    }

    // The base is tracked under exactly one key
    url.set_fragment(None);
    Ok(url)
}

/// Filters a page's raw hrefs down to same-host URLs
///
/// # Rules
///
/// | href | Result |
/// |------|--------|
/// | empty | skipped |
/// | unparseable | whole call fails with [`UrlError::Malformed`] |
/// | `/path` | base origin + href |
/// | `path`, `?q`, `#frag` | per [`RelativeLinks`] (verbatim by default) |
/// | `http(s)://` same host and port | accepted |
/// | `http(s)://` other host | discarded |
/// | any other scheme | discarded |
///
/// The result holds each URL once, in order of first appearance.
///
/// # Arguments
///
/// * `page_url` - The page the hrefs came from (error context)
/// * `base_url` - The crawl's base URL
/// * `raw_hrefs` - The href attribute values, in document order
/// * `relative` - Policy for page-relative hrefs
///
/// # Examples
///
/// ```
/// use sitemap_ripple::url::{filter_links, parse_base_url, RelativeLinks};
///
/// let base = parse_base_url("https://example.com/").unwrap();
/// let links = filter_links(
///     base.as_str(),
///     &base,
///     &["/about", "mailto:x@y.com", "https://other.com/page", "/about"],
///     RelativeLinks::Verbatim,
/// )
/// .unwrap();
///
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].url, "https://example.com/about");
/// assert_eq!(links[0].occurrences, 2);
/// ```
pub fn filter_links<S: AsRef<str>>(
    page_url: &str,
    base_url: &Url,
    raw_hrefs: &[S],
    relative: RelativeLinks,
) -> UrlResult<Vec<DiscoveredLink>> {
    let mut links: Vec<DiscoveredLink> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for raw in raw_hrefs {
        let href = raw.as_ref().trim();
        if href.is_empty() {
            continue;
        }

        let Some(accepted) = accept_href(page_url, base_url, href, relative)? else {
            tracing::trace!("Discarding link {} on {}", href, page_url);
            continue;
        };

        match positions.get(&accepted) {
            Some(&index) => links[index].occurrences += 1,
            None => {
                positions.insert(accepted.clone(), links.len());
                links.push(DiscoveredLink {
                    url: accepted,
                    occurrences: 1,
                });
            }
        }
    }

    Ok(links)
}

/// Applies the filter rules to one href
///
/// `Ok(None)` means the href is well formed but not followed.
fn accept_href(
    page_url: &str,
    base_url: &Url,
    href: &str,
    relative: RelativeLinks,
) -> UrlResult<Option<String>> {
    match Url::parse(href) {
        Ok(absolute) => {
            if absolute.scheme() != "http" && absolute.scheme() != "https" {
                return Ok(None);
            }
            if is_same_host(&absolute, base_url) {
                Ok(Some(absolute.to_string()))
            } else {
                Ok(None)
            }
        }
        Err(ParseError::RelativeUrlWithoutBase) => {
            resolve_relative(page_url, base_url, href, relative)
        }
        Err(e) => Err(malformed(href, page_url, e)),
    }
}

/// Handles an href without a scheme
fn resolve_relative(
    page_url: &str,
    base_url: &Url,
    href: &str,
    relative: RelativeLinks,
) -> UrlResult<Option<String>> {
    // Reject references that no base could make sense of
    base_url
        .join(href)
        .map_err(|e| malformed(href, page_url, e))?;

    if href.starts_with('/') {
        let root = base_url.origin().ascii_serialization();
        let resolved =
            Url::parse(&format!("{}{}", root, href)).map_err(|e| malformed(href, page_url, e))?;
        return Ok(Some(resolved.to_string()));
    }

    match relative {
        RelativeLinks::Verbatim => Ok(Some(href.to_string())),
        RelativeLinks::ResolveAgainstPage => {
            let page = Url::parse(page_url).map_err(|e| malformed(href, page_url, e))?;
            let mut resolved = page.join(href).map_err(|e| malformed(href, page_url, e))?;
            resolved.set_fragment(None);
            if is_same_host(&resolved, base_url) {
                Ok(Some(resolved.to_string()))
            } else {
                Ok(None)
            }
        }
    }
}

/// Exact host and port comparison; subdomains are different hosts
fn is_same_host(candidate: &Url, base_url: &Url) -> bool {
    candidate.host_str() == base_url.host_str() && candidate.port() == base_url.port()
}

fn malformed(href: &str, page_url: &str, error: ParseError) -> UrlError {
    UrlError::Malformed {
        href: href.to_string(),
        page: page_url.to_string(),
        reason: error.to_string(),
    }
}
