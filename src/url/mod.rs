//! URL handling module for Sitemap-Ripple
//!
//! This module validates the base URL and filters the hrefs found on each
//! page down to the same-host URLs the crawler follows.

mod filter;

pub use filter::{filter_links, parse_base_url, DiscoveredLink, RelativeLinks};
