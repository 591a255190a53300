//! Sitemap XML emission

use crate::output::ordering::SitemapEntry;
use std::io::{self, Write};

/// Namespace of the sitemaps.org protocol
pub const SITEMAP_XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Streams a sitemap document to any writer
///
/// The preamble and the opening `urlset` tag are written on construction;
/// [`SitemapWriter::finish`] closes the envelope and flushes.
pub struct SitemapWriter<W: Write> {
    writer: W,
    url_count: usize,
}

impl<W: Write> SitemapWriter<W> {
    pub fn new(mut writer: W) -> io::Result<Self> {
        writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(writer, r#"<urlset xmlns="{}">"#, SITEMAP_XMLNS)?;

        Ok(Self {
            writer,
            url_count: 0,
        })
    }

    pub fn add_entry(&mut self, entry: &SitemapEntry) -> io::Result<()> {
        writeln!(self.writer, "  <url>")?;
        writeln!(self.writer, "    <loc>{}</loc>", escape_xml(&entry.loc))?;
        writeln!(
            self.writer,
            "    <priority>{}</priority>",
            entry.priority_text()
        )?;
        writeln!(self.writer, "  </url>")?;
        self.url_count += 1;
        Ok(())
    }

    /// Closes the document and returns how many URLs it holds
    pub fn finish(mut self) -> io::Result<usize> {
        writeln!(self.writer, "</urlset>")?;
        self.writer.flush()?;
        Ok(self.url_count)
    }
}

/// Writes a complete sitemap for `entries`, in the order given
pub fn write_sitemap<W: Write>(writer: W, entries: &[SitemapEntry]) -> io::Result<usize> {
    let mut sitemap = SitemapWriter::new(writer)?;
    for entry in entries {
        sitemap.add_entry(entry)?;
    }
    sitemap.finish()
}

/// Renders a complete sitemap into a string
///
/// # Examples
///
/// ```
/// use sitemap_ripple::output::{render_sitemap, SitemapEntry};
///
/// let xml = render_sitemap(&[SitemapEntry {
///     loc: "https://site.test/".to_string(),
///     priority: 0.5,
/// }])
/// .unwrap();
/// assert!(xml.contains("<priority>0.50000</priority>"));
/// ```
pub fn render_sitemap(entries: &[SitemapEntry]) -> io::Result<String> {
    let mut buffer = Vec::new();
    write_sitemap(&mut buffer, entries)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(loc: &str, priority: f64) -> SitemapEntry {
        SitemapEntry {
            loc: loc.to_string(),
            priority,
        }
    }

    #[test]
    fn test_full_document_layout() {
        let xml = render_sitemap(&[
            entry("https://example.com/a", 1.0),
            entry("https://example.com/b", 0.0),
        ])
        .unwrap();

        let expected = concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
            "  <url>\n",
            "    <loc>https://example.com/a</loc>\n",
            "    <priority>1.00000</priority>\n",
            "  </url>\n",
            "  <url>\n",
            "    <loc>https://example.com/b</loc>\n",
            "    <priority>0.00000</priority>\n",
            "  </url>\n",
            "</urlset>\n",
        );
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_loc_is_escaped() {
        let xml = render_sitemap(&[entry("https://example.com/?a=1&b=<2>", 0.5)]).unwrap();
        assert!(xml.contains("<loc>https://example.com/?a=1&amp;b=&lt;2&gt;</loc>"));
    }

    #[test]
    fn test_quotes_are_escaped() {
        assert_eq!(escape_xml(r#"a"b'c"#), "a&quot;b&apos;c");
    }

    #[test]
    fn test_writer_counts_entries() {
        let mut buffer = Vec::new();
        let count = write_sitemap(
            &mut buffer,
            &[
                entry("https://example.com/", 0.5),
                entry("https://example.com/x", 0.5),
                entry("https://example.com/y", 0.5),
            ],
        )
        .unwrap();

        assert_eq!(count, 3);
        let xml = String::from_utf8(buffer).unwrap();
        assert_eq!(xml.matches("<url>").count(), 3);
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn test_entries_keep_given_order() {
        let xml = render_sitemap(&[
            entry("https://example.com/z", 1.0),
            entry("https://example.com/a", 0.5),
        ])
        .unwrap();

        let z = xml.find("/z<").unwrap();
        let a = xml.find("/a<").unwrap();
        assert!(z < a);
    }
}
