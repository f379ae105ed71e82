use std::collections::HashSet;

use scraper::{Html, Selector};
use url::Url;

use crate::filter::FileLinkFilter;
use crate::results::PageRecord;

/// Maximum number of characters kept from the extracted page text
pub const CONTENT_SNIPPET_CHARS: usize = 500;

#[derive(Debug)]
struct Keyword {
    raw: String,
    lowered: String,
}

/// Extracts a [`PageRecord`] from raw HTML when the page matches the keyword set
#[derive(Debug)]
pub struct Extractor {
    keywords: Vec<Keyword>,
    link_filter: FileLinkFilter,
}

impl Extractor {
    /// Build an extractor over a keyword set.
    ///
    /// Keywords are deduplicated case-insensitively, preserving list order,
    /// and matched as case-insensitive substrings of the page text.
    pub fn new(keywords: &[String], link_filter: FileLinkFilter) -> Self {
        let mut seen = HashSet::new();
        let mut deduped = Vec::new();
        for raw in keywords {
            let lowered = raw.to_lowercase();
            if seen.insert(lowered.clone()) {
                deduped.push(Keyword {
                    raw: raw.clone(),
                    lowered,
                });
            }
        }

        Self {
            keywords: deduped,
            link_filter,
        }
    }

    /// Produce a record if at least one keyword appears in the page text.
    ///
    /// Pages with no match yield `None` and are not recorded.
    pub fn extract(&self, page_url: &str, html: &str) -> Option<PageRecord> {
        let doc = Html::parse_document(html);

        let text = visible_text(&doc);
        let lowered = text.to_lowercase();
        let keywords_matched: Vec<String> = self
            .keywords
            .iter()
            .filter(|keyword| lowered.contains(&keyword.lowered))
            .map(|keyword| keyword.raw.clone())
            .collect();
        if keywords_matched.is_empty() {
            return None;
        }

        let url = canonical_url(&doc).unwrap_or_else(|| page_url.to_string());
        let files = self.collect_file_links(&doc, page_url);
        let content: String = text.chars().take(CONTENT_SNIPPET_CHARS).collect();

        Some(PageRecord::new(
            url,
            title_text(&doc),
            keywords_matched,
            content,
            files,
        ))
    }

    /// Collect links to downloadable files.
    ///
    /// A link qualifies if its resolved URL path ends in a configured
    /// extension and its filename or anchor text contains a keyword.
    /// Results are absolute, fragment-free, and deduplicated in discovery
    /// order.
    fn collect_file_links(&self, doc: &Html, page_url: &str) -> Vec<String> {
        let Ok(base) = Url::parse(page_url) else {
            ::log::debug!("Not resolving file links, invalid base URL: {}", page_url);
            return Vec::new();
        };

        let anchor_selector = Selector::parse("a").unwrap();
        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for anchor in doc.select(&anchor_selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let Ok(resolved) = base.join(href) else {
                ::log::debug!("Skipping unresolvable link: {}", href);
                continue;
            };
            if !self.link_filter.is_downloadable(&resolved) {
                continue;
            }

            let file_name = self.link_filter.file_name(&resolved).to_lowercase();
            let anchor_text = anchor
                .text()
                .collect::<Vec<_>>()
                .join(" ")
                .to_lowercase();
            let relevant = self
                .keywords
                .iter()
                .any(|kw| file_name.contains(&kw.lowered) || anchor_text.contains(&kw.lowered));
            if !relevant {
                continue;
            }

            let normalized = self.link_filter.normalize_url(&resolved).to_string();
            if seen.insert(normalized.clone()) {
                files.push(normalized);
            }
        }

        ::log::debug!("Found {} file links in {}", files.len(), page_url);
        files
    }
}

/// Extracts all visible body text, joined with single spaces
fn visible_text(doc: &Html) -> String {
    let body_selector = Selector::parse("body").unwrap();
    doc.select(&body_selector)
        .flat_map(|n| n.text())
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts the `<title>` text (empty string if absent)
fn title_text(doc: &Html) -> String {
    let title_selector = Selector::parse("title").unwrap();
    doc.select(&title_selector)
        .flat_map(|n| n.text())
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The page's declared canonical URL, if any
fn canonical_url(doc: &Html) -> Option<String> {
    let canonical_selector = Selector::parse(r#"link[rel="canonical"]"#).unwrap();
    doc.select(&canonical_selector)
        .find_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(keywords: &[&str]) -> Extractor {
        let keywords: Vec<String> = keywords.iter().map(|kw| kw.to_string()).collect();
        Extractor::new(&keywords, FileLinkFilter::default())
    }

    const PAGE_URL: &str = "https://example.com/learn";

    #[test]
    fn no_keyword_match_produces_no_record() {
        let html = "<title>Test</title><body>Nothing relevant here</body>";
        let result = extractor(&["python", "scraping"]).extract(PAGE_URL, html);
        assert!(result.is_none());
    }

    #[test]
    fn matched_page_produces_expected_record() {
        let html = "<title>Test</title><body>Learn python scraping here</body>";
        let record = extractor(&["python", "scraping"])
            .extract(PAGE_URL, html)
            .unwrap();

        assert_eq!(record.url, PAGE_URL);
        assert_eq!(record.title, "Test");
        assert_eq!(record.keywords_matched, vec!["python", "scraping"]);
        assert_eq!(record.content, "Learn python scraping here");
        assert!(record.files.is_empty());
    }

    #[test]
    fn matching_is_case_insensitive_and_preserves_keyword_casing() {
        let html = "<body>All about PYTHON tooling</body>";
        let record = extractor(&["Python"]).extract(PAGE_URL, html).unwrap();
        assert_eq!(record.keywords_matched, vec!["Python"]);
    }

    #[test]
    fn matched_keywords_are_distinct_in_keyword_list_order() {
        let html = "<body>scraping scraping with python and more python</body>";
        let record = extractor(&["python", "Python", "scraping"])
            .extract(PAGE_URL, html)
            .unwrap();
        assert_eq!(record.keywords_matched, vec!["python", "scraping"]);
    }

    #[test]
    fn missing_title_yields_empty_string() {
        let html = "<body>python content</body>";
        let record = extractor(&["python"]).extract(PAGE_URL, html).unwrap();
        assert_eq!(record.title, "");
    }

    #[test]
    fn canonical_link_overrides_page_url() {
        let html = r#"<head><link rel="canonical" href="https://example.com/real"></head>
                      <body>python</body>"#;
        let record = extractor(&["python"]).extract(PAGE_URL, html).unwrap();
        assert_eq!(record.url, "https://example.com/real");
    }

    #[test]
    fn content_is_truncated_to_snippet_length() {
        let long_text = "python ".repeat(200);
        let html = format!("<body>{}</body>", long_text);
        let record = extractor(&["python"]).extract(PAGE_URL, &html).unwrap();
        assert_eq!(record.content.chars().count(), CONTENT_SNIPPET_CHARS);
    }

    #[test]
    fn short_content_is_kept_whole() {
        let html = "<body>short python text</body>";
        let record = extractor(&["python"]).extract(PAGE_URL, html).unwrap();
        assert_eq!(record.content, "short python text");
    }

    #[test]
    fn file_links_are_resolved_deduplicated_and_gated_by_extension() {
        let html = r#"<body>python downloads:
            <a href="/files/python-guide.pdf">guide</a>
            <a href="/files/python-guide.pdf#intro">same guide</a>
            <a href="/files/python-styles.css">styles</a>
            <a href="https://cdn.example.net/python-talk.zip">talk</a>
        </body>"#;
        let record = extractor(&["python"]).extract(PAGE_URL, html).unwrap();
        assert_eq!(
            record.files,
            vec![
                "https://example.com/files/python-guide.pdf",
                "https://cdn.example.net/python-talk.zip",
            ]
        );
    }

    #[test]
    fn file_link_qualifies_via_anchor_text() {
        let html = r#"<body>python material
            <a href="/dl/9f31c2.pdf">python cheat sheet</a>
            <a href="/dl/unrelated.pdf">brochure</a>
        </body>"#;
        let record = extractor(&["python"]).extract(PAGE_URL, html).unwrap();
        assert_eq!(record.files, vec!["https://example.com/dl/9f31c2.pdf"]);
    }
}
