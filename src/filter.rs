use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Configuration for classifying link targets as downloadable files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileLinkConfig {
    /// Path extensions (without the leading dot) treated as downloadable
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for FileLinkConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

/// Default set of binary/document extensions worth recording
pub(crate) fn default_extensions() -> Vec<String> {
    [
        "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "jpg", "jpeg", "png", "gif", "zip",
        "rar",
    ]
    .iter()
    .map(|ext| ext.to_string())
    .collect()
}

/// Classifies link targets by path extension
#[derive(Debug)]
pub struct FileLinkFilter {
    extension_regex: Regex,
}

impl Default for FileLinkFilter {
    fn default() -> Self {
        Self::new(&FileLinkConfig::default()).expect("Default extension patterns should be valid")
    }
}

impl FileLinkFilter {
    /// Create a new filter from configuration
    pub fn new(config: &FileLinkConfig) -> Result<Self, regex::Error> {
        let alternation = config
            .extensions
            .iter()
            .map(|ext| regex::escape(ext.trim_start_matches('.')))
            .collect::<Vec<_>>()
            .join("|");
        let extension_regex = Regex::new(&format!(r"(?i)\.({})$", alternation))?;

        Ok(Self { extension_regex })
    }

    /// Determine if a URL path ends in a configured downloadable extension
    pub fn is_downloadable(&self, url: &Url) -> bool {
        self.extension_regex.is_match(url.path())
    }

    /// Final path segment of the URL (empty when the path ends in '/')
    pub fn file_name<'a>(&self, url: &'a Url) -> &'a str {
        url.path().rsplit('/').next().unwrap_or("")
    }

    /// Create a normalized version of the URL (e.g., removing fragments)
    pub fn normalize_url(&self, url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let filter = FileLinkFilter::default();

        let pdf_url = Url::parse("https://example.com/paper.pdf").unwrap();
        assert!(filter.is_downloadable(&pdf_url));

        let html_url = Url::parse("https://example.com/page.html").unwrap();
        assert!(!filter.is_downloadable(&html_url));

        // Extension matching ignores case
        let shouty_url = Url::parse("https://example.com/PAPER.PDF").unwrap();
        assert!(filter.is_downloadable(&shouty_url));

        // Query strings are not part of the path
        let query_url = Url::parse("https://example.com/paper.pdf?v=2").unwrap();
        assert!(filter.is_downloadable(&query_url));
    }

    #[test]
    fn test_configured_extensions() {
        let config = FileLinkConfig {
            extensions: vec!["epub".to_string(), ".mobi".to_string()],
        };
        let filter = FileLinkFilter::new(&config).unwrap();

        let epub_url = Url::parse("https://example.com/book.epub").unwrap();
        assert!(filter.is_downloadable(&epub_url));

        // A leading dot in the configured extension is tolerated
        let mobi_url = Url::parse("https://example.com/book.mobi").unwrap();
        assert!(filter.is_downloadable(&mobi_url));

        let pdf_url = Url::parse("https://example.com/book.pdf").unwrap();
        assert!(!filter.is_downloadable(&pdf_url));
    }

    #[test]
    fn test_file_name() {
        let filter = FileLinkFilter::default();

        let url = Url::parse("https://example.com/papers/2024/report.pdf").unwrap();
        assert_eq!(filter.file_name(&url), "report.pdf");

        let dir_url = Url::parse("https://example.com/papers/").unwrap();
        assert_eq!(filter.file_name(&dir_url), "");
    }

    #[test]
    fn test_normalize_url() {
        let filter = FileLinkFilter::default();

        let url = Url::parse("https://example.com/doc.pdf#page=3").unwrap();
        let normalized = filter.normalize_url(&url);
        assert_eq!(normalized.as_str(), "https://example.com/doc.pdf");
    }
}
