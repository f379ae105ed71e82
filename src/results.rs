use serde::{Deserialize, Serialize};
use std::fmt;

/// A matched page as persisted in a category file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// URL of the page (canonical URL if the page declares one)
    pub url: String,

    /// Title of the page (empty if absent)
    pub title: String,

    /// Keywords found in the page text, in keyword-list order
    pub keywords_matched: Vec<String>,

    /// Leading snippet of the extracted page text
    pub content: String,

    /// Absolute URLs of downloadable files discovered on the page
    #[serde(default)]
    pub files: Vec<String>,
}

impl PageRecord {
    /// Create a new page record
    pub fn new(
        url: String,
        title: String,
        keywords_matched: Vec<String>,
        content: String,
        files: Vec<String>,
    ) -> Self {
        Self {
            url,
            title,
            keywords_matched,
            content,
            files,
        }
    }
}

/// Per-category counts reported after a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// URLs the batch was asked to scrape
    pub attempted: usize,

    /// Pages that produced a record
    pub matched: usize,

    /// Pages fetched successfully but containing no keyword
    pub no_match: usize,

    /// Fetches that failed (network, timeout, non-2xx)
    pub failed: usize,

    /// Fetches abandoned after an interrupt was requested
    pub skipped: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempted, {} matched, {} without matches, {} failed, {} skipped",
            self.attempted, self.matched, self.no_match, self.failed, self.skipped
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_roundtrips_through_json() {
        let record = PageRecord::new(
            "https://example.com/post".to_string(),
            "A Post".to_string(),
            vec!["rust".to_string()],
            "Some content".to_string(),
            vec!["https://example.com/paper.pdf".to_string()],
        );

        let json = serde_json::to_string(&record).unwrap();
        let back: PageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn record_without_files_field_still_parses() {
        // Category files written before file discovery existed lack `files`
        let json = r#"{
            "url": "https://example.com",
            "title": "Old",
            "keywords_matched": ["rust"],
            "content": "text"
        }"#;

        let record: PageRecord = serde_json::from_str(json).unwrap();
        assert!(record.files.is_empty());
    }
}
