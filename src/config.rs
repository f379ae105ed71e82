use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::filter;

/// Configuration for a scrape run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Directory containing the keyword and category list files
    #[serde(default = "default_input_dir")]
    pub input_dir: String,

    /// File with one keyword per line, relative to `input_dir`
    #[serde(default = "default_keywords_file")]
    pub keywords_file: String,

    /// Categories to scrape; each reads `<input_dir>/<category>.txt`
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Directory the per-category JSON files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Maximum number of concurrent page requests
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Path extensions treated as downloadable files
    #[serde(default = "filter::default_extensions")]
    pub file_extensions: Vec<String>,

    /// Whether to mirror discovered files to disk
    #[serde(default)]
    pub download_files: bool,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            keywords_file: default_keywords_file(),
            categories: default_categories(),
            output_dir: default_output_dir(),
            max_concurrency: default_max_concurrency(),
            request_timeout_secs: default_request_timeout_secs(),
            file_extensions: filter::default_extensions(),
            download_files: false,
            user_agent: default_user_agent(),
        }
    }
}

impl ScrapeConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Path of the keyword list file
    pub fn keywords_path(&self) -> PathBuf {
        Path::new(&self.input_dir).join(&self.keywords_file)
    }

    /// Path of the URL list file for `category`
    pub fn category_path(&self, category: &str) -> PathBuf {
        Path::new(&self.input_dir).join(format!("{category}.txt"))
    }
}

/// Default directory for input list files
fn default_input_dir() -> String {
    ".".to_string()
}

/// Default keyword list filename
fn default_keywords_file() -> String {
    "keywords.txt".to_string()
}

/// Default category set
fn default_categories() -> Vec<String> {
    ["articles", "books", "news", "regular"]
        .iter()
        .map(|category| category.to_string())
        .collect()
}

/// Default output directory
fn default_output_dir() -> String {
    "scraped_data".to_string()
}

/// Default value for max_concurrency
fn default_max_concurrency() -> usize {
    10
}

/// Default per-request timeout
fn default_request_timeout_secs() -> u64 {
    30
}

/// Default User-Agent header
pub(crate) fn default_user_agent() -> String {
    format!("sift-page/{}", env!("CARGO_PKG_VERSION"))
}
