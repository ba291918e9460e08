use crate::crawler::error::CrawlerError;
use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

/// Default configuration constants
pub mod defaults {
    /// Default maximum depth for recursive crawling
    pub const MAX_DEPTH: usize = 10;

    /// Default crawl time budget in seconds
    pub const TIMEOUT_SECONDS: u64 = 30;

    /// Default number of top-ranked words reported
    pub const POPULAR_WORD_COUNT: usize = 10;
}

/// Crawler configuration as it appears in a JSON config file.
///
/// Field names follow the camelCase keys of the file format. This is the
/// raw, unvalidated form; [`CrawlerConfig::validate`] turns it into a
/// [`CrawlPlan`] the engine can run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CrawlerConfig {
    /// URLs the crawl starts from, in order
    pub starting_urls: Vec<String>,

    /// Wall-clock budget for the whole crawl, in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Maximum number of link hops from a starting URL
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Regular expressions; a URL that fully matches any of them is never crawled
    #[serde(default)]
    pub ignored_url_patterns: Vec<String>,

    /// How many of the most popular words the result reports
    #[serde(default = "default_popular_word_count")]
    pub popular_word_count: usize,

    /// Desired worker count; clamped to hardware concurrency, defaults to it
    #[serde(default)]
    pub parallelism: Option<usize>,

    /// Where to write the crawl result; stdout when absent
    #[serde(default)]
    pub result_path: Option<String>,
}

fn default_timeout_seconds() -> u64 {
    defaults::TIMEOUT_SECONDS
}

fn default_max_depth() -> usize {
    defaults::MAX_DEPTH
}

fn default_popular_word_count() -> usize {
    defaults::POPULAR_WORD_COUNT
}

impl CrawlerConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, CrawlerError> {
        let file = File::open(path)?;
        let config = Self::read(BufReader::new(file))?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Read configuration from a JSON reader
    pub fn read(reader: impl std::io::Read) -> Result<Self, CrawlerError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Validate the configuration and compile it into a runnable plan.
    ///
    /// Rejects `parallelism = 0` and malformed ignore patterns here so the
    /// engine never runs with a partially-invalid configuration.
    pub fn validate(self) -> Result<CrawlPlan, CrawlerError> {
        if self.parallelism == Some(0) {
            return Err(CrawlerError::InvalidConfig(
                "parallelism must be at least 1".to_string(),
            ));
        }

        let hardware = max_parallelism();
        let parallelism = self.parallelism.unwrap_or(hardware).min(hardware);

        // Anchor each pattern so matching is full-string, not substring.
        let ignored_url_patterns = self
            .ignored_url_patterns
            .iter()
            .map(|p| Regex::new(&format!("^(?:{})$", p)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CrawlPlan {
            starting_urls: self.starting_urls,
            timeout: Duration::from_secs(self.timeout_seconds),
            max_depth: self.max_depth,
            ignored_url_patterns,
            popular_word_count: self.popular_word_count,
            parallelism,
            result_path: self.result_path,
        })
    }
}

/// A validated, immutable crawl plan
#[derive(Debug, Clone)]
pub struct CrawlPlan {
    /// URLs the crawl starts from, in order
    pub starting_urls: Vec<String>,

    /// Wall-clock budget for the whole crawl
    pub timeout: Duration,

    /// Maximum number of link hops from a starting URL
    pub max_depth: usize,

    /// Compiled, anchored ignore patterns
    pub ignored_url_patterns: Vec<Regex>,

    /// How many of the most popular words the result reports
    pub popular_word_count: usize,

    /// Worker count, already clamped to hardware concurrency
    pub parallelism: usize,

    /// Where to write the crawl result; stdout when absent
    pub result_path: Option<String>,
}

/// Number of hardware threads available to the crawler
pub fn max_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
