pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod parser;
pub mod tally;
pub mod visit;

pub use config::{max_parallelism, CrawlPlan, CrawlerConfig};
pub use engine::{CrawlResult, CrawlerEngine};
pub use error::CrawlerError;
pub use parser::{HttpPageParser, PageData, PageParser};
