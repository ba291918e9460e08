use anyhow::Result;
use env_logger::Env;
use log::info;
use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use wordcrawl::crawler::{output, CrawlerConfig, CrawlerEngine, HttpPageParser};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // Get command line arguments
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: {} <config.json>", args[0]);
        println!();
        println!("The config file describes the crawl:");
        println!("  startingUrls       - URLs to start from (required)");
        println!("  timeoutSeconds     - wall-clock budget for the whole crawl");
        println!("  maxDepth           - how many link hops to follow");
        println!("  ignoredUrlPatterns - regexes for URLs to never visit");
        println!("  popularWordCount   - how many top words to report");
        println!("  parallelism        - worker count, clamped to hardware");
        println!("  resultPath         - output file; stdout when absent");
        return Ok(());
    }

    let config = CrawlerConfig::load(Path::new(&args[1]))?;
    let result_path = config.result_path.clone();

    let parser = Arc::new(HttpPageParser::new()?);
    let engine = CrawlerEngine::from_config(config, parser)?;

    let start = Instant::now();
    let result = engine.crawl().await;
    info!("Crawl completed in {:?}", start.elapsed());

    match result_path {
        Some(path) => output::write_to_file(&result, Path::new(&path))?,
        None => output::write(&result, std::io::stdout().lock())?,
    }

    Ok(())
}
