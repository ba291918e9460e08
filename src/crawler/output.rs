use crate::crawler::engine::CrawlResult;
use crate::crawler::error::CrawlerError;
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write a crawl result as pretty JSON to the given file
pub fn write_to_file(result: &CrawlResult, path: &Path) -> Result<(), CrawlerError> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, result)?;
    info!("Saved crawl result to {}", path.display());
    Ok(())
}

/// Write a crawl result as pretty JSON to any sink
pub fn write(result: &CrawlResult, mut sink: impl Write) -> Result<(), CrawlerError> {
    serde_json::to_writer_pretty(&mut sink, result)?;
    writeln!(sink)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::NamedTempFile;

    fn sample() -> CrawlResult {
        CrawlResult {
            word_counts: vec![("the".to_string(), 10), ("cat".to_string(), 3)],
            urls_visited: 4,
        }
    }

    #[test]
    fn test_write_to_file_produces_valid_json() {
        let file = NamedTempFile::new().unwrap();
        write_to_file(&sample(), file.path()).unwrap();

        let json: Value = serde_json::from_reader(file.reopen().unwrap()).unwrap();
        assert_eq!(json["urlsVisited"], 4);
        assert_eq!(json["wordCounts"][0][0], "the");
        assert_eq!(json["wordCounts"][0][1], 10);
    }

    #[test]
    fn test_write_to_sink() {
        let mut buffer = Vec::new();
        write(&sample(), &mut buffer).unwrap();

        let json: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(json["urlsVisited"], 4);
        assert_eq!(json["wordCounts"][1][0], "cat");
    }

    #[test]
    fn test_write_to_file_bad_path() {
        let result = write_to_file(&sample(), Path::new("/no/such/dir/out.json"));
        assert!(matches!(result, Err(CrawlerError::Io(_))));
    }
}
