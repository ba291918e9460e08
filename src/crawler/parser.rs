use crate::crawler::error::CrawlerError;
use futures::future::BoxFuture;
use futures::FutureExt;
use log::debug;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Everything extracted from one fetched page
#[derive(Debug, Clone, Default)]
pub struct PageData {
    /// Word frequencies on the page
    pub word_counts: HashMap<String, usize>,

    /// Outbound links found on the page, as absolute URLs
    pub links: Vec<String>,
}

/// Fetches a URL and turns it into word counts and outbound links.
///
/// Object-safe so the engine can share one parser across all crawl tasks;
/// tests substitute an in-memory implementation.
pub trait PageParser: Send + Sync {
    /// Fetch and parse one page
    fn parse<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<PageData, CrawlerError>>;
}

/// Page parser backed by a real HTTP client
pub struct HttpPageParser {
    client: Client,
}

impl HttpPageParser {
    /// Create a parser with its own HTTP client
    pub fn new() -> Result<Self, CrawlerError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .timeout(Duration::from_secs(30))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT,
                    "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                        .parse()
                        .unwrap(),
                );
                headers.insert(
                    reqwest::header::ACCEPT_LANGUAGE,
                    "en-US,en;q=0.5".parse().unwrap(),
                );
                headers
            })
            .build()
            .map_err(|e| CrawlerError::HttpClient(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn fetch(&self, url: &str) -> Result<String, CrawlerError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(CrawlerError::HttpStatus(format!(
                "HTTP error status: {} for {}",
                response.status(),
                url
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();

        if !content_type.contains("text/html") && !content_type.contains("application/xhtml+xml") {
            return Err(CrawlerError::ContentType(format!(
                "Not HTML content: {}",
                content_type
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| CrawlerError::PageParse(format!("Failed to read body: {}", e)))?;

        Ok(html)
    }
}

impl PageParser for HttpPageParser {
    fn parse<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<PageData, CrawlerError>> {
        async move {
            let base = Url::parse(url)?;
            let html = self.fetch(url).await?;
            Ok(parse_page(&html, &base))
        }
        .boxed()
    }
}

/// Extract word counts and absolute outbound links from an HTML document
pub fn parse_page(html: &str, base: &Url) -> PageData {
    let document = Html::parse_document(html);

    let word_counts = count_words(&document);
    let links = extract_links(&document, base);
    debug!("Parsed {}: {} words, {} links", base, word_counts.len(), links.len());

    PageData { word_counts, links }
}

fn count_words(document: &Html) -> HashMap<String, usize> {
    let mut counts = HashMap::new();

    for text in document.root_element().text() {
        for token in text.split(|c: char| !c.is_alphanumeric()) {
            if token.is_empty() {
                continue;
            }
            *counts.entry(token.to_lowercase()).or_insert(0) += 1;
        }
    }

    counts
}

fn extract_links(document: &Html, base: &Url) -> Vec<String> {
    let selector = Selector::parse("a[href]").unwrap();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("javascript:")
            || href.starts_with("mailto:")
        {
            continue;
        }

        match base.join(href) {
            Ok(absolute) => links.push(absolute.to_string()),
            Err(e) => debug!("Failed to resolve link {}: {}", href, e),
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://example.com/start").unwrap()
    }

    #[test]
    fn test_parse_page_counts_words_case_insensitively() {
        let html = "<html><body><p>The cat and the hat</p></body></html>";
        let page = parse_page(html, &base());
        assert_eq!(page.word_counts.get("the"), Some(&2));
        assert_eq!(page.word_counts.get("cat"), Some(&1));
        assert_eq!(page.word_counts.get("hat"), Some(&1));
    }

    #[test]
    fn test_parse_page_splits_on_punctuation() {
        let html = "<html><body><p>one,two;three-four</p></body></html>";
        let page = parse_page(html, &base());
        assert_eq!(page.word_counts.len(), 4);
        assert_eq!(page.word_counts.get("three"), Some(&1));
    }

    #[test]
    fn test_parse_page_resolves_relative_links() {
        let html = r#"<html><body><a href="/next">next</a></body></html>"#;
        let page = parse_page(html, &base());
        assert_eq!(page.links, vec!["http://example.com/next"]);
    }

    #[test]
    fn test_parse_page_keeps_absolute_links() {
        let html = r#"<html><body><a href="http://other.com/page">x</a></body></html>"#;
        let page = parse_page(html, &base());
        assert_eq!(page.links, vec!["http://other.com/page"]);
    }

    #[test]
    fn test_parse_page_skips_fragment_and_scheme_links() {
        let html = concat!(
            r##"<html><body>"##,
            r##"<a href="#section">anchor</a>"##,
            r##"<a href="javascript:void(0)">js</a>"##,
            r##"<a href="mailto:x@example.com">mail</a>"##,
            r##"<a href="/real">real</a>"##,
            r##"</body></html>"##,
        );
        let page = parse_page(html, &base());
        assert_eq!(page.links, vec!["http://example.com/real"]);
    }

    #[test]
    fn test_parse_page_empty_document() {
        let page = parse_page("<html></html>", &base());
        assert!(page.word_counts.get("html").is_none());
        assert!(page.links.is_empty());
    }

    #[tokio::test]
    async fn test_http_parser_fetches_and_parses() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"<html><body><p>hello hello world</p><a href="/next">go</a></body></html>"#;
        let mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(body)
            .create_async()
            .await;

        let parser = HttpPageParser::new().unwrap();
        let url = format!("{}/page", server.url());
        let page = parser.parse(&url).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.word_counts.get("hello"), Some(&2));
        assert_eq!(page.word_counts.get("world"), Some(&1));
        assert_eq!(page.links, vec![format!("{}/next", server.url())]);
    }

    #[tokio::test]
    async fn test_http_parser_rejects_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let parser = HttpPageParser::new().unwrap();
        let url = format!("{}/missing", server.url());
        let result = parser.parse(&url).await;

        assert!(matches!(result, Err(CrawlerError::HttpStatus(_))));
    }

    #[tokio::test]
    async fn test_http_parser_rejects_non_html() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/data")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{}")
            .create_async()
            .await;

        let parser = HttpPageParser::new().unwrap();
        let url = format!("{}/data", server.url());
        let result = parser.parse(&url).await;

        assert!(matches!(result, Err(CrawlerError::ContentType(_))));
    }
}
