use crate::crawler::config::{CrawlPlan, CrawlerConfig};
use crate::crawler::error::CrawlerError;
use crate::crawler::parser::PageParser;
use crate::crawler::tally::{self, WordAccumulator};
use crate::crawler::visit::VisitGuard;

use futures::future::BoxFuture;
use futures::FutureExt;
use log::{debug, info, warn};
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// Final outcome of one crawl invocation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// The most popular words and their totals, ranked
    pub word_counts: Vec<(String, usize)>,

    /// Number of distinct URLs claimed during the crawl
    pub urls_visited: usize,
}

/// State shared by every task of one crawl invocation.
///
/// The deadline and ignore patterns are read-only; the visited set and the
/// accumulator are the only mutable shared state.
struct CrawlContext {
    deadline: Instant,
    visited: VisitGuard,
    counts: WordAccumulator,
    ignored_url_patterns: Vec<Regex>,
    parser: Arc<dyn PageParser>,
    fetch_slots: Semaphore,
}

impl CrawlContext {
    fn is_ignored(&self, url: &str) -> bool {
        self.ignored_url_patterns.iter().any(|re| re.is_match(url))
    }

    fn deadline_passed(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// Visit one URL and recursively crawl the pages it links to.
///
/// `remaining_depth` is the number of link hops this branch may still take:
/// the page itself is processed (claim, fetch, merge) whenever the deadline,
/// ignore, and claim checks pass, and children are spawned only while hops
/// remain. A fetch failure abandons the branch without touching siblings.
/// The returned future completes only after every spawned child completes.
fn visit(ctx: Arc<CrawlContext>, url: String, remaining_depth: usize) -> BoxFuture<'static, ()> {
    async move {
        if ctx.deadline_passed() {
            debug!("Deadline passed, abandoning {}", url);
            return;
        }
        if ctx.is_ignored(&url) {
            debug!("Ignoring {}", url);
            return;
        }
        if !ctx.visited.try_claim(&url) {
            debug!("Already visited {}", url);
            return;
        }

        // Permit held only for the fetch; the pool stays free while this
        // task merges counts and waits on its children.
        let page = {
            let Ok(_permit) = ctx.fetch_slots.acquire().await else {
                return;
            };
            // Queueing for a permit can outlast the budget; a fetch must
            // never start past the deadline.
            if ctx.deadline_passed() {
                debug!("Deadline passed while queued for a fetch slot, abandoning {}", url);
                return;
            }
            match ctx.parser.parse(&url).await {
                Ok(page) => page,
                Err(e) => {
                    warn!("Failed to fetch {}: {}", url, e);
                    return;
                }
            }
        };

        ctx.counts.merge(&page.word_counts);

        if remaining_depth == 0 {
            return;
        }

        let children: Vec<_> = page
            .links
            .into_iter()
            .map(|link| tokio::spawn(visit(ctx.clone(), link, remaining_depth - 1)))
            .collect();

        for child in children {
            if let Err(e) = child.await {
                warn!("Crawl task panicked: {}", e);
            }
        }
    }
    .boxed()
}

/// Orchestrates a whole crawl: spawns one root task per starting URL, waits
/// for the forest to drain, and ranks the accumulated word counts.
pub struct CrawlerEngine {
    plan: CrawlPlan,
    parser: Arc<dyn PageParser>,
}

impl CrawlerEngine {
    /// Create an engine from an already-validated plan
    pub fn new(plan: CrawlPlan, parser: Arc<dyn PageParser>) -> Self {
        Self { plan, parser }
    }

    /// Validate a raw configuration and create an engine from it
    pub fn from_config(
        config: CrawlerConfig,
        parser: Arc<dyn PageParser>,
    ) -> Result<Self, CrawlerError> {
        Ok(Self::new(config.validate()?, parser))
    }

    /// Run the crawl to completion.
    ///
    /// Never fails once the configuration is valid: fetch failures are
    /// absorbed per branch and the deadline cuts branches off cooperatively,
    /// so the worst case is an empty result.
    pub async fn crawl(&self) -> CrawlResult {
        info!(
            "Starting crawl: {} starting URLs, max depth {}, timeout {:?}, {} workers",
            self.plan.starting_urls.len(),
            self.plan.max_depth,
            self.plan.timeout,
            self.plan.parallelism,
        );

        let ctx = Arc::new(CrawlContext {
            deadline: Instant::now() + self.plan.timeout,
            visited: VisitGuard::new(),
            counts: WordAccumulator::new(),
            ignored_url_patterns: self.plan.ignored_url_patterns.clone(),
            parser: self.parser.clone(),
            fetch_slots: Semaphore::new(self.plan.parallelism),
        });

        let roots: Vec<_> = self
            .plan
            .starting_urls
            .iter()
            .map(|url| tokio::spawn(visit(ctx.clone(), url.clone(), self.plan.max_depth)))
            .collect();

        for root in roots {
            if let Err(e) = root.await {
                warn!("Crawl task panicked: {}", e);
            }
        }

        let urls_visited = ctx.visited.len();
        let word_counts = if ctx.counts.is_empty() {
            Vec::new()
        } else {
            tally::rank(&ctx.counts.totals(), self.plan.popular_word_count)
        };

        info!(
            "Crawl complete: {} URLs visited, {} popular words",
            urls_visited,
            word_counts.len()
        );

        CrawlResult {
            word_counts,
            urls_visited,
        }
    }
}
