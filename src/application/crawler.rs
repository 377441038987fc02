//! Pagination-driven catalogue crawling
//!
//! Fetches listing pages 1..=max_pages in order, parses each into records,
//! and concatenates the batches. A page that fails to fetch is skipped and
//! counted, never fatal; a page that parses to zero records contributes
//! nothing. Fetches are strictly sequential with a fixed politeness delay
//! in between.

use chrono::{DateTime, Utc};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::book::BookRecord;
use crate::infrastructure::config::CrawlingConfig;
use crate::infrastructure::http_client::PageFetcher;
use crate::infrastructure::parsing::{BookListParser, ParsingResult};

/// Result of one crawl session.
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub session_id: String,
    /// All extracted records, page order then within-page order.
    pub records: Vec<BookRecord>,
    /// Pages that returned a body and were parsed.
    pub pages_fetched: u32,
    /// Pages skipped after a fetch failure.
    pub pages_skipped: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Sequential crawler over a paginated catalogue.
pub struct CatalogueCrawler<'a, F: PageFetcher> {
    fetcher: &'a F,
    parser: BookListParser,
    config: CrawlingConfig,
}

impl<'a, F: PageFetcher> CatalogueCrawler<'a, F> {
    pub fn new(fetcher: &'a F, config: CrawlingConfig) -> ParsingResult<Self> {
        Ok(Self {
            fetcher,
            parser: BookListParser::new()?,
            config,
        })
    }

    /// Crawl pages 1..=max_pages and concatenate the extracted records.
    ///
    /// Fetch failures skip the page; parsing failures (a structurally
    /// present page with an unusable record) abort the run.
    pub fn run(&self) -> ParsingResult<CrawlOutcome> {
        let session_id = Uuid::new_v4().to_string();
        let started_at = Utc::now();
        info!(
            session = %session_id,
            max_pages = self.config.max_pages,
            "starting catalogue crawl"
        );

        let mut records = Vec::new();
        let mut pages_fetched = 0;
        let mut pages_skipped = 0;

        for page in 1..=self.config.max_pages {
            let url = self.config.page_url(page);
            match self.fetcher.fetch_page(&url) {
                Ok(body) => {
                    let page_records = self.parser.parse(&body, page)?;
                    info!(page, records = page_records.len(), "page scraped");
                    pages_fetched += 1;
                    records.extend(page_records);
                }
                Err(err) => {
                    warn!(page, %url, error = %err, "failed to retrieve page, skipping");
                    pages_skipped += 1;
                }
            }

            if page < self.config.max_pages {
                thread::sleep(Duration::from_millis(self.config.request_delay_ms));
            }
        }

        let finished_at = Utc::now();
        info!(
            session = %session_id,
            records = records.len(),
            pages_fetched,
            pages_skipped,
            "crawl finished"
        );

        Ok(CrawlOutcome {
            session_id,
            records,
            pages_fetched,
            pages_skipped,
            started_at,
            finished_at,
        })
    }
}
