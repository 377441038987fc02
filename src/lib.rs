//! book-insight - Book Catalogue Crawling and Market Analytics Pipeline
//!
//! This crate scrapes a paginated book-catalogue website into typed records,
//! persists them as CSV datasets, and derives segment features, grouped
//! statistics, and keyword frequencies from the scraped batch.

// Module declarations
pub mod domain;
pub mod application;
pub mod infrastructure;

// Re-export the pipeline surface for easier access
pub use application::crawler::{CatalogueCrawler, CrawlOutcome};
pub use domain::book::{BookRecord, DerivedRecord, KeywordCount, PriceSegment, RatingSummary};
