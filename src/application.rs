//! Application layer
//!
//! Orchestrates the domain logic: pagination-driven crawling, batch
//! feature derivation, aggregation queries, and the derived datasets and
//! insight report built on top of them. Everything except the crawler is
//! a pure function over immutable batches.

pub mod analytics;
pub mod crawler;
pub mod datasets;
pub mod features;
pub mod insights;

// Re-export commonly used items
pub use analytics::{AnalyticsError, CorrelationMatrix};
pub use crawler::{CatalogueCrawler, CrawlOutcome};
pub use features::derive_features;
pub use insights::CatalogueInsights;
