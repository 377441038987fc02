//! Infrastructure layer for configuration, HTTP fetching, HTML parsing,
//! CSV export, and logging
//!
//! Everything here talks to the outside world (network, filesystem,
//! terminal); the application layer stays pure over domain batches.

pub mod config;
pub mod csv_export;
pub mod http_client;
pub mod logging;
pub mod parsing;

// Re-export commonly used items
pub use config::AppConfig;
pub use http_client::{FetchError, HttpClient, PageFetcher};
pub use parsing::{BookListParser, ParsingError, ParsingResult};
