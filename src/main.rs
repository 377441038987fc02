//! Pipeline binary: scrape the catalogue, persist the records, build the
//! derived datasets, and print the insight report.

use anyhow::{Context, Result, bail};
use std::env;
use std::path::PathBuf;
use tracing::info;

use book_insight::application::crawler::CatalogueCrawler;
use book_insight::application::insights::CatalogueInsights;
use book_insight::application::{datasets, features};
use book_insight::infrastructure::config::AppConfig;
use book_insight::infrastructure::http_client::HttpClient;
use book_insight::infrastructure::{csv_export, logging};

fn main() -> Result<()> {
    let config_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("book-insight.json"));
    let config = AppConfig::load(&config_path).context("loading configuration")?;
    logging::init_logging(&config.logging)?;

    let client = HttpClient::new(&config.crawling).context("building HTTP client")?;
    let crawler = CatalogueCrawler::new(&client, config.crawling.clone())
        .context("compiling listing selectors")?;
    let outcome = crawler.run().context("crawling catalogue")?;

    if outcome.records.is_empty() {
        bail!(
            "no records extracted ({} of {} pages skipped); nothing to analyze",
            outcome.pages_skipped,
            config.crawling.max_pages
        );
    }

    csv_export::write_records(&config.output.records_path(), &outcome.records)
        .context("writing records dataset")?;

    let derived = features::derive_features(&outcome.records).context("deriving features")?;

    let vip = datasets::vip_catalog(&derived).context("building VIP catalog")?;
    csv_export::write_derived(&config.output.vip_catalog_path(), &vip)
        .context("writing VIP catalog")?;

    let risky = datasets::risk_audit(&derived);
    csv_export::write_derived(&config.output.risk_audit_path(), &risky)
        .context("writing risk audit")?;

    let summary = datasets::pricing_summary(&derived);
    csv_export::write_pricing_summary(&config.output.pricing_summary_path(), &summary)
        .context("writing pricing summary")?;

    let keywords = datasets::marketing_keywords(&derived);
    csv_export::write_keywords(&config.output.marketing_keywords_path(), &keywords)
        .context("writing marketing keywords")?;

    let insights = CatalogueInsights::from_batch(&derived).context("building insight report")?;
    println!("{insights}");

    info!(
        session = %outcome.session_id,
        records = outcome.records.len(),
        pages_skipped = outcome.pages_skipped,
        "pipeline complete"
    );
    Ok(())
}
