//! Configuration infrastructure
//!
//! Configuration is organized into three tiers: crawling (where and how
//! fast to fetch), output (where the datasets land), and logging. Values
//! come from an optional JSON file; missing files and missing fields fall
//! back to the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use url::Url;

/// Placeholder substituted with the page number in the base URL template.
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Default configuration values.
pub mod defaults {
    pub const BASE_URL_TEMPLATE: &str = "http://books.toscrape.com/catalogue/page-{page}.html";
    pub const MAX_PAGES: u32 = 5;
    pub const REQUEST_DELAY_MS: u64 = 1000;
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
    pub const USER_AGENT: &str = "book-insight/0.2 (catalogue research tool)";

    pub const DATA_DIR: &str = "data";
    pub const RECORDS_FILE: &str = "books_ecommerce_data.csv";
    pub const VIP_CATALOG_FILE: &str = "dataset_1_vip_catalog.csv";
    pub const RISK_AUDIT_FILE: &str = "dataset_2_risk_audit.csv";
    pub const PRICING_SUMMARY_FILE: &str = "dataset_3_pricing_summary.csv";
    pub const MARKETING_KEYWORDS_FILE: &str = "dataset_4_marketing_keywords.csv";

    pub const LOG_LEVEL: &str = "info";
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io { path: String, source: io::Error },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("base URL template '{template}' does not contain the {{page}} placeholder")]
    MissingPlaceholder { template: String },

    #[error("base URL template does not form a valid URL ({url}): {source}")]
    InvalidUrl { url: String, source: url::ParseError },
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub crawling: CrawlingConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Crawl target and politeness settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlingConfig {
    /// Listing page URL template; `{page}` is replaced by the page number.
    pub base_url_template: String,

    /// Pages 1..=max_pages are fetched in order.
    pub max_pages: u32,

    /// Fixed politeness delay between page fetches in milliseconds.
    pub request_delay_ms: u64,

    /// Per-request timeout in seconds.
    pub request_timeout_seconds: u64,

    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for CrawlingConfig {
    fn default() -> Self {
        Self {
            base_url_template: defaults::BASE_URL_TEMPLATE.to_string(),
            max_pages: defaults::MAX_PAGES,
            request_delay_ms: defaults::REQUEST_DELAY_MS,
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            user_agent: defaults::USER_AGENT.to_string(),
        }
    }
}

impl CrawlingConfig {
    /// Build the concrete URL for one listing page.
    pub fn page_url(&self, page: u32) -> String {
        self.base_url_template
            .replace(PAGE_PLACEHOLDER, &page.to_string())
    }
}

/// Output directory and dataset file names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub data_dir: PathBuf,
    pub records_file: String,
    pub vip_catalog_file: String,
    pub risk_audit_file: String,
    pub pricing_summary_file: String,
    pub marketing_keywords_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(defaults::DATA_DIR),
            records_file: defaults::RECORDS_FILE.to_string(),
            vip_catalog_file: defaults::VIP_CATALOG_FILE.to_string(),
            risk_audit_file: defaults::RISK_AUDIT_FILE.to_string(),
            pricing_summary_file: defaults::PRICING_SUMMARY_FILE.to_string(),
            marketing_keywords_file: defaults::MARKETING_KEYWORDS_FILE.to_string(),
        }
    }
}

impl OutputConfig {
    pub fn records_path(&self) -> PathBuf {
        self.data_dir.join(&self.records_file)
    }

    pub fn vip_catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.vip_catalog_file)
    }

    pub fn risk_audit_path(&self) -> PathBuf {
        self.data_dir.join(&self.risk_audit_file)
    }

    pub fn pricing_summary_path(&self) -> PathBuf {
        self.data_dir.join(&self.pricing_summary_file)
    }

    pub fn marketing_keywords_path(&self) -> PathBuf {
        self.data_dir.join(&self.marketing_keywords_file)
    }
}

/// Logging configuration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, falling back to defaults when
    /// the file does not exist. Missing fields take their default values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?
        } else {
            info!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the crawl target template is usable before any fetch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let template = &self.crawling.base_url_template;
        if !template.contains(PAGE_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder {
                template: template.clone(),
            });
        }
        let sample = self.crawling.page_url(1);
        Url::parse(&sample).map_err(|source| ConfigError::InvalidUrl {
            url: sample.clone(),
            source,
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn page_url_substitutes_page_number() {
        let config = CrawlingConfig::default();
        assert_eq!(
            config.page_url(3),
            "http://books.toscrape.com/catalogue/page-3.html"
        );
    }

    #[test]
    fn default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load(Path::new("no-such-config.json")).unwrap();
        assert_eq!(config.crawling.max_pages, defaults::MAX_PAGES);
        assert_eq!(config.logging.level, defaults::LOG_LEVEL);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"crawling": {{"max_pages": 2}}}}"#).unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.crawling.max_pages, 2);
        assert_eq!(config.crawling.request_delay_ms, defaults::REQUEST_DELAY_MS);
        assert_eq!(config.output.records_file, defaults::RECORDS_FILE);
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let mut config = AppConfig::default();
        config.crawling.base_url_template =
            "http://books.toscrape.com/catalogue/page-1.html".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingPlaceholder { .. })
        ));
    }

    #[test]
    fn template_that_is_not_a_url_is_rejected() {
        let mut config = AppConfig::default();
        config.crawling.base_url_template = "catalogue/page-{page}.html".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn output_paths_join_data_dir() {
        let output = OutputConfig::default();
        assert_eq!(
            output.records_path(),
            PathBuf::from("data").join("books_ecommerce_data.csv")
        );
    }
}
