//! Book record types shared across the pipeline
//!
//! A `BookRecord` is created once per extracted listing-page entry and is
//! immutable afterwards. Everything else in this module is a derived view:
//! a pure function of a batch of records, never written back to the source.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Star-rating labels used by the catalogue markup, mapped to 1..=5.
/// Any other label (or a missing rating element) maps to the 0 sentinel;
/// this is a defined fallback, not an error.
pub fn rating_from_label(label: &str) -> u8 {
    match label {
        "One" => 1,
        "Two" => 2,
        "Three" => 3,
        "Four" => 4,
        "Five" => 5,
        _ => 0,
    }
}

/// One scraped catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    /// Human-readable title taken from the product link's label attribute.
    pub title: String,
    /// Displayed price in GBP, normalized to a non-negative decimal.
    pub price: f64,
    /// Star rating 1..=5, or 0 when the rating label was unrecognized.
    pub rating: u8,
    /// Literal trimmed text of the availability indicator. Not parsed.
    pub availability: String,
}

impl AsRef<BookRecord> for BookRecord {
    fn as_ref(&self) -> &BookRecord {
        self
    }
}

/// Price tier assigned by equal-frequency (tertile) binning over the
/// batch's own price distribution. Never a fixed price threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceSegment {
    Budget,
    MidRange,
    Premium,
}

impl PriceSegment {
    /// Label used in exported datasets and reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Budget => "Budget",
            Self::MidRange => "Mid-Range",
            Self::Premium => "Premium",
        }
    }

    /// All segments in ascending price order.
    pub const ALL: [PriceSegment; 3] = [Self::Budget, Self::MidRange, Self::Premium];
}

impl fmt::Display for PriceSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scraped record plus the batch-derived features.
///
/// Embeds the source record untouched; `price_vs_avg` and `price_segment`
/// only make sense relative to the batch the record was derived with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRecord {
    pub record: BookRecord,
    /// Character count of the title (chars, not bytes).
    pub title_length: usize,
    /// `price - mean(price over batch)`.
    pub price_vs_avg: f64,
    pub price_segment: PriceSegment,
}

impl AsRef<BookRecord> for DerivedRecord {
    fn as_ref(&self) -> &BookRecord {
        &self.record
    }
}

/// One tokenized title keyword and its occurrence count within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Price statistics for one distinct rating value present in a batch.
///
/// The grouping key is the raw rating integer, including the 0 sentinel
/// when unrated records are present. Ratings absent from the batch are
/// simply absent from the result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub rating: u8,
    pub avg_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub count: usize,
}
