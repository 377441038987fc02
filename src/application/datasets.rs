//! Derived dataset builders
//!
//! The four batch-scoped datasets consumed by downstream teams, built on
//! the aggregation queries. All pure; the input batch is never reordered
//! or mutated.

use crate::application::analytics::{
    self, AnalyticsError,
};
use crate::domain::book::{DerivedRecord, KeywordCount, RatingSummary};

/// VIP catalog price cut: top quarter of the batch by price.
pub const VIP_PERCENTILE: f64 = 0.75;

/// Ratings at or below this mark a record as a risk when it is also
/// priced above the batch mean. The 0 sentinel qualifies.
pub const RISK_MAX_RATING: u8 = 2;

/// Number of keyword rows in the marketing dataset.
pub const TOP_KEYWORD_COUNT: usize = 50;

/// High-value records: price at or above the batch's 75th percentile,
/// descending by price.
pub fn vip_catalog(batch: &[DerivedRecord]) -> Result<Vec<DerivedRecord>, AnalyticsError> {
    let threshold = analytics::percentile_threshold(batch, VIP_PERCENTILE)?;
    let mut vip: Vec<DerivedRecord> = batch
        .iter()
        .filter(|d| d.record.price >= threshold)
        .cloned()
        .collect();
    vip.sort_by(|a, b| b.record.price.total_cmp(&a.record.price));
    Ok(vip)
}

/// Risky records: priced above the batch mean but rated at most
/// [`RISK_MAX_RATING`]. Batch order is preserved.
pub fn risk_audit(batch: &[DerivedRecord]) -> Vec<DerivedRecord> {
    batch
        .iter()
        .filter(|d| d.price_vs_avg > 0.0 && d.record.rating <= RISK_MAX_RATING)
        .cloned()
        .collect()
}

/// Per-rating pricing summary for the management dashboard.
pub fn pricing_summary(batch: &[DerivedRecord]) -> Vec<RatingSummary> {
    analytics::group_by_rating(batch)
}

/// Top title keywords for the marketing team.
pub fn marketing_keywords(batch: &[DerivedRecord]) -> Vec<KeywordCount> {
    analytics::top_keywords(batch, TOP_KEYWORD_COUNT)
}
