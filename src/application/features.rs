//! Batch feature derivation
//!
//! Two-phase transform: batch statistics (mean price, tertile boundaries)
//! are computed once from the whole input batch, then every record is
//! mapped against the captured statistics. The per-record features are
//! meaningless outside the batch they were derived with.

use crate::application::analytics::{AnalyticsError, percentile_threshold};
use crate::domain::book::{BookRecord, DerivedRecord, PriceSegment};

/// Minimum batch size for equal-frequency binning into three segments.
pub const MIN_BATCH_SIZE: usize = 3;

/// Price statistics captured once per batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchPriceStats {
    /// Arithmetic mean of price over the whole batch.
    pub mean: f64,
    /// Empirical tertile boundaries: the 1/3 and 2/3 quantile prices.
    pub lower_tertile: f64,
    pub upper_tertile: f64,
}

impl BatchPriceStats {
    pub fn from_records(records: &[BookRecord]) -> Result<Self, AnalyticsError> {
        if records.len() < MIN_BATCH_SIZE {
            return Err(AnalyticsError::insufficient_data(
                MIN_BATCH_SIZE,
                records.len(),
            ));
        }

        let mean = records.iter().map(|r| r.price).sum::<f64>() / records.len() as f64;
        let lower_tertile = percentile_threshold(records, 1.0 / 3.0)?;
        let upper_tertile = percentile_threshold(records, 2.0 / 3.0)?;

        Ok(Self {
            mean,
            lower_tertile,
            upper_tertile,
        })
    }

    /// Equal-frequency segment for a price from this batch's distribution.
    pub fn segment_for(&self, price: f64) -> PriceSegment {
        if price <= self.lower_tertile {
            PriceSegment::Budget
        } else if price <= self.upper_tertile {
            PriceSegment::MidRange
        } else {
            PriceSegment::Premium
        }
    }
}

/// Derive the per-record features for a batch.
///
/// One-to-one and order-preserving; the source records are embedded
/// untouched. Fails with `InsufficientData` below three records, where
/// tertile binning is undefined.
pub fn derive_features(records: &[BookRecord]) -> Result<Vec<DerivedRecord>, AnalyticsError> {
    let stats = BatchPriceStats::from_records(records)?;

    Ok(records
        .iter()
        .map(|record| DerivedRecord {
            record: record.clone(),
            title_length: record.title.chars().count(),
            price_vs_avg: record.price - stats.mean,
            price_segment: stats.segment_for(record.price),
        })
        .collect())
}
