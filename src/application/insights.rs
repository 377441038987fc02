//! Catalogue insight report
//!
//! The exploratory summary printed at the end of a pipeline run: price
//! statistics, extremes, per-rating averages, availability statuses, the
//! inventory price point, per-segment ratings, and the correlation
//! matrix. All figures are computed from the derived batch; rendering is
//! a `Display` impl so callers decide where the report goes.

use std::fmt;
use tracing::warn;

use crate::application::analytics::{
    self, AnalyticsError, CorrelationMatrix,
};
use crate::domain::book::{DerivedRecord, PriceSegment, RatingSummary};

/// Price point covering most of the inventory, as in "80% of the books
/// are priced below X".
pub const INVENTORY_PERCENTILE: f64 = 0.80;

/// Descriptive statistics of the batch's prices.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceStats {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Aggregated view of one crawled batch.
#[derive(Debug, Clone)]
pub struct CatalogueInsights {
    pub price_stats: PriceStats,
    /// Title and price of the priciest record.
    pub most_expensive: (String, f64),
    pub cheapest: (String, f64),
    pub price_by_rating: Vec<RatingSummary>,
    /// Distinct availability statuses in first-seen order.
    pub availability_statuses: Vec<String>,
    /// Smallest price covering [`INVENTORY_PERCENTILE`] of the inventory.
    pub inventory_price: f64,
    /// Average rating per price segment, ascending segment order.
    pub rating_by_segment: Vec<(PriceSegment, f64)>,
    /// Absent when a field was constant across the batch; the report
    /// degrades rather than failing the whole run.
    pub correlation: Option<CorrelationMatrix>,
}

impl CatalogueInsights {
    pub fn from_batch(batch: &[DerivedRecord]) -> Result<Self, AnalyticsError> {
        if batch.is_empty() {
            return Err(AnalyticsError::insufficient_data(1, 0));
        }

        let count = batch.len();
        let mean = batch.iter().map(|d| d.record.price).sum::<f64>() / count as f64;
        let variance = batch
            .iter()
            .map(|d| (d.record.price - mean).powi(2))
            .sum::<f64>()
            / (count.max(2) - 1) as f64;
        let min = batch
            .iter()
            .map(|d| d.record.price)
            .fold(f64::INFINITY, f64::min);
        let max = batch
            .iter()
            .map(|d| d.record.price)
            .fold(f64::NEG_INFINITY, f64::max);

        // max_by/min_by over a non-empty batch always yield a record.
        let most_expensive = batch
            .iter()
            .max_by(|a, b| a.record.price.total_cmp(&b.record.price))
            .map(|d| (d.record.title.clone(), d.record.price))
            .unwrap_or_default();
        let cheapest = batch
            .iter()
            .min_by(|a, b| a.record.price.total_cmp(&b.record.price))
            .map(|d| (d.record.title.clone(), d.record.price))
            .unwrap_or_default();

        let mut availability_statuses: Vec<String> = Vec::new();
        for derived in batch {
            if !availability_statuses.contains(&derived.record.availability) {
                availability_statuses.push(derived.record.availability.clone());
            }
        }

        let inventory_price = analytics::percentile_threshold(batch, INVENTORY_PERCENTILE)?;

        let mut rating_by_segment = Vec::new();
        for segment in PriceSegment::ALL {
            let ratings: Vec<f64> = batch
                .iter()
                .filter(|d| d.price_segment == segment)
                .map(|d| f64::from(d.record.rating))
                .collect();
            if !ratings.is_empty() {
                let avg = ratings.iter().sum::<f64>() / ratings.len() as f64;
                rating_by_segment.push((segment, avg));
            }
        }

        let correlation = match analytics::correlation_matrix(batch) {
            Ok(matrix) => Some(matrix),
            Err(err @ AnalyticsError::DegenerateInput { .. }) => {
                warn!(error = %err, "skipping correlation matrix");
                None
            }
            Err(err) => return Err(err),
        };

        Ok(Self {
            price_stats: PriceStats {
                count,
                mean,
                std_dev: variance.sqrt(),
                min,
                max,
            },
            most_expensive,
            cheapest,
            price_by_rating: analytics::group_by_rating(batch),
            availability_statuses,
            inventory_price,
            rating_by_segment,
            correlation,
        })
    }
}

impl fmt::Display for CatalogueInsights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Catalogue insights")?;
        writeln!(
            f,
            "  Prices: count={} mean=£{:.2} std=£{:.2} min=£{:.2} max=£{:.2}",
            self.price_stats.count,
            self.price_stats.mean,
            self.price_stats.std_dev,
            self.price_stats.min,
            self.price_stats.max
        )?;
        writeln!(
            f,
            "  Most expensive: {} (£{:.2})",
            self.most_expensive.0, self.most_expensive.1
        )?;
        writeln!(f, "  Cheapest: {} (£{:.2})", self.cheapest.0, self.cheapest.1)?;

        writeln!(f, "  Average price by rating:")?;
        for summary in &self.price_by_rating {
            writeln!(
                f,
                "    {} star: £{:.2} over {} records",
                summary.rating, summary.avg_price, summary.count
            )?;
        }

        writeln!(
            f,
            "  Availability statuses: {}",
            self.availability_statuses.join(", ")
        )?;
        writeln!(
            f,
            "  {:.0}% of the inventory is priced at or below £{:.2}",
            INVENTORY_PERCENTILE * 100.0,
            self.inventory_price
        )?;

        writeln!(f, "  Average rating by price segment:")?;
        for (segment, avg) in &self.rating_by_segment {
            writeln!(f, "    {segment}: {avg:.2}")?;
        }

        match &self.correlation {
            Some(matrix) => write!(f, "  Correlation matrix:\n{matrix}")?,
            None => writeln!(f, "  Correlation matrix: skipped (constant field)")?,
        }
        Ok(())
    }
}
