//! Aggregation queries over record batches
//!
//! Read-only statistics used by the derived datasets and the insight
//! report: per-rating price summaries, rank-based empirical quantiles,
//! keyword frequencies, and a Pearson correlation matrix. Each query is a
//! pure function of the batch it is handed.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use thiserror::Error;

use crate::domain::book::{BookRecord, DerivedRecord, KeywordCount, RatingSummary};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("batch of {got} records is too small, at least {needed} required")]
    InsufficientData { needed: usize, got: usize },

    #[error("percentile {value} is outside the closed range [0, 1]")]
    InvalidPercentile { value: f64 },

    #[error("field '{field}' has zero variance in this batch")]
    DegenerateInput { field: &'static str },
}

impl AnalyticsError {
    pub fn insufficient_data(needed: usize, got: usize) -> Self {
        Self::InsufficientData { needed, got }
    }

    pub fn invalid_percentile(value: f64) -> Self {
        Self::InvalidPercentile { value }
    }

    pub fn degenerate_input(field: &'static str) -> Self {
        Self::DegenerateInput { field }
    }
}

/// Words excluded from keyword frequency analysis.
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "of", "and", "in", "to", "for", "with", "on", "at", "by", "from",
    ]
    .into_iter()
    .collect()
});

/// Punctuation stripped from token edges before counting.
const TOKEN_TRIM: &[char] = &['.', ',', '!', '?', ':', ';', '(', ')', '[', ']'];

/// Tokens this short carry no keyword signal.
const MIN_TOKEN_CHARS: usize = 4;

/// Price summary per distinct rating value present in the batch, ascending
/// by rating. Ratings absent from the batch are absent from the result.
pub fn group_by_rating<R: AsRef<BookRecord>>(records: &[R]) -> Vec<RatingSummary> {
    let mut groups: BTreeMap<u8, Vec<f64>> = BTreeMap::new();
    for record in records {
        let record = record.as_ref();
        groups.entry(record.rating).or_default().push(record.price);
    }

    groups
        .into_iter()
        .map(|(rating, prices)| {
            let count = prices.len();
            let sum: f64 = prices.iter().sum();
            let min_price = prices.iter().copied().fold(f64::INFINITY, f64::min);
            let max_price = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            RatingSummary {
                rating,
                avg_price: sum / count as f64,
                min_price,
                max_price,
                count,
            }
        })
        .collect()
}

/// Smallest observed price such that the fraction of batch items priced at
/// or below it is >= `p`. Rank-based lookup on the empirical distribution;
/// no interpolation.
pub fn percentile_threshold<R: AsRef<BookRecord>>(
    records: &[R],
    p: f64,
) -> Result<f64, AnalyticsError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(AnalyticsError::invalid_percentile(p));
    }
    if records.is_empty() {
        return Err(AnalyticsError::insufficient_data(1, 0));
    }

    let mut prices: Vec<f64> = records.iter().map(|r| r.as_ref().price).collect();
    prices.sort_by(f64::total_cmp);

    let n = prices.len() as f64;
    let rank = prices
        .iter()
        .enumerate()
        .position(|(i, _)| (i as f64 + 1.0) / n >= p)
        .unwrap_or(prices.len() - 1);
    Ok(prices[rank])
}

/// Top `n` title keywords by occurrence count, descending, ties broken by
/// first-seen token order.
pub fn top_keywords<R: AsRef<BookRecord>>(records: &[R], n: usize) -> Vec<KeywordCount> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();

    for record in records {
        for raw in record.as_ref().title.split_whitespace() {
            let token = raw.to_lowercase();
            let token = token.trim_matches(TOKEN_TRIM);
            if token.chars().count() < MIN_TOKEN_CHARS || STOP_WORDS.contains(token) {
                continue;
            }
            *counts.entry(token.to_string()).or_insert(0) += 1;
        }
    }

    // IndexMap preserves first-seen order; the stable sort keeps it for ties.
    let mut keywords: Vec<KeywordCount> = counts
        .into_iter()
        .map(|(word, count)| KeywordCount { word, count })
        .collect();
    keywords.sort_by(|a, b| b.count.cmp(&a.count));
    keywords.truncate(n);
    keywords
}

/// Field names of the correlation matrix, in row/column order.
pub const CORRELATION_FIELDS: [&str; 3] = ["price", "rating", "title_length"];

/// Symmetric Pearson correlation matrix over price, rating, and title
/// length, diagonal fixed at 1.0.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub values: [[f64; 3]; 3],
}

impl fmt::Display for CorrelationMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>14}", "")?;
        for field in CORRELATION_FIELDS {
            write!(f, "{field:>14}")?;
        }
        writeln!(f)?;
        for (row, field) in self.values.iter().zip(CORRELATION_FIELDS) {
            write!(f, "{field:>14}")?;
            for value in row {
                write!(f, "{value:>14.3}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Pearson correlation over {price, rating, title_length}.
///
/// Fails with `DegenerateInput` when any field is constant across the
/// batch; a correlation against zero variance is undefined.
pub fn correlation_matrix(records: &[DerivedRecord]) -> Result<CorrelationMatrix, AnalyticsError> {
    if records.len() < 2 {
        return Err(AnalyticsError::insufficient_data(2, records.len()));
    }

    let series: [(&'static str, Vec<f64>); 3] = [
        (
            "price",
            records.iter().map(|d| d.record.price).collect(),
        ),
        (
            "rating",
            records.iter().map(|d| f64::from(d.record.rating)).collect(),
        ),
        (
            "title_length",
            records.iter().map(|d| d.title_length as f64).collect(),
        ),
    ];

    let n = records.len() as f64;
    let means: Vec<f64> = series.iter().map(|(_, v)| v.iter().sum::<f64>() / n).collect();
    let deviations: Vec<Vec<f64>> = series
        .iter()
        .zip(&means)
        .map(|((_, values), mean)| values.iter().map(|v| v - mean).collect())
        .collect();

    for ((field, _), devs) in series.iter().zip(&deviations) {
        let variance: f64 = devs.iter().map(|d| d * d).sum();
        if variance == 0.0 {
            return Err(AnalyticsError::degenerate_input(*field));
        }
    }

    let mut values = [[1.0; 3]; 3];
    for i in 0..3 {
        for j in (i + 1)..3 {
            let covariance: f64 = deviations[i]
                .iter()
                .zip(&deviations[j])
                .map(|(a, b)| a * b)
                .sum();
            let denom = (deviations[i].iter().map(|d| d * d).sum::<f64>()
                * deviations[j].iter().map(|d| d * d).sum::<f64>())
            .sqrt();
            let r = covariance / denom;
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::PriceSegment;

    fn record(title: &str, price: f64, rating: u8) -> BookRecord {
        BookRecord {
            title: title.to_string(),
            price,
            rating,
            availability: "In stock".to_string(),
        }
    }

    fn derived(title: &str, price: f64, rating: u8) -> DerivedRecord {
        DerivedRecord {
            record: record(title, price, rating),
            title_length: title.chars().count(),
            price_vs_avg: 0.0,
            price_segment: PriceSegment::Budget,
        }
    }

    #[test]
    fn group_by_rating_only_returns_present_ratings() {
        let records = vec![
            record("A", 10.0, 3),
            record("B", 20.0, 3),
            record("C", 30.0, 5),
        ];
        let summaries = group_by_rating(&records);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].rating, 3);
        assert_eq!(summaries[0].count, 2);
        assert_eq!(summaries[0].avg_price, 15.0);
        assert_eq!(summaries[0].min_price, 10.0);
        assert_eq!(summaries[0].max_price, 20.0);
        assert_eq!(summaries[1].rating, 5);
        assert_eq!(summaries[1].count, 1);
    }

    #[test]
    fn group_by_rating_includes_the_zero_sentinel() {
        let records = vec![record("A", 10.0, 0), record("B", 20.0, 1)];
        let summaries = group_by_rating(&records);
        assert_eq!(summaries[0].rating, 0);
        assert_eq!(summaries[0].count, 1);
    }

    #[test]
    fn percentile_bounds_are_min_and_max() {
        let records = vec![
            record("A", 35.0, 1),
            record("B", 12.0, 2),
            record("C", 48.0, 3),
            record("D", 21.0, 4),
        ];
        assert_eq!(percentile_threshold(&records, 0.0).unwrap(), 12.0);
        assert_eq!(percentile_threshold(&records, 1.0).unwrap(), 48.0);
    }

    #[test]
    fn percentile_uses_rank_lookup_not_interpolation() {
        let records: Vec<BookRecord> = (1..=4).map(|i| record("B", i as f64 * 10.0, 1)).collect();
        // With 4 observations, the 0.5 threshold is the 2nd ranked price:
        // 2/4 = 0.5 >= 0.5. No averaging of 20 and 30.
        assert_eq!(percentile_threshold(&records, 0.5).unwrap(), 20.0);
        assert_eq!(percentile_threshold(&records, 0.75).unwrap(), 30.0);
        assert_eq!(percentile_threshold(&records, 0.76).unwrap(), 40.0);
    }

    #[test]
    fn percentile_outside_unit_interval_is_rejected() {
        let records = vec![record("A", 1.0, 1)];
        assert!(matches!(
            percentile_threshold(&records, 1.5),
            Err(AnalyticsError::InvalidPercentile { .. })
        ));
        assert!(matches!(
            percentile_threshold(&records, -0.1),
            Err(AnalyticsError::InvalidPercentile { .. })
        ));
    }

    #[test]
    fn percentile_on_empty_batch_is_insufficient_data() {
        let records: Vec<BookRecord> = Vec::new();
        assert!(matches!(
            percentile_threshold(&records, 0.5),
            Err(AnalyticsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn top_keywords_count_and_tie_order() {
        let records = vec![
            record("The Great Gatsby", 10.0, 1),
            record("Great Expectations", 12.0, 2),
        ];
        let keywords = top_keywords(&records, 10);

        let pairs: Vec<(&str, usize)> = keywords
            .iter()
            .map(|k| (k.word.as_str(), k.count))
            .collect();
        assert_eq!(
            pairs,
            [("great", 2), ("gatsby", 1), ("expectations", 1)]
        );
    }

    #[test]
    fn top_keywords_strips_enclosing_punctuation() {
        let records = vec![record("Voyager (Outlander, Book 3)", 10.0, 1)];
        let keywords = top_keywords(&records, 10);
        let words: Vec<&str> = keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, ["voyager", "outlander", "book"]);
    }

    #[test]
    fn top_keywords_drops_short_tokens_and_stop_words() {
        let records = vec![record("The Art of War and the Way", 10.0, 1)];
        let keywords = top_keywords(&records, 10);
        // "the", "of", "and" are stop words; "art", "war", "way" are <= 3 chars.
        assert!(keywords.is_empty());
    }

    #[test]
    fn top_keywords_truncates_to_n() {
        let records = vec![record("alpha bravo charlie delta", 10.0, 1)];
        assert_eq!(top_keywords(&records, 2).len(), 2);
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let batch = vec![
            derived("Short", 10.0, 1),
            derived("A longer title", 25.0, 3),
            derived("The longest title of all", 40.0, 5),
        ];
        let matrix = correlation_matrix(&batch).unwrap().values;

        for i in 0..3 {
            assert_eq!(matrix[i][i], 1.0);
            for j in 0..3 {
                assert!((matrix[i][j] - matrix[j][i]).abs() < 1e-12);
                assert!(matrix[i][j] <= 1.0 + 1e-12);
                assert!(matrix[i][j] >= -1.0 - 1e-12);
            }
        }
        // Price and rating rise together in this batch.
        assert!(matrix[0][1] > 0.99);
    }

    #[test]
    fn constant_field_is_degenerate() {
        let batch = vec![
            derived("One title", 10.0, 3),
            derived("Another title", 25.0, 3),
            derived("Third one here", 40.0, 3),
        ];
        assert_eq!(
            correlation_matrix(&batch),
            Err(AnalyticsError::degenerate_input("rating"))
        );
    }

    #[test]
    fn queries_accept_derived_batches() {
        let batch = vec![
            derived("The Great Gatsby", 10.0, 3),
            derived("Great Expectations", 30.0, 5),
        ];
        assert_eq!(group_by_rating(&batch).len(), 2);
        assert_eq!(percentile_threshold(&batch, 1.0).unwrap(), 30.0);
        assert_eq!(top_keywords(&batch, 1)[0].word, "great");
    }
}
