//! CSV dataset export
//!
//! Writes the scraped records file and the four derived datasets. Headers
//! are explicit so the on-disk column names stay stable regardless of
//! struct field names; prices are formatted with two decimals.

use csv::Writer;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::domain::book::{BookRecord, DerivedRecord, KeywordCount, RatingSummary};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir { path: String, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: String, source: csv::Error },

    #[error("failed to flush {path}: {source}")]
    Flush { path: String, source: io::Error },
}

/// Header of the scraped records file.
pub const RECORD_HEADER: [&str; 4] = ["Title", "Price_GBP", "Rating", "Availability"];

/// Header of the VIP catalog and risk audit datasets: the record columns
/// plus the batch-derived features.
pub const DERIVED_HEADER: [&str; 7] = [
    "Title",
    "Price_GBP",
    "Rating",
    "Availability",
    "Title_Length",
    "Price_Versus_Avg",
    "Price_Segment",
];

pub const PRICING_SUMMARY_HEADER: [&str; 5] =
    ["Rating", "Avg_Price", "Min_Price", "Max_Price", "Count"];

pub const KEYWORD_HEADER: [&str; 2] = ["Keyword", "Frequency"];

/// Write the raw scraped records.
pub fn write_records(path: &Path, records: &[BookRecord]) -> Result<(), ExportError> {
    let mut writer = writer_for(path)?;
    write_row(&mut writer, path, &RECORD_HEADER)?;
    for record in records {
        let row = record_columns(record);
        write_row(&mut writer, path, &row)?;
    }
    finish(writer, path, records.len())
}

/// Write a derived dataset (VIP catalog, risk audit).
pub fn write_derived(path: &Path, records: &[DerivedRecord]) -> Result<(), ExportError> {
    let mut writer = writer_for(path)?;
    write_row(&mut writer, path, &DERIVED_HEADER)?;
    for derived in records {
        let base = record_columns(&derived.record);
        let mut row = base.to_vec();
        row.push(derived.title_length.to_string());
        row.push(format!("{:.2}", derived.price_vs_avg));
        row.push(derived.price_segment.label().to_string());
        write_row(&mut writer, path, &row)?;
    }
    finish(writer, path, records.len())
}

/// Write the per-rating pricing summary.
pub fn write_pricing_summary(path: &Path, summaries: &[RatingSummary]) -> Result<(), ExportError> {
    let mut writer = writer_for(path)?;
    write_row(&mut writer, path, &PRICING_SUMMARY_HEADER)?;
    for summary in summaries {
        let row = [
            summary.rating.to_string(),
            format!("{:.2}", summary.avg_price),
            format!("{:.2}", summary.min_price),
            format!("{:.2}", summary.max_price),
            summary.count.to_string(),
        ];
        write_row(&mut writer, path, &row)?;
    }
    finish(writer, path, summaries.len())
}

/// Write the keyword frequency dataset.
pub fn write_keywords(path: &Path, keywords: &[KeywordCount]) -> Result<(), ExportError> {
    let mut writer = writer_for(path)?;
    write_row(&mut writer, path, &KEYWORD_HEADER)?;
    for keyword in keywords {
        let row = [keyword.word.clone(), keyword.count.to_string()];
        write_row(&mut writer, path, &row)?;
    }
    finish(writer, path, keywords.len())
}

fn record_columns(record: &BookRecord) -> [String; 4] {
    [
        record.title.clone(),
        format!("{:.2}", record.price),
        record.rating.to_string(),
        record.availability.clone(),
    ]
}

fn writer_for(path: &Path) -> Result<Writer<fs::File>, ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ExportError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }
    }
    Writer::from_path(path).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })
}

fn write_row<W: io::Write, S: AsRef<[u8]>>(
    writer: &mut Writer<W>,
    path: &Path,
    row: &[S],
) -> Result<(), ExportError> {
    writer.write_record(row).map_err(|source| ExportError::Write {
        path: path.display().to_string(),
        source,
    })
}

fn finish<W: io::Write>(mut writer: Writer<W>, path: &Path, rows: usize) -> Result<(), ExportError> {
    writer.flush().map_err(|source| ExportError::Flush {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), rows, "dataset written");
    Ok(())
}
