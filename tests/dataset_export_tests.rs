//! Dataset export round-trip: derive a batch, write every dataset file,
//! and check the on-disk shapes.

use std::fs;

use book_insight::application::{datasets, features};
use book_insight::domain::book::BookRecord;
use book_insight::infrastructure::config::OutputConfig;
use book_insight::infrastructure::csv_export;

fn record(title: &str, price: f64, rating: u8) -> BookRecord {
    BookRecord {
        title: title.to_string(),
        price,
        rating,
        availability: "In stock".to_string(),
    }
}

fn sample_records() -> Vec<BookRecord> {
    vec![
        record("A Light in the Attic", 51.77, 3),
        record("Tipping the Velvet", 53.74, 1),
        record("Soumission", 50.10, 1),
        record("Sharp Objects", 47.82, 4),
        record("Sapiens: A Brief History of Humankind", 54.23, 5),
        record("The Requiem Red", 22.65, 1),
    ]
}

#[test]
fn all_five_dataset_files_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let output = OutputConfig {
        data_dir: dir.path().to_path_buf(),
        ..OutputConfig::default()
    };

    let records = sample_records();
    let derived = features::derive_features(&records).unwrap();

    csv_export::write_records(&output.records_path(), &records).unwrap();
    csv_export::write_derived(
        &output.vip_catalog_path(),
        &datasets::vip_catalog(&derived).unwrap(),
    )
    .unwrap();
    csv_export::write_derived(&output.risk_audit_path(), &datasets::risk_audit(&derived)).unwrap();
    csv_export::write_pricing_summary(
        &output.pricing_summary_path(),
        &datasets::pricing_summary(&derived),
    )
    .unwrap();
    csv_export::write_keywords(
        &output.marketing_keywords_path(),
        &datasets::marketing_keywords(&derived),
    )
    .unwrap();

    for path in [
        output.records_path(),
        output.vip_catalog_path(),
        output.risk_audit_path(),
        output.pricing_summary_path(),
        output.marketing_keywords_path(),
    ] {
        assert!(path.exists(), "{} should exist", path.display());
    }
}

#[test]
fn records_file_round_trips_row_count_and_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("books_ecommerce_data.csv");
    let records = sample_records();

    csv_export::write_records(&path, &records).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "Title,Price_GBP,Rating,Availability");
    assert_eq!(lines.len(), records.len() + 1);
    assert!(contents.contains("Sapiens: A Brief History of Humankind,54.23,5,In stock"));
}

#[test]
fn pricing_summary_covers_each_present_rating_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("summary.csv");
    let derived = features::derive_features(&sample_records()).unwrap();

    csv_export::write_pricing_summary(&path, &datasets::pricing_summary(&derived)).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    // Ratings present: 1, 3, 4, 5 -> four rows plus the header.
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Rating,Avg_Price,Min_Price,Max_Price,Count");
    assert!(lines[1].starts_with("1,"));
}
