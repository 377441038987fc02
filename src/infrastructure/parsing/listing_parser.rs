//! Listing page parser
//!
//! Extracts one `BookRecord` per product block from a catalogue listing
//! page, in page layout order. A page with zero product blocks yields an
//! empty batch, not an error; deciding whether that means "last page" or
//! "malformed page" is the pagination driver's job.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace};

use super::{ParsingError, ParsingResult};
use crate::domain::book::{BookRecord, rating_from_label};

/// Strips currency symbols and anything else that is not part of a
/// decimal number from the displayed price text.
static NON_PRICE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9.]+").expect("price pattern is a valid regex"));

/// Parser for extracting book records from listing pages.
///
/// Selectors are compiled once at construction; the parser itself is
/// immutable and reusable across pages.
pub struct BookListParser {
    product_block: Selector,
    title_link: Selector,
    price: Selector,
    rating: Selector,
    availability: Selector,
}

impl BookListParser {
    pub fn new() -> ParsingResult<Self> {
        Ok(Self {
            product_block: Self::compile("article.product_pod")?,
            title_link: Self::compile("h3 a")?,
            price: Self::compile("p.price_color")?,
            rating: Self::compile("p.star-rating")?,
            availability: Self::compile("p.availability")?,
        })
    }

    fn compile(selector: &str) -> ParsingResult<Selector> {
        Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, e))
    }

    /// Parse one listing page into ordered book records.
    pub fn parse(&self, html: &str, page: u32) -> ParsingResult<Vec<BookRecord>> {
        let document = Html::parse_document(html);
        let mut records = Vec::new();

        for (index, block) in document.select(&self.product_block).enumerate() {
            records.push(self.extract_record(&block, index, page)?);
        }

        debug!(page, records = records.len(), "parsed listing page");
        Ok(records)
    }

    fn extract_record(
        &self,
        block: &ElementRef<'_>,
        index: usize,
        page: u32,
    ) -> ParsingResult<BookRecord> {
        // The full title lives in the link's title attribute; the visible
        // link text is truncated for long titles.
        let title = block
            .select(&self.title_link)
            .next()
            .and_then(|a| a.value().attr("title"))
            .map(str::to_string)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ParsingError::required_field_missing("title", index, page))?;

        let price_text = self
            .text_of(block, &self.price)
            .ok_or_else(|| ParsingError::required_field_missing("price", index, page))?;
        let price = Self::normalize_price(&price_text, page)?;

        let rating = self.extract_rating(block);

        let availability = self.text_of(block, &self.availability).unwrap_or_default();

        Ok(BookRecord {
            title,
            price,
            rating,
            availability,
        })
    }

    /// The rating is carried as a class name next to "star-rating",
    /// e.g. `class="star-rating Three"`. Unrecognized or missing labels
    /// map to the 0 sentinel.
    fn extract_rating(&self, block: &ElementRef<'_>) -> u8 {
        let label = block
            .select(&self.rating)
            .next()
            .and_then(|e| e.value().classes().find(|class| *class != "star-rating"));

        match label {
            Some(label) => {
                let rating = rating_from_label(label);
                if rating == 0 {
                    trace!(label, "unrecognized rating label, using sentinel 0");
                }
                rating
            }
            None => {
                trace!("no rating element in product block, using sentinel 0");
                0
            }
        }
    }

    fn text_of(&self, block: &ElementRef<'_>, selector: &Selector) -> Option<String> {
        block
            .select(selector)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
            .filter(|text| !text.is_empty())
    }

    fn normalize_price(raw: &str, page: u32) -> ParsingResult<f64> {
        let cleaned = NON_PRICE_CHARS.replace_all(raw, "");
        cleaned
            .parse::<f64>()
            .map_err(|_| ParsingError::malformed_price(raw, page))
    }
}
