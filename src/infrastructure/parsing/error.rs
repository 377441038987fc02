//! Parsing error types
//!
//! Field-level errors raised while extracting book records from listing
//! HTML. The rating-label fallback is deliberately NOT an error; an
//! unrecognized label maps to the 0 sentinel at the domain level.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ParsingError {
    #[error("invalid CSS selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("required field '{field}' not found in listing block {index} on page {page}")]
    RequiredFieldMissing {
        field: &'static str,
        index: usize,
        page: u32,
    },

    #[error("price text '{raw}' on page {page} did not normalize to a number")]
    MalformedPrice { raw: String, page: u32 },
}

impl ParsingError {
    pub fn invalid_selector(selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn required_field_missing(field: &'static str, index: usize, page: u32) -> Self {
        Self::RequiredFieldMissing { field, index, page }
    }

    pub fn malformed_price(raw: &str, page: u32) -> Self {
        Self::MalformedPrice {
            raw: raw.to_string(),
            page,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
