use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{BridgeError, Result};

/// Source short form: MM/DD/YYYY.
pub const SOURCE_FORMAT: &str = "%m/%d/%Y";
/// Destination short form: YYYYMMDD.
pub const DESTINATION_FORMAT: &str = "%Y%m%d";

fn source_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("static date pattern"))
}

/// Parse a source-format date. Both month and day must be zero-padded.
pub fn parse_source_date(raw: &str) -> Result<NaiveDate> {
    // chrono alone accepts "5/2/20" as year 20
    if !source_shape().is_match(raw) {
        return Err(BridgeError::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(raw, SOURCE_FORMAT)
        .map_err(|_| BridgeError::InvalidDate(raw.to_string()))
}

pub fn format_destination(date: NaiveDate) -> String {
    date.format(DESTINATION_FORMAT).to_string()
}

pub fn to_destination_format(raw: &str) -> Result<String> {
    parse_source_date(raw).map(format_destination)
}
