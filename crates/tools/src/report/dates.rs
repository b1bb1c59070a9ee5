//! `YYYY-MM-DD` to the reporting engine's date form

use dv360_client::DateParts;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid date '{input}': expected YYYY-MM-DD, found {parts} hyphen-separated part(s)")]
pub struct DateFormatError {
    pub input: String,
    pub parts: usize,
}

/// Split into year, month and day verbatim. Only the shape is checked.
pub fn format_date(date: &str) -> Result<DateParts, DateFormatError> {
    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [year, month, day] => Ok(DateParts {
            year: year.to_string(),
            month: month.to_string(),
            day: day.to_string(),
        }),
        _ => Err(DateFormatError {
            input: date.to_string(),
            parts: parts.len(),
        }),
    }
}
