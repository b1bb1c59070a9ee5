//! Report file decoding
//!
//! The reporting engine delivers CSV with a header row. Every cell is typed
//! on its own by the first matcher that accepts it:
//!
//! 1. empty → `null`
//! 2. integer (`-?[0-9]+`, no leading zeros unless the value is zero, fits
//!    in `i64`) → number
//! 3. decimal (`-?` digits with exactly one dot, same leading-zero rule for
//!    the whole part) → number, unless the parse is not finite
//! 4. anything else → the text as-is
//!
//! This is a heuristic. Zero-padded codes such as `007` or `007.5` stay
//! strings, but values like phone numbers still come out as numbers.

use std::sync::OnceLock;

use dv360_client::{ClientError, ReportFetcher};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;
use tracing::debug;

/// One decoded report line, keyed by header column in header order
pub type ReportRow = Map<String, Value>;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to download report: {0}")]
    Fetch(#[from] ClientError),

    #[error("failed to parse report CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Decoded rows with their count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedReport {
    pub rows: Vec<ReportRow>,
    pub row_count: usize,
}

type Matcher = fn(&str) -> Option<Value>;

const MATCHERS: &[Matcher] = &[match_empty, match_integer, match_decimal];

fn integer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?[0-9]+$").expect("valid integer regex"))
}

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^-?([0-9]+\.[0-9]*|\.[0-9]+)$").expect("valid decimal regex")
    })
}

/// Leading zeros on a multi-digit whole part, e.g. `007` or `-00`
fn zero_padded(whole: &str) -> bool {
    let digits = whole.strip_prefix('-').unwrap_or(whole);
    digits.len() > 1 && digits.starts_with('0')
}

fn match_empty(cell: &str) -> Option<Value> {
    cell.is_empty().then_some(Value::Null)
}

fn match_integer(cell: &str) -> Option<Value> {
    if !integer_pattern().is_match(cell) {
        return None;
    }
    if zero_padded(cell) {
        return None;
    }
    cell.parse::<i64>().ok().map(Value::from)
}

fn match_decimal(cell: &str) -> Option<Value> {
    if !decimal_pattern().is_match(cell) {
        return None;
    }
    let whole = cell.split('.').next().unwrap_or_default();
    if zero_padded(whole) {
        return None;
    }
    cell.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

/// Type one cell
pub fn infer_cell(cell: &str) -> Value {
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(cell))
        .unwrap_or_else(|| Value::String(cell.to_string()))
}

/// Decode CSV text with a header row. Short rows fill the missing columns
/// with `null`; cells past the header width are dropped.
pub fn decode_csv(text: &str) -> Result<DecodedReport, DecodeError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: ReportRow = headers
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let value = record.get(i).map(infer_cell).unwrap_or(Value::Null);
                (column.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    let row_count = rows.len();
    debug!("Decoded {} report rows across {} columns", row_count, headers.len());
    Ok(DecodedReport { rows, row_count })
}

/// Download the finished report and decode it
pub async fn fetch_report(
    fetcher: &dyn ReportFetcher,
    location: &str,
) -> Result<DecodedReport, DecodeError> {
    let text = fetcher.fetch_text(location).await?;
    decode_csv(&text)
}
