//! Report pipeline

pub mod dates;
pub mod decode;
pub mod fields;
pub mod filters;
pub mod runner;

pub use dates::{format_date, DateFormatError};
pub use decode::{decode_csv, fetch_report, infer_cell, DecodeError, DecodedReport, ReportRow};
pub use fields::normalize_fields;
pub use filters::IdFilters;
pub use runner::{
    DateRange, ReportError, ReportFailure, ReportOutcome, ReportRequest, ReportRunner,
    ReportSuccess, RunMetadata, DEFAULT_REPORT_NAME,
};
