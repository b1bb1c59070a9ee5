//! DV360 tool implementations
//!
//! Report execution and entity lookups, each returning a tagged
//! success/failure record instead of an error.

pub mod entities;
pub mod hints;
pub mod input;
pub mod report;

pub use entities::EntityTools;
pub use hints::{ErrorClass, Hints, ToolFailure, ToolResult};
pub use input::ListInput;
pub use report::{
    IdFilters, ReportFailure, ReportOutcome, ReportRequest, ReportRow, ReportRunner,
    ReportSuccess, RunMetadata, DEFAULT_REPORT_NAME,
};
