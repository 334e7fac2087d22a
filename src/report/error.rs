use thiserror::Error;

use super::models::RecordKind;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Record source failed: {0}")]
    SourceFailure(String),
    #[error("Schema violation in {kind} record #{index}: {reason}")]
    SchemaViolation {
        kind: RecordKind,
        index: usize,
        reason: String,
    },
    #[error("{kind} table has no column `{column}`")]
    MissingColumn { kind: RecordKind, column: String },
    #[error("{kind} record {id} belongs to company {found}, expected {expected}")]
    TenantMismatch {
        kind: RecordKind,
        id: i64,
        expected: i32,
        found: i32,
    },
    #[error("Invalid date range: {0}")]
    InvalidRange(String),
    #[error("Workbook generation failed: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
    #[error("CSV generation failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("Output encoding error: {0}")]
    Encoding(String),
}
