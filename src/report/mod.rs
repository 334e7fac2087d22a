//! Aggregation and rendering of operations reports.

pub mod aggregator;
pub mod distribution;
pub mod error;
pub mod flat;
pub mod models;
pub mod normalizer;
pub mod workbook;

pub use aggregator::aggregate;
pub use error::ReportError;
pub use flat::render_flat;
pub use models::{AggregationBundle, AlertRecord, DateRange, RecordKind, TicketRecord};
pub use workbook::render_workbook;
