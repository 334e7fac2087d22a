use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::report::{AlertRecord, DateRange, RecordKind, ReportError, TicketRecord};

pub mod mock;

pub use mock::MockRecordSource;

/// Supplies alert and ticket records for a tenant over a date range.
///
/// Implementations are shared across concurrent requests, so they must not
/// keep per-request state. Any failure aborts the request that asked for it.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_alerts(
        &self,
        range: &DateRange,
        tenant_id: i32,
    ) -> Result<Vec<AlertRecord>, ReportError>;

    async fn fetch_tickets(
        &self,
        range: &DateRange,
        tenant_id: i32,
    ) -> Result<Vec<TicketRecord>, ReportError>;
}

/// Decodes upstream alert documents. The first document missing a field or
/// carrying an unexpected value fails the whole batch.
pub fn decode_alerts(documents: Vec<Value>) -> Result<Vec<AlertRecord>, ReportError> {
    decode_all(RecordKind::Alert, documents)
}

pub fn decode_tickets(documents: Vec<Value>) -> Result<Vec<TicketRecord>, ReportError> {
    decode_all(RecordKind::Ticket, documents)
}

fn decode_all<T: DeserializeOwned>(
    kind: RecordKind,
    documents: Vec<Value>,
) -> Result<Vec<T>, ReportError> {
    documents
        .into_iter()
        .enumerate()
        .map(|(index, document)| {
            serde_json::from_value(document).map_err(|e| ReportError::SchemaViolation {
                kind,
                index,
                reason: e.to_string(),
            })
        })
        .collect()
}
