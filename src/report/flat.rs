use chrono::NaiveDateTime;

use super::error::ReportError;
use super::models::{AggregationBundle, RecordKind};

pub const CSV_MEDIA_TYPE: &str = "text/csv; charset=utf-8";
pub const CSV_FILENAME: &str = "OpsNexus_Report.csv";

const HEADER: [&str; 5] = ["Type", "ID", "Timestamp", "Details", "Status"];
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Alerts and tickets re-mapped onto one common schema.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedRow {
    pub kind: RecordKind,
    pub id: i64,
    pub timestamp: NaiveDateTime,
    pub details: String,
    pub status: String,
}

impl UnifiedRow {
    fn to_record(&self) -> [String; 5] {
        [
            self.kind.to_string(),
            self.id.to_string(),
            self.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            self.details.clone(),
            self.status.clone(),
        ]
    }
}

/// Alerts first, then tickets, then a stable sort by timestamp: records with
/// equal timestamps keep that relative order.
pub fn unified_rows(bundle: &AggregationBundle) -> Vec<UnifiedRow> {
    let alerts = bundle.alerts.iter().map(|alert| UnifiedRow {
        kind: RecordKind::Alert,
        id: alert.id,
        timestamp: alert.timestamp,
        details: format!("{} - {} - {}", alert.host, alert.service, alert.message),
        status: alert.status.as_str().to_string(),
    });
    let tickets = bundle.tickets.iter().map(|ticket| UnifiedRow {
        kind: RecordKind::Ticket,
        id: ticket.id,
        timestamp: ticket.created_at,
        details: ticket.subject.clone(),
        status: ticket.status.as_str().to_string(),
    });

    let mut rows: Vec<UnifiedRow> = alerts.chain(tickets).collect();
    rows.sort_by_key(|row| row.timestamp);
    rows
}

pub fn render_flat(bundle: &AggregationBundle) -> Result<String, ReportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for row in unified_rows(bundle) {
        writer.write_record(row.to_record())?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Encoding(e.error().to_string()))?;
    String::from_utf8(bytes).map_err(|e| ReportError::Encoding(e.to_string()))
}
