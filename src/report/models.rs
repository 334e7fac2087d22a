use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::fmt;

use super::error::ReportError;

/// The two kinds of record a report is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Alert,
    Ticket,
}

impl RecordKind {
    /// Plural label used for sheet names and chart series ("Alerts Data").
    pub fn plural(&self) -> &'static str {
        match self {
            RecordKind::Alert => "Alerts",
            RecordKind::Ticket => "Tickets",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Alert => f.write_str("Alert"),
            RecordKind::Ticket => f.write_str("Ticket"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertStatus {
    Critical,
    Warning,
    Ok,
    Unknown,
}

impl AlertStatus {
    pub const ALL: [AlertStatus; 4] = [
        AlertStatus::Critical,
        AlertStatus::Warning,
        AlertStatus::Ok,
        AlertStatus::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Critical => "CRITICAL",
            AlertStatus::Warning => "WARNING",
            AlertStatus::Ok => "OK",
            AlertStatus::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }
}

/// A monitoring alert as delivered by the record source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: i64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: NaiveDateTime,
    pub host: String,
    pub service: String,
    pub status: AlertStatus,
    pub message: String,
    #[serde(rename = "company_id")]
    pub tenant_id: i32,
}

/// A helpdesk ticket as delivered by the record source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: i64,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: NaiveDateTime,
    pub subject: String,
    pub status: TicketStatus,
    #[serde(rename = "company_id")]
    pub tenant_id: i32,
}

/// Both record kinds for a single export or dashboard request.
///
/// Every record is expected to carry the tenant id the bundle was requested
/// for; [`crate::report::aggregator::aggregate`] enforces this before a bundle
/// is handed out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationBundle {
    pub alerts: Vec<AlertRecord>,
    pub tickets: Vec<TicketRecord>,
}

impl AggregationBundle {
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty() && self.tickets.is_empty()
    }
}

/// Inclusive date range a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvalidRange(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Whole days, both ends at midnight.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        Self::new(start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN))
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }
}

/// Accepts naive ISO-8601 (`2024-01-01T00:00:00[.fff]`) or RFC 3339 with an
/// offset, which is normalised to UTC.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, String> {
    if let Ok(naive) = raw.parse::<NaiveDateTime>() {
        return Ok(naive);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .map_err(|e| format!("invalid timestamp {raw:?}: {e}"))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_variants() {
        let naive = parse_timestamp("2024-01-01T08:30:00").unwrap();
        assert_eq!(naive.to_string(), "2024-01-01 08:30:00");

        let fractional = parse_timestamp("2024-01-01T08:30:00.250").unwrap();
        assert!(fractional > naive);

        let offset = parse_timestamp("2024-01-01T10:30:00+02:00").unwrap();
        assert_eq!(offset, naive);

        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        assert!(matches!(
            DateRange::from_dates(start, end),
            Err(ReportError::InvalidRange(_))
        ));
        assert!(DateRange::from_dates(end, end).is_ok());
    }

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&TicketStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        for status in AlertStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_bundle_is_empty_only_without_records() {
        let mut bundle = AggregationBundle::default();
        assert!(bundle.is_empty());

        bundle.tickets.push(TicketRecord {
            id: 10001,
            created_at: parse_timestamp("2024-01-01T09:00:00").unwrap(),
            subject: "Issue with vpn".to_string(),
            status: TicketStatus::Open,
            tenant_id: 1,
        });
        assert!(!bundle.is_empty());
    }
}
