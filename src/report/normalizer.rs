use chrono::NaiveDateTime;

use super::error::ReportError;
use super::models::{AggregationBundle, AlertRecord, RecordKind, TicketRecord};

pub const ALERT_COLUMNS: &[&str] = &["id", "timestamp", "host", "service", "status", "message"];
pub const TICKET_COLUMNS: &[&str] = &["id", "created_at", "subject", "status"];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Integer(i64),
    Timestamp(NaiveDateTime),
    Text(String),
}

impl Cell {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(value) => Some(value),
            _ => None,
        }
    }
}

/// Rows of one record kind projected onto that kind's fixed column schema.
/// The column list is defined even when there are no rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    kind: RecordKind,
    columns: &'static [&'static str],
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of a named column, in row order. An unknown column is an
    /// error rather than an empty result.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Cell>, ReportError> {
        let index = self
            .columns
            .iter()
            .position(|column| *column == name)
            .ok_or_else(|| ReportError::MissingColumn {
                kind: self.kind,
                column: name.to_string(),
            })?;
        Ok(self.rows.iter().map(move |row| &row[index]))
    }
}

pub fn normalize(bundle: &AggregationBundle) -> (Table, Table) {
    (normalize_alerts(&bundle.alerts), normalize_tickets(&bundle.tickets))
}

pub fn normalize_alerts(alerts: &[AlertRecord]) -> Table {
    let rows = alerts
        .iter()
        .map(|alert| {
            vec![
                Cell::Integer(alert.id),
                Cell::Timestamp(alert.timestamp),
                Cell::Text(alert.host.clone()),
                Cell::Text(alert.service.clone()),
                Cell::Text(alert.status.as_str().to_string()),
                Cell::Text(alert.message.clone()),
            ]
        })
        .collect();

    Table {
        kind: RecordKind::Alert,
        columns: ALERT_COLUMNS,
        rows,
    }
}

pub fn normalize_tickets(tickets: &[TicketRecord]) -> Table {
    let rows = tickets
        .iter()
        .map(|ticket| {
            vec![
                Cell::Integer(ticket.id),
                Cell::Timestamp(ticket.created_at),
                Cell::Text(ticket.subject.clone()),
                Cell::Text(ticket.status.as_str().to_string()),
            ]
        })
        .collect();

    Table {
        kind: RecordKind::Ticket,
        columns: TICKET_COLUMNS,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::models::{AlertStatus, TicketStatus};
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_alert_table_keeps_column_and_row_order() {
        let alerts = vec![
            AlertRecord {
                id: 9,
                timestamp: at(3),
                host: "srv-web-01".to_string(),
                service: "CPU Load".to_string(),
                status: AlertStatus::Critical,
                message: "Threshold exceeded".to_string(),
                tenant_id: 1,
            },
            AlertRecord {
                id: 4,
                timestamp: at(1),
                host: "firewall-main".to_string(),
                service: "Memory Usage".to_string(),
                status: AlertStatus::Ok,
                message: "Recovered".to_string(),
                tenant_id: 1,
            },
        ];

        let table = normalize_alerts(&alerts);

        assert_eq!(
            table.columns(),
            &["id", "timestamp", "host", "service", "status", "message"]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][0], Cell::Integer(9));
        assert_eq!(table.rows()[1][1], Cell::Timestamp(at(1)));
        assert_eq!(table.rows()[1][4], Cell::Text("OK".to_string()));
    }

    #[test]
    fn test_ticket_table_columns() {
        let tickets = vec![TicketRecord {
            id: 12345,
            created_at: at(2),
            subject: "Issue with vpn".to_string(),
            status: TicketStatus::InProgress,
            tenant_id: 1,
        }];

        let table = normalize_tickets(&tickets);

        assert_eq!(table.columns(), &["id", "created_at", "subject", "status"]);
        assert_eq!(
            table.rows()[0],
            vec![
                Cell::Integer(12345),
                Cell::Timestamp(at(2)),
                Cell::Text("Issue with vpn".to_string()),
                Cell::Text("In Progress".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_bundle_yields_empty_tables_with_columns() {
        let (alerts, tickets) = normalize(&AggregationBundle::default());

        assert!(alerts.is_empty());
        assert!(tickets.is_empty());
        assert_eq!(alerts.columns().len(), 6);
        assert_eq!(tickets.columns().len(), 4);
    }

    #[test]
    fn test_unknown_column_lookup_fails_loudly() {
        let table = normalize_tickets(&[]);
        match table.column("severity") {
            Err(ReportError::MissingColumn { kind, column }) => {
                assert_eq!(kind, RecordKind::Ticket);
                assert_eq!(column, "severity");
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("unknown column resolved"),
        }
        assert_eq!(table.column("status").unwrap().count(), 0);
    }
}
