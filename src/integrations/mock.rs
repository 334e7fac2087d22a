use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};
use tracing::debug;

use super::{RecordSource, decode_alerts, decode_tickets};
use crate::report::models::{AlertStatus, TicketStatus};
use crate::report::{AlertRecord, DateRange, ReportError, TicketRecord};

const ALERT_HOSTS: [&str; 4] = ["srv-web-01", "srv-db-01", "srv-app-02", "firewall-main"];
const TICKET_TOPICS: [&str; 4] = ["email", "printer", "network", "vpn"];

const MAX_ALERTS_PER_DAY: u32 = 5;
const MAX_TICKETS_PER_DAY: u32 = 3;
const TICKET_STREAM: u64 = 0x5449_434b_4554;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Fabricates monitoring alerts and helpdesk tickets, one random batch per
/// day of the requested range.
///
/// Documents are generated in the upstream JSON shape and decoded through
/// the same path a real client would use.
#[derive(Debug, Clone, Default)]
pub struct MockRecordSource {
    seed: Option<u64>,
}

impl MockRecordSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic output per `(seed, tenant)` pair.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    fn rng(&self, tenant_id: i32, stream: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ (tenant_id as u64) ^ stream),
            None => StdRng::from_os_rng(),
        }
    }

    pub fn alert_documents(&self, range: &DateRange, tenant_id: i32) -> Vec<Value> {
        let mut rng = self.rng(tenant_id, 0);
        let mut documents = Vec::new();
        for day in days(range) {
            for _ in 0..rng.random_range(0..=MAX_ALERTS_PER_DAY) {
                let service = if rng.random::<f64>() > 0.5 {
                    "CPU Load"
                } else {
                    "Memory Usage"
                };
                documents.push(json!({
                    "id": rng.random_range(1000..=9999),
                    "timestamp": day.format(TIMESTAMP_FORMAT).to_string(),
                    "host": pick(&mut rng, &ALERT_HOSTS),
                    "service": service,
                    "status": AlertStatus::ALL.choose(&mut rng).map(AlertStatus::as_str),
                    "message": "Threshold exceeded",
                    "company_id": tenant_id,
                }));
            }
        }
        documents
    }

    pub fn ticket_documents(&self, range: &DateRange, tenant_id: i32) -> Vec<Value> {
        let mut rng = self.rng(tenant_id, TICKET_STREAM);
        let mut documents = Vec::new();
        for day in days(range) {
            for _ in 0..rng.random_range(0..=MAX_TICKETS_PER_DAY) {
                documents.push(json!({
                    "id": rng.random_range(10000..=99999),
                    "created_at": day.format(TIMESTAMP_FORMAT).to_string(),
                    "subject": format!("Issue with {}", pick(&mut rng, &TICKET_TOPICS)),
                    "status": TicketStatus::ALL.choose(&mut rng).map(TicketStatus::as_str),
                    "company_id": tenant_id,
                }));
            }
        }
        documents
    }
}

fn pick(rng: &mut StdRng, options: &[&'static str]) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

/// Every day from `start` up to and including `end`, keeping `start`'s time of day.
fn days(range: &DateRange) -> impl Iterator<Item = NaiveDateTime> {
    let end = range.end();
    std::iter::successors(Some(range.start()), |day| day.checked_add_signed(Duration::days(1)))
        .take_while(move |day| *day <= end)
}

#[async_trait]
impl RecordSource for MockRecordSource {
    async fn fetch_alerts(
        &self,
        range: &DateRange,
        tenant_id: i32,
    ) -> Result<Vec<AlertRecord>, ReportError> {
        let documents = self.alert_documents(range, tenant_id);
        debug!(company_id = tenant_id, count = documents.len(), "Generated mock alerts.");
        decode_alerts(documents)
    }

    async fn fetch_tickets(
        &self,
        range: &DateRange,
        tenant_id: i32,
    ) -> Result<Vec<TicketRecord>, ReportError> {
        let documents = self.ticket_documents(range, tenant_id);
        debug!(company_id = tenant_id, count = documents.len(), "Generated mock tickets.");
        decode_tickets(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn week() -> DateRange {
        DateRange::from_dates(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_days_are_inclusive() {
        let collected: Vec<NaiveDateTime> = days(&week()).collect();
        assert_eq!(collected.len(), 7);
        assert_eq!(collected.first(), Some(&week().start()));
        assert_eq!(collected.last(), Some(&week().end()));
    }

    #[tokio::test]
    async fn test_generated_alerts_stay_within_shape() {
        let source = MockRecordSource::with_seed(42);
        let range = week();
        let alerts = source.fetch_alerts(&range, 101).await.unwrap();

        assert!(alerts.len() <= 7 * MAX_ALERTS_PER_DAY as usize);
        for alert in &alerts {
            assert!((1000..=9999).contains(&alert.id));
            assert!(alert.timestamp >= range.start() && alert.timestamp <= range.end());
            assert!(ALERT_HOSTS.contains(&alert.host.as_str()));
            assert!(alert.service == "CPU Load" || alert.service == "Memory Usage");
            assert_eq!(alert.message, "Threshold exceeded");
            assert_eq!(alert.tenant_id, 101);
        }
    }

    #[tokio::test]
    async fn test_generated_tickets_stay_within_shape() {
        let source = MockRecordSource::with_seed(7);
        let range = week();
        let tickets = source.fetch_tickets(&range, 1).await.unwrap();

        assert!(tickets.len() <= 7 * MAX_TICKETS_PER_DAY as usize);
        for ticket in &tickets {
            assert!((10000..=99999).contains(&ticket.id));
            assert!(ticket.subject.starts_with("Issue with "));
            assert_eq!(ticket.tenant_id, 1);
        }
    }

    #[test]
    fn test_seeded_source_is_deterministic() {
        let range = week();
        let first = MockRecordSource::with_seed(9).alert_documents(&range, 1);
        let second = MockRecordSource::with_seed(9).alert_documents(&range, 1);
        assert_eq!(first, second);
    }
}
