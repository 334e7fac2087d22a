use std::collections::HashMap;

use super::error::ReportError;
use super::normalizer::Table;

/// Count of rows per distinct status value.
///
/// Entries are ordered by descending count, then ascending status name. The
/// dashboard writes its cells and builds its chart ranges from this single
/// ordering, so wedge colours always line up with the labels beneath them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDistribution {
    entries: Vec<(String, u64)>,
}

impl StatusDistribution {
    pub fn from_table(table: &Table) -> Result<Self, ReportError> {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for (index, cell) in table.column("status")?.enumerate() {
            let status = cell.as_text().ok_or_else(|| ReportError::SchemaViolation {
                kind: table.kind(),
                index,
                reason: format!("status is not text: {cell:?}"),
            })?;
            *counts.entry(status).or_insert(0) += 1;
        }

        let mut entries: Vec<(String, u64)> = counts
            .into_iter()
            .map(|(status, count)| (status.to_string(), count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[(String, u64)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }
}

#[cfg(test)]
impl StatusDistribution {
    fn count_of(&self, status: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(name, _)| name == status)
            .map(|(_, count)| *count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::models::{AlertRecord, AlertStatus};
    use crate::report::normalizer::normalize_alerts;
    use chrono::NaiveDate;

    fn alerts_with(statuses: &[AlertStatus]) -> Vec<AlertRecord> {
        let timestamp = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        statuses
            .iter()
            .enumerate()
            .map(|(i, status)| AlertRecord {
                id: i as i64,
                timestamp,
                host: "srv-app-02".to_string(),
                service: "CPU Load".to_string(),
                status: *status,
                message: "Threshold exceeded".to_string(),
                tenant_id: 1,
            })
            .collect()
    }

    #[test]
    fn test_distribution_counts_and_total() {
        let table = normalize_alerts(&alerts_with(&[
            AlertStatus::Critical,
            AlertStatus::Critical,
            AlertStatus::Warning,
            AlertStatus::Ok,
        ]));

        let distribution = StatusDistribution::from_table(&table).unwrap();

        assert_eq!(distribution.len(), 3);
        assert_eq!(distribution.total(), 4);
        assert_eq!(distribution.count_of("CRITICAL"), Some(2));
        assert_eq!(distribution.count_of("WARNING"), Some(1));
        assert_eq!(distribution.count_of("OK"), Some(1));
        assert_eq!(distribution.count_of("UNKNOWN"), None);
    }

    #[test]
    fn test_distribution_order_is_count_then_name() {
        let table = normalize_alerts(&alerts_with(&[
            AlertStatus::Warning,
            AlertStatus::Unknown,
            AlertStatus::Ok,
            AlertStatus::Unknown,
            AlertStatus::Critical,
        ]));

        let distribution = StatusDistribution::from_table(&table).unwrap();
        let names: Vec<&str> = distribution
            .entries()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();

        assert_eq!(names, vec!["UNKNOWN", "CRITICAL", "OK", "WARNING"]);
    }

    #[test]
    fn test_distribution_of_empty_table() {
        let distribution = StatusDistribution::from_table(&normalize_alerts(&[])).unwrap();
        assert!(distribution.is_empty());
        assert_eq!(distribution.total(), 0);
    }
}
