use tracing::{info, warn};

use super::error::ReportError;
use super::models::{AggregationBundle, DateRange, RecordKind};
use crate::integrations::RecordSource;

/// Fetches alerts and tickets for one tenant and wraps them in a bundle.
///
/// The source is trusted for ordering and content; records are never
/// filtered or deduplicated. A failure of either fetch, or any record tagged
/// with a different tenant, fails the whole aggregation.
pub async fn aggregate(
    source: &dyn RecordSource,
    range: &DateRange,
    tenant_id: i32,
) -> Result<AggregationBundle, ReportError> {
    let alerts = source.fetch_alerts(range, tenant_id).await?;
    let tickets = source.fetch_tickets(range, tenant_id).await?;

    for alert in &alerts {
        check_tenant(RecordKind::Alert, alert.id, tenant_id, alert.tenant_id)?;
    }
    for ticket in &tickets {
        check_tenant(RecordKind::Ticket, ticket.id, tenant_id, ticket.tenant_id)?;
    }

    info!(
        company_id = tenant_id,
        start = %range.start(),
        end = %range.end(),
        alerts = alerts.len(),
        tickets = tickets.len(),
        "Aggregated report data."
    );

    Ok(AggregationBundle { alerts, tickets })
}

fn check_tenant(kind: RecordKind, id: i64, expected: i32, found: i32) -> Result<(), ReportError> {
    if expected != found {
        warn!(%kind, id, expected, found, "Record tenant does not match request.");
        return Err(ReportError::TenantMismatch {
            kind,
            id,
            expected,
            found,
        });
    }
    Ok(())
}
