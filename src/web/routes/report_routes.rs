use axum::{
    Json, Router,
    extract::{Extension, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::report::{self, DateRange, flat, workbook};
use crate::web::models::{AuthenticatedUser, DashboardResponse, ReportRangeQuery};
use crate::web::{AppError, AppState};

// Mounted at the root; all routes require an authenticated user.
pub fn create_report_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route("/export", get(export_workbook_handler))
        .route("/export/csv", get(export_csv_handler))
}

fn resolve_range(query: &ReportRangeQuery) -> Result<DateRange, AppError> {
    let today = Utc::now().date_naive();
    let start = query.start_date.unwrap_or(today);
    let end = query.end_date.unwrap_or(today);
    Ok(DateRange::from_dates(start, end)?)
}

async fn dashboard_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ReportRangeQuery>,
) -> Result<Json<DashboardResponse>, AppError> {
    let range = resolve_range(&query)?;
    let bundle = report::aggregate(app_state.record_source.as_ref(), &range, user.company_id).await?;

    Ok(Json(DashboardResponse {
        company_id: user.company_id,
        alerts_count: bundle.alerts.len(),
        tickets_count: bundle.tickets.len(),
        alerts: bundle.alerts,
        tickets: bundle.tickets,
    }))
}

async fn export_workbook_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ReportRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = resolve_range(&query)?;
    let bundle = report::aggregate(app_state.record_source.as_ref(), &range, user.company_id).await?;
    let bytes = report::render_workbook(&bundle)?;

    info!(
        username = %user.username,
        company_id = user.company_id,
        bytes = bytes.len(),
        "Workbook export generated."
    );

    Ok((
        [
            (header::CONTENT_TYPE, workbook::XLSX_MEDIA_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", workbook::XLSX_FILENAME),
            ),
        ],
        bytes,
    ))
}

async fn export_csv_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ReportRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = resolve_range(&query)?;
    let bundle = report::aggregate(app_state.record_source.as_ref(), &range, user.company_id).await?;
    let csv = report::render_flat(&bundle)?;

    info!(
        username = %user.username,
        company_id = user.company_id,
        rows = bundle.alerts.len() + bundle.tickets.len(),
        "CSV export generated."
    );

    Ok((
        [
            (header::CONTENT_TYPE, flat::CSV_MEDIA_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", flat::CSV_FILENAME),
            ),
        ],
        csv,
    ))
}
