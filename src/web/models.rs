use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::report::{AlertRecord, TicketRecord};

/// Form body of `POST /token`.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Username
    pub company_id: i32,
    pub exp: usize,
}

/// Struct to hold authenticated user details, to be passed as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub company_id: i32,
    pub role: String,
}

/// Optional report window; missing dates default to today.
#[derive(Debug, Default, Deserialize)]
pub struct ReportRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub company_id: i32,
    pub alerts_count: usize,
    pub tickets_count: usize,
    pub alerts: Vec<AlertRecord>,
    pub tickets: Vec<TicketRecord>,
}
