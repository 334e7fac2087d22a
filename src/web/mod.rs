use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::integrations::RecordSource;
use crate::server::config::ServerConfig;
use crate::services::auth_service::{self, UserDirectory};
use crate::web::{middleware::auth, models::LoginRequest, routes::*};

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub record_source: Arc<dyn RecordSource>,
    pub users: Arc<UserDirectory>,
}

async fn login_handler(
    State(app_state): State<Arc<AppState>>,
    Form(payload): Form<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let username = payload.username.clone();
    let login_response = auth_service::login_user(
        &app_state.users,
        payload,
        &app_state.config.jwt_secret,
        app_state.config.token_ttl_minutes,
    )
    .inspect_err(|e| warn!(username = %username, error = %e, "Login rejected."))?;
    info!(username = %username, "User logged in.");

    let auth_cookie = Cookie::build(("token", login_response.access_token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(true)
        .build();
    let cookie_value = HeaderValue::from_str(&auth_cookie.to_string())
        .map_err(|e| AppError::InternalServerError(format!("Invalid cookie header: {e}")))?;

    let mut response = Json(login_response).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie_value);

    Ok(response)
}

async fn root_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Agent Backend is running" }))
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(config: Arc<ServerConfig>, record_source: Arc<dyn RecordSource>) -> Router {
    let users = Arc::new(UserDirectory::new(config.users.clone()));
    let app_state = Arc::new(AppState {
        config,
        record_source,
        users,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root_handler))
        .route("/api/health", get(health_check_handler))
        .route("/token", post(login_handler))
        .merge(
            report_routes::create_report_router()
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth)),
        )
        .with_state(app_state)
        .layer(cors)
}
