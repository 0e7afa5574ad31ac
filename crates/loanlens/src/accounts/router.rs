use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::domain::{Credentials, Registration};
use super::repository::{AccountRepository, AccountRepositoryError};
use super::service::{AccountService, AccountServiceError};

/// Router builder exposing HTTP endpoints for registration and login.
pub fn accounts_router<R>(service: Arc<AccountService<R>>) -> Router
where
    R: AccountRepository + 'static,
{
    Router::new()
        .route("/api/v1/accounts", post(register_handler::<R>))
        .route("/api/v1/sessions", post(login_handler::<R>))
        .with_state(service)
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    axum::Json(registration): axum::Json<Registration>,
) -> Response
where
    R: AccountRepository + 'static,
{
    match service.register(registration, Utc::now()) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(AccountServiceError::Registration(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(AccountServiceError::Repository(AccountRepositoryError::DuplicateEmail)) => {
            let payload = json!({ "error": "an account with this email already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn login_handler<R>(
    State(service): State<Arc<AccountService<R>>>,
    axum::Json(credentials): axum::Json<Credentials>,
) -> Response
where
    R: AccountRepository + 'static,
{
    match service.login(&credentials) {
        Ok(view) => (StatusCode::OK, axum::Json(json!({ "account": view }))).into_response(),
        Err(AccountServiceError::InvalidCredentials) => {
            let payload = json!({ "error": "invalid email or password" });
            (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
