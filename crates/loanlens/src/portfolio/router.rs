use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;

use super::domain::{BorrowerId, LoanApplication};
use super::query::QuerySpec;
use super::repository::{BorrowerRepository, RepositoryError};
use super::service::{PortfolioService, PortfolioServiceError};

/// Router builder exposing HTTP endpoints for portfolio queries, intake,
/// detail lookup, and re-analysis.
pub fn portfolio_router<R>(service: Arc<PortfolioService<R>>) -> Router
where
    R: BorrowerRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/borrowers",
            get(list_handler::<R>).post(intake_handler::<R>),
        )
        .route("/api/v1/borrowers/:borrower_id", get(detail_handler::<R>))
        .route(
            "/api/v1/borrowers/:borrower_id/analysis",
            post(analyze_handler::<R>),
        )
        .with_state(service)
}

/// Raw query parameters as supplied by the listing screen.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ListParams {
    search: Option<String>,
    risk: Option<String>,
    sort: Option<String>,
    direction: Option<String>,
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Query(params): Query<ListParams>,
) -> Response
where
    R: BorrowerRepository + 'static,
{
    let spec = match QuerySpec::from_params(
        params.search.as_deref(),
        params.risk.as_deref(),
        params.sort.as_deref(),
        params.direction.as_deref(),
    ) {
        Ok(spec) => spec,
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match service.list(&spec) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn intake_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    axum::Json(application): axum::Json<LoanApplication>,
) -> Response
where
    R: BorrowerRepository + 'static,
{
    let today = Local::now().date_naive();
    match service.submit(application, today) {
        Ok(file) => (StatusCode::CREATED, axum::Json(file.detail_view())).into_response(),
        Err(PortfolioServiceError::Intake(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(PortfolioServiceError::Repository(RepositoryError::Conflict)) => {
            let payload = json!({ "error": "borrower already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Path(borrower_id): Path<String>,
) -> Response
where
    R: BorrowerRepository + 'static,
{
    let id = BorrowerId(borrower_id);
    match service.get(&id) {
        Ok(file) => (StatusCode::OK, axum::Json(file.detail_view())).into_response(),
        Err(PortfolioServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "borrower not found",
                "borrower_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn analyze_handler<R>(
    State(service): State<Arc<PortfolioService<R>>>,
    Path(borrower_id): Path<String>,
) -> Response
where
    R: BorrowerRepository + 'static,
{
    let id = BorrowerId(borrower_id);
    let today = Local::now().date_naive();
    match service.analyze(&id, today) {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Err(PortfolioServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "borrower not found",
                "borrower_id": id.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error @ PortfolioServiceError::MissingProfile(_)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

fn internal_error(error: PortfolioServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
