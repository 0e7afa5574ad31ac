use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use loanlens::accounts::{accounts_router, AccountRepository, AccountService};
use loanlens::portfolio::{portfolio_router, BorrowerRepository, PortfolioService};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_service_routes<B, A>(
    portfolio: Arc<PortfolioService<B>>,
    accounts: Arc<AccountService<A>>,
) -> axum::Router
where
    B: BorrowerRepository + 'static,
    A: AccountRepository + 'static,
{
    portfolio_router(portfolio)
        .merge(accounts_router(accounts))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{
        default_assessment_config, sample_borrower_files, InMemoryAccountRepository,
        InMemoryBorrowerRepository,
    };
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> axum::Router {
        let repository = Arc::new(InMemoryBorrowerRepository::seeded(sample_borrower_files()));
        let portfolio = Arc::new(PortfolioService::new(
            repository,
            default_assessment_config(),
        ));
        let accounts = Arc::new(AccountService::new(Arc::new(
            InMemoryAccountRepository::default(),
        )));
        with_service_routes(portfolio, accounts)
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body.get("status"), Some(&Value::from("ok")));
    }

    #[tokio::test]
    async fn borrower_listing_is_served() {
        let response = app()
            .oneshot(
                axum::http::Request::get("/api/v1/borrowers?risk=medium")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        let payload: Value = serde_json::from_slice(&body).expect("json payload");
        assert_eq!(payload.get("matched"), Some(&Value::from(2)));
        assert_eq!(payload.get("total"), Some(&Value::from(5)));
    }

    #[tokio::test]
    async fn bad_query_params_yield_bad_request() {
        let response = app()
            .oneshot(
                axum::http::Request::get("/api/v1/borrowers?sort=shoe_size")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
